//! Error types
//!
//! Every failure in the world core is local: a bad coordinate is rejected, a
//! failed chunk stays absent and is retried on a later tick.

use thiserror::Error;

use crate::world::ChunkCoord;

pub type Result<T> = std::result::Result<T, WorldError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    /// Non-finite or out-of-range position handed to the world
    #[error("invalid coordinate ({x}, {y})")]
    InvalidCoordinate { x: f64, y: f64 },

    /// Chunk generation failed; nothing was cached for `coord`
    #[error("failed to generate chunk {coord}: {reason}")]
    Generation { coord: ChunkCoord, reason: String },

    #[error("invalid world config: {0}")]
    Config(String),
}
