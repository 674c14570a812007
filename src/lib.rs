//! Umbral - procedural infinite world core
//!
//! Deterministic seeded terrain, chunked on demand around the player
//! and cached with distance-based eviction.

pub mod data;
pub mod error;
pub mod world;

// Re-export commonly used types
pub use data::WorldConfig;
pub use error::{Result, WorldError};
pub use world::{Chunk, ChunkCoord, Tile, World};
