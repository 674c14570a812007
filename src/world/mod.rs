//! World module
//!
//! Chunk data structures, tiles, procedural generation and the chunk cache.

pub mod chunk;
pub mod coordinator;
pub mod coords;
pub mod feature;
pub mod generation;
pub mod store;
pub mod tile;

pub use chunk::Chunk;
pub use coordinator::{Camera, TickReport, World, WorldSnapshot};
pub use coords::{ChunkCoord, LocalPos, TilePos, CHUNK_AREA, CHUNK_SIZE};
pub use feature::{Feature, FeatureKind, StructureKind};
pub use generation::{Biome, ChunkGenerator, WorldSeed};
pub use store::{ChunkStore, StoreStats};
pub use tile::{Tile, TileKind};
