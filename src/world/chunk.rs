//! Chunk data structure
//!
//! A fixed-size square of generated tiles plus the features scattered on it.
//! Chunks are built whole by the generator and never modified afterwards.

use std::time::Instant;

use super::coords::{ChunkCoord, LocalPos, TilePos, CHUNK_AREA};
use super::feature::Feature;
use super::generation::Biome;
use super::tile::Tile;

/// A generated block of `CHUNK_SIZE x CHUNK_SIZE` tiles
#[derive(Debug, Clone)]
pub struct Chunk {
    coord: ChunkCoord,
    biome: Biome,
    tiles: Vec<Tile>,
    features: Vec<Feature>,
    generated_at: Instant,
}

impl Chunk {
    /// `tiles` must hold exactly `CHUNK_AREA` tiles in row-major order
    pub(crate) fn new(
        coord: ChunkCoord,
        biome: Biome,
        tiles: Vec<Tile>,
        features: Vec<Feature>,
    ) -> Self {
        debug_assert_eq!(tiles.len(), CHUNK_AREA);
        Self {
            coord,
            biome,
            tiles,
            features,
            generated_at: Instant::now(),
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn biome(&self) -> Biome {
        self.biome
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn generated_at(&self) -> Instant {
        self.generated_at
    }

    /// World tile of the top-left corner
    pub fn origin(&self) -> TilePos {
        self.coord.origin()
    }

    /// Tile at a local position
    #[inline]
    pub fn tile(&self, pos: LocalPos) -> &Tile {
        &self.tiles[pos.index()]
    }

    /// Tile at raw local coordinates, `None` outside the chunk
    pub fn tile_at(&self, x: i32, y: i32) -> Option<&Tile> {
        LocalPos::new(x, y).map(|pos| self.tile(pos))
    }

    /// All tiles in row-major order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tiles paired with their local positions
    pub fn iter_tiles(&self) -> impl Iterator<Item = (LocalPos, &Tile)> {
        LocalPos::all().zip(self.tiles.iter())
    }

    /// Feature occupying a local tile, if any
    pub fn feature_at(&self, pos: LocalPos) -> Option<&Feature> {
        self.features.iter().find(|f| f.covers(pos))
    }

    /// Walkable terrain with no blocking feature on it
    pub fn is_passable(&self, pos: LocalPos) -> bool {
        self.tile(pos).is_walkable()
            && !self
                .features
                .iter()
                .any(|f| f.blocks_movement && f.covers(pos))
    }
}

/// Generation time is not part of a chunk's identity
impl PartialEq for Chunk {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
            && self.biome == other.biome
            && self.tiles == other.tiles
            && self.features == other.features
    }
}

impl Eq for Chunk {}
