//! Coordinate spaces
//!
//! World tiles, chunks and chunk-local tiles. All conversions use floor
//! division so negative coordinates land in the right chunk.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Width and height of a chunk, in tiles
pub const CHUNK_SIZE: i32 = 16;

const _: () = assert!(CHUNK_SIZE > 0, "CHUNK_SIZE must be positive");

/// Number of tiles in a chunk
pub const CHUNK_AREA: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;

/// Position of a chunk in the chunk grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// World tile of this chunk's top-left corner
    pub fn origin(&self) -> TilePos {
        TilePos::new(self.x.saturating_mul(CHUNK_SIZE), self.y.saturating_mul(CHUNK_SIZE))
    }

    /// Chebyshev distance in chunk units
    pub fn chebyshev_distance(&self, other: &ChunkCoord) -> i64 {
        let dx = (i64::from(self.x) - i64::from(other.x)).abs();
        let dy = (i64::from(self.y) - i64::from(other.y)).abs();
        dx.max(dy)
    }

    /// Squared Euclidean distance in chunk units
    pub fn distance_squared(&self, other: &ChunkCoord) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }

    /// All chunks within Chebyshev `radius` of this one, row by row
    pub fn square_around(&self, radius: u32) -> impl Iterator<Item = ChunkCoord> {
        let r = radius as i32;
        let center = *self;
        (-r..=r).flat_map(move |dy| {
            (-r..=r).map(move |dx| {
                ChunkCoord::new(center.x.saturating_add(dx), center.y.saturating_add(dy))
            })
        })
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Absolute tile position in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk containing this tile
    #[inline]
    pub fn chunk(&self) -> ChunkCoord {
        ChunkCoord::new(self.x.div_euclid(CHUNK_SIZE), self.y.div_euclid(CHUNK_SIZE))
    }

    /// Position of this tile inside its chunk
    #[inline]
    pub fn local(&self) -> LocalPos {
        LocalPos {
            x: self.x.rem_euclid(CHUNK_SIZE),
            y: self.y.rem_euclid(CHUNK_SIZE),
        }
    }
}

/// Tile position inside a chunk, always in `[0, CHUNK_SIZE)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalPos {
    x: i32,
    y: i32,
}

impl LocalPos {
    /// Returns `None` when either component is outside the chunk
    pub fn new(x: i32, y: i32) -> Option<Self> {
        if (0..CHUNK_SIZE).contains(&x) && (0..CHUNK_SIZE).contains(&y) {
            Some(Self { x, y })
        } else {
            None
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    /// Row-major index into a chunk's tile array
    #[inline]
    pub fn index(&self) -> usize {
        (self.y * CHUNK_SIZE + self.x) as usize
    }

    /// Inverse of [`LocalPos::index`]
    #[inline]
    pub fn from_index(idx: usize) -> Option<Self> {
        if idx >= CHUNK_AREA {
            return None;
        }
        let idx = idx as i32;
        Some(Self {
            x: idx % CHUNK_SIZE,
            y: idx / CHUNK_SIZE,
        })
    }

    /// World tile for this local position in `chunk`
    pub fn to_world(&self, chunk: ChunkCoord) -> TilePos {
        let origin = chunk.origin();
        TilePos::new(origin.x.saturating_add(self.x), origin.y.saturating_add(self.y))
    }

    /// Iterate every local position in row-major order
    pub fn all() -> impl Iterator<Item = LocalPos> {
        (0..CHUNK_SIZE).flat_map(|y| (0..CHUNK_SIZE).map(move |x| LocalPos { x, y }))
    }
}
