//! Tile definitions
//!
//! Terrain tile kinds and the immutable tile descriptor stored in chunks.

use serde::{Deserialize, Serialize};

/// A single generated terrain tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub kind: TileKind,
    pub walkable: bool,
    /// Display color (RGB)
    pub color: (u8, u8, u8),
    /// Visual height, only used for the pseudo-3D offset when drawing
    pub height: u8,
}

impl Tile {
    /// Create a tile with the kind's default color and walkability
    pub fn new(kind: TileKind, height: u8) -> Self {
        Self {
            kind,
            walkable: kind.is_walkable(),
            color: kind.default_color(),
            height,
        }
    }

    /// Override the display color
    pub fn with_color(mut self, color: (u8, u8, u8)) -> Self {
        self.color = color;
        self
    }

    pub fn is_walkable(&self) -> bool {
        self.walkable
    }

    pub fn glyph(&self) -> char {
        self.kind.glyph()
    }
}

/// Types of terrain tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Grass,
    Flower,
    Sand,
    Dune,
    Stone,
    Mountain,
    Snow,
    Ice,
    Water,
}

impl TileKind {
    pub const ALL: [TileKind; 9] = [
        TileKind::Grass,
        TileKind::Flower,
        TileKind::Sand,
        TileKind::Dune,
        TileKind::Stone,
        TileKind::Mountain,
        TileKind::Snow,
        TileKind::Ice,
        TileKind::Water,
    ];

    pub fn is_walkable(&self) -> bool {
        !matches!(self, TileKind::Mountain | TileKind::Water)
    }

    pub fn glyph(&self) -> char {
        match self {
            TileKind::Grass => '.',
            TileKind::Flower => '"',
            TileKind::Sand => ':',
            TileKind::Dune => '~',
            TileKind::Stone => ',',
            TileKind::Mountain => '^',
            TileKind::Snow => '*',
            TileKind::Ice => '_',
            TileKind::Water => '≈',
        }
    }

    pub fn default_color(&self) -> (u8, u8, u8) {
        match self {
            TileKind::Grass => (122, 171, 103),
            TileKind::Flower => (138, 185, 121),
            TileKind::Sand => (219, 210, 142),
            TileKind::Dune => (214, 201, 123),
            TileKind::Stone => (142, 142, 142),
            TileKind::Mountain => (107, 107, 107),
            TileKind::Snow => (232, 240, 240),
            TileKind::Ice => (179, 224, 229),
            TileKind::Water => (38, 102, 145),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TileKind::Grass => "grass",
            TileKind::Flower => "flower",
            TileKind::Sand => "sand",
            TileKind::Dune => "dune",
            TileKind::Stone => "stone",
            TileKind::Mountain => "mountain",
            TileKind::Snow => "snow",
            TileKind::Ice => "ice",
            TileKind::Water => "water",
        }
    }
}
