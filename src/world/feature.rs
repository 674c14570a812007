//! Scattered chunk features
//!
//! Trees, rocks, plants and special structures placed on top of terrain.

use serde::{Deserialize, Serialize};

use super::coords::{ChunkCoord, LocalPos, TilePos};

/// Special structures that can appear in a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Ruins,
    Temple,
    Camp,
    Grave,
}

impl StructureKind {
    pub const ALL: [StructureKind; 4] = [
        StructureKind::Ruins,
        StructureKind::Temple,
        StructureKind::Camp,
        StructureKind::Grave,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StructureKind::Ruins => "ruins",
            StructureKind::Temple => "temple",
            StructureKind::Camp => "camp",
            StructureKind::Grave => "grave",
        }
    }

    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            StructureKind::Ruins => (140, 140, 140),
            StructureKind::Temple => (212, 188, 122),
            StructureKind::Camp => (150, 75, 0),
            StructureKind::Grave => (102, 102, 102),
        }
    }
}

/// What a feature is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    Tree,
    Pine,
    Cactus,
    Rock,
    Flower,
    DeadBush,
    SnowPlant,
    Structure { kind: StructureKind, size: u8 },
}

impl FeatureKind {
    pub fn glyph(&self) -> char {
        match self {
            FeatureKind::Tree => '♣',
            FeatureKind::Pine => '♠',
            FeatureKind::Cactus => '¥',
            FeatureKind::Rock => 'o',
            FeatureKind::Flower => '✿',
            FeatureKind::DeadBush => '¤',
            FeatureKind::SnowPlant => '❄',
            FeatureKind::Structure { .. } => '■',
        }
    }

    pub fn is_structure(&self) -> bool {
        matches!(self, FeatureKind::Structure { .. })
    }

    /// Half-width of the square footprint around the anchor tile
    pub fn footprint_radius(&self) -> i32 {
        match self {
            FeatureKind::Structure { .. } => 1,
            _ => 0,
        }
    }
}

/// A feature placed inside a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Feature {
    pub kind: FeatureKind,
    /// Anchor tile inside the owning chunk
    pub local: LocalPos,
    /// Anchor tile in world space
    pub world: TilePos,
    /// Sprite variant picked at generation time
    pub variant: u8,
    pub blocks_movement: bool,
}

impl Feature {
    pub fn new(
        kind: FeatureKind,
        chunk: ChunkCoord,
        local: LocalPos,
        variant: u8,
        blocks_movement: bool,
    ) -> Self {
        Self {
            kind,
            local,
            world: local.to_world(chunk),
            variant,
            blocks_movement,
        }
    }

    /// Does this feature occupy the given local tile?
    pub fn covers(&self, pos: LocalPos) -> bool {
        let r = self.kind.footprint_radius();
        (pos.x() - self.local.x()).abs() <= r && (pos.y() - self.local.y()).abs() <= r
    }
}
