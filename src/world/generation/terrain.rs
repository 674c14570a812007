//! Tile synthesis
//!
//! Turns sampled terrain values into concrete tiles.

use serde::{Deserialize, Serialize};

use super::biomes::Biome;
use crate::world::tile::{Tile, TileKind};

/// Maps (terrain value, moisture, biome) to a tile
pub trait TileSynthesizer {
    /// Must be pure. `elevation` and `moisture` are in `[0, 1)`.
    fn synthesize(&self, elevation: f64, moisture: f64, biome: Biome) -> Tile;
}

/// Threshold-based terrain rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainRules {
    /// Moisture above this can flood low ground
    pub wet_threshold: f64,
    /// Elevation below this can flood when wet
    pub low_threshold: f64,
    /// Desert sand turns into dunes above this
    pub dune_threshold: f64,
    /// Mountain stone turns into impassable peaks above this
    pub peak_threshold: f64,
    /// Snow turns into ice above this
    pub ice_threshold: f64,
    /// Plains grass flowers above this moisture
    pub flower_moisture: f64,
    /// Elevation to height multiplier
    pub height_scale: f64,
}

impl Default for TerrainRules {
    fn default() -> Self {
        Self {
            wet_threshold: 0.85,
            low_threshold: 0.4,
            dune_threshold: 0.7,
            peak_threshold: 0.6,
            ice_threshold: 0.7,
            flower_moisture: 0.7,
            height_scale: 10.0,
        }
    }
}

impl TerrainRules {
    /// Would this sample be flooded regardless of biome?
    pub fn is_flooded(&self, elevation: f64, moisture: f64) -> bool {
        moisture > self.wet_threshold && elevation < self.low_threshold
    }

    fn base_height(&self, elevation: f64) -> u8 {
        (elevation * self.height_scale).floor().clamp(0.0, f64::from(u8::MAX - 8)) as u8
    }

    fn biome_tile(&self, elevation: f64, moisture: f64, biome: Biome) -> Tile {
        let height = self.base_height(elevation);
        match biome {
            Biome::Desert => {
                if elevation > self.dune_threshold {
                    Tile::new(TileKind::Dune, height + 2)
                } else {
                    Tile::new(TileKind::Sand, height)
                }
            }
            Biome::Plains => {
                if moisture > self.flower_moisture {
                    Tile::new(TileKind::Flower, height)
                } else {
                    Tile::new(TileKind::Grass, height)
                }
            }
            Biome::Forest => {
                Tile::new(TileKind::Grass, height).with_color(biome.profile().grass_color)
            }
            Biome::Mountains => {
                if elevation > self.peak_threshold {
                    Tile::new(TileKind::Mountain, height + 5)
                } else {
                    Tile::new(TileKind::Stone, height)
                }
            }
            Biome::Snowlands => {
                if elevation > self.ice_threshold {
                    Tile::new(TileKind::Ice, height)
                } else {
                    Tile::new(TileKind::Snow, height)
                }
            }
        }
    }
}

impl TileSynthesizer for TerrainRules {
    fn synthesize(&self, elevation: f64, moisture: f64, biome: Biome) -> Tile {
        // Water wins over every biome rule
        if self.is_flooded(elevation, moisture) {
            return Tile::new(TileKind::Water, 0);
        }
        self.biome_tile(elevation, moisture, biome)
    }
}
