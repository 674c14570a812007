//! World configuration
//!
//! Loads world tunables from a RON file, with fallback to built-in defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldError};
use crate::world::generation::{NoiseKind, NoiseLayer, TerrainRules, TerrainTuning};

/// Default location of the world config file
pub const DEFAULT_CONFIG_PATH: &str = "assets/world.ron";

/// Tunables for a world session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Fixed seed, or `None` to pick one at world start
    pub seed: Option<u32>,
    /// Pixels per tile
    pub tile_size: u32,
    /// Viewport size in tiles, used to center the camera
    pub viewport_tiles: (u32, u32),
    /// Chunks within this Chebyshev radius of the player are kept resident
    pub visible_radius: u32,
    /// Extra margin beyond `visible_radius` before a chunk may be evicted
    pub hysteresis: u32,
    /// Soft bound on resident chunks
    pub max_chunks: usize,
    pub noise: NoiseKind,
    pub terrain: TerrainTuning,
    pub rules: TerrainRules,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tile_size: 16,
            viewport_tiles: (20, 12),
            visible_radius: 2,
            hysteresis: 5,
            max_chunks: 100,
            noise: NoiseKind::Hash,
            terrain: TerrainTuning::default(),
            rules: TerrainRules::default(),
        }
    }
}

impl WorldConfig {
    /// Load from a RON file, falling back to defaults if it is missing or broken
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No world config at {:?}, using defaults", path);
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => match Self::from_ron_str(&content) {
                Ok(config) => {
                    log::info!("World config loaded from {:?}", path);
                    return config;
                }
                Err(e) => log::warn!("Failed to parse {:?}: {}", path, e),
            },
            Err(e) => log::warn!("Failed to read {:?}: {}", path, e),
        }
        Self::default()
    }

    /// Parse and validate a RON document
    pub fn from_ron_str(content: &str) -> Result<Self> {
        let config: Self =
            ron::from_str(content).map_err(|e| WorldError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| WorldError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Write the default config as pretty RON
    pub fn export_default(path: &Path) -> Result<()> {
        let content = Self::default().to_ron()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| WorldError::Config(format!("Failed to create {:?}: {}", parent, e)))?;
        }
        fs::write(path, content)
            .map_err(|e| WorldError::Config(format!("Failed to write {:?}: {}", path, e)))
    }

    /// Eviction radius: visible radius plus hysteresis
    pub fn keep_radius(&self) -> u32 {
        self.visible_radius.saturating_add(self.hysteresis)
    }

    /// Chunks in the residency square around the player
    pub fn resident_square(&self) -> usize {
        let side = 2 * self.visible_radius as usize + 1;
        side * side
    }

    /// Chunks that survive eviction around a fixed center
    pub fn retained_disk(&self) -> usize {
        let r = i64::from(self.keep_radius());
        let mut count = 0;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    count += 1;
                }
            }
        }
        count
    }

    /// Reject configs the generator cannot work with.
    ///
    /// A retention disk larger than `max_chunks` is allowed; the cache then
    /// overflows its bound until the player moves on.
    pub fn validate(&self) -> Result<()> {
        if self.tile_size == 0 {
            return Err(WorldError::Config("tile_size must be positive".into()));
        }
        if self.max_chunks == 0 {
            return Err(WorldError::Config("max_chunks must be positive".into()));
        }
        if self.visible_radius > 64 || self.hysteresis > 64 {
            return Err(WorldError::Config(format!(
                "radius {} + {} is too large",
                self.visible_radius, self.hysteresis
            )));
        }

        let t = &self.terrain;
        for (name, layer) in [
            ("biome", &t.biome),
            ("elevation", &t.elevation),
            ("moisture", &t.moisture),
            ("detail", &t.detail),
        ] {
            check_layer(name, layer)?;
        }
        for (name, weight) in [
            ("elevation_weight", t.elevation_weight),
            ("moisture_weight", t.moisture_weight),
            ("detail_weight", t.detail_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(WorldError::Config(format!("{} must be >= 0, got {}", name, weight)));
            }
        }
        if t.total_weight() > 1.0 {
            return Err(WorldError::Config(format!(
                "terrain weights sum to {}, must be at most 1",
                t.total_weight()
            )));
        }

        let r = &self.rules;
        for (name, value) in [
            ("wet_threshold", r.wet_threshold),
            ("low_threshold", r.low_threshold),
            ("dune_threshold", r.dune_threshold),
            ("peak_threshold", r.peak_threshold),
            ("ice_threshold", r.ice_threshold),
            ("flower_moisture", r.flower_moisture),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(WorldError::Config(format!("{} must be in [0, 1], got {}", name, value)));
            }
        }
        if !r.height_scale.is_finite() || r.height_scale < 0.0 {
            return Err(WorldError::Config(format!(
                "height_scale must be >= 0, got {}",
                r.height_scale
            )));
        }

        if self.retained_disk() > self.max_chunks {
            log::info!(
                "Retention radius {} keeps up to {} chunks, above max_chunks {}; cache may overflow",
                self.keep_radius(),
                self.retained_disk(),
                self.max_chunks
            );
        }

        Ok(())
    }
}

fn check_layer(name: &str, layer: &NoiseLayer) -> Result<()> {
    if layer.octaves == 0 {
        return Err(WorldError::Config(format!("{} layer needs at least one octave", name)));
    }
    if !layer.scale.is_finite() || layer.scale <= 0.0 {
        return Err(WorldError::Config(format!("{} scale must be positive", name)));
    }
    if !(layer.persistence > 0.0 && layer.persistence <= 1.0) {
        return Err(WorldError::Config(format!(
            "{} persistence must be in (0, 1], got {}",
            name, layer.persistence
        )));
    }
    Ok(())
}
