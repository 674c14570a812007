//! Biome definitions and configuration
//!
//! Biomes are picked per chunk from a coarse noise sample. Each biome has a
//! ground color and a feature profile driving the scatter pass.

use serde::{Deserialize, Serialize};

use crate::world::feature::FeatureKind;

/// Coarse terrain categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Desert,
    Plains,
    Forest,
    Mountains,
    Snowlands,
}

/// Feature scatter parameters for a biome
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomeProfile {
    /// Placement attempts per chunk
    pub feature_slots: u32,
    /// Relative weights for (tree, rock, plant) per slot
    pub tree_weight: u32,
    pub rock_weight: u32,
    pub plant_weight: u32,
    /// What a "tree" looks like here
    pub tree: FeatureKind,
    /// What a "plant" looks like here
    pub plant: FeatureKind,
    /// Grass color for biomes that use grass tiles
    pub grass_color: (u8, u8, u8),
}

impl Biome {
    pub const ALL: [Biome; 5] = [
        Biome::Desert,
        Biome::Plains,
        Biome::Forest,
        Biome::Mountains,
        Biome::Snowlands,
    ];

    /// Map a noise sample to a biome.
    ///
    /// Bands are ordered and contiguous; changing them changes every world.
    /// Anything that fails all comparisons (including NaN) lands in the last band.
    pub fn classify(value: f64) -> Biome {
        if value < 0.2 {
            Biome::Desert
        } else if value < 0.4 {
            Biome::Plains
        } else if value < 0.6 {
            Biome::Forest
        } else if value < 0.8 {
            Biome::Mountains
        } else {
            Biome::Snowlands
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Biome::Desert => "Desert",
            Biome::Plains => "Plains",
            Biome::Forest => "Forest",
            Biome::Mountains => "Mountains",
            Biome::Snowlands => "Snowlands",
        }
    }

    /// Get the scatter profile for this biome
    pub fn profile(&self) -> BiomeProfile {
        match self {
            Biome::Desert => BiomeProfile {
                feature_slots: 7,
                tree_weight: 1,
                rock_weight: 5,
                plant_weight: 1,
                tree: FeatureKind::Cactus,
                plant: FeatureKind::DeadBush,
                grass_color: (122, 171, 103),
            },
            Biome::Plains => BiomeProfile {
                feature_slots: 9,
                tree_weight: 3,
                rock_weight: 2,
                plant_weight: 4,
                tree: FeatureKind::Tree,
                plant: FeatureKind::Flower,
                grass_color: (122, 171, 103),
            },
            Biome::Forest => BiomeProfile {
                feature_slots: 21,  // Dense canopy
                tree_weight: 15,
                rock_weight: 3,
                plant_weight: 3,
                tree: FeatureKind::Tree,
                plant: FeatureKind::Flower,
                grass_color: (77, 138, 61),
            },
            Biome::Mountains => BiomeProfile {
                feature_slots: 11,
                tree_weight: 2,
                rock_weight: 8,
                plant_weight: 1,
                tree: FeatureKind::Tree,
                plant: FeatureKind::Flower,
                grass_color: (122, 171, 103),
            },
            Biome::Snowlands => BiomeProfile {
                feature_slots: 10,
                tree_weight: 4,
                rock_weight: 5,
                plant_weight: 1,
                tree: FeatureKind::Pine,
                plant: FeatureKind::SnowPlant,
                grass_color: (122, 171, 103),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(Biome::classify(0.0), Biome::Desert);
        assert_eq!(Biome::classify(0.1999), Biome::Desert);
        assert_eq!(Biome::classify(0.2), Biome::Plains);
        assert_eq!(Biome::classify(0.4), Biome::Forest);
        assert_eq!(Biome::classify(0.6), Biome::Mountains);
        assert_eq!(Biome::classify(0.8), Biome::Snowlands);
        assert_eq!(Biome::classify(0.9999), Biome::Snowlands);
    }

    #[test]
    fn test_classification_is_total_and_monotonic() {
        let mut last = 0usize;
        for i in 0..10_000 {
            let v = i as f64 / 10_000.0;
            let biome = Biome::classify(v);
            let rank = Biome::ALL.iter().position(|b| *b == biome).unwrap();
            assert!(rank >= last, "classification went backwards at {}", v);
            last = rank;
        }
        assert_eq!(last, Biome::ALL.len() - 1);
    }

    #[test]
    fn test_degenerate_inputs_still_classify() {
        assert_eq!(Biome::classify(-3.0), Biome::Desert);
        assert_eq!(Biome::classify(f64::NAN), Biome::Snowlands);
    }

    #[test]
    fn test_forest_is_denser_than_plains() {
        assert!(Biome::Forest.profile().feature_slots > Biome::Plains.profile().feature_slots);
    }

    #[test]
    fn test_every_profile_has_a_positive_weight() {
        for biome in Biome::ALL {
            let p = biome.profile();
            assert!(p.tree_weight + p.rock_weight + p.plant_weight > 0, "{:?}", biome);
        }
    }
}
