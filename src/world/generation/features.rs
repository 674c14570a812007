//! Feature scatter pass
//!
//! Places trees, rocks, plants and the occasional structure on a freshly
//! synthesized tile grid. All randomness comes from the chunk's own seeded
//! RNG, so the result depends only on the chunk coordinate and world seed.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::biomes::Biome;
use crate::world::coords::{ChunkCoord, LocalPos, CHUNK_SIZE};
use crate::world::feature::{Feature, FeatureKind, StructureKind};
use crate::world::tile::Tile;

/// Chance that a chunk gets a special structure
const STRUCTURE_CHANCE: f64 = 0.05;
/// Chance that a placed rock blocks movement
const ROCK_BLOCK_CHANCE: f64 = 0.7;
/// Structures keep this many tiles clear of the chunk edge
const STRUCTURE_MARGIN: i32 = 2;

/// Scatter features over `tiles` (row-major, `CHUNK_AREA` long).
///
/// Positions on non-walkable terrain or already occupied by another feature
/// are rejected and the slot is skipped.
pub fn scatter_features(
    rng: &mut ChaCha8Rng,
    coord: ChunkCoord,
    biome: Biome,
    tiles: &[Tile],
) -> Result<Vec<Feature>, String> {
    let profile = biome.profile();
    let mut features: Vec<Feature> = Vec::new();

    if rng.gen_bool(STRUCTURE_CHANCE) {
        if let Some(structure) = place_structure(rng, coord, tiles) {
            features.push(structure);
        }
    }

    let weights = [profile.tree_weight, profile.rock_weight, profile.plant_weight];
    let choice = WeightedIndex::new(weights)
        .map_err(|e| format!("bad feature weights for {}: {}", biome.name(), e))?;

    for _ in 0..profile.feature_slots {
        let pos = random_local(rng, 0, CHUNK_SIZE)?;

        // Draw the kind before rejecting so every slot consumes the same rolls
        let slot = choice.sample(rng);
        let variant_roll: u8 = rng.gen();
        let block_roll = rng.gen_bool(ROCK_BLOCK_CHANCE);

        if !tiles[pos.index()].is_walkable() || features.iter().any(|f| f.covers(pos)) {
            continue;
        }

        let feature = match slot {
            0 => Feature::new(profile.tree, coord, pos, variant_roll % 3, true),
            1 => Feature::new(FeatureKind::Rock, coord, pos, variant_roll % 2, block_roll),
            _ => Feature::new(profile.plant, coord, pos, variant_roll % 4, false),
        };
        features.push(feature);
    }

    Ok(features)
}

/// Try to place a structure; every tile of its footprint must be walkable
fn place_structure(rng: &mut ChaCha8Rng, coord: ChunkCoord, tiles: &[Tile]) -> Option<Feature> {
    let pos = random_local(rng, STRUCTURE_MARGIN, CHUNK_SIZE - STRUCTURE_MARGIN).ok()?;
    let kind = StructureKind::ALL[rng.gen_range(0..StructureKind::ALL.len())];
    let size = rng.gen_range(2..=4);
    let feature_kind = FeatureKind::Structure { kind, size };

    if !footprint_is_walkable(tiles, pos, feature_kind.footprint_radius()) {
        return None;
    }

    log::debug!("Placed {} in chunk {}", kind.name(), coord);
    Some(Feature::new(feature_kind, coord, pos, 0, true))
}

fn footprint_is_walkable(tiles: &[Tile], anchor: LocalPos, radius: i32) -> bool {
    (-radius..=radius).all(|dy| {
        (-radius..=radius).all(|dx| {
            LocalPos::new(anchor.x() + dx, anchor.y() + dy)
                .is_some_and(|p| tiles[p.index()].is_walkable())
        })
    })
}

fn random_local(rng: &mut ChaCha8Rng, min: i32, max: i32) -> Result<LocalPos, String> {
    let x = rng.gen_range(min..max);
    let y = rng.gen_range(min..max);
    LocalPos::new(x, y).ok_or_else(|| format!("scatter position ({}, {}) outside chunk", x, y))
}
