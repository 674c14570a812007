//! Procedural chunk generation
//!
//! Terrain is sampled in world tile coordinates so neighbouring chunks meet
//! seamlessly; features use a per-chunk seed so their placement does not
//! repeat from chunk to chunk.

pub mod biomes;
pub mod features;
pub mod noise;
pub mod terrain;

pub use biomes::{Biome, BiomeProfile};
pub use noise::{HashNoise, NoiseField, NoiseKind, PerlinNoise};
pub use terrain::{TerrainRules, TileSynthesizer};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::chunk::Chunk;
use super::coords::{ChunkCoord, LocalPos, CHUNK_AREA};
use super::tile::Tile;
use crate::error::{Result, WorldError};

/// Odd primes decorrelating feature placement between chunks
const CHUNK_PRIME_X: i64 = 73_856_093;
const CHUNK_PRIME_Y: i64 = 19_349_663;

/// Seed offsets separating the noise layers
const MOISTURE_SEED_OFFSET: u32 = 123;
const DETAIL_SEED_OFFSET: u32 = 456;

/// Seed that drives every procedural decision in a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldSeed(pub u32);

impl WorldSeed {
    /// Pick a fresh seed in `[0, 10000)`
    pub fn random() -> Self {
        use rand::Rng;
        Self(rand::thread_rng().gen_range(0..10_000))
    }

    /// Per-chunk seed for the feature scatter pass
    pub fn chunk_seed(&self, coord: ChunkCoord) -> u64 {
        i64::from(self.0)
            .wrapping_add(i64::from(coord.x).wrapping_mul(CHUNK_PRIME_X))
            .wrapping_add(i64::from(coord.y).wrapping_mul(CHUNK_PRIME_Y)) as u64
    }
}

/// One fractal noise layer: sampling scale, octave count and persistence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseLayer {
    pub scale: f64,
    pub octaves: u32,
    pub persistence: f64,
}

impl NoiseLayer {
    pub const fn new(scale: f64, octaves: u32, persistence: f64) -> Self {
        Self { scale, octaves, persistence }
    }
}

/// Tunables for terrain sampling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainTuning {
    /// Per-chunk biome selection (sampled at chunk centers)
    pub biome: NoiseLayer,
    pub elevation: NoiseLayer,
    pub moisture: NoiseLayer,
    pub detail: NoiseLayer,
    /// Weights combining the three layers into a terrain value
    pub elevation_weight: f64,
    pub moisture_weight: f64,
    pub detail_weight: f64,
}

impl Default for TerrainTuning {
    fn default() -> Self {
        Self {
            biome: NoiseLayer::new(0.05, 2, 0.5),
            elevation: NoiseLayer::new(0.05, 4, 0.5),
            moisture: NoiseLayer::new(0.07, 3, 0.4),
            detail: NoiseLayer::new(0.2, 2, 0.3),
            elevation_weight: 0.6,
            moisture_weight: 0.3,
            detail_weight: 0.1,
        }
    }
}

impl TerrainTuning {
    /// Sum of the three layer weights; at most 1 keeps terrain in `[0, 1)`
    pub fn total_weight(&self) -> f64 {
        self.elevation_weight + self.moisture_weight + self.detail_weight
    }
}

/// Per-tile samples before synthesis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainSample {
    pub elevation: f64,
    pub moisture: f64,
    pub detail: f64,
    /// Weighted combination fed to the synthesizer
    pub terrain: f64,
}

/// Builds chunks from a seed, a noise field and a tile synthesizer
pub struct ChunkGenerator {
    seed: WorldSeed,
    tuning: TerrainTuning,
    noise: Box<dyn NoiseField>,
    synthesizer: Box<dyn TileSynthesizer>,
}

impl ChunkGenerator {
    pub fn new(
        seed: WorldSeed,
        tuning: TerrainTuning,
        noise: Box<dyn NoiseField>,
        synthesizer: Box<dyn TileSynthesizer>,
    ) -> Self {
        Self { seed, tuning, noise, synthesizer }
    }

    /// Hash noise with the default terrain rules
    pub fn with_defaults(seed: WorldSeed) -> Self {
        Self::new(
            seed,
            TerrainTuning::default(),
            Box::new(HashNoise),
            Box::new(TerrainRules::default()),
        )
    }

    pub fn seed(&self) -> WorldSeed {
        self.seed
    }

    pub fn tuning(&self) -> &TerrainTuning {
        &self.tuning
    }

    /// Dominant biome of a chunk, from a coarse sample at its center
    pub fn biome_at(&self, coord: ChunkCoord) -> Result<Biome> {
        let layer = self.tuning.biome;
        let x = (f64::from(coord.x) + 0.5) * layer.scale;
        let y = (f64::from(coord.y) + 0.5) * layer.scale;
        let value = self.noise.fractal(x, y, layer.octaves, layer.persistence, self.seed.0);
        let value = check_sample(coord, "biome", value)?;
        Ok(Biome::classify(value))
    }

    /// Sample the terrain layers at a world tile
    pub fn sample_terrain(&self, coord: ChunkCoord, wx: i32, wy: i32) -> Result<TerrainSample> {
        let t = &self.tuning;
        let seed = self.seed.0;
        let (x, y) = (f64::from(wx), f64::from(wy));

        let layer = |l: &NoiseLayer, seed: u32| {
            self.noise.fractal(x * l.scale, y * l.scale, l.octaves, l.persistence, seed)
        };

        let elevation = check_sample(coord, "elevation", layer(&t.elevation, seed))?;
        let moisture = check_sample(
            coord,
            "moisture",
            layer(&t.moisture, seed.wrapping_add(MOISTURE_SEED_OFFSET)),
        )?;
        let detail = check_sample(
            coord,
            "detail",
            layer(&t.detail, seed.wrapping_add(DETAIL_SEED_OFFSET)),
        )?;

        let terrain = elevation * t.elevation_weight
            + moisture * t.moisture_weight
            + detail * t.detail_weight;
        let terrain = check_sample(coord, "terrain", terrain)?;

        Ok(TerrainSample { elevation, moisture, detail, terrain })
    }

    /// Generate the chunk at `coord`.
    ///
    /// Pure in `(coord, seed)`: the same inputs always rebuild the same chunk.
    pub fn generate(&self, coord: ChunkCoord) -> Result<Chunk> {
        let biome = self.biome_at(coord)?;

        let mut tiles: Vec<Tile> = Vec::with_capacity(CHUNK_AREA);
        for local in LocalPos::all() {
            let world = local.to_world(coord);
            let sample = self.sample_terrain(coord, world.x, world.y)?;
            tiles.push(self.synthesizer.synthesize(sample.terrain, sample.moisture, biome));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed.chunk_seed(coord));
        let features = features::scatter_features(&mut rng, coord, biome, &tiles)
            .map_err(|reason| WorldError::Generation { coord, reason })?;

        log::debug!(
            "Generated chunk {} ({}, {} features)",
            coord,
            biome.name(),
            features.len()
        );

        Ok(Chunk::new(coord, biome, tiles, features))
    }
}

/// Reject samples that would silently corrupt a chunk
fn check_sample(coord: ChunkCoord, layer: &str, value: f64) -> Result<f64> {
    if value.is_finite() && (0.0..1.0).contains(&value) {
        Ok(value)
    } else {
        Err(WorldError::Generation {
            coord,
            reason: format!("{} sample {} outside [0, 1)", layer, value),
        })
    }
}
