//! Noise fields
//!
//! Deterministic scalar fields used for biome, elevation and moisture sampling.
//! Every field maps `(x, y, seed)` to a value in `[0, 1)` with no hidden state.

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

/// Largest value a field may return (samples live in `[0, 1)`)
pub const MAX_SAMPLE: f64 = 1.0 - f64::EPSILON;

/// Seed stride between octaves of a fractal sample
const OCTAVE_SEED_STRIDE: u32 = 97;

/// A deterministic 2D noise source
pub trait NoiseField {
    /// Sample a single octave. Must be pure: same inputs, same output.
    fn sample(&self, x: f64, y: f64, seed: u32) -> f64;

    /// Sum `octaves` samples at doubling frequency and decaying amplitude,
    /// normalised by the total amplitude.
    fn fractal(&self, x: f64, y: f64, octaves: u32, persistence: f64, seed: u32) -> f64 {
        let mut total = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        let mut max_value = 0.0;

        for octave in 0..octaves {
            let octave_seed = seed.wrapping_add(octave.wrapping_mul(OCTAVE_SEED_STRIDE));
            total += self.sample(x * frequency, y * frequency, octave_seed) * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= 2.0;
        }

        if max_value <= 0.0 {
            return 0.0;
        }
        below_one(total / max_value)
    }
}

/// Pulls rounding overshoot back under 1 without masking NaN or infinity
#[inline]
fn below_one(value: f64) -> f64 {
    if value.is_finite() && value >= 1.0 {
        MAX_SAMPLE
    } else {
        value
    }
}

/// Trigonometric lattice hash:
/// `fract(sin(seed + x * 12.9898 + y * 78.233) * 43758.5453)`
#[inline]
fn lattice_hash(x: f64, y: f64, seed: u32) -> f64 {
    let s = f64::from(seed) + x * 12.9898 + y * 78.233;
    let scrambled = s.sin() * 43_758.545_312_3;
    below_one(scrambled - scrambled.floor())
}

#[inline]
fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Value noise over the trigonometric lattice hash.
///
/// Integer points take the hash value; everything in between is a
/// smoothstep-weighted blend of the four surrounding lattice points, so
/// nearby inputs give nearby outputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashNoise;

impl NoiseField for HashNoise {
    fn sample(&self, x: f64, y: f64, seed: u32) -> f64 {
        let (x0, y0) = (x.floor(), y.floor());
        let tx = smoothstep(x - x0);
        let ty = smoothstep(y - y0);

        let v00 = lattice_hash(x0, y0, seed);
        let v10 = lattice_hash(x0 + 1.0, y0, seed);
        let v01 = lattice_hash(x0, y0 + 1.0, seed);
        let v11 = lattice_hash(x0 + 1.0, y0 + 1.0, seed);

        let top = v00 + (v10 - v00) * tx;
        let bottom = v01 + (v11 - v01) * tx;
        let value = top + (bottom - top) * ty;
        // Blending can round a hair below zero; NaN falls through untouched
        if value < 0.0 {
            0.0
        } else {
            below_one(value)
        }
    }
}

/// Gradient noise backed by the `noise` crate's Perlin implementation.
///
/// The per-call seed shifts the sampling window instead of rebuilding the
/// permutation table, so octaves and layers stay decorrelated.
#[derive(Clone)]
pub struct PerlinNoise {
    perlin: Perlin,
}

impl PerlinNoise {
    pub fn new(world_seed: u32) -> Self {
        Self {
            perlin: Perlin::new(world_seed),
        }
    }

    fn seed_offset(seed: u32) -> (f64, f64) {
        // Half-cell shift keeps integer inputs off the lattice, where Perlin is 0
        let ox = f64::from(seed % 4093) * 3.71 + 0.5;
        let oy = f64::from((seed / 4093) % 4093) * 2.93 + 0.5;
        (ox, oy)
    }
}

impl NoiseField for PerlinNoise {
    fn sample(&self, x: f64, y: f64, seed: u32) -> f64 {
        let (ox, oy) = Self::seed_offset(seed);
        let value = self.perlin.get([x + ox, y + oy]);
        // clamp keeps NaN as NaN
        ((value + 1.0) * 0.5).clamp(0.0, MAX_SAMPLE)
    }
}

/// Which noise field a world samples from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoiseKind {
    #[default]
    Hash,
    Perlin,
}

impl NoiseKind {
    /// Build the field for a world seed
    pub fn build(&self, world_seed: u32) -> Box<dyn NoiseField> {
        match self {
            NoiseKind::Hash => Box::new(HashNoise),
            NoiseKind::Perlin => Box::new(PerlinNoise::new(world_seed)),
        }
    }
}
