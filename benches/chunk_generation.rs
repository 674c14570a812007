//! Criterion benchmarks for chunk generation and streaming.
//!
//! Benchmarks:
//!   - single chunk generation with hash and Perlin noise
//!   - first tick of a fresh world (25 chunks)
//!   - steady-state walk across chunk borders
//!
//! Run with: cargo bench --bench chunk_generation

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use umbral::data::WorldConfig;
use umbral::world::generation::{ChunkGenerator, NoiseKind, TerrainRules, TerrainTuning};
use umbral::world::{ChunkCoord, World, WorldSeed};

fn bench_generate_chunk(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_chunk");

    let hash = ChunkGenerator::with_defaults(WorldSeed(12345));
    group.bench_function("hash", |b| {
        b.iter(|| black_box(hash.generate(black_box(ChunkCoord::new(3, -7)))))
    });

    let perlin = ChunkGenerator::new(
        WorldSeed(12345),
        TerrainTuning::default(),
        NoiseKind::Perlin.build(12345),
        Box::new(TerrainRules::default()),
    );
    group.bench_function("perlin", |b| {
        b.iter(|| black_box(perlin.generate(black_box(ChunkCoord::new(3, -7)))))
    });

    group.finish();
}

fn bench_world_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_tick");
    let config = WorldConfig {
        seed: Some(12345),
        ..WorldConfig::default()
    };

    group.bench_function("cold_start", |b| {
        b.iter(|| {
            let mut world = World::new(config.clone()).ok()?;
            world.tick(black_box(0.0), black_box(0.0)).ok()
        })
    });

    group.bench_function("walk_100_ticks", |b| {
        b.iter(|| {
            let mut world = World::new(config.clone()).ok()?;
            for step in 0..100 {
                world.tick(f64::from(step) * 24.0, 0.0).ok()?;
            }
            Some(world.resident_chunks())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_generate_chunk, bench_world_tick);
criterion_main!(benches);
