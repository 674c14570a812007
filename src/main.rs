//! Umbral - Entry Point
//!
//! Headless walk through a procedural world. Loads the world config,
//! walks a player east for a number of ticks, then prints the terrain
//! around the player and the chunk cache statistics.
//!
//! Usage: `umbral [config.ron] [ticks]`

use std::path::PathBuf;

use anyhow::{Context, Result};

use umbral::data::{WorldConfig, DEFAULT_CONFIG_PATH};
use umbral::world::{FeatureKind, TilePos, World};

/// Default number of ticks to simulate
const DEFAULT_TICKS: u32 = 120;

/// World pixels the player moves per tick
const WALK_SPEED: f64 = 6.0;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Umbral v{}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let config_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let ticks = match args.next() {
        Some(arg) => arg
            .parse::<u32>()
            .with_context(|| format!("invalid tick count {:?}", arg))?,
        None => DEFAULT_TICKS,
    };

    let config = WorldConfig::load(&config_path);
    let mut world = World::new(config).context("failed to create world")?;

    let (mut x, mut y) = (0.0, 0.0);
    for tick in 0..ticks {
        match world.tick(x, y) {
            Ok(report) => {
                if report.generated > 0 || report.evicted > 0 {
                    log::debug!(
                        "Tick {}: chunk {}, +{} -{} ({} resident)",
                        tick,
                        report.player_chunk,
                        report.generated,
                        report.evicted,
                        report.resident
                    );
                }
            }
            // The failed chunk is retried on the next tick
            Err(e) => log::warn!("Tick {}: {}", tick, e),
        }
        x += WALK_SPEED;
        y += WALK_SPEED * 0.25;
    }

    let (last_x, last_y) = (x - WALK_SPEED, y - WALK_SPEED * 0.25);
    print_view(&world, last_x, last_y)?;
    print_stats(&world, last_x, last_y)?;
    print_structures(&world)?;

    log::info!("Umbral shut down cleanly");
    Ok(())
}

/// Print the viewport around the player as glyphs
fn print_view(world: &World, player_x: f64, player_y: f64) -> Result<()> {
    let player = world.world_to_tile(player_x, player_y)?;
    let (w, h) = world.config().viewport_tiles;
    let (half_w, half_h) = ((w / 2) as i32, (h / 2) as i32);

    for dy in -half_h..half_h {
        let mut line = String::with_capacity(w as usize);
        for dx in -half_w..half_w {
            let tile = TilePos::new(player.x + dx, player.y + dy);
            line.push(glyph_at(world, tile, player));
        }
        println!("{}", line);
    }
    Ok(())
}

fn glyph_at(world: &World, tile: TilePos, player: TilePos) -> char {
    if tile == player {
        return '@';
    }
    let (coord, local) = world.tile_to_chunk(tile);
    match world.chunk(coord) {
        Some(chunk) => chunk
            .feature_at(local)
            .map(|f| f.kind.glyph())
            .unwrap_or_else(|| chunk.tile(local).glyph()),
        None => ' ',
    }
}

fn print_stats(world: &World, player_x: f64, player_y: f64) -> Result<()> {
    let stats = world.stats();
    let player = world.world_to_tile(player_x, player_y)?;
    println!();
    println!("seed:      {}", world.seed().0);
    println!("ticks:     {}", world.ticks());
    if let Some(chunk) = world.player_chunk() {
        println!("chunk:     {}", chunk);
    }
    if let Some(biome) = world.current_biome() {
        println!("biome:     {}", biome.name());
    }
    if let Some(tile) = world.get_tile(player.x, player.y) {
        println!("ground:    {} (height {})", tile.kind.name(), tile.height);
    }
    println!(
        "resident:  {} / {}",
        world.resident_chunks(),
        world.config().max_chunks
    );
    println!(
        "generated: {} (failed {}, evicted {})",
        stats.generated, stats.failed, stats.evicted
    );
    println!("cache:     {} hits, {} misses", stats.hits, stats.misses);
    Ok(())
}

/// List structures in the chunks under the camera
fn print_structures(world: &World) -> Result<()> {
    let camera = world.camera();
    let (w, h) = world.config().viewport_tiles;
    for chunk in world.get_visible_chunks(camera.world_x, camera.world_y, w, h)? {
        for feature in chunk.features() {
            if let FeatureKind::Structure { kind, size } = feature.kind {
                let (r, g, b) = kind.color();
                println!(
                    "structure: {} (size {}) at ({}, {}) #{:02x}{:02x}{:02x}",
                    kind.name(),
                    size,
                    feature.world.x,
                    feature.world.y,
                    r,
                    g,
                    b
                );
            }
        }
    }
    Ok(())
}
