//! World coordinator
//!
//! Owns the chunk cache and camera for one world session and drives the
//! generate/evict cycle once per tick from the player's position.

use serde::{Deserialize, Serialize};

use super::chunk::Chunk;
use super::coords::{ChunkCoord, LocalPos, TilePos, CHUNK_SIZE};
use super::generation::{Biome, ChunkGenerator, WorldSeed};
use super::store::{ChunkStore, StoreStats};
use super::tile::Tile;
use crate::data::WorldConfig;
use crate::error::{Result, WorldError};

/// Positions beyond this many tiles from the origin are rejected
pub const MAX_TILE_COORD: f64 = (1u32 << 30) as f64;

/// Top-left corner of the view, in world pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    pub world_x: f64,
    pub world_y: f64,
}

/// Summary of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub player_chunk: ChunkCoord,
    /// Chunks generated this tick
    pub generated: usize,
    /// Chunks evicted this tick
    pub evicted: usize,
    /// Chunks resident after the tick
    pub resident: usize,
}

/// What a host needs to rebuild the same world later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub seed: WorldSeed,
    pub player_chunk: ChunkCoord,
}

/// Convert a world pixel position to the tile under it
pub fn world_to_tile(x: f64, y: f64, tile_size: u32) -> Result<TilePos> {
    if !x.is_finite() || !y.is_finite() || tile_size == 0 {
        return Err(WorldError::InvalidCoordinate { x, y });
    }
    let size = f64::from(tile_size);
    let tx = (x / size).floor();
    let ty = (y / size).floor();
    if tx.abs() > MAX_TILE_COORD || ty.abs() > MAX_TILE_COORD {
        return Err(WorldError::InvalidCoordinate { x, y });
    }
    Ok(TilePos::new(tx as i32, ty as i32))
}

/// Split a world tile into its chunk and local offset
pub fn tile_to_chunk(tile: TilePos) -> (ChunkCoord, LocalPos) {
    (tile.chunk(), tile.local())
}

/// World pixel position of a chunk's top-left corner
pub fn chunk_to_world_origin(coord: ChunkCoord, tile_size: u32) -> (f64, f64) {
    let origin = coord.origin();
    let size = f64::from(tile_size);
    (f64::from(origin.x) * size, f64::from(origin.y) * size)
}

/// One procedural world: seed, chunk cache, camera
pub struct World {
    config: WorldConfig,
    store: ChunkStore,
    camera: Camera,
    player_chunk: Option<ChunkCoord>,
    ticks: u64,
}

impl World {
    /// Create a world, drawing a random seed if the config has none
    pub fn new(config: WorldConfig) -> Result<Self> {
        let seed = config.seed.map(WorldSeed).unwrap_or_else(WorldSeed::random);
        Self::with_seed(config, seed)
    }

    pub fn with_seed(config: WorldConfig, seed: WorldSeed) -> Result<Self> {
        log::debug!("Sampling {:?} noise", config.noise);
        let generator = ChunkGenerator::new(
            seed,
            config.terrain,
            config.noise.build(seed.0),
            Box::new(config.rules),
        );
        Self::with_generator(config, generator)
    }

    /// Create a world around a prebuilt generator; the generator's seed wins
    /// over `config.seed`
    pub fn with_generator(config: WorldConfig, generator: ChunkGenerator) -> Result<Self> {
        config.validate()?;

        let seed = generator.seed();
        let store = ChunkStore::new(generator, config.max_chunks);

        log::info!(
            "World created: seed {}, radius {} (+{}), max {} chunks",
            seed.0,
            config.visible_radius,
            config.hysteresis,
            config.max_chunks
        );

        Ok(Self {
            config,
            store,
            camera: Camera::default(),
            player_chunk: None,
            ticks: 0,
        })
    }

    /// Rebuild a world from a snapshot and load the chunks around the player
    pub fn from_snapshot(config: WorldConfig, snapshot: WorldSnapshot) -> Result<Self> {
        let limit = MAX_TILE_COORD / f64::from(CHUNK_SIZE);
        let (cx, cy) = (f64::from(snapshot.player_chunk.x), f64::from(snapshot.player_chunk.y));
        if cx.abs() > limit || cy.abs() > limit {
            return Err(WorldError::InvalidCoordinate { x: cx, y: cy });
        }

        let mut world = Self::with_seed(config, snapshot.seed)?;
        world.restore_player_chunk(snapshot.player_chunk);
        Ok(world)
    }

    /// Place the player at a chunk origin and load its surroundings.
    ///
    /// A chunk that fails to generate is left absent and retried next tick.
    fn restore_player_chunk(&mut self, chunk: ChunkCoord) {
        self.player_chunk = Some(chunk);
        let (x, y) = chunk_to_world_origin(chunk, self.config.tile_size);
        self.center_camera(x, y);
        if let Err(e) = self.store.ensure_resident(chunk, self.config.visible_radius) {
            log::warn!("Restored world around {} with missing chunks: {}", chunk, e);
        }
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            seed: self.seed(),
            player_chunk: self.player_chunk.unwrap_or_default(),
        }
    }

    pub fn seed(&self) -> WorldSeed {
        self.store.generator().seed()
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn player_chunk(&self) -> Option<ChunkCoord> {
        self.player_chunk
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn resident_chunks(&self) -> usize {
        self.store.len()
    }

    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }

    /// Advance one frame for a player at world pixel position `(x, y)`.
    ///
    /// Loads the chunks around the player, then evicts far ones. Eviction
    /// runs even when a chunk failed to generate; the failure is returned
    /// afterwards and that chunk is retried next tick.
    pub fn tick(&mut self, player_x: f64, player_y: f64) -> Result<TickReport> {
        let chunk = self.world_to_tile(player_x, player_y)?.chunk();

        if self.player_chunk != Some(chunk) {
            log::debug!("Player entered chunk {}", chunk);
        }
        self.player_chunk = Some(chunk);
        self.center_camera(player_x, player_y);
        self.ticks += 1;

        let ensured = self.store.ensure_resident(chunk, self.config.visible_radius);
        let evicted = self.store.evict_far(chunk, self.config.keep_radius());
        let generated = ensured?;

        Ok(TickReport {
            player_chunk: chunk,
            generated,
            evicted,
            resident: self.store.len(),
        })
    }

    fn center_camera(&mut self, x: f64, y: f64) {
        let size = f64::from(self.config.tile_size);
        let (w, h) = self.config.viewport_tiles;
        self.camera = Camera {
            world_x: x - f64::from(w) * size / 2.0,
            world_y: y - f64::from(h) * size / 2.0,
        };
    }

    /// Tile under a world pixel position
    pub fn world_to_tile(&self, x: f64, y: f64) -> Result<TilePos> {
        world_to_tile(x, y, self.config.tile_size)
    }

    pub fn tile_to_chunk(&self, tile: TilePos) -> (ChunkCoord, LocalPos) {
        tile_to_chunk(tile)
    }

    pub fn chunk_to_world_origin(&self, coord: ChunkCoord) -> (f64, f64) {
        chunk_to_world_origin(coord, self.config.tile_size)
    }

    /// Screen position of a world pixel, relative to the camera
    pub fn world_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.camera.world_x, y - self.camera.world_y)
    }

    /// Screen position of a tile's top-left corner relative to the camera
    pub fn tile_to_screen(&self, tile: TilePos) -> (f64, f64) {
        let size = f64::from(self.config.tile_size);
        self.world_to_screen(f64::from(tile.x) * size, f64::from(tile.y) * size)
    }

    /// Tile at a world tile position, `None` if its chunk is not loaded yet
    pub fn get_tile(&self, wx: i32, wy: i32) -> Option<&Tile> {
        let (coord, local) = tile_to_chunk(TilePos::new(wx, wy));
        self.store.peek(coord).map(|chunk| chunk.tile(local))
    }

    /// Resident chunk by coordinate
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.store.peek(coord)
    }

    /// Walkable terrain with no blocking feature, `None` if not loaded
    pub fn is_passable(&self, wx: i32, wy: i32) -> Option<bool> {
        let (coord, local) = tile_to_chunk(TilePos::new(wx, wy));
        self.store.peek(coord).map(|chunk| chunk.is_passable(local))
    }

    /// Resident chunks overlapping a viewport, in row-major order.
    ///
    /// Chunks that are not loaded are skipped rather than generated.
    pub fn get_visible_chunks(
        &self,
        camera_x: f64,
        camera_y: f64,
        viewport_tiles_w: u32,
        viewport_tiles_h: u32,
    ) -> Result<Vec<&Chunk>> {
        let start = self.world_to_tile(camera_x, camera_y)?;
        // One extra tile covers a camera that is not tile-aligned
        let end = TilePos::new(
            start.x.saturating_add(i32::try_from(viewport_tiles_w).unwrap_or(i32::MAX)),
            start.y.saturating_add(i32::try_from(viewport_tiles_h).unwrap_or(i32::MAX)),
        );
        let (first, last) = (start.chunk(), end.chunk());

        // Walk the cache rather than the rectangle, which may be enormous
        let mut visible: Vec<&Chunk> = self
            .store
            .iter()
            .filter(|chunk| {
                let c = chunk.coord();
                (first.x..=last.x).contains(&c.x) && (first.y..=last.y).contains(&c.y)
            })
            .collect();
        visible.sort_by_key(|chunk| (chunk.coord().y, chunk.coord().x));
        Ok(visible)
    }

    /// Biome of the chunk the player stands in, if loaded
    pub fn current_biome(&self) -> Option<Biome> {
        self.player_chunk
            .and_then(|coord| self.store.peek(coord))
            .map(|chunk| chunk.biome())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generation::{HashNoise, NoiseField, TerrainRules, TerrainTuning};

    fn config() -> WorldConfig {
        WorldConfig {
            seed: Some(12345),
            max_chunks: 160,
            ..WorldConfig::default()
        }
    }

    fn world() -> World {
        World::new(config()).unwrap()
    }

    /// World pixels per chunk edge with the default tile size
    const CHUNK_PX: f64 = (CHUNK_SIZE * 16) as f64;

    #[test]
    fn test_world_to_tile() {
        assert_eq!(world_to_tile(0.0, 0.0, 16).unwrap(), TilePos::new(0, 0));
        assert_eq!(world_to_tile(15.9, 16.0, 16).unwrap(), TilePos::new(0, 1));
        assert_eq!(world_to_tile(-0.1, -16.0, 16).unwrap(), TilePos::new(-1, -1));
        assert_eq!(world_to_tile(-16.1, 0.0, 16).unwrap(), TilePos::new(-2, 0));
    }

    #[test]
    fn test_rejects_non_finite_positions() {
        assert!(matches!(
            world_to_tile(f64::NAN, 0.0, 16),
            Err(WorldError::InvalidCoordinate { .. })
        ));
        assert!(world_to_tile(0.0, f64::INFINITY, 16).is_err());
        assert!(world_to_tile(1e300, 0.0, 16).is_err());
    }

    #[test]
    fn test_tick_rejects_nan_without_side_effects() {
        let mut world = world();
        assert!(world.tick(f64::NAN, 0.0).is_err());
        assert_eq!(world.resident_chunks(), 0);
        assert_eq!(world.ticks(), 0);
        assert!(world.player_chunk().is_none());
    }

    #[test]
    fn test_chunk_origin() {
        assert_eq!(chunk_to_world_origin(ChunkCoord::new(1, -1), 16), (256.0, -256.0));
        let (coord, local) = tile_to_chunk(TilePos::new(-1, 17));
        assert_eq!(coord, ChunkCoord::new(-1, 1));
        assert_eq!((local.x(), local.y()), (15, 1));
    }

    #[test]
    fn test_tick_loads_visible_square() {
        let mut world = world();
        let report = world.tick(CHUNK_PX * 3.5, CHUNK_PX * -2.5).unwrap();
        assert_eq!(report.player_chunk, ChunkCoord::new(3, -3));
        assert_eq!(report.generated, 25);
        assert_eq!(report.resident, 25);

        let again = world.tick(CHUNK_PX * 3.6, CHUNK_PX * -2.4).unwrap();
        assert_eq!(again.generated, 0);
        assert_eq!(world.current_biome(), world.chunk(ChunkCoord::new(3, -3)).map(|c| c.biome()));
    }

    #[test]
    fn test_camera_centers_on_player() {
        let mut world = world();
        world.tick(1000.0, 500.0).unwrap();
        let camera = world.camera();
        assert_eq!(camera.world_x, 1000.0 - 20.0 * 16.0 / 2.0);
        assert_eq!(camera.world_y, 500.0 - 12.0 * 16.0 / 2.0);

        assert_eq!(world.world_to_screen(1000.0, 500.0), (160.0, 96.0));

        let player_tile = world.world_to_tile(1000.0, 500.0).unwrap();
        let (sx, sy) = world.tile_to_screen(player_tile);
        assert!((0.0..320.0).contains(&sx));
        assert!((0.0..192.0).contains(&sy));
    }

    #[test]
    fn test_get_tile_only_reads_resident_chunks() {
        let mut world = world();
        assert!(world.get_tile(0, 0).is_none());
        world.tick(0.0, 0.0).unwrap();
        assert!(world.get_tile(0, 0).is_some());
        assert!(world.get_tile(-1, -1).is_some());
        assert!(world.get_tile(CHUNK_SIZE * 10, 0).is_none());
        assert!(world.is_passable(CHUNK_SIZE * 10, 0).is_none());
    }

    #[test]
    fn test_border_tile_consistent_both_ways() {
        let mut world = world();
        world.tick(0.0, 0.0).unwrap();
        let generator = ChunkGenerator::with_defaults(WorldSeed(12345));
        let right = generator.generate(ChunkCoord::new(1, 0)).unwrap();
        for y in 0..CHUNK_SIZE {
            assert_eq!(world.get_tile(16, y), right.tile_at(0, y));
        }
    }

    #[test]
    fn test_hysteresis_prevents_thrashing() {
        let mut world = World::new(WorldConfig {
            seed: Some(1),
            max_chunks: 25,
            ..WorldConfig::default()
        })
        .unwrap();

        world.tick(CHUNK_PX * 0.9, 0.0).unwrap();
        let mut generated = 0;
        for i in 0..20 {
            let x = if i % 2 == 0 { CHUNK_PX * 1.1 } else { CHUNK_PX * 0.9 };
            generated += world.tick(x, 0.0).unwrap().generated;
        }
        // Only the first crossing loads a new column
        assert_eq!(generated, 5);
    }

    #[test]
    fn test_eviction_during_long_walk() {
        let mut world = world();
        let mut evicted = 0;
        for step in 0..60 {
            let report = world.tick(CHUNK_PX * step as f64, 0.0).unwrap();
            evicted += report.evicted;
            assert!(report.resident <= 160);
        }
        assert!(evicted > 0);
        assert!(world.chunk(ChunkCoord::new(0, 0)).is_none());
        assert!(world.chunk(ChunkCoord::new(59, 0)).is_some());
    }

    #[test]
    fn test_revisit_after_eviction_is_identical() {
        let mut world = world();
        world.tick(0.0, 0.0).unwrap();
        let first = world.chunk(ChunkCoord::new(0, 0)).cloned().unwrap();
        for step in 0..40 {
            world.tick(CHUNK_PX * step as f64, 0.0).unwrap();
        }
        assert!(world.chunk(ChunkCoord::new(0, 0)).is_none());
        world.tick(0.0, 0.0).unwrap();
        assert_eq!(world.chunk(ChunkCoord::new(0, 0)), Some(&first));
    }

    #[test]
    fn test_visible_chunks() {
        let mut world = world();
        world.tick(8.0, 8.0).unwrap();
        let visible = world.get_visible_chunks(0.0, 0.0, 20, 12).unwrap();
        let coords: Vec<_> = visible.iter().map(|c| c.coord()).collect();
        assert_eq!(coords, vec![ChunkCoord::new(0, 0), ChunkCoord::new(1, 0)]);

        // Unaligned camera spans a chunk corner
        let visible = world.get_visible_chunks(-8.0, -8.0, 8, 8).unwrap();
        assert_eq!(visible.len(), 4);

        assert!(world.get_visible_chunks(f64::NAN, 0.0, 20, 12).is_err());
    }

    #[test]
    fn test_visible_chunks_with_huge_viewport() {
        let mut world = world();
        world.tick(8.0, 8.0).unwrap();
        // Everything resident from (0, 0) down-right: chunks 0..=2 on both axes
        let visible = world.get_visible_chunks(0.0, 0.0, u32::MAX, u32::MAX).unwrap();
        assert_eq!(visible.len(), 9);
        assert_eq!(visible[0].coord(), ChunkCoord::new(0, 0));
        assert_eq!(visible[8].coord(), ChunkCoord::new(2, 2));
    }

    /// Fails for every chunk west of x = 0
    struct WestIsBroken;

    impl NoiseField for WestIsBroken {
        fn sample(&self, x: f64, y: f64, seed: u32) -> f64 {
            if x < 0.0 {
                f64::NAN
            } else {
                HashNoise.sample(x, y, seed)
            }
        }
    }

    #[test]
    fn test_restore_survives_failed_chunks() {
        let generator = ChunkGenerator::new(
            WorldSeed(12345),
            TerrainTuning::default(),
            Box::new(WestIsBroken),
            Box::new(TerrainRules::default()),
        );
        let mut world = World::with_generator(config(), generator).unwrap();
        world.restore_player_chunk(ChunkCoord::new(0, 0));

        assert_eq!(world.player_chunk(), Some(ChunkCoord::new(0, 0)));
        // Columns 0..=2 load, columns -2..=-1 stay absent
        assert_eq!(world.resident_chunks(), 15);
        assert!(world.chunk(ChunkCoord::new(-1, 0)).is_none());
        assert_eq!(world.stats().failed, 10);

        // The next tick retries them and still reports the failure
        assert!(world.tick(8.0, 8.0).is_err());
        assert_eq!(world.stats().failed, 20);
    }

    #[test]
    fn test_snapshot_reconstruction() {
        let mut world = world();
        world.tick(CHUNK_PX * 5.5, CHUNK_PX * 2.5).unwrap();
        let snapshot = world.snapshot();
        assert_eq!(snapshot.player_chunk, ChunkCoord::new(5, 2));

        let restored = World::from_snapshot(config(), snapshot).unwrap();
        assert_eq!(restored.seed(), WorldSeed(12345));
        assert_eq!(restored.resident_chunks(), 25);
        assert_eq!(
            restored.chunk(ChunkCoord::new(5, 2)),
            world.chunk(ChunkCoord::new(5, 2))
        );
    }

    #[test]
    fn test_snapshot_out_of_range() {
        let snapshot = WorldSnapshot {
            seed: WorldSeed(1),
            player_chunk: ChunkCoord::new(i32::MAX, 0),
        };
        assert!(matches!(
            World::from_snapshot(config(), snapshot),
            Err(WorldError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_independent_worlds() {
        let mut a = world();
        let mut b = World::new(WorldConfig { seed: Some(999), ..config() }).unwrap();
        a.tick(0.0, 0.0).unwrap();
        assert_eq!(b.resident_chunks(), 0);
        b.tick(0.0, 0.0).unwrap();
        assert_ne!(
            a.chunk(ChunkCoord::new(0, 0)).map(|c| c.tiles().to_vec()),
            b.chunk(ChunkCoord::new(0, 0)).map(|c| c.tiles().to_vec())
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = WorldConfig { tile_size: 0, ..WorldConfig::default() };
        assert!(matches!(World::new(config), Err(WorldError::Config(_))));
    }
}
