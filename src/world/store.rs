//! Chunk cache
//!
//! Keeps generated chunks keyed by coordinate, generates missing ones on
//! request and evicts far chunks once the cache grows past its bound.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::chunk::Chunk;
use super::coords::ChunkCoord;
use super::generation::ChunkGenerator;
use crate::error::Result;

/// Counters describing cache behaviour over a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub hits: u64,
    pub misses: u64,
    pub generated: u64,
    pub failed: u64,
    pub evicted: u64,
}

/// Bounded cache of generated chunks
pub struct ChunkStore {
    chunks: HashMap<ChunkCoord, Chunk>,
    generator: ChunkGenerator,
    max_chunks: usize,
    stats: StoreStats,
}

impl ChunkStore {
    pub fn new(generator: ChunkGenerator, max_chunks: usize) -> Self {
        Self {
            chunks: HashMap::new(),
            generator,
            max_chunks,
            stats: StoreStats::default(),
        }
    }

    pub fn generator(&self) -> &ChunkGenerator {
        &self.generator
    }

    pub fn max_chunks(&self) -> usize {
        self.max_chunks
    }

    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Resident chunk, without generating
    pub fn peek(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// All resident chunks, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Get a chunk, generating and caching it if absent.
    ///
    /// A failed generation leaves the coordinate absent so a later call retries.
    pub fn get(&mut self, coord: ChunkCoord) -> Result<&Chunk> {
        match self.chunks.entry(coord) {
            Entry::Occupied(entry) => {
                self.stats.hits += 1;
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                self.stats.misses += 1;
                match self.generator.generate(coord) {
                    Ok(chunk) => {
                        self.stats.generated += 1;
                        Ok(entry.insert(chunk))
                    }
                    Err(e) => {
                        self.stats.failed += 1;
                        Err(e)
                    }
                }
            }
        }
    }

    /// Make every chunk within Chebyshev `radius` of `center` resident.
    ///
    /// Every coordinate is attempted even if one fails; the first failure is
    /// returned. On success, returns how many chunks were newly generated.
    pub fn ensure_resident(&mut self, center: ChunkCoord, radius: u32) -> Result<usize> {
        let mut generated = 0;
        let mut first_error = None;

        for coord in center.square_around(radius) {
            if self.chunks.contains_key(&coord) {
                continue;
            }
            match self.get(coord) {
                Ok(_) => generated += 1,
                Err(e) => {
                    log::warn!("Chunk {} left absent: {}", coord, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(generated),
        }
    }

    /// Drop chunks farther than `keep_radius` from `center`, but only once the
    /// cache holds more than `max_chunks`. Returns how many were removed.
    ///
    /// If the retained disk alone exceeds the bound the cache stays over it;
    /// that is a tuning problem, not an error.
    pub fn evict_far(&mut self, center: ChunkCoord, keep_radius: u32) -> usize {
        if self.chunks.len() <= self.max_chunks {
            return 0;
        }

        let keep_sq = i64::from(keep_radius) * i64::from(keep_radius);
        let before = self.chunks.len();
        self.chunks
            .retain(|coord, _| coord.distance_squared(&center) <= keep_sq);
        let removed = before - self.chunks.len();
        self.stats.evicted += removed as u64;

        if removed > 0 {
            log::info!(
                "Evicted {} chunks around {} ({} resident)",
                removed,
                center,
                self.chunks.len()
            );
        }
        if self.chunks.len() > self.max_chunks {
            log::debug!(
                "Chunk cache over bound: {} resident, max {}",
                self.chunks.len(),
                self.max_chunks
            );
        }

        removed
    }

    /// Drop every resident chunk
    pub fn clear(&mut self) {
        self.stats.evicted += self.chunks.len() as u64;
        self.chunks.clear();
    }
}
