//! Set-associative cache model.
//!
//! This module implements the cache that trace replay drives. It owns
//! `S * E` lines in a single flat allocation, tracks per-line recency for
//! LRU replacement, and exposes one mutating operation — [`Cache::access`] —
//! which classifies every address as a hit, a miss, or a miss that evicted
//! an occupied line.
//!
//! Replacement is exact LRU: every touch stamps the line with a recency
//! value strictly greater than every other valid line in its set, and the
//! victim scan picks the smallest stamp (lowest way index on a tie, which
//! cannot arise under the stamping rule but keeps the scan deterministic).

use crate::config::CacheConfig;
use crate::error::ConfigError;

/// One cache slot: validity, the resident tag, and its recency stamp.
///
/// Tag and recency are deterministically zero while the line is invalid.
#[derive(Debug, Clone, Default)]
struct CacheLine {
    valid: bool,
    tag: u64,
    recency: u64,
}

/// Outcome of a single cache access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    /// The address's tag was resident in its set.
    Hit,
    /// The tag was absent and an invalid line was available.
    Miss,
    /// The tag was absent and the LRU line was overwritten.
    MissWithEviction,
}

/// Hit, miss, and eviction counts for a simulation run.
///
/// Monotonically non-decreasing; mutated only by [`Cache::access`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    /// Accesses that found their tag resident.
    pub hits: u64,
    /// Accesses that had to install their tag.
    pub misses: u64,
    /// Misses that overwrote a valid line.
    pub evictions: u64,
}

/// Set-associative cache with LRU replacement.
///
/// Storage is sized once at construction and only [`access`](Self::access)
/// mutates it; dropping the cache releases everything. Not intended for
/// shared mutation — concurrent simulations should use independent
/// instances.
///
/// # Examples
///
/// ```
/// use csim_core::cache::{AccessOutcome, Cache};
/// use csim_core::config::CacheConfig;
///
/// // One set, one line, one-byte blocks: every distinct address conflicts.
/// let config = CacheConfig { set_bits: 0, ways: 1, block_bits: 0 };
/// let mut cache = Cache::new(&config).unwrap();
///
/// assert_eq!(cache.access(0), AccessOutcome::Miss);
/// assert_eq!(cache.access(1), AccessOutcome::MissWithEviction);
/// assert_eq!(cache.access(0), AccessOutcome::MissWithEviction);
/// assert_eq!(cache.counters().evictions, 2);
/// ```
#[derive(Debug)]
pub struct Cache {
    lines: Vec<CacheLine>,
    num_sets: usize,
    ways: usize,
    block_bytes: u64,
    counters: Counters,
}

impl Cache {
    /// Builds a cache from the given geometry.
    ///
    /// Allocates exactly `S * E` lines, all invalid with zeroed tag and
    /// recency. This is the only allocation point in the model.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the geometry fails
    /// [`CacheConfig::validate`]; no partial cache is constructed.
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            lines: vec![CacheLine::default(); config.total_lines()],
            num_sets: config.num_sets(),
            ways: config.ways,
            block_bytes: config.block_bytes(),
            counters: Counters::default(),
        })
    }

    /// Splits an address into its set index and tag.
    ///
    /// Pure integer arithmetic: `set = (addr / B) % S`, `tag = addr / (B * S)`.
    /// The block offset (`addr % B`) never matters at this granularity.
    fn decompose(&self, addr: u64) -> (usize, u64) {
        let set_index = ((addr / self.block_bytes) % self.num_sets as u64) as usize;
        let tag = addr / (self.block_bytes * self.num_sets as u64);
        (set_index, tag)
    }

    /// Accesses the cache at `addr`, updating counters and line state.
    ///
    /// Scans the target set for a valid line with a matching tag (hit);
    /// otherwise installs the tag in the lowest-index invalid line (miss),
    /// or overwrites the least-recently-used line (miss with eviction).
    /// The touched line is stamped most-recent in its set.
    ///
    /// Total for every `u64` address: once the cache is built, no access
    /// can fail and no storage is allocated or freed.
    pub fn access(&mut self, addr: u64) -> AccessOutcome {
        let (set_index, tag) = self.decompose(addr);
        let base = set_index * self.ways;
        let set = &mut self.lines[base..base + self.ways];

        // Strictly above every valid recency in the set.
        let stamp = set
            .iter()
            .filter(|line| line.valid)
            .map(|line| line.recency)
            .max()
            .unwrap_or(0)
            + 1;

        if let Some(line) = set.iter_mut().find(|line| line.valid && line.tag == tag) {
            line.recency = stamp;
            self.counters.hits += 1;
            return AccessOutcome::Hit;
        }

        self.counters.misses += 1;

        if let Some(line) = set.iter_mut().find(|line| !line.valid) {
            line.valid = true;
            line.tag = tag;
            line.recency = stamp;
            return AccessOutcome::Miss;
        }

        // Set full: evict the smallest recency, lowest way on a tie.
        if let Some(victim) = set.iter_mut().min_by_key(|line| line.recency) {
            victim.tag = tag;
            victim.recency = stamp;
        }
        self.counters.evictions += 1;
        AccessOutcome::MissWithEviction
    }

    /// Reports whether `addr`'s block is currently resident.
    ///
    /// Read-only: neither counters nor recency are touched.
    pub fn contains(&self, addr: u64) -> bool {
        let (set_index, tag) = self.decompose(addr);
        let base = set_index * self.ways;
        self.lines[base..base + self.ways]
            .iter()
            .any(|line| line.valid && line.tag == tag)
    }

    /// Returns a copy of the hit/miss/eviction counters.
    pub fn counters(&self) -> Counters {
        self.counters
    }
}
