//! Set-associative cache model.
//!
//! Models a write-back cache for timing and occupancy metrics: each access
//! reports hit/miss and a latency (`hit_latency`, plus `miss_penalty` on a
//! miss). On a miss the least-recently-used way is replaced; a dirty
//! victim is silently dropped (no write-back traffic is modelled).
//!
//! LRU rank is a strictly monotone per-cache access counter, never
//! wall-clock time, so replacement decisions are deterministic across
//! runs.

use serde::Serialize;

use crate::config::CacheConfig;

/// Result of a single cache access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheAccess {
    /// Whether the block was present.
    pub hit: bool,
    /// Reported latency: `hit_latency` on a hit, `hit_latency +
    /// miss_penalty` on a miss.
    pub cycles: u64,
}

/// Access/hit/miss counters for one cache, snapshot form.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct CacheCounters {
    /// Total accesses.
    pub accesses: u64,
    /// Accesses that hit.
    pub hits: u64,
    /// Accesses that missed.
    pub misses: u64,
    /// Sum of reported access latencies, in cycles.
    pub latency_cycles: u64,
}

impl CacheCounters {
    /// Hit rate in percent; 0 when the cache has not been accessed.
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            100.0 * self.hits as f64 / self.accesses as f64
        }
    }
}

/// One cache line: tag, validity, dirty bit, LRU rank.
#[derive(Clone, Default)]
struct CacheLine {
    tag: u32,
    valid: bool,
    dirty: bool,
    lru: u64,
}

/// Set-associative write-back cache.
pub struct Cache {
    lines: Vec<CacheLine>,
    sets: usize,
    ways: usize,
    line_bytes: usize,
    hit_latency: u64,
    miss_penalty: u64,
    /// Monotone access counter used as the LRU rank.
    tick: u64,
    counters: CacheCounters,
}

impl Cache {
    /// Creates a cache from its configuration. All lines start invalid
    /// and never match until filled.
    pub fn new(config: &CacheConfig) -> Self {
        let sets = config.sets.max(1);
        let ways = config.ways.max(1);
        let line_bytes = config.line_bytes.max(4);

        Self {
            lines: vec![CacheLine::default(); sets * ways],
            sets,
            ways,
            line_bytes,
            hit_latency: config.hit_latency,
            miss_penalty: config.miss_penalty,
            tick: 0,
            counters: CacheCounters::default(),
        }
    }

    /// Accesses the cache at a byte address.
    ///
    /// On a hit the way's LRU rank is refreshed and the dirty bit is set
    /// for writes. On a miss the LRU way is replaced with a line whose
    /// dirty bit reflects `is_write`. Counters are updated either way.
    pub fn access(&mut self, addr: u32, is_write: bool) -> CacheAccess {
        self.tick += 1;
        self.counters.accesses += 1;

        let set_index = ((addr as usize) / self.line_bytes) % self.sets;
        let tag = addr / (self.line_bytes * self.sets) as u32;
        let base_idx = set_index * self.ways;

        for way in 0..self.ways {
            let line = &mut self.lines[base_idx + way];
            if line.valid && line.tag == tag {
                line.lru = self.tick;
                if is_write {
                    line.dirty = true;
                }
                self.counters.hits += 1;
                self.counters.latency_cycles += self.hit_latency;
                return CacheAccess {
                    hit: true,
                    cycles: self.hit_latency,
                };
            }
        }

        // Miss: evict the way with the smallest LRU rank. A dirty victim
        // is dropped without modelled write-back traffic.
        self.counters.misses += 1;
        let mut victim = base_idx;
        for idx in base_idx..base_idx + self.ways {
            if self.lines[idx].lru < self.lines[victim].lru {
                victim = idx;
            }
        }
        self.lines[victim] = CacheLine {
            tag,
            valid: true,
            dirty: is_write,
            lru: self.tick,
        };

        let cycles = self.hit_latency + self.miss_penalty;
        self.counters.latency_cycles += cycles;
        CacheAccess { hit: false, cycles }
    }

    /// Returns a snapshot of this cache's counters.
    pub fn counters(&self) -> CacheCounters {
        self.counters
    }
}
