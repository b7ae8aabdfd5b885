//! Configuration system for the core model.
//!
//! This module defines all configuration structures used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline micro-architectural constants (ROB, stations,
//!    latencies, caches, predictor, memory).
//! 2. **Structures:** Hierarchical config for general, pipeline, cache,
//!    predictor, and memory settings.
//!
//! Configuration is supplied as JSON by a driver or use `Config::default()`.

use serde::Deserialize;

use crate::isa::instruction::OpClass;

/// Default configuration constants for the simulator.
///
/// These values define the baseline hardware configuration when not
/// explicitly overridden.
mod defaults {
    /// Reorder buffer capacity (in-flight instruction window).
    pub const ROB_CAPACITY: usize = 32;

    /// Issue width (instructions entering the backend per cycle).
    ///
    /// Commit width is tied to this value: the core retires up to the
    /// same number of instructions per cycle, in program order.
    pub const ISSUE_WIDTH: usize = 2;

    /// Number of reservation stations in the ALU pool.
    pub const ALU_STATIONS: usize = 8;

    /// Number of reservation stations in the load/store pool.
    pub const LS_STATIONS: usize = 4;

    /// Execution latency of ALU-class operations in cycles.
    pub const ALU_LATENCY: u32 = 1;

    /// Execution latency of loads in cycles.
    pub const LOAD_LATENCY: u32 = 2;

    /// Execution latency of stores in cycles (address/data resolution only;
    /// the memory write happens at commit).
    pub const STORE_LATENCY: u32 = 1;

    /// Execution latency of conditional branches in cycles.
    pub const BRANCH_LATENCY: u32 = 1;

    /// Number of sets in each L1 cache.
    pub const CACHE_SETS: usize = 32;

    /// Associativity of each L1 cache (number of ways).
    pub const CACHE_WAYS: usize = 2;

    /// Cache block size in bytes.
    pub const CACHE_LINE: usize = 64;

    /// L1 instruction cache hit latency in cycles.
    pub const L1I_HIT_LATENCY: u64 = 1;

    /// L1 data cache hit latency in cycles.
    pub const L1D_HIT_LATENCY: u64 = 2;

    /// Additional latency charged on a cache miss.
    pub const MISS_PENALTY: u64 = 10;

    /// Global history register width of the gshare predictor, in bits.
    ///
    /// The pattern history table holds `1 << GHR_BITS` two-bit counters.
    pub const GHR_BITS: usize = 10;

    /// Main memory size in 32-bit words.
    pub const MEMORY_WORDS: usize = 65536;
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use o3sim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.pipeline.rob_capacity, 32);
/// assert_eq!(config.cache.l1_d.ways, 2);
/// ```
///
/// Deserializing from JSON (typical driver usage; omitted fields take
/// their defaults):
///
/// ```
/// use o3sim_core::config::Config;
///
/// let json = r#"{
///     "general": { "trace": true },
///     "pipeline": { "rob_capacity": 16, "issue_width": 2 },
///     "cache": {
///         "l1_i": { "sets": 32, "ways": 2 },
///         "l1_d": { "sets": 32, "ways": 2, "hit_latency": 2 }
///     },
///     "predictor": { "history_bits": 10 },
///     "memory": { "words": 65536 }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert!(config.general.trace);
/// assert_eq!(config.pipeline.rob_capacity, 16);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Pipeline widths, structure sizes, and operation latencies.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// L1 cache configuration.
    #[serde(default)]
    pub cache: CacheHierarchyConfig,
    /// Branch predictor configuration.
    #[serde(default)]
    pub predictor: PredictorConfig,
    /// Main memory configuration.
    #[serde(default)]
    pub memory: MemoryConfig,
}

/// General simulation settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    /// Enable per-stage trace lines on stderr (`IS`/`EX`/`CM`/`FL`).
    #[serde(default)]
    pub trace: bool,

    /// Initial program counter.
    #[serde(default)]
    pub start_pc: u32,
}

/// Pipeline structure sizes and per-class execution latencies.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Reorder buffer capacity.
    #[serde(default = "PipelineConfig::default_rob_capacity")]
    pub rob_capacity: usize,

    /// Issue (and commit) width in instructions per cycle.
    #[serde(default = "PipelineConfig::default_issue_width")]
    pub issue_width: usize,

    /// ALU reservation station count.
    #[serde(default = "PipelineConfig::default_alu_stations")]
    pub alu_stations: usize,

    /// Load/store reservation station count.
    #[serde(default = "PipelineConfig::default_ls_stations")]
    pub ls_stations: usize,

    /// ALU operation latency in cycles.
    #[serde(default = "PipelineConfig::default_alu_latency")]
    pub alu_latency: u32,

    /// Load latency in cycles.
    #[serde(default = "PipelineConfig::default_load_latency")]
    pub load_latency: u32,

    /// Store latency in cycles.
    #[serde(default = "PipelineConfig::default_store_latency")]
    pub store_latency: u32,

    /// Branch latency in cycles.
    #[serde(default = "PipelineConfig::default_branch_latency")]
    pub branch_latency: u32,
}

impl PipelineConfig {
    /// Returns the default reorder buffer capacity.
    fn default_rob_capacity() -> usize {
        defaults::ROB_CAPACITY
    }

    /// Returns the default issue width.
    fn default_issue_width() -> usize {
        defaults::ISSUE_WIDTH
    }

    /// Returns the default ALU station count.
    fn default_alu_stations() -> usize {
        defaults::ALU_STATIONS
    }

    /// Returns the default load/store station count.
    fn default_ls_stations() -> usize {
        defaults::LS_STATIONS
    }

    /// Returns the default ALU latency.
    fn default_alu_latency() -> u32 {
        defaults::ALU_LATENCY
    }

    /// Returns the default load latency.
    fn default_load_latency() -> u32 {
        defaults::LOAD_LATENCY
    }

    /// Returns the default store latency.
    fn default_store_latency() -> u32 {
        defaults::STORE_LATENCY
    }

    /// Returns the default branch latency.
    fn default_branch_latency() -> u32 {
        defaults::BRANCH_LATENCY
    }

    /// Execution latency for an operation class, clamped to at least one
    /// cycle (every operation spends one cycle in a functional unit).
    pub fn latency_for(&self, class: OpClass) -> u32 {
        let cycles = match class {
            OpClass::Alu => self.alu_latency,
            OpClass::Load => self.load_latency,
            OpClass::Store => self.store_latency,
            OpClass::Branch => self.branch_latency,
        };
        cycles.max(1)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rob_capacity: defaults::ROB_CAPACITY,
            issue_width: defaults::ISSUE_WIDTH,
            alu_stations: defaults::ALU_STATIONS,
            ls_stations: defaults::LS_STATIONS,
            alu_latency: defaults::ALU_LATENCY,
            load_latency: defaults::LOAD_LATENCY,
            store_latency: defaults::STORE_LATENCY,
            branch_latency: defaults::BRANCH_LATENCY,
        }
    }
}

/// L1 cache pair configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheHierarchyConfig {
    /// L1 instruction cache.
    #[serde(default)]
    pub l1_i: CacheConfig,
    /// L1 data cache.
    #[serde(default = "CacheHierarchyConfig::default_l1_d")]
    pub l1_d: CacheConfig,
}

impl CacheHierarchyConfig {
    /// Returns the default L1 data cache configuration (slower hit path
    /// than the instruction cache).
    fn default_l1_d() -> CacheConfig {
        CacheConfig {
            hit_latency: defaults::L1D_HIT_LATENCY,
            ..CacheConfig::default()
        }
    }
}

impl Default for CacheHierarchyConfig {
    fn default() -> Self {
        Self {
            l1_i: CacheConfig::default(),
            l1_d: Self::default_l1_d(),
        }
    }
}

/// Individual cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Number of sets.
    #[serde(default = "CacheConfig::default_sets")]
    pub sets: usize,

    /// Associativity (number of ways).
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Cache block size in bytes.
    #[serde(default = "CacheConfig::default_line")]
    pub line_bytes: usize,

    /// Hit latency in cycles.
    #[serde(default = "CacheConfig::default_hit_latency")]
    pub hit_latency: u64,

    /// Additional latency charged on a miss.
    #[serde(default = "CacheConfig::default_miss_penalty")]
    pub miss_penalty: u64,
}

impl CacheConfig {
    /// Returns the default set count.
    fn default_sets() -> usize {
        defaults::CACHE_SETS
    }

    /// Returns the default associativity.
    fn default_ways() -> usize {
        defaults::CACHE_WAYS
    }

    /// Returns the default block size in bytes.
    fn default_line() -> usize {
        defaults::CACHE_LINE
    }

    /// Returns the default hit latency.
    fn default_hit_latency() -> u64 {
        defaults::L1I_HIT_LATENCY
    }

    /// Returns the default miss penalty.
    fn default_miss_penalty() -> u64 {
        defaults::MISS_PENALTY
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sets: defaults::CACHE_SETS,
            ways: defaults::CACHE_WAYS,
            line_bytes: defaults::CACHE_LINE,
            hit_latency: defaults::L1I_HIT_LATENCY,
            miss_penalty: defaults::MISS_PENALTY,
        }
    }
}

/// Branch predictor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictorConfig {
    /// Global history register width in bits; the pattern history table
    /// holds `1 << history_bits` counters.
    #[serde(default = "PredictorConfig::default_history_bits")]
    pub history_bits: usize,
}

impl PredictorConfig {
    /// Returns the default global history width.
    fn default_history_bits() -> usize {
        defaults::GHR_BITS
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            history_bits: defaults::GHR_BITS,
        }
    }
}

/// Main memory configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Memory size in 32-bit words.
    #[serde(default = "MemoryConfig::default_words")]
    pub words: usize,
}

impl MemoryConfig {
    /// Returns the default memory size in words.
    fn default_words() -> usize {
        defaults::MEMORY_WORDS
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            words: defaults::MEMORY_WORDS,
        }
    }
}
