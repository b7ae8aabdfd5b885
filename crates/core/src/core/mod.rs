//! CPU core state and speculation recovery.
//!
//! `Core` owns every architectural and micro-architectural structure the
//! pipeline stages operate on: PC, register file, RAT, ROB, both
//! reservation-station pools, LSQ, predictor, caches, main memory, the
//! program store, statistics, and the event log. Stages are free
//! functions over `&mut Core` so a single tick can split-borrow the
//! fields it needs.

/// Architectural register state (GPR file, RAT).
pub mod arch;
/// Pipeline stages and in-flight structures.
pub mod pipeline;
/// Functional units (ALU, caches, branch predictor).
pub mod units;

use crate::config::{Config, PipelineConfig};
use crate::core::arch::gpr::Gpr;
use crate::core::arch::rat::Rat;
use crate::core::pipeline::lsq::LoadStoreQueue;
use crate::core::pipeline::rob::Rob;
use crate::core::pipeline::station::StationPool;
use crate::core::units::cache::Cache;
use crate::core::units::gshare::GsharePredictor;
use crate::sim::log::CycleLog;
use crate::sim::program::Program;
use crate::soc::memory::MainMemory;
use crate::stats::SimStats;

/// Complete simulator state.
pub struct Core {
    /// Fetch program counter.
    pub pc: u32,
    /// Architectural register file (committed values).
    pub regs: Gpr,
    /// Register alias table.
    pub rat: Rat,
    /// Reorder buffer.
    pub rob: Rob,
    /// ALU-class reservation stations.
    pub alu_rs: StationPool,
    /// Load/store reservation stations.
    pub ls_rs: StationPool,
    /// Load/store queue.
    pub lsq: LoadStoreQueue,
    /// Branch direction predictor.
    pub predictor: GsharePredictor,
    /// L1 instruction cache.
    pub icache: Cache,
    /// L1 data cache.
    pub dcache: Cache,
    /// Main memory.
    pub mem: MainMemory,
    /// Program store.
    pub program: Program,
    /// Statistics counters.
    pub stats: SimStats,
    /// Cycle-tagged event log.
    pub log: CycleLog,
    /// Emit per-stage trace lines on stderr.
    pub trace: bool,
    /// Pipeline widths and latencies.
    pub params: PipelineConfig,
}

impl Core {
    /// Creates a core from its configuration, with an empty program store.
    pub fn new(config: &Config) -> Self {
        Self {
            pc: config.general.start_pc,
            regs: Gpr::new(),
            rat: Rat::new(),
            rob: Rob::new(config.pipeline.rob_capacity),
            alu_rs: StationPool::new(config.pipeline.alu_stations),
            ls_rs: StationPool::new(config.pipeline.ls_stations),
            lsq: LoadStoreQueue::new(),
            predictor: GsharePredictor::new(config.predictor.history_bits),
            icache: Cache::new(&config.cache.l1_i),
            dcache: Cache::new(&config.cache.l1_d),
            mem: MainMemory::new(config.memory.words),
            program: Program::new(),
            stats: SimStats::default(),
            log: CycleLog::new(),
            trace: config.general.trace,
            params: config.pipeline.clone(),
        }
    }

    /// Squashes all speculative state and redirects fetch.
    ///
    /// Empties the ROB, both reservation-station pools, and the LSQ, and
    /// reverts every RAT entry to architectural: no uncommitted producer
    /// outlives the flush, so the committed register file is current for
    /// every register. The register file itself is untouched.
    pub fn flush(&mut self, redirect: u32) {
        let squashed = self.rob.len() as u64;
        self.stats.discarded += squashed;

        self.rob.flush_all();
        self.alu_rs.flush();
        self.ls_rs.flush();
        self.lsq.flush();
        self.rat.flush();
        self.pc = redirect;

        self.log.record(
            self.stats.cycles,
            format!("flush: squashed {} in-flight, redirect to {:#x}", squashed, redirect),
        );
        if self.trace {
            eprintln!("FL  redirect={:#x} squashed={}", redirect, squashed);
        }
    }
}
