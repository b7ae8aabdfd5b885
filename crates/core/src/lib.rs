//! Cycle-accurate out-of-order RISC-V core model.
//!
//! This crate implements a two-wide, speculative, out-of-order core using
//! Tomasulo-style renaming. It provides:
//! 1. **Pipeline:** Fused fetch/issue, reservation-station execute with
//!    CDB-style broadcast, and in-order commit from a reorder buffer.
//! 2. **Renaming:** A register alias table mapping each architectural
//!    register to its newest in-flight producer tag.
//! 3. **Memory ordering:** A program-order load/store queue; stores become
//!    visible only at commit.
//! 4. **Speculation:** A gshare branch predictor with precise recovery via
//!    full pipeline flush on mispredict.
//! 5. **Memory hierarchy:** Set-associative L1 instruction and data cache
//!    models with deterministic LRU replacement.
//! 6. **Simulation:** Program store, configuration, statistics collection,
//!    and a cycle-tagged event log.

/// Simulator configuration (defaults and hierarchical config structures).
pub mod config;
/// CPU core (architectural state, pipeline, functional units).
pub mod core;
/// Instruction set (decoded instruction format, opcodes, register names).
pub mod isa;
/// Simulation layer (program store, simulator facade, cycle log).
pub mod sim;
/// Memory system (flat word-addressable main memory).
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Decoded instruction record, the contract surface for an external parser.
pub use crate::isa::instruction::{DecodedInstruction, Opcode};
/// Addressable map from PC to decoded instruction.
pub use crate::sim::program::Program;
/// Top-level simulator; construct with `Simulator::new` and drive with `step`.
pub use crate::sim::simulator::Simulator;
/// Machine-readable statistics snapshot.
pub use crate::stats::StatsReport;
