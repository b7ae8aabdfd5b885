//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for the core model. It provides:
//! 1. **Cycle and IPC:** Total cycles, committed instructions, and derived
//!    throughput.
//! 2. **Structural occupancy:** Per-cycle mean and maximum occupancy for
//!    the ROB, both reservation-station pools, and the LSQ.
//! 3. **Branch prediction:** Correct/mispredicted counts and accuracy.
//! 4. **Reporting:** A serializable `StatsReport` snapshot with a
//!    sectioned text printer.

use serde::Serialize;

use crate::core::units::cache::CacheCounters;

/// Running occupancy accumulator for one structure.
#[derive(Clone, Copy, Debug, Default)]
pub struct Occupancy {
    sum: u64,
    /// Highest occupancy observed at any cycle boundary.
    pub max: usize,
}

impl Occupancy {
    /// Records the structure's occupancy at a cycle boundary.
    pub fn record(&mut self, len: usize) {
        self.sum += len as u64;
        if len > self.max {
            self.max = len;
        }
    }

    /// Mean occupancy over the given cycle count.
    pub fn mean(&self, cycles: u64) -> f64 {
        if cycles == 0 {
            0.0
        } else {
            self.sum as f64 / cycles as f64
        }
    }
}

/// Raw statistics counters, updated by the pipeline as it runs.
#[derive(Clone, Debug, Default)]
pub struct SimStats {
    /// Total simulated cycles.
    pub cycles: u64,
    /// Instructions retired in program order.
    pub committed: u64,
    /// Instructions allocated into the ROB since reset.
    pub issued: u64,
    /// Speculative instructions squashed by flushes.
    pub discarded: u64,
    /// Conditional branches whose predicted direction was correct.
    pub branch_correct: u64,
    /// Conditional branches whose predicted direction was wrong.
    pub branch_mispredicted: u64,
    /// ROB occupancy accumulator.
    pub rob_occupancy: Occupancy,
    /// ALU reservation-station pool occupancy accumulator.
    pub alu_rs_occupancy: Occupancy,
    /// Load/store reservation-station pool occupancy accumulator.
    pub ls_rs_occupancy: Occupancy,
    /// Load/store queue occupancy accumulator.
    pub lsq_occupancy: Occupancy,
}

impl SimStats {
    /// Samples every structure's occupancy at the end of a cycle.
    pub fn sample_occupancy(&mut self, rob: usize, alu_rs: usize, ls_rs: usize, lsq: usize) {
        self.rob_occupancy.record(rob);
        self.alu_rs_occupancy.record(alu_rs);
        self.ls_rs_occupancy.record(ls_rs);
        self.lsq_occupancy.record(lsq);
    }

    /// Committed instructions per cycle.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.committed as f64 / self.cycles as f64
        }
    }

    /// Branch direction prediction accuracy in percent; 0 when no branch
    /// has resolved.
    pub fn branch_accuracy(&self) -> f64 {
        let total = self.branch_correct + self.branch_mispredicted;
        if total == 0 {
            0.0
        } else {
            100.0 * self.branch_correct as f64 / total as f64
        }
    }
}

/// Mean/max occupancy pair in report form.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct OccupancyReport {
    /// Mean occupancy per cycle.
    pub mean: f64,
    /// Maximum occupancy observed.
    pub max: usize,
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"occupancy"`, `"branch"`,
/// `"memory"`. Pass an empty slice to `print_sections` to print all.
pub const STATS_SECTIONS: &[&str] = &["summary", "occupancy", "branch", "memory"];

/// Machine-readable statistics snapshot.
///
/// Built by `Simulator::report`; serializable for drivers that consume
/// JSON, printable in sections for humans.
#[derive(Clone, Debug, Serialize)]
pub struct StatsReport {
    /// Total simulated cycles.
    pub cycles: u64,
    /// Instructions retired.
    pub committed: u64,
    /// Instructions allocated since reset.
    pub issued: u64,
    /// Instructions squashed by flushes.
    pub discarded: u64,
    /// Committed instructions per cycle.
    pub ipc: f64,
    /// ROB occupancy.
    pub rob: OccupancyReport,
    /// ALU reservation-station pool occupancy.
    pub alu_rs: OccupancyReport,
    /// Load/store reservation-station pool occupancy.
    pub ls_rs: OccupancyReport,
    /// Load/store queue occupancy.
    pub lsq: OccupancyReport,
    /// Correctly predicted conditional branches.
    pub branch_correct: u64,
    /// Mispredicted conditional branches.
    pub branch_mispredicted: u64,
    /// Branch prediction accuracy in percent.
    pub branch_accuracy: f64,
    /// L1 instruction cache counters.
    pub l1_i: CacheCounters,
    /// L1 data cache counters.
    pub l1_d: CacheCounters,
}

impl StatsReport {
    /// Prints only the requested sections to stdout. Pass an empty slice
    /// to print everything (same as `print`).
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);

        if want("summary") {
            println!("==========================================================");
            println!("CORE MODEL SIMULATION STATISTICS");
            println!("==========================================================");
            println!("sim_cycles               {}", self.cycles);
            println!("sim_insts                {}", self.committed);
            println!("sim_issued               {}", self.issued);
            println!("sim_discarded            {}", self.discarded);
            println!("sim_ipc                  {:.4}", self.ipc);
            println!("----------------------------------------------------------");
        }
        if want("occupancy") {
            let row = |name: &str, occ: &OccupancyReport| {
                println!("  {:<22} mean: {:<8.2} | max: {}", name, occ.mean, occ.max);
            };
            println!("STRUCTURAL OCCUPANCY");
            row("rob", &self.rob);
            row("rs.alu", &self.alu_rs);
            row("rs.loadstore", &self.ls_rs);
            row("lsq", &self.lsq);
            println!("----------------------------------------------------------");
        }
        if want("branch") {
            println!("BRANCH PREDICTION");
            println!(
                "  bp.resolved            {}",
                self.branch_correct + self.branch_mispredicted
            );
            println!("  bp.mispredicts         {}", self.branch_mispredicted);
            println!("  bp.accuracy            {:.2}%", self.branch_accuracy);
            println!("----------------------------------------------------------");
        }
        if want("memory") {
            let row = |name: &str, c: &CacheCounters| {
                println!(
                    "  {:<6} accesses: {:<10} | hits: {:<10} | miss_rate: {:.2}%",
                    name,
                    c.accesses,
                    c.hits,
                    100.0 - c.hit_rate()
                );
            };
            println!("MEMORY HIERARCHY");
            row("L1-I", &self.l1_i);
            row("L1-D", &self.l1_d);
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupancy_mean_and_max() {
        let mut occ = Occupancy::default();
        occ.record(2);
        occ.record(4);
        occ.record(0);
        assert_eq!(occ.max, 4);
        assert!((occ.mean(3) - 2.0).abs() < f64::EPSILON);
        assert_eq!(occ.mean(0), 0.0);
    }

    #[test]
    fn test_ipc() {
        let stats = SimStats {
            cycles: 10,
            committed: 15,
            ..SimStats::default()
        };
        assert!((stats.ipc() - 1.5).abs() < f64::EPSILON);
        assert_eq!(SimStats::default().ipc(), 0.0);
    }

    #[test]
    fn test_branch_accuracy() {
        let stats = SimStats {
            branch_correct: 3,
            branch_mispredicted: 1,
            ..SimStats::default()
        };
        assert!((stats.branch_accuracy() - 75.0).abs() < f64::EPSILON);
        assert_eq!(SimStats::default().branch_accuracy(), 0.0);
    }
}
