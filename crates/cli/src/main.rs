//! Batch driver for the out-of-order core model.
//!
//! Runs one of the built-in demo workloads to quiescence (or a cycle
//! bound) and reports the final architectural state and statistics. This
//! binary performs:
//! 1. **Workload selection:** Straight-line arithmetic, a store/load
//!    round trip, a countdown loop that trains the predictor, or a
//!    branchy pattern with both taken and not-taken paths.
//! 2. **Execution:** Drives `Simulator::step` with no wall-clock coupling.
//! 3. **Reporting:** Sectioned text statistics or a JSON report, an
//!    optional register dump, and an optional cycle-log tail.

use clap::{Parser, ValueEnum};
use std::process;

use o3sim_core::isa::abi::REG_NAMES;
use o3sim_core::{Config, DecodedInstruction, Program, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "o3sim",
    version,
    about = "Out-of-order RISC-V core model",
    long_about = "Run a built-in demo workload on the two-wide out-of-order core model.\n\nExamples:\n  o3sim --workload arith\n  o3sim --workload loop --trace\n  o3sim --workload branchy --json"
)]
struct Cli {
    /// Built-in demo workload to run.
    #[arg(short, long, value_enum, default_value = "arith")]
    workload: Workload,

    /// Maximum number of cycles to simulate.
    #[arg(short, long, default_value_t = 100_000)]
    cycles: u64,

    /// Emit per-stage trace lines on stderr.
    #[arg(long)]
    trace: bool,

    /// Emit the statistics report as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Dump the architectural register file after the run.
    #[arg(long)]
    regs: bool,

    /// Print the last N cycle-log entries after the run.
    #[arg(long, default_value_t = 0, value_name = "N")]
    log_tail: usize,
}

/// Built-in demo workloads.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Workload {
    /// Straight-line dependent arithmetic.
    Arith,
    /// Store a value and load it back.
    Roundtrip,
    /// Countdown loop; the backward branch trains the predictor.
    Loop,
    /// Mixed taken and not-taken forward branches.
    Branchy,
}

fn main() {
    let cli = Cli::parse();

    let mut config = Config::default();
    config.general.trace = cli.trace;

    let mut sim = Simulator::new(&config);
    sim.load_program(build_workload(cli.workload), 0);

    let used = sim.run_until_idle(cli.cycles);
    if used == cli.cycles {
        eprintln!("warning: cycle bound of {} reached before quiescence", used);
    }

    let report = sim.report();
    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                eprintln!("error: failed to serialize report: {}", err);
                process::exit(1);
            }
        }
    } else {
        report.print();
    }

    if cli.regs {
        println!();
        println!("ARCHITECTURAL REGISTERS");
        let regs = sim.registers();
        for (idx, value) in regs.iter().enumerate() {
            if *value != 0 {
                println!("  {:<4} = {}", REG_NAMES[idx], value);
            }
        }
    }

    if cli.log_tail > 0 {
        println!();
        println!("CYCLE LOG (last {})", cli.log_tail);
        for entry in sim.log().tail(cli.log_tail) {
            println!("  [{:>6}] {}", entry.cycle, entry.message);
        }
    }
}

/// Builds the selected demo workload, based at PC 0.
fn build_workload(workload: Workload) -> Program {
    let instructions = match workload {
        Workload::Arith => vec![
            DecodedInstruction::addi(0x00, 1, 0, 5),
            DecodedInstruction::addi(0x04, 2, 0, 7),
            DecodedInstruction::add(0x08, 3, 1, 2),
            DecodedInstruction::sub(0x0c, 4, 2, 1),
            DecodedInstruction::xor(0x10, 5, 3, 4),
            DecodedInstruction::slt(0x14, 6, 4, 3),
            DecodedInstruction::or(0x18, 7, 5, 6),
            DecodedInstruction::and(0x1c, 8, 7, 3),
        ],
        Workload::Roundtrip => vec![
            DecodedInstruction::addi(0x00, 1, 0, 42),
            DecodedInstruction::sw(0x04, 1, 0, 0),
            DecodedInstruction::lw(0x08, 2, 0, 0),
            DecodedInstruction::add(0x0c, 3, 2, 1),
            DecodedInstruction::sw(0x10, 3, 4, 0),
        ],
        Workload::Loop => vec![
            DecodedInstruction::addi(0x00, 1, 0, 64),
            DecodedInstruction::addi(0x04, 2, 0, 0),
            // loop body: x2 += 1; x1 -= 1; repeat while x1 != 0
            DecodedInstruction::addi(0x08, 2, 2, 1),
            DecodedInstruction::addi(0x0c, 1, 1, -1),
            DecodedInstruction::bne(0x10, 1, 0, -8),
            DecodedInstruction::add(0x14, 3, 2, 0),
        ],
        Workload::Branchy => vec![
            DecodedInstruction::addi(0x00, 1, 0, 1),
            // not taken: x1 != x0
            DecodedInstruction::beq(0x04, 1, 0, 8),
            DecodedInstruction::addi(0x08, 2, 0, 2),
            // taken: skips the poison write to x3
            DecodedInstruction::bne(0x0c, 1, 0, 8),
            DecodedInstruction::addi(0x10, 3, 0, 99),
            DecodedInstruction::addi(0x14, 4, 0, 4),
            DecodedInstruction::jal(0x18, 0, 8),
            DecodedInstruction::addi(0x1c, 5, 0, 99),
            DecodedInstruction::addi(0x20, 6, 2, 4),
        ],
    };
    Program::from_instructions(instructions)
}
