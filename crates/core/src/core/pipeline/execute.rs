//! Execute stage: wake-up, countdown, completion, broadcast.
//!
//! Every busy station is scanned each cycle, ALU pool first, then the
//! load/store pool:
//! 1. **Wake-up:** Operand tags whose producers have completed capture
//!    the broadcast result. A producer that already committed is read
//!    from the architectural file instead (its value landed there at
//!    commit, which runs before this stage).
//! 2. **Countdown:** Once both operands are captured, the remaining-cycle
//!    counter decrements; the effective address of a memory op is
//!    computed on its first execute cycle.
//! 3. **Completion:** At zero, the result is computed (loads read main
//!    memory and touch the L1D; stores resolve their LSQ entry; branches
//!    record their redirect target) and broadcast onto the ROB entry, and
//!    the station is freed.
//!
//! Writing result + ready onto the ROB entry is the abstracted common
//! data bus: stations scanned later in the same cycle already observe it.

use crate::core::arch::gpr::Gpr;
use crate::core::pipeline::lsq::LoadStoreQueue;
use crate::core::pipeline::rob::Rob;
use crate::core::pipeline::station::Station;
use crate::core::units::alu;
use crate::core::units::cache::Cache;
use crate::core::Core;
use crate::isa::instruction::Opcode;
use crate::soc::memory::MainMemory;

/// Executes one cycle of every busy reservation station.
pub fn execute_stage(core: &mut Core) {
    let Core {
        alu_rs,
        ls_rs,
        rob,
        lsq,
        dcache,
        mem,
        regs,
        trace,
        ..
    } = core;
    let trace = *trace;

    for station in alu_rs.iter_mut() {
        step_station(station, rob, lsq, dcache, mem, regs, trace);
    }
    for station in ls_rs.iter_mut() {
        step_station(station, rob, lsq, dcache, mem, regs, trace);
    }
}

/// Advances a single station by one cycle.
fn step_station(
    st: &mut Station,
    rob: &mut Rob,
    lsq: &mut LoadStoreQueue,
    dcache: &mut Cache,
    mem: &MainMemory,
    regs: &Gpr,
    trace: bool,
) {
    if !st.busy {
        return;
    }

    // Wake-up: capture operands whose producers have finished. A tag that
    // no longer resolves belongs to a committed producer, whose value is
    // in the architectural file.
    if let Some(tag) = st.qj {
        match rob.find_entry(tag) {
            Some(entry) if entry.is_ready() => {
                st.vj = entry.result;
                st.qj = None;
            }
            Some(_) => {}
            None => {
                st.vj = regs.read(st.inst.rs1);
                st.qj = None;
            }
        }
    }
    if let Some(tag) = st.qk {
        match rob.find_entry(tag) {
            Some(entry) if entry.is_ready() => {
                st.vk = entry.result;
                st.qk = None;
            }
            Some(_) => {}
            None => {
                st.vk = regs.read(st.inst.rs2);
                st.qk = None;
            }
        }
    }
    if !st.operands_ready() {
        return;
    }

    // First execute cycle of a memory op computes the effective address.
    if st.remaining == st.total && st.op.is_mem() {
        st.eff_addr = Some(st.vj.wrapping_add(st.inst.imm) as u32);
    }

    st.remaining -= 1;
    if st.remaining > 0 {
        return;
    }

    // Completion.
    let result = match st.op {
        Opcode::Add | Opcode::Sub | Opcode::And | Opcode::Or | Opcode::Xor | Opcode::Slt => {
            alu::execute(st.op, st.vj, st.vk)
        }
        Opcode::Addi => alu::execute(st.op, st.vj, st.inst.imm),
        Opcode::Lw => {
            let addr = st.eff_addr.unwrap_or(0);
            // Hit/miss bookkeeping only; the value comes from main memory
            // at word granularity.
            dcache.access(addr, false);
            lsq.resolve_load(st.dest, addr);
            mem.read_word(addr)
        }
        Opcode::Sw => {
            let addr = st.eff_addr.unwrap_or(0);
            // Memory is untouched here; the write happens at commit.
            lsq.resolve_store(st.dest, addr, st.vk);
            st.vk
        }
        Opcode::Beq | Opcode::Bne => {
            let taken = alu::branch_taken(st.op, st.vj, st.vk);
            let target = if taken {
                st.inst.pc.wrapping_add_signed(st.inst.imm)
            } else {
                st.inst.pc.wrapping_add(4)
            };
            rob.set_target(st.dest, target);
            taken as i32
        }
        Opcode::Jal | Opcode::Jalr | Opcode::Nop => 0,
    };

    rob.complete(st.dest, result);
    if trace {
        eprintln!(
            "EX  pc={:#x} {} rob_tag={} result={}",
            st.inst.pc,
            st.op.mnemonic(),
            st.dest.0,
            result
        );
    }
    st.clear();
}
