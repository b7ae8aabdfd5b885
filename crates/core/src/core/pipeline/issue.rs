//! Fused fetch/issue stage.
//!
//! Up to the pipeline width per cycle:
//! 1. Stop when the ROB is full or no instruction exists at the PC.
//! 2. Select the station pool by operation class; stop if it is full.
//! 3. Touch the L1I at the PC (timing metric only; fetch never stalls).
//! 4. Allocate a ROB tag and rename the sources against the RAT:
//!    architectural entries read the register file, completed in-flight
//!    producers forward their result, pending producers leave a tag.
//!    Sources are renamed before the destination is claimed, so an
//!    instruction reading its own destination sees the previous producer.
//! 5. Memory ops push an unresolved LSQ entry; branches consult the
//!    predictor and record the verdict in the ROB entry.
//! 6. The PC advances: predicted-taken branches and JAL redirect to
//!    `pc + imm`, everything else falls through to `pc + 4`.

use crate::core::arch::gpr::Gpr;
use crate::core::arch::rat::{Rat, RatEntry};
use crate::core::pipeline::lsq::MemKind;
use crate::core::pipeline::rob::{Rob, RobTag};
use crate::core::pipeline::station::Station;
use crate::core::Core;
use crate::isa::instruction::Opcode;

/// Executes the fetch/issue stage.
pub fn issue_stage(core: &mut Core) {
    for _ in 0..core.params.issue_width {
        if core.rob.is_full() {
            break;
        }
        let inst = match core.program.fetch(core.pc) {
            Some(inst) => inst.clone(),
            None => break,
        };

        let to_ls_pool = inst.opcode.is_mem();
        let has_slot = if to_ls_pool {
            core.ls_rs.has_free()
        } else {
            core.alu_rs.has_free()
        };
        if !has_slot {
            break;
        }

        // Instruction fetch; hit/miss bookkeeping only in this model.
        core.icache.access(core.pc, false);

        let tag = match core.rob.allocate(inst.opcode, inst.rd, inst.pc) {
            Some(tag) => tag,
            None => break,
        };
        core.stats.issued += 1;

        // Rename sources before claiming rd.
        let (vj, qj) = if inst.opcode.uses_rs1() {
            rename_source(inst.rs1, &core.rat, &core.rob, &core.regs)
        } else {
            (0, None)
        };
        let (vk, qk) = if inst.opcode.uses_rs2() {
            rename_source(inst.rs2, &core.rat, &core.rob, &core.regs)
        } else {
            (0, None)
        };

        if inst.opcode.writes_register() && inst.rd != 0 {
            core.rat.rename(inst.rd, tag);
        }

        if inst.opcode.is_mem() {
            let kind = if inst.opcode.is_store() {
                MemKind::Store
            } else {
                MemKind::Load
            };
            core.lsq.push(tag, kind);
        }

        let next_pc = match inst.opcode {
            Opcode::Beq | Opcode::Bne => {
                let predicted_taken = core.predictor.predict(inst.pc);
                core.rob.set_prediction(tag, predicted_taken);
                if predicted_taken {
                    inst.pc.wrapping_add_signed(inst.imm)
                } else {
                    inst.pc.wrapping_add(4)
                }
            }
            Opcode::Jal => inst.pc.wrapping_add_signed(inst.imm),
            _ => inst.pc.wrapping_add(4),
        };

        let latency = core.params.latency_for(inst.opcode.class());
        let station = Station {
            busy: true,
            op: inst.opcode,
            vj,
            vk,
            qj,
            qk,
            dest: tag,
            remaining: latency,
            total: latency,
            eff_addr: None,
            inst: inst.clone(),
        };
        if to_ls_pool {
            core.ls_rs.issue(station);
        } else {
            core.alu_rs.issue(station);
        }

        if core.trace {
            eprintln!("IS  pc={:#x} {} rob_tag={}", inst.pc, inst.text, tag.0);
        }
        core.pc = next_pc;
    }
}

/// Renames one source register.
///
/// Returns the captured value and `None`, or a pending producer tag.
/// The bypass from an already-completed producer is what preserves the
/// in-flight-forward property.
fn rename_source(reg: usize, rat: &Rat, rob: &Rob, regs: &Gpr) -> (i32, Option<RobTag>) {
    if reg == 0 {
        return (0, None);
    }

    match rat.get(reg) {
        RatEntry::Architectural => (regs.read(reg), None),
        RatEntry::Renamed(tag) => match rob.find_entry(tag) {
            Some(entry) if entry.is_ready() => (entry.result, None),
            Some(_) => (0, Some(tag)),
            // Producer already committed; the value is architectural.
            None => (regs.read(reg), None),
        },
    }
}
