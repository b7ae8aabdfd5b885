//! Commit stage: retire instructions from the ROB head.
//!
//! Retires up to the pipeline width per cycle, in program order:
//! 1. **Memory gate:** A load or store retires only when it is also the
//!    LSQ head and resolved; otherwise commit stalls this cycle.
//! 2. **Branch resolution:** The predictor is trained with the actual
//!    direction; a mispredicted branch retires, then everything younger
//!    is flushed and the cycle is aborted.
//! 3. **Register commit:** The result is written to the architectural
//!    file and the RAT entry is released if this instruction is still the
//!    newest producer.
//! 4. **Memory commit:** A store writes through the L1D and to main
//!    memory here; a load's read already happened at execute. The LSQ
//!    head is popped either way.

use crate::core::Core;

/// Executes the commit stage. Returns true if a mispredict flushed the
/// pipeline, which aborts the remainder of the cycle.
pub fn commit_stage(core: &mut Core) -> bool {
    for _ in 0..core.params.issue_width {
        let head = match core.rob.peek_head() {
            Some(entry) if entry.is_ready() => entry.clone(),
            _ => return false,
        };

        // Memory gate: the head must own the LSQ head and be resolved.
        // A stall here is backpressure, not an error.
        if head.opcode.is_mem() {
            let gate_open = match core.lsq.head() {
                Some(entry) => entry.tag == head.tag && entry.mem_ready,
                None => false,
            };
            if !gate_open {
                return false;
            }
        }

        if head.opcode.is_branch() {
            let actual_taken = head.result == 1;
            core.predictor.update(head.pc, actual_taken);

            if actual_taken == head.pred_taken {
                core.stats.branch_correct += 1;
            } else {
                core.stats.branch_mispredicted += 1;

                // The branch itself retires; everything younger is squashed.
                core.rob.commit_head();
                core.stats.committed += 1;
                core.log.record(
                    core.stats.cycles,
                    format!(
                        "mispredict at {:#x}: predicted {}, actual {}",
                        head.pc,
                        direction(head.pred_taken),
                        direction(actual_taken)
                    ),
                );
                if core.trace {
                    eprintln!(
                        "CM  pc={:#x} {} MISPREDICT -> {:#x}",
                        head.pc,
                        head.opcode.mnemonic(),
                        head.target
                    );
                }
                core.flush(head.target);
                return true;
            }
        }

        if head.opcode.writes_register() && head.rd != 0 {
            core.regs.write(head.rd, head.result);
            core.rat.clear_if_match(head.rd, head.tag);
        }

        if head.opcode.is_mem() {
            if let Some(entry) = core.lsq.pop_head() {
                if head.opcode.is_store() {
                    if let Some(addr) = entry.addr {
                        // Store becomes architecturally visible only here.
                        core.dcache.access(addr, true);
                        core.mem.write_word(addr, entry.data);
                        if core.trace {
                            eprintln!("CM  pc={:#x} mem[{:#x}] <= {}", head.pc, addr, entry.data);
                        }
                    }
                }
            }
        }

        core.rob.commit_head();
        core.stats.committed += 1;
        core.log.record(
            core.stats.cycles,
            format!("commit {:#x} {}", head.pc, head.opcode.mnemonic()),
        );
        if core.trace {
            eprintln!(
                "CM  pc={:#x} {} rob_tag={} result={}",
                head.pc,
                head.opcode.mnemonic(),
                head.tag.0,
                head.result
            );
        }
    }

    false
}

/// Renders a branch direction for log messages.
fn direction(taken: bool) -> &'static str {
    if taken {
        "taken"
    } else {
        "not-taken"
    }
}
