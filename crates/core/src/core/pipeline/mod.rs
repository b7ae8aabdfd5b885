//! Pipeline stages and per-cycle orchestration.
//!
//! One call to `tick` advances the simulated clock by exactly one cycle.
//! Stages run in reverse program order to emulate latched hardware:
//! Commit first, then Execute with broadcast, then fused Fetch/Issue.
//! Running Commit before Execute means a result broadcast in cycle N is
//! not visible to commit until N+1; running Execute before Issue means a
//! newly issued station cannot fire in its issue cycle. A mispredict
//! detected at commit flushes and aborts the remainder of the cycle.

/// Commit stage: in-order retirement from the ROB head.
pub mod commit;
/// Execute stage: wake-up, countdown, completion, broadcast.
pub mod execute;
/// Fused fetch/issue stage: renaming, dispatch, PC redirect.
pub mod issue;
/// Load/store queue.
pub mod lsq;
/// Reorder buffer.
pub mod rob;
/// Reservation stations.
pub mod station;

use crate::core::Core;

/// Advances the core by one cycle.
pub fn tick(core: &mut Core) {
    core.stats.cycles += 1;

    let flushed = commit::commit_stage(core);
    if !flushed {
        execute::execute_stage(core);
        issue::issue_stage(core);
    }

    core.stats.sample_occupancy(
        core.rob.len(),
        core.alu_rs.len(),
        core.ls_rs.len(),
        core.lsq.len(),
    );
}
