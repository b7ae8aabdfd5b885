//! End-to-end architectural scenarios.
//!
//! Each test runs a short program to quiescence (initial registers and
//! memory all zero unless preset) and checks the committed architectural
//! state, plus the speculation bookkeeping where relevant.

use crate::common::harness::TestContext;
use o3sim_core::core::arch::rat::RatEntry;
use o3sim_core::DecodedInstruction;

#[test]
fn straight_line_arithmetic() {
    let mut ctx = TestContext::new().load_program(vec![
        DecodedInstruction::addi(0x00, 1, 0, 5),
        DecodedInstruction::addi(0x04, 2, 0, 7),
        DecodedInstruction::add(0x08, 3, 1, 2),
    ]);
    ctx.run_to_completion();

    assert_eq!(ctx.reg(1), 5);
    assert_eq!(ctx.reg(2), 7);
    assert_eq!(ctx.reg(3), 12);
    assert_eq!(ctx.sim.stats().committed, 3);
}

#[test]
fn load_store_round_trip() {
    let mut ctx = TestContext::new().load_program(vec![
        DecodedInstruction::addi(0x00, 1, 0, 42),
        DecodedInstruction::sw(0x04, 1, 0, 0),
        DecodedInstruction::lw(0x08, 2, 0, 0),
    ]);
    ctx.run_to_completion();

    assert_eq!(ctx.reg(2), 42);
    assert_eq!(ctx.mem(0), 42);
}

#[test]
fn taken_branch_squashes_speculative_store() {
    // BEQ x1, x1 is always taken and jumps over the store. The predictor
    // starts weakly-not-taken, so the store is speculatively issued and
    // must be squashed by the mispredict flush before it can write.
    let mut ctx = TestContext::new().load_program(vec![
        DecodedInstruction::addi(0x00, 1, 0, 1),
        DecodedInstruction::beq(0x04, 1, 1, 8),
        DecodedInstruction::sw(0x08, 1, 0, 0),
        DecodedInstruction::addi(0x0c, 2, 0, 9),
    ]);
    ctx.run_to_completion();

    assert_eq!(ctx.mem(0), 0, "squashed store must never reach memory");
    assert_eq!(ctx.reg(2), 9);
}

#[test]
fn mispredict_recovers_precisely() {
    let mut ctx = TestContext::new().load_program(vec![
        DecodedInstruction::addi(0x00, 1, 0, 1),
        DecodedInstruction::bne(0x04, 1, 0, 8),
        DecodedInstruction::addi(0x08, 3, 0, 99),
        DecodedInstruction::addi(0x0c, 4, 0, 7),
    ]);
    ctx.run_to_completion();

    // The wrong-path write to x3 must not survive.
    assert_eq!(ctx.reg(3), 0);
    assert_eq!(ctx.reg(4), 7);

    let stats = ctx.sim.stats();
    assert_eq!(stats.branch_mispredicted, 1);
    assert_eq!(stats.branch_correct, 0);
    assert_eq!(stats.branch_accuracy(), 0.0);
    assert!(stats.discarded > 0);
}

#[test]
fn repeated_branch_trains_predictor() {
    // Countdown loop: the backward branch is taken 63 times and then
    // falls through. Early iterations mispredict while the history
    // warms up; accuracy must climb well past chance.
    let mut ctx = TestContext::new().load_program(vec![
        DecodedInstruction::addi(0x00, 1, 0, 64),
        DecodedInstruction::addi(0x04, 2, 0, 0),
        DecodedInstruction::addi(0x08, 2, 2, 1),
        DecodedInstruction::addi(0x0c, 1, 1, -1),
        DecodedInstruction::bne(0x10, 1, 0, -8),
        DecodedInstruction::add(0x14, 3, 2, 0),
    ]);
    ctx.run_to_completion();

    assert_eq!(ctx.reg(2), 64);
    assert_eq!(ctx.reg(3), 64);

    let stats = ctx.sim.stats();
    assert_eq!(stats.branch_correct + stats.branch_mispredicted, 64);
    assert!(
        stats.branch_accuracy() > 60.0,
        "accuracy stayed at {:.1}%",
        stats.branch_accuracy()
    );
}

#[test]
fn raw_chain_renames_through_rob() {
    let mut ctx = TestContext::new().load_program(vec![
        DecodedInstruction::addi(0x00, 1, 0, 1),
        DecodedInstruction::addi(0x04, 1, 1, 1),
        DecodedInstruction::addi(0x08, 1, 1, 1),
    ]);

    // After the first cycle both issued instructions target x1 under
    // distinct tags, and the RAT points at the youngest producer.
    ctx.sim.step();
    let rob = ctx.sim.rob_snapshot();
    assert_eq!(rob.len(), 2);
    assert_eq!(rob[0].rd, 1);
    assert_eq!(rob[1].rd, 1);
    assert_ne!(rob[0].tag, rob[1].tag);
    match ctx.sim.rat()[1] {
        RatEntry::Renamed(tag) => assert_eq!(tag, rob[1].tag),
        RatEntry::Architectural => panic!("x1 must be renamed while producers are in flight"),
    }

    ctx.run_to_completion();
    assert_eq!(ctx.reg(1), 3);
}

#[test]
fn x0_writes_are_discarded() {
    let mut ctx = TestContext::new().load_program(vec![
        DecodedInstruction::addi(0x00, 0, 0, 99),
        DecodedInstruction::add(0x04, 1, 0, 0),
    ]);
    ctx.run_to_completion();

    assert_eq!(ctx.reg(0), 0);
    assert_eq!(ctx.reg(1), 0);
}

#[test]
fn jal_redirects_unconditionally() {
    let mut ctx = TestContext::new().load_program(vec![
        DecodedInstruction::addi(0x00, 1, 0, 1),
        DecodedInstruction::jal(0x04, 0, 8),
        DecodedInstruction::addi(0x08, 2, 0, 99),
        DecodedInstruction::addi(0x0c, 3, 0, 3),
    ]);
    ctx.run_to_completion();

    assert_eq!(ctx.reg(1), 1);
    assert_eq!(ctx.reg(2), 0, "jumped-over instruction must not issue");
    assert_eq!(ctx.reg(3), 3);
}

#[test]
fn mispredict_is_logged() {
    let mut ctx = TestContext::new().load_program(vec![
        DecodedInstruction::addi(0x00, 1, 0, 1),
        DecodedInstruction::bne(0x04, 1, 0, 8),
        DecodedInstruction::addi(0x08, 3, 0, 99),
        DecodedInstruction::addi(0x0c, 4, 0, 7),
    ]);
    ctx.run_to_completion();

    let log = ctx.sim.log();
    assert!(log.iter().any(|e| e.message.contains("mispredict")));
    assert!(log.iter().any(|e| e.message.contains("flush")));
}
