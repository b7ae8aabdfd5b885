//! Instruction set definitions.
//!
//! This module holds the decoded instruction format the core consumes,
//! the supported opcode set, and register-name helpers for trace output.

/// Register name constants for trace and snapshot rendering.
pub mod abi;
/// Decoded instruction record and opcode classification.
pub mod instruction;
