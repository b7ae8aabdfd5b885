//! Functional units and structural models.

/// Integer ALU and branch condition evaluation.
pub mod alu;
/// Set-associative write-back cache model.
pub mod cache;
/// gshare branch direction predictor.
pub mod gshare;
