/// Test harness: simulator construction and program loading helpers.
pub mod harness;
