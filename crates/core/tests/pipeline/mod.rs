/// Per-cycle structural invariant checks.
mod invariants;
/// End-to-end architectural scenarios.
mod scenarios;
/// Timing and backpressure properties.
mod timing;
