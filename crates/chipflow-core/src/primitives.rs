//! # Engine Primitives
//!
//! Hardcoded runtime constants for the chipflow engine.
//!
//! These are compiled into the binary and are immutable at runtime.

/// Number of chips a bot holds before it can fire.
pub const BOT_CAPACITY: usize = 2;

/// Maximum number of deliveries processed while applying one instruction.
///
/// - An acyclic graph delivers each chip at most once per hop, so real
///   cascades stay far below this bound.
/// - A cyclic routing graph would otherwise cascade forever.
pub const MAX_CASCADE_STEPS: usize = 1_000_000;

/// Maximum number of instructions accepted in a single run.
///
/// Callers loading instructions from untrusted files check against this
/// before handing the sequence to the engine.
pub const MAX_INSTRUCTIONS: usize = 100_000;
