//! # chipflow-core
//!
//! The deterministic dataflow engine for chipflow - THE ENGINE.
//!
//! Bots hold up to two chips. Once a bot holds two chips and has a routing
//! rule, it compares them and hands the low and high chip to other bots or
//! to output bins. One instruction can cascade through any number of bots.
//!
//! ## Architectural Constraints
//!
//! The engine:
//! - Never parses text and never performs I/O; callers hand it structured
//!   `Instruction`s and read the `ObservationLog` afterwards
//! - Is single-threaded and synchronous; `Engine::apply` completes its whole
//!   cascade before returning
//! - Uses `BTreeMap` only, so every observable ordering is deterministic

// =============================================================================
// MODULES
// =============================================================================

pub mod bot;
pub mod engine;
pub mod observation;
pub mod primitives;
pub mod routing;
pub mod types;
pub mod validate;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{BotId, Chip, ChipflowError, Destination, Instruction, OutputId, Rule};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use bot::{Bot, Slots};
pub use engine::{Engine, EngineStats, Pending};
pub use observation::ObservationLog;
pub use routing::RoutingTable;
pub use validate::{ValidationReport, check};
