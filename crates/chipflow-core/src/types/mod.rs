//! # Core Type Definitions
//!
//! This module contains all core types for the chipflow dataflow engine:
//! - Identifiers and values (`BotId`, `OutputId`, `Chip`)
//! - Routing (`Destination`, `Rule`)
//! - Input (`Instruction`)
//! - Error types (`ChipflowError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer values only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS & VALUES
// =============================================================================

/// Identifier of a bot (a two-slot comparison node).
///
/// The identifier space is open and sparse: bots come into existence the
/// first time any instruction or delivery names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BotId(pub u32);

/// Identifier of an output bin (a terminal sink).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OutputId(pub u32);

/// A value carried through the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Chip(pub u32);

impl Chip {
    /// Get the raw chip value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bot {}", self.0)
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "output {}", self.0)
    }
}

impl fmt::Display for Chip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// ROUTING
// =============================================================================

/// Where a bot forwards one of its two chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Destination {
    /// Hand the chip to another bot.
    Bot(BotId),
    /// Drop the chip into an output bin.
    Output(OutputId),
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bot(id) => id.fmt(f),
            Self::Output(id) => id.fmt(f),
        }
    }
}

/// The forwarding rule of a single bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    /// Destination of the lower chip.
    pub low: Destination,
    /// Destination of the higher chip.
    pub high: Destination,
}

impl Rule {
    /// Create a new rule.
    #[must_use]
    pub const fn new(low: Destination, high: Destination) -> Self {
        Self { low, high }
    }
}

// =============================================================================
// INSTRUCTION
// =============================================================================

/// A single input instruction for the engine.
///
/// Instructions arrive already structured; turning text into instructions is
/// the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    /// Deliver `value` straight into `bot`.
    Seed { value: Chip, bot: BotId },
    /// Register the forwarding rule of `bot`.
    Route {
        bot: BotId,
        low: Destination,
        high: Destination,
    },
}

impl Instruction {
    /// Shorthand for a `Seed` instruction.
    #[must_use]
    pub const fn seed(value: u32, bot: u32) -> Self {
        Self::Seed {
            value: Chip(value),
            bot: BotId(bot),
        }
    }

    /// Shorthand for a `Route` instruction.
    #[must_use]
    pub const fn route(bot: u32, low: Destination, high: Destination) -> Self {
        Self::Route {
            bot: BotId(bot),
            low,
            high,
        }
    }

    /// The bot this instruction addresses.
    #[must_use]
    pub const fn bot(&self) -> BotId {
        match self {
            Self::Seed { bot, .. } | Self::Route { bot, .. } => *bot,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the chipflow system.
///
/// - No silent failures
/// - Use `Result<T, ChipflowError>` for fallible operations
/// - Engine errors mean the instruction set is malformed for its graph; they
///   are never retried
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChipflowError {
    /// A bot already holding two chips was handed a third.
    #[error("{bot} already holds two chips, cannot take {incoming}")]
    Overflow { bot: BotId, incoming: Chip },

    /// A second routing rule was registered for the same bot.
    #[error("{0} already has a rule")]
    DuplicateRule(BotId),

    /// A bot was drained while not holding two chips.
    #[error("{0} drained before it was full")]
    UndrainedAccess(BotId),

    /// A single instruction cascaded through more deliveries than allowed.
    #[error("cascade exceeded {steps} deliveries (cyclic routing?)")]
    CascadeLimit { steps: usize },

    /// Bots still held chips when the run was finished.
    #[error("incomplete graph: {} bot(s) still pending", pending.len())]
    IncompleteGraph { pending: Vec<BotId> },

    /// Static validation found problems in an instruction set.
    #[error("validation failed: {problems} problem(s)")]
    ValidationFailed { problems: usize },

    /// A textual instruction could not be parsed.
    #[error("invalid instruction on line {line}: {text:?}")]
    InvalidInstruction { line: usize, text: String },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),
}

// =============================================================================
// TESTS
// =============================================================================
