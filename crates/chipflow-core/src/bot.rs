//! # Bot
//!
//! A two-slot chip buffer.
//!
//! A bot walks `Empty -> HasOne -> Full` as chips arrive and is reset to
//! `Empty` when drained. Once full, the two chips are kept as `(low, high)`;
//! arrival order is not retained.

use crate::{BotId, Chip, ChipflowError};
use serde::{Deserialize, Serialize};

/// The chips currently held by a bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Slots {
    #[default]
    Empty,
    HasOne(Chip),
    Full { low: Chip, high: Chip },
}

/// A bot in the dataflow graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bot {
    id: BotId,
    slots: Slots,
    firings: u64,
}

impl Bot {
    /// Create an empty bot.
    #[must_use]
    pub const fn new(id: BotId) -> Self {
        Self {
            id,
            slots: Slots::Empty,
            firings: 0,
        }
    }

    #[must_use]
    pub const fn id(&self) -> BotId {
        self.id
    }

    #[must_use]
    pub const fn slots(&self) -> Slots {
        self.slots
    }

    /// Hand a chip to the bot.
    ///
    /// Fails with `Overflow` if the bot already holds two chips.
    pub fn add(&mut self, chip: Chip) -> Result<(), ChipflowError> {
        self.slots = match self.slots {
            Slots::Empty => Slots::HasOne(chip),
            Slots::HasOne(held) => Slots::Full {
                low: held.min(chip),
                high: held.max(chip),
            },
            Slots::Full { .. } => {
                return Err(ChipflowError::Overflow {
                    bot: self.id,
                    incoming: chip,
                });
            }
        };
        Ok(())
    }

    /// True iff the bot holds two chips.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        matches!(self.slots, Slots::Full { .. })
    }

    /// Number of chips currently held (0, 1 or 2).
    #[must_use]
    pub const fn held(&self) -> usize {
        match self.slots {
            Slots::Empty => 0,
            Slots::HasOne(_) => 1,
            Slots::Full { .. } => 2,
        }
    }

    /// Chips currently held, lowest first.
    #[must_use]
    pub fn peek(&self) -> Vec<Chip> {
        match self.slots {
            Slots::Empty => Vec::new(),
            Slots::HasOne(chip) => vec![chip],
            Slots::Full { low, high } => vec![low, high],
        }
    }

    /// How many times this bot has been drained.
    #[must_use]
    pub const fn firings(&self) -> u64 {
        self.firings
    }

    /// Take both chips out of a full bot, leaving it empty.
    pub fn drain(&mut self) -> Result<(Chip, Chip), ChipflowError> {
        match self.slots {
            Slots::Full { low, high } => {
                self.slots = Slots::Empty;
                self.firings = self.firings.saturating_add(1);
                Ok((low, high))
            }
            Slots::Empty | Slots::HasOne(_) => Err(ChipflowError::UndrainedAccess(self.id)),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
