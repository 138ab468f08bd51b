//! # Routing Table
//!
//! Maps each bot to its single forwarding rule.
//!
//! A rule is write-once: registering a second rule for the same bot is an
//! error, and rules are never removed.

use crate::{BotId, ChipflowError, Rule};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// The routing table of a run.
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    rules: BTreeMap<BotId, Rule>,
}

impl RoutingTable {
    /// Create an empty routing table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the rule for `bot`.
    ///
    /// Returns `ChipflowError::DuplicateRule` if the bot already has one.
    pub fn register(&mut self, bot: BotId, rule: Rule) -> Result<(), ChipflowError> {
        match self.rules.entry(bot) {
            Entry::Occupied(_) => Err(ChipflowError::DuplicateRule(bot)),
            Entry::Vacant(slot) => {
                slot.insert(rule);
                Ok(())
            }
        }
    }

    /// The rule registered for `bot`, if any.
    #[must_use]
    pub fn lookup(&self, bot: BotId) -> Option<Rule> {
        self.rules.get(&bot).copied()
    }

    #[must_use]
    pub fn contains(&self, bot: BotId) -> bool {
        self.rules.contains_key(&bot)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All rules in ascending bot order.
    pub fn iter(&self) -> impl Iterator<Item = (BotId, Rule)> + '_ {
        self.rules.iter().map(|(bot, rule)| (*bot, *rule))
    }
}

// =============================================================================
// TESTS
// =============================================================================
