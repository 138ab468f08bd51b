//! # Observation Log
//!
//! What a run left behind: which bot compared which pair of chips, and which
//! chip ended up in each output bin.
//!
//! The engine writes to the log while cascading; callers only ever see it
//! through `&ObservationLog`, so reads cannot mutate it.

use crate::{BotId, Chip, OutputId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Comparisons performed and chips delivered to outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationLog {
    comparisons: BTreeMap<(Chip, Chip), BotId>,
    outputs: BTreeMap<OutputId, Chip>,
}

impl ObservationLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_comparison(&mut self, low: Chip, high: Chip, bot: BotId) {
        self.comparisons.insert((low, high), bot);
    }

    /// Last write wins.
    pub(crate) fn record_output(&mut self, output: OutputId, chip: Chip) {
        self.outputs.insert(output, chip);
    }

    /// Every compared `(low, high)` pair and the bot that compared it.
    #[must_use]
    pub fn comparisons(&self) -> &BTreeMap<(Chip, Chip), BotId> {
        &self.comparisons
    }

    /// The chip held by each output bin.
    #[must_use]
    pub fn outputs(&self) -> &BTreeMap<OutputId, Chip> {
        &self.outputs
    }

    /// The bot that compared chips `a` and `b`, in either order.
    #[must_use]
    pub fn who_compared(&self, a: Chip, b: Chip) -> Option<BotId> {
        self.comparisons.get(&(a.min(b), a.max(b))).copied()
    }

    /// The chip in output bin `id`, if one arrived.
    #[must_use]
    pub fn output(&self, id: OutputId) -> Option<Chip> {
        self.outputs.get(&id).copied()
    }

    /// Product of the chips in the given outputs.
    ///
    /// Returns `None` if any of the outputs is empty. Multiplication saturates
    /// at `u64::MAX`.
    #[must_use]
    pub fn output_product(&self, ids: &[OutputId]) -> Option<u64> {
        ids.iter().try_fold(1u64, |acc, id| {
            self.output(*id)
                .map(|chip| acc.saturating_mul(u64::from(chip.value())))
        })
    }

    /// True if nothing was compared or delivered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comparisons.is_empty() && self.outputs.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
