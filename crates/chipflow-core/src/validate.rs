//! # Static Validation
//!
//! Checks an instruction set for problems that can be found without running
//! it:
//! - bots with more than one rule
//! - bots that are handed chips but never get a rule
//! - unruled bots fed more than `BOT_CAPACITY` chips
//!
//! The check is conservative. It reads instructions and never simulates a
//! cascade, so a rule counts as feeding its targets even if it never fires. A
//! bot with a rule fires every time it fills and may take any number of chips,
//! so it is never reported as overfed. An engine run stops at the first fault;
//! the report lists everything it can see.

use crate::primitives::BOT_CAPACITY;
use crate::{BotId, Destination, Instruction, OutputId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Result of a static check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub seeds: usize,
    pub routes: usize,
    /// Every bot named by any instruction or rule.
    pub bots: BTreeSet<BotId>,
    /// Every output named by any rule.
    pub outputs: BTreeSet<OutputId>,
    /// Bots that received more than one rule.
    pub duplicate_rules: BTreeSet<BotId>,
    /// Bots that receive chips but have no rule.
    pub unruled: BTreeSet<BotId>,
    /// Unruled bots and the number of chips sent to them, seeds plus rule
    /// destinations, where that exceeds what they can hold.
    pub overfed: BTreeMap<BotId, usize>,
}

impl ValidationReport {
    /// True if no problem was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.problem_count() == 0
    }

    /// Total number of problem entries across all problem kinds.
    #[must_use]
    pub fn problem_count(&self) -> usize {
        self.duplicate_rules.len() + self.unruled.len() + self.overfed.len()
    }
}

/// Check `instructions` without applying them.
#[must_use]
pub fn check(instructions: &[Instruction]) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut ruled = BTreeSet::new();
    let mut inbound: BTreeMap<BotId, usize> = BTreeMap::new();

    for instruction in instructions {
        match *instruction {
            Instruction::Seed { bot, .. } => {
                report.seeds += 1;
                report.bots.insert(bot);
                *inbound.entry(bot).or_default() += 1;
            }
            Instruction::Route { bot, low, high } => {
                report.routes += 1;
                report.bots.insert(bot);
                if !ruled.insert(bot) {
                    report.duplicate_rules.insert(bot);
                }
                for destination in [low, high] {
                    match destination {
                        Destination::Bot(target) => {
                            report.bots.insert(target);
                            *inbound.entry(target).or_default() += 1;
                        }
                        Destination::Output(output) => {
                            report.outputs.insert(output);
                        }
                    }
                }
            }
        }
    }

    for (bot, count) in inbound {
        if ruled.contains(&bot) {
            continue;
        }
        report.unruled.insert(bot);
        if count > BOT_CAPACITY {
            report.overfed.insert(bot, count);
        }
    }
    report
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn to_bot(id: u32) -> Destination {
        Destination::Bot(BotId(id))
    }

    fn to_output(id: u32) -> Destination {
        Destination::Output(OutputId(id))
    }

    #[test]
    fn clean_sample() {
        let report = check(&[
            Instruction::seed(5, 2),
            Instruction::route(2, to_bot(1), to_bot(0)),
            Instruction::seed(3, 1),
            Instruction::route(1, to_output(1), to_bot(0)),
            Instruction::route(0, to_output(2), to_output(0)),
            Instruction::seed(2, 2),
        ]);

        assert!(report.is_clean());
        assert_eq!(report.seeds, 3);
        assert_eq!(report.routes, 3);
        assert_eq!(report.bots.len(), 3);
        assert_eq!(report.outputs.len(), 3);
    }

    #[test]
    fn finds_every_problem() {
        let report = check(&[
            Instruction::route(4, to_output(0), to_bot(7)),
            Instruction::route(4, to_output(0), to_output(1)),
            Instruction::seed(1, 5),
            Instruction::seed(2, 5),
            Instruction::seed(3, 5),
        ]);

        assert!(!report.is_clean());
        assert_eq!(report.duplicate_rules, BTreeSet::from([BotId(4)]));
        assert_eq!(report.unruled, BTreeSet::from([BotId(5), BotId(7)]));
        assert_eq!(report.overfed.get(&BotId(5)), Some(&3));
        assert_eq!(report.problem_count(), 4);
    }

    #[test]
    fn ruled_bot_may_fire_repeatedly() {
        let report = check(&[
            Instruction::route(0, to_output(0), to_output(1)),
            Instruction::seed(4, 0),
            Instruction::seed(2, 0),
            Instruction::seed(9, 0),
            Instruction::seed(7, 0),
        ]);

        assert!(report.is_clean());
        assert!(report.overfed.is_empty());
    }

    #[test]
    fn overfed_counts_rule_deliveries() {
        let report = check(&[
            Instruction::route(1, to_bot(3), to_output(0)),
            Instruction::route(2, to_output(1), to_bot(3)),
            Instruction::seed(8, 3),
        ]);

        assert_eq!(report.unruled, BTreeSet::from([BotId(3)]));
        assert_eq!(report.overfed.get(&BotId(3)), Some(&3));
        assert_eq!(report.problem_count(), 2);
    }

    #[test]
    fn unruled_within_capacity_is_not_overfed() {
        let report = check(&[Instruction::seed(1, 6), Instruction::seed(2, 6)]);

        assert_eq!(report.unruled, BTreeSet::from([BotId(6)]));
        assert!(report.overfed.is_empty());
        assert_eq!(report.problem_count(), 1);
    }

    #[test]
    fn empty_input_is_clean() {
        assert!(check(&[]).is_clean());
    }
}
