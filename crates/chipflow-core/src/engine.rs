//! # Resolution Engine
//!
//! Owns every bot, the routing table and the observation log of a run, and
//! applies instructions one at a time.
//!
//! ## Firing
//!
//! A bot fires when it holds two chips AND has a rule. Either condition may be
//! satisfied last, so both `Seed` and `Route` end with a fire-check on their
//! bot. Firing drains the bot, records the comparison, and delivers the low
//! chip and then the high chip. Delivering to a bot is the same as seeding
//! it, so one instruction can cascade through many bots.
//!
//! ## Cascades
//!
//! The cascade runs on an explicit worklist rather than on the call stack.
//! Work items are processed depth-first: the low chip's entire downstream
//! cascade completes before the high chip is delivered. Each `apply` is
//! capped at `MAX_CASCADE_STEPS` deliveries; exceeding it means the routing
//! graph contains a cycle.
//!
//! ## Failure
//!
//! Errors are fatal for the run. State is not rolled back, so an engine that
//! returned an error should be discarded.

use crate::bot::Bot;
use crate::observation::ObservationLog;
use crate::primitives::MAX_CASCADE_STEPS;
use crate::routing::RoutingTable;
use crate::{BotId, Chip, ChipflowError, Destination, Instruction, Rule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// REPORTING TYPES
// =============================================================================

/// Counters accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    /// Instructions applied successfully.
    pub instructions: u64,
    /// Chips moved into a bot or an output, including seeds.
    pub deliveries: u64,
    /// Times any bot drained and forwarded its chips.
    pub firings: u64,
    /// Bots that have been referenced so far.
    pub bots: usize,
    /// Rules registered so far.
    pub rules: usize,
}

/// A bot still holding chips after the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pending {
    pub bot: BotId,
    /// Chips held, lowest first.
    pub chips: Vec<Chip>,
    /// Whether the bot ever received a rule.
    pub has_rule: bool,
}

/// One unit of cascade work.
#[derive(Debug, Clone, Copy)]
enum Work {
    /// Move a chip into a bot or an output.
    Deliver(Destination, Chip),
    /// Fire the bot if it is full and ruled.
    FireCheck(BotId),
}

// =============================================================================
// ENGINE
// =============================================================================

/// The dataflow resolution engine.
///
/// # Example
/// ```
/// use chipflow_core::{BotId, Chip, Destination, Engine, Instruction, OutputId};
///
/// let mut engine = Engine::new();
/// engine.apply(Instruction::seed(5, 0)).expect("seed");
/// engine
///     .apply(Instruction::route(
///         0,
///         Destination::Output(OutputId(0)),
///         Destination::Output(OutputId(1)),
///     ))
///     .expect("route");
/// engine.apply(Instruction::seed(3, 0)).expect("seed");
///
/// assert_eq!(engine.log().output(OutputId(0)), Some(Chip(3)));
/// assert_eq!(engine.log().who_compared(Chip(5), Chip(3)), Some(BotId(0)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    /// Bot storage: BotId -> Bot, created lazily.
    bots: BTreeMap<BotId, Bot>,
    rules: RoutingTable,
    log: ObservationLog,
    stats: EngineStats,
}

impl Engine {
    /// Create an engine with no bots and no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine and apply the whole instruction sequence.
    pub fn run<I>(instructions: I) -> Result<Self, ChipflowError>
    where
        I: IntoIterator<Item = Instruction>,
    {
        let mut engine = Self::new();
        engine.apply_all(instructions)?;
        Ok(engine)
    }

    /// Apply instructions in order, stopping at the first error.
    pub fn apply_all<I>(&mut self, instructions: I) -> Result<(), ChipflowError>
    where
        I: IntoIterator<Item = Instruction>,
    {
        for instruction in instructions {
            self.apply(instruction)?;
        }
        Ok(())
    }

    /// Apply one instruction and run its cascade to completion.
    pub fn apply(&mut self, instruction: Instruction) -> Result<(), ChipflowError> {
        match instruction {
            Instruction::Seed { value, bot } => {
                self.cascade(Work::Deliver(Destination::Bot(bot), value))?;
            }
            Instruction::Route { bot, low, high } => {
                self.rules.register(bot, Rule::new(low, high))?;
                self.get_or_create(bot);
                self.cascade(Work::FireCheck(bot))?;
            }
        }
        self.stats.instructions = self.stats.instructions.saturating_add(1);
        Ok(())
    }

    /// Drain the worklist seeded with `start`.
    fn cascade(&mut self, start: Work) -> Result<(), ChipflowError> {
        let mut worklist = vec![start];
        let mut steps = 0usize;

        while let Some(work) = worklist.pop() {
            match work {
                Work::Deliver(destination, chip) => {
                    steps += 1;
                    if steps > MAX_CASCADE_STEPS {
                        return Err(ChipflowError::CascadeLimit {
                            steps: MAX_CASCADE_STEPS,
                        });
                    }
                    self.stats.deliveries = self.stats.deliveries.saturating_add(1);

                    match destination {
                        Destination::Output(output) => self.log.record_output(output, chip),
                        Destination::Bot(bot) => {
                            self.get_or_create(bot).add(chip)?;
                            worklist.push(Work::FireCheck(bot));
                        }
                    }
                }
                Work::FireCheck(bot) => {
                    if let Some((rule, low, high)) = self.fire(bot)? {
                        // Stack order: low is popped (and fully resolved) first.
                        worklist.push(Work::Deliver(rule.high, high));
                        worklist.push(Work::Deliver(rule.low, low));
                    }
                }
            }
        }

        Ok(())
    }

    /// Drain `bot` if it is full and has a rule.
    ///
    /// Returns `None` while the bot is still waiting for a chip or a rule.
    fn fire(&mut self, bot: BotId) -> Result<Option<(Rule, Chip, Chip)>, ChipflowError> {
        let Some(rule) = self.rules.lookup(bot) else {
            return Ok(None);
        };

        let node = self.get_or_create(bot);
        if !node.is_full() {
            return Ok(None);
        }
        let (low, high) = node.drain()?;

        self.log.record_comparison(low, high, bot);
        self.stats.firings = self.stats.firings.saturating_add(1);
        Ok(Some((rule, low, high)))
    }

    /// Get the bot with this id, creating it empty on first reference.
    fn get_or_create(&mut self, bot: BotId) -> &mut Bot {
        self.bots.entry(bot).or_insert_with(|| Bot::new(bot))
    }

    // =========================================================================
    // READ ACCESS
    // =========================================================================

    /// The observation log accumulated so far.
    #[must_use]
    pub fn log(&self) -> &ObservationLog {
        &self.log
    }

    /// Look up a bot that has been referenced.
    #[must_use]
    pub fn bot(&self, id: BotId) -> Option<&Bot> {
        self.bots.get(&id)
    }

    /// All referenced bots in ascending id order.
    pub fn bots(&self) -> impl Iterator<Item = &Bot> {
        self.bots.values()
    }

    #[must_use]
    pub fn rules(&self) -> &RoutingTable {
        &self.rules
    }

    #[must_use]
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            bots: self.bots.len(),
            rules: self.rules.len(),
            ..self.stats
        }
    }

    /// Bots left holding chips, in ascending id order.
    ///
    /// A non-empty result after the last instruction means some bot never got
    /// its second chip or never got a rule.
    #[must_use]
    pub fn pending(&self) -> Vec<Pending> {
        self.bots
            .values()
            .filter(|bot| bot.held() > 0)
            .map(|bot| Pending {
                bot: bot.id(),
                chips: bot.peek(),
                has_rule: self.rules.contains(bot.id()),
            })
            .collect()
    }

    /// Consume the engine and return its log.
    #[must_use]
    pub fn into_log(self) -> ObservationLog {
        self.log
    }

    /// Consume the engine, requiring that no bot is left pending.
    pub fn finish(self) -> Result<ObservationLog, ChipflowError> {
        let pending: Vec<BotId> = self.pending().into_iter().map(|p| p.bot).collect();
        if !pending.is_empty() {
            return Err(ChipflowError::IncompleteGraph { pending });
        }
        Ok(self.log)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutputId;

    fn to_bot(id: u32) -> Destination {
        Destination::Bot(BotId(id))
    }

    fn to_output(id: u32) -> Destination {
        Destination::Output(OutputId(id))
    }

    fn sample() -> Vec<Instruction> {
        vec![
            Instruction::seed(5, 2),
            Instruction::route(2, to_bot(1), to_bot(0)),
            Instruction::seed(3, 1),
            Instruction::route(1, to_output(1), to_bot(0)),
            Instruction::route(0, to_output(2), to_output(0)),
            Instruction::seed(2, 2),
        ]
    }

    #[test]
    fn sample_cascade_resolves() {
        let engine = Engine::run(sample()).expect("run");
        let log = engine.log();

        assert_eq!(log.output(OutputId(0)), Some(Chip(5)));
        assert_eq!(log.output(OutputId(1)), Some(Chip(2)));
        assert_eq!(log.output(OutputId(2)), Some(Chip(3)));
        assert_eq!(log.comparisons().get(&(Chip(2), Chip(5))), Some(&BotId(2)));
        assert_eq!(log.who_compared(Chip(3), Chip(2)), Some(BotId(1)));
        assert_eq!(log.who_compared(Chip(3), Chip(5)), Some(BotId(0)));
    }

    #[test]
    fn sample_cascade_happens_in_last_seed() {
        let instructions = sample();
        let mut engine = Engine::new();
        engine
            .apply_all(instructions[..5].iter().copied())
            .expect("prefix");

        assert!(engine.log().is_empty());

        engine.apply(instructions[5]).expect("last seed");
        assert_eq!(engine.log().outputs().len(), 3);
        assert_eq!(engine.log().comparisons().len(), 3);
    }

    #[test]
    fn route_after_full_bot_fires() {
        let mut engine = Engine::new();
        engine.apply(Instruction::seed(7, 9)).expect("seed");
        engine.apply(Instruction::seed(4, 9)).expect("seed");
        assert!(engine.bot(BotId(9)).is_some_and(Bot::is_full));

        engine
            .apply(Instruction::route(9, to_output(0), to_output(1)))
            .expect("route");

        assert_eq!(engine.log().output(OutputId(0)), Some(Chip(4)));
        assert_eq!(engine.log().output(OutputId(1)), Some(Chip(7)));
        assert_eq!(engine.bot(BotId(9)).map(Bot::held), Some(0));
    }

    #[test]
    fn overflow_aborts_third_seed() {
        let mut engine = Engine::new();
        engine.apply(Instruction::seed(1, 5)).expect("first");
        engine.apply(Instruction::seed(2, 5)).expect("second");

        let err = engine.apply(Instruction::seed(3, 5)).expect_err("third");
        assert_eq!(
            err,
            ChipflowError::Overflow {
                bot: BotId(5),
                incoming: Chip(3)
            }
        );
    }

    #[test]
    fn duplicate_route_rejected() {
        let mut engine = Engine::new();
        let route = Instruction::route(4, to_output(0), to_output(1));
        engine.apply(route).expect("first");

        assert_eq!(
            engine.apply(route),
            Err(ChipflowError::DuplicateRule(BotId(4)))
        );
    }

    #[test]
    fn overflow_inside_cascade_propagates() {
        // Bot 1 is full and unruled; bot 0 forwards into it.
        let mut engine = Engine::new();
        engine.apply(Instruction::seed(1, 1)).expect("seed");
        engine.apply(Instruction::seed(2, 1)).expect("seed");
        engine
            .apply(Instruction::route(0, to_bot(1), to_output(0)))
            .expect("route");
        engine.apply(Instruction::seed(10, 0)).expect("seed");

        let err = engine.apply(Instruction::seed(20, 0)).expect_err("overflow");
        assert_eq!(
            err,
            ChipflowError::Overflow {
                bot: BotId(1),
                incoming: Chip(10)
            }
        );
    }

    #[test]
    fn low_subtree_resolves_before_high_delivery() {
        // Bot 0 sends low to bot 1 and high to output 0. Bot 1 also sends its
        // high chip to output 0, so output 0 ends with bot 0's high chip only
        // if the low subtree ran first.
        let mut engine = Engine::new();
        engine.apply(Instruction::seed(1, 1)).expect("seed");
        engine
            .apply(Instruction::route(1, to_output(1), to_output(0)))
            .expect("route");
        engine
            .apply(Instruction::route(0, to_bot(1), to_output(0)))
            .expect("route");
        engine.apply(Instruction::seed(5, 0)).expect("seed");
        engine.apply(Instruction::seed(9, 0)).expect("seed");

        assert_eq!(engine.log().output(OutputId(1)), Some(Chip(1)));
        assert_eq!(engine.log().output(OutputId(0)), Some(Chip(9)));
    }

    #[test]
    fn cycle_hits_cascade_limit() {
        // Bots 0 and 1 hand both chips back and forth forever.
        let mut engine = Engine::new();
        engine
            .apply(Instruction::route(0, to_bot(1), to_bot(1)))
            .expect("route");
        engine
            .apply(Instruction::route(1, to_bot(0), to_bot(0)))
            .expect("route");
        engine.apply(Instruction::seed(1, 0)).expect("seed");

        let err = engine.apply(Instruction::seed(2, 0)).expect_err("cycle");
        assert_eq!(
            err,
            ChipflowError::CascadeLimit {
                steps: MAX_CASCADE_STEPS
            }
        );
    }

    #[test]
    fn pending_reports_unfinished_bots() {
        let mut engine = Engine::new();
        engine.apply(Instruction::seed(3, 4)).expect("seed");
        engine.apply(Instruction::seed(8, 6)).expect("seed");
        engine.apply(Instruction::seed(1, 6)).expect("seed");
        engine
            .apply(Instruction::route(4, to_output(0), to_output(1)))
            .expect("route");

        assert_eq!(
            engine.pending(),
            vec![
                Pending {
                    bot: BotId(4),
                    chips: vec![Chip(3)],
                    has_rule: true,
                },
                Pending {
                    bot: BotId(6),
                    chips: vec![Chip(1), Chip(8)],
                    has_rule: false,
                },
            ]
        );
        assert_eq!(
            engine.finish(),
            Err(ChipflowError::IncompleteGraph {
                pending: vec![BotId(4), BotId(6)]
            })
        );
    }

    #[test]
    fn finish_returns_log_when_complete() {
        let engine = Engine::run(sample()).expect("run");
        assert!(engine.pending().is_empty());

        let log = engine.finish().expect("finish");
        assert_eq!(log.output_product(&[OutputId(0), OutputId(1), OutputId(2)]), Some(30));
    }

    #[test]
    fn stats_count_work() {
        let engine = Engine::run(sample()).expect("run");
        let stats = engine.stats();

        assert_eq!(stats.instructions, 6);
        assert_eq!(stats.firings, 3);
        assert_eq!(stats.bots, 3);
        assert_eq!(stats.rules, 3);
        // 3 seeds + 2 chips forwarded by each of the 3 firings.
        assert_eq!(stats.deliveries, 9);
    }

    #[test]
    fn bot_fires_more_than_once() {
        let mut engine = Engine::new();
        engine
            .apply(Instruction::route(0, to_output(0), to_output(1)))
            .expect("route");
        for chip in [4, 2, 9, 7] {
            engine.apply(Instruction::seed(chip, 0)).expect("seed");
        }

        assert_eq!(engine.bot(BotId(0)).map(Bot::firings), Some(2));
        assert_eq!(engine.log().who_compared(Chip(2), Chip(4)), Some(BotId(0)));
        assert_eq!(engine.log().who_compared(Chip(7), Chip(9)), Some(BotId(0)));
        assert_eq!(engine.log().output(OutputId(1)), Some(Chip(9)));
    }
}
