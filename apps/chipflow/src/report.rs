//! # Reports
//!
//! Serializable views of a finished run, used for both the human-readable and
//! the `--json-mode` output of the CLI.

use chipflow_core::{Chip, ChipflowError, Engine, EngineStats, Instruction, OutputId};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

// =============================================================================
// RUN REPORT
// =============================================================================

/// One entry of the comparison log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonJson {
    pub low: u32,
    pub high: u32,
    pub bot: u32,
}

/// One filled output bin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputJson {
    pub output: u32,
    pub chip: u32,
}

/// A bot left holding chips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingJson {
    pub bot: u32,
    pub chips: Vec<u32>,
    pub has_rule: bool,
}

/// Everything observable after a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub comparisons: Vec<ComparisonJson>,
    pub outputs: Vec<OutputJson>,
    pub pending: Vec<PendingJson>,
    pub stats: EngineStats,
}

impl RunReport {
    /// Snapshot an engine. Entries are in ascending key order.
    #[must_use]
    pub fn from_engine(engine: &Engine) -> Self {
        let log = engine.log();
        Self {
            comparisons: log
                .comparisons()
                .iter()
                .map(|(&(low, high), bot)| ComparisonJson {
                    low: low.0,
                    high: high.0,
                    bot: bot.0,
                })
                .collect(),
            outputs: log
                .outputs()
                .iter()
                .map(|(output, chip)| OutputJson {
                    output: output.0,
                    chip: chip.0,
                })
                .collect(),
            pending: engine
                .pending()
                .into_iter()
                .map(|p| PendingJson {
                    bot: p.bot.0,
                    chips: p.chips.iter().map(|c| c.0).collect(),
                    has_rule: p.has_rule,
                })
                .collect(),
            stats: engine.stats(),
        }
    }
}

// =============================================================================
// SOLVE REPORT
// =============================================================================

/// The two puzzle answers and how long each took.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveReport {
    /// The chip pair looked up in part 1.
    pub compare: [u32; 2],
    /// The bot that compared that pair, if any did.
    pub part1: Option<u32>,
    pub part1_micros: u64,
    /// The outputs multiplied in part 2.
    pub outputs: Vec<u32>,
    /// Their product, if every one of them was filled.
    pub part2: Option<u64>,
    pub part2_micros: u64,
}

fn micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}

/// Run every instruction. Under `strict`, bots left holding chips are an
/// `IncompleteGraph` error.
fn run_all(instructions: &[Instruction], strict: bool) -> Result<Engine, ChipflowError> {
    let engine = Engine::run(instructions.iter().copied())?;
    if strict {
        let pending: Vec<_> = engine.pending().into_iter().map(|p| p.bot).collect();
        if !pending.is_empty() {
            return Err(ChipflowError::IncompleteGraph { pending });
        }
    }
    Ok(engine)
}

/// Answer both parts. Each part gets its own engine run and its own timing.
pub fn solve(
    instructions: &[Instruction],
    compare: (Chip, Chip),
    outputs: &[OutputId],
    strict: bool,
) -> Result<SolveReport, ChipflowError> {
    let started = Instant::now();
    let engine = run_all(instructions, strict)?;
    let part1 = engine.log().who_compared(compare.0, compare.1).map(|b| b.0);
    let part1_micros = micros(started.elapsed());

    let started = Instant::now();
    let engine = run_all(instructions, strict)?;
    let part2 = engine.log().output_product(outputs);
    let part2_micros = micros(started.elapsed());

    Ok(SolveReport {
        compare: [compare.0.0, compare.1.0],
        part1,
        part1_micros,
        outputs: outputs.iter().map(|o| o.0).collect(),
        part2,
        part2_micros,
    })
}
