//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use chipflow::config::Settings;
use chipflow::parse::load_instructions;
use chipflow::report::{RunReport, SolveReport, solve};
use chipflow_core::{ChipflowError, Engine, check};
use serde::Serialize;
use std::time::Instant;

/// Print a value as pretty JSON.
fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// RUN COMMAND
// =============================================================================

/// Apply every instruction and print the observation log.
pub fn cmd_run(settings: &Settings, json_mode: bool) -> Result<(), ChipflowError> {
    let instructions = load_instructions(&settings.input, &settings.format)?;
    tracing::info!(
        "Applying {} instructions from {:?}",
        instructions.len(),
        settings.input
    );

    let started = Instant::now();
    let engine = Engine::run(instructions)?;
    tracing::info!("Run finished in {:.3?}", started.elapsed());

    let report = RunReport::from_engine(&engine);
    if settings.strict {
        engine.finish()?;
    } else if !report.pending.is_empty() {
        tracing::warn!("{} bot(s) still holding chips", report.pending.len());
    }

    if json_mode {
        print_json(&report);
        return Ok(());
    }

    println!("chipflow Run");
    println!("============");
    println!("Input: {:?}", settings.input);
    println!();
    println!("Comparisons: {}", report.comparisons.len());
    for c in &report.comparisons {
        println!("  bot {:>4} compared {} and {}", c.bot, c.low, c.high);
    }
    println!();
    println!("Outputs: {}", report.outputs.len());
    for o in &report.outputs {
        println!("  output {:>4} = {}", o.output, o.chip);
    }
    if !report.pending.is_empty() {
        println!();
        println!("Pending: {}", report.pending.len());
        for p in &report.pending {
            println!(
                "  bot {:>4} holds {:?}{}",
                p.bot,
                p.chips,
                if p.has_rule { "" } else { " (no rule)" }
            );
        }
    }
    println!();
    println!(
        "Instructions: {}  Deliveries: {}  Firings: {}",
        report.stats.instructions, report.stats.deliveries, report.stats.firings
    );

    Ok(())
}

// =============================================================================
// SOLVE COMMAND
// =============================================================================

fn print_solve(report: &SolveReport) {
    let part1 = report
        .part1
        .map_or_else(|| "none".to_string(), |bot| bot.to_string());
    let part2 = report
        .part2
        .map_or_else(|| "none".to_string(), |product| product.to_string());

    println!(
        "Part 1: {} (bot comparing {} and {}) in {}us",
        part1, report.compare[0], report.compare[1], report.part1_micros
    );
    println!(
        "Part 2: {} (product of outputs {:?}) in {}us",
        part2, report.outputs, report.part2_micros
    );
}

/// Answer both puzzle parts.
pub fn cmd_solve(settings: &Settings, json_mode: bool) -> Result<(), ChipflowError> {
    let instructions = load_instructions(&settings.input, &settings.format)?;
    let report = solve(
        &instructions,
        settings.compare,
        &settings.product_outputs,
        settings.strict,
    )?;

    if report.part1.is_none() {
        tracing::warn!(
            "No bot compared {} and {}",
            settings.compare.0,
            settings.compare.1
        );
    }
    if report.part2.is_none() {
        tracing::warn!("Not every output in {:?} was filled", report.outputs);
    }

    if json_mode {
        print_json(&report);
    } else {
        print_solve(&report);
    }
    Ok(())
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Statically validate an instruction file.
pub fn cmd_check(settings: &Settings, json_mode: bool) -> Result<(), ChipflowError> {
    let instructions = load_instructions(&settings.input, &settings.format)?;
    let report = check(&instructions);

    if json_mode {
        print_json(&report);
    } else {
        println!("chipflow Check");
        println!("==============");
        println!("Seeds:   {}", report.seeds);
        println!("Routes:  {}", report.routes);
        println!("Bots:    {}", report.bots.len());
        println!("Outputs: {}", report.outputs.len());
        for bot in &report.duplicate_rules {
            println!("  {} has more than one rule", bot);
        }
        for bot in &report.unruled {
            println!("  {} receives chips but has no rule", bot);
        }
        for (bot, count) in &report.overfed {
            println!("  {} has no rule and is sent {} chips", bot, count);
        }
    }

    if !report.is_clean() {
        return Err(ChipflowError::ValidationFailed {
            problems: report.problem_count(),
        });
    }
    Ok(())
}
