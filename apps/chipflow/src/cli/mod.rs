//! # chipflow CLI Module
//!
//! ## Available Commands
//!
//! - `run` - Apply an instruction file and print the observation log
//! - `solve` - Report which bot compared a chip pair and the product of outputs
//! - `check` - Statically validate an instruction file without running it

mod commands;

use chipflow::config::{FileConfig, Overrides, Settings};
use chipflow_core::ChipflowError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// chipflow - resolve bot instruction cascades
///
/// Bots compare pairs of chips and pass the low and high chip on to other
/// bots or output bins.
#[derive(Parser, Debug)]
#[command(name = "chipflow")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML config file (default: chipflow.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Input selection shared by every command.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Path to the instruction file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Input format (text, json)
    #[arg(short = 't', long)]
    pub format: Option<String>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply all instructions and print comparisons and outputs
    Run {
        #[command(flatten)]
        input: InputArgs,

        /// Fail if any bot is left holding chips
        #[arg(long)]
        strict: bool,
    },

    /// Answer both puzzle parts
    Solve {
        #[command(flatten)]
        input: InputArgs,

        /// Chip pair to look up (comma-separated, e.g. 17,61)
        #[arg(long)]
        compare: Option<String>,

        /// Outputs to multiply (comma-separated, e.g. 0,1,2)
        #[arg(long)]
        outputs: Option<String>,

        /// Fail if any bot is left holding chips
        #[arg(long)]
        strict: bool,
    },

    /// Validate instructions without running them
    Check {
        #[command(flatten)]
        input: InputArgs,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), ChipflowError> {
    let file_config = FileConfig::discover(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Commands::Run { input, strict } => {
            let settings = Settings::resolve(
                file_config,
                Overrides {
                    input: input.file,
                    format: input.format,
                    strict,
                    ..Overrides::default()
                },
            )?;
            cmd_run(&settings, json_mode)
        }
        Commands::Solve {
            input,
            compare,
            outputs,
            strict,
        } => {
            let settings = Settings::resolve(
                file_config,
                Overrides {
                    input: input.file,
                    format: input.format,
                    compare,
                    product_outputs: outputs,
                    strict,
                },
            )?;
            cmd_solve(&settings, json_mode)
        }
        Commands::Check { input } => {
            let settings = Settings::resolve(
                file_config,
                Overrides {
                    input: input.file,
                    format: input.format,
                    ..Overrides::default()
                },
            )?;
            cmd_check(&settings, json_mode)
        }
    }
}
