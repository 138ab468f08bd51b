//! # chipflow
//!
//! Library half of the chipflow binary: instruction loading, configuration
//! and report types. The CLI in `main.rs` is a thin layer over these.

pub mod config;
pub mod parse;
pub mod report;

pub use config::{FileConfig, Overrides, Settings};
pub use parse::{load_instructions, parse, parse_json, parse_line, parse_text};
pub use report::{RunReport, SolveReport, solve};
