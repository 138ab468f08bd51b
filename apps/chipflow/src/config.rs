//! # Configuration
//!
//! Settings come from three layers, highest priority first:
//! 1. Command-line flags
//! 2. A TOML config file (`--config`, or `chipflow.toml` in the working
//!    directory if present)
//! 3. Built-in defaults
//!
//! ```toml
//! input = "instructions.txt"
//! format = "text"
//! compare = [17, 61]
//! product_outputs = [0, 1, 2]
//! strict = false
//! ```

use chipflow_core::{Chip, ChipflowError, OutputId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "chipflow.toml";

/// Default pair whose comparing bot `solve` reports.
pub const DEFAULT_COMPARE: [u32; 2] = [17, 61];

/// Default outputs whose product `solve` reports.
pub const DEFAULT_PRODUCT_OUTPUTS: [u32; 3] = [0, 1, 2];

/// Contents of a config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub input: Option<PathBuf>,
    pub format: Option<String>,
    pub compare: Option<[u32; 2]>,
    pub product_outputs: Option<Vec<u32>>,
    pub strict: Option<bool>,
}

impl FileConfig {
    /// Parse a config document.
    pub fn from_toml(text: &str) -> Result<Self, ChipflowError> {
        toml::from_str(text).map_err(|e| ChipflowError::Config(e.to_string()))
    }

    /// Load a config file from disk.
    pub fn load(path: &Path) -> Result<Self, ChipflowError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ChipflowError::Io(format!("Read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    /// Load the explicit config if given, else `chipflow.toml` if it exists,
    /// else an empty config.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ChipflowError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    tracing::debug!("Using config file {}", DEFAULT_CONFIG_FILE);
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Fully resolved settings for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input: PathBuf,
    pub format: String,
    pub compare: (Chip, Chip),
    pub product_outputs: Vec<OutputId>,
    pub strict: bool,
}

/// Flag values as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub format: Option<String>,
    pub compare: Option<String>,
    pub product_outputs: Option<String>,
    pub strict: bool,
}

impl Settings {
    /// Merge command-line overrides over the file config.
    pub fn resolve(file: FileConfig, flags: Overrides) -> Result<Self, ChipflowError> {
        let input = flags.input.or(file.input).ok_or_else(|| {
            ChipflowError::Config("No input file. Pass --file or set `input` in the config".into())
        })?;

        let format = flags
            .format
            .or(file.format)
            .unwrap_or_else(|| "text".to_string());

        let compare = match flags.compare {
            Some(list) => {
                let ids = parse_id_list(&list)?;
                <[u32; 2]>::try_from(ids).map_err(|ids| {
                    ChipflowError::Config(format!(
                        "--compare takes exactly two values, got {}",
                        ids.len()
                    ))
                })?
            }
            None => file.compare.unwrap_or(DEFAULT_COMPARE),
        };

        let product_outputs = match flags.product_outputs {
            Some(list) => parse_id_list(&list)?,
            None => file
                .product_outputs
                .unwrap_or_else(|| DEFAULT_PRODUCT_OUTPUTS.to_vec()),
        };

        Ok(Self {
            input,
            format,
            compare: (Chip(compare[0]), Chip(compare[1])),
            product_outputs: product_outputs.into_iter().map(OutputId).collect(),
            strict: flags.strict || file.strict.unwrap_or(false),
        })
    }
}

/// Parse a comma-separated list of ids such as "0,1,2".
pub fn parse_id_list(list: &str) -> Result<Vec<u32>, ChipflowError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .map_err(|_| ChipflowError::Config(format!("Not a valid id: {:?}", s)))
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
