//! # Instruction Loading
//!
//! Turns instruction files into `Instruction`s for the engine.
//!
//! ## Text format
//!
//! One instruction per line, blank lines ignored. Words are separated by
//! exactly one space; leading and trailing whitespace is trimmed.
//!
//! ```text
//! value 5 goes to bot 2
//! bot 2 gives low to bot 1 and high to bot 0
//! bot 1 gives low to output 1 and high to bot 0
//! ```
//!
//! ## JSON format
//!
//! An array of serialized `Instruction`s:
//!
//! ```json
//! [{"op":"seed","value":5,"bot":2},
//!  {"op":"route","bot":2,"low":{"kind":"bot","id":1},"high":{"kind":"output","id":0}}]
//! ```

use chipflow_core::primitives::MAX_INSTRUCTIONS;
use chipflow_core::{BotId, Chip, ChipflowError, Destination, Instruction, OutputId};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE LIMITS
// =============================================================================

/// Maximum instruction file size (16 MB).
pub const MAX_INPUT_FILE_SIZE: u64 = 16 * 1024 * 1024;

// =============================================================================
// TEXT FORMAT
// =============================================================================

fn invalid(line: usize, text: &str) -> ChipflowError {
    ChipflowError::InvalidInstruction {
        line,
        text: text.to_string(),
    }
}

fn destination(kind: &str, id: &str, line: usize, text: &str) -> Result<Destination, ChipflowError> {
    let id: u32 = id.parse().map_err(|_| invalid(line, text))?;
    match kind {
        "bot" => Ok(Destination::Bot(BotId(id))),
        "output" => Ok(Destination::Output(OutputId(id))),
        _ => Err(invalid(line, text)),
    }
}

/// Parse one line. Blank lines yield `None`.
///
/// `line` is the 1-based line number used in error reports.
pub fn parse_line(line: usize, text: &str) -> Result<Option<Instruction>, ChipflowError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let tokens: Vec<&str> = trimmed.split(' ').collect();
    let instruction = match tokens.as_slice() {
        ["value", value, "goes", "to", "bot", bot] => Instruction::Seed {
            value: Chip(value.parse().map_err(|_| invalid(line, trimmed))?),
            bot: BotId(bot.parse().map_err(|_| invalid(line, trimmed))?),
        },
        [
            "bot",
            bot,
            "gives",
            "low",
            "to",
            low_kind,
            low_id,
            "and",
            "high",
            "to",
            high_kind,
            high_id,
        ] => Instruction::Route {
            bot: BotId(bot.parse().map_err(|_| invalid(line, trimmed))?),
            low: destination(low_kind, low_id, line, trimmed)?,
            high: destination(high_kind, high_id, line, trimmed)?,
        },
        _ => return Err(invalid(line, trimmed)),
    };

    Ok(Some(instruction))
}

/// Parse a whole text document.
pub fn parse_text(input: &str) -> Result<Vec<Instruction>, ChipflowError> {
    let mut instructions = Vec::new();
    for (index, text) in input.lines().enumerate() {
        if let Some(instruction) = parse_line(index + 1, text)? {
            instructions.push(instruction);
        }
    }
    Ok(instructions)
}

// =============================================================================
// JSON FORMAT
// =============================================================================

/// Parse a JSON array of instructions.
pub fn parse_json(input: &[u8]) -> Result<Vec<Instruction>, ChipflowError> {
    serde_json::from_slice(input).map_err(|e| ChipflowError::InvalidInstruction {
        line: e.line(),
        text: e.to_string(),
    })
}

/// Parse `contents` in the named format ("text" or "json").
pub fn parse(contents: &[u8], format: &str) -> Result<Vec<Instruction>, ChipflowError> {
    match format {
        "text" => parse_text(&String::from_utf8_lossy(contents)),
        "json" => parse_json(contents),
        _ => Err(ChipflowError::Config(format!(
            "Unknown format: {}. Use: text, json",
            format
        ))),
    }
}

// =============================================================================
// FILE LOADING
// =============================================================================

/// Resolve `path` to an existing regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, ChipflowError> {
    let canonical = path.canonicalize().map_err(|e| {
        ChipflowError::Io(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(ChipflowError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

fn validate_file_size(path: &Path) -> Result<(), ChipflowError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| ChipflowError::Io(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > MAX_INPUT_FILE_SIZE {
        return Err(ChipflowError::Io(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_INPUT_FILE_SIZE
        )));
    }
    Ok(())
}

/// Read and parse an instruction file.
pub fn load_instructions(path: &Path, format: &str) -> Result<Vec<Instruction>, ChipflowError> {
    let validated = validate_file_path(path)?;
    validate_file_size(&validated)?;

    let contents = std::fs::read(&validated)
        .map_err(|e| ChipflowError::Io(format!("Read file: {}", e)))?;
    let instructions = parse(&contents, format)?;

    if instructions.len() > MAX_INSTRUCTIONS {
        return Err(ChipflowError::Config(format!(
            "Instruction count {} exceeds maximum {}",
            instructions.len(),
            MAX_INSTRUCTIONS
        )));
    }

    tracing::debug!(
        "Loaded {} instructions from {:?} (format: {})",
        instructions.len(),
        validated,
        format
    );
    Ok(instructions)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_seed() {
        let parsed = parse_line(1, "value 5 goes to bot 2").expect("parse");
        assert_eq!(parsed, Some(Instruction::seed(5, 2)));
    }

    #[test]
    fn parses_route_with_mixed_destinations() {
        let parsed =
            parse_line(1, "bot 1 gives low to output 1 and high to bot 0").expect("parse");
        assert_eq!(
            parsed,
            Some(Instruction::route(
                1,
                Destination::Output(OutputId(1)),
                Destination::Bot(BotId(0)),
            ))
        );
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse_line(3, "   ").expect("parse"), None);
        let parsed = parse_text("\nvalue 1 goes to bot 1\n\n").expect("parse");
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn unknown_line_reports_line_number() {
        let err = parse_text("value 1 goes to bot 1\nbot 1 takes a nap\n").expect_err("bad line");
        assert_eq!(
            err,
            ChipflowError::InvalidInstruction {
                line: 2,
                text: "bot 1 takes a nap".to_string()
            }
        );
    }

    #[test]
    fn rejects_bad_numbers_and_kinds() {
        assert!(parse_line(1, "value -5 goes to bot 2").is_err());
        assert!(parse_line(1, "value 5 goes to bot two").is_err());
        assert!(parse_line(1, "bot 1 gives low to bin 1 and high to bot 0").is_err());
    }

    #[test]
    fn words_need_single_spaces() {
        assert!(parse_line(1, "value  5 goes to bot 2").is_err());
        assert!(parse_line(1, "value\t5 goes to bot 2").is_err());
        assert!(parse_line(1, "bot 1 gives low to output 1 and  high to bot 0").is_err());
        assert_eq!(
            parse_line(1, "  value 5 goes to bot 2\r").expect("parse"),
            Some(Instruction::seed(5, 2))
        );
    }

    #[test]
    fn unknown_format_rejected() {
        assert!(matches!(
            parse(b"", "yaml"),
            Err(ChipflowError::Config(_))
        ));
    }
}
