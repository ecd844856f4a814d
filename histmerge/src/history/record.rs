//! Record grammar and parser for `: <timestamp>:<duration>;<command>` lines.

use histmerge_types::{ParseError, Record};
use regex::Regex;
use std::sync::LazyLock;

static RECORD_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^: [0-9]{10,}:[0-9]+;").unwrap());

/// Whether a logical line matches the record grammar.
pub fn is_well_formed(line: &str) -> bool {
    RECORD_LINE_REGEX.is_match(line)
}

/// Parse a logical line into a [`Record`].
///
/// Only the first `;` separates the metadata from the command, so the command
/// keeps any further semicolons.
pub fn parse_line(line: &str) -> Result<Record, ParseError> {
    let (meta, command) = line.split_once(';').ok_or(ParseError::MissingDelimiter)?;

    let mut fields = meta.split(':');
    let (timestamp, duration) = match (fields.next(), fields.next(), fields.next(), fields.next())
    {
        (Some(""), Some(timestamp), Some(duration), None) if !timestamp.trim().is_empty() => {
            (timestamp.trim(), duration.trim())
        }
        _ => return Err(ParseError::BadShape(meta.to_string())),
    };

    let executed_at = timestamp
        .parse::<i64>()
        .map_err(ParseError::InvalidTimestamp)?;
    let duration = duration
        .parse::<u64>()
        .map_err(ParseError::InvalidDuration)?;

    Ok(Record::new(command, executed_at, duration))
}

/// Validate and parse in one step.
pub fn parse_record(line: &str) -> Result<Record, ParseError> {
    if !is_well_formed(line) {
        return Err(ParseError::Grammar);
    }
    parse_line(line)
}
