//! Continuation joining.
//!
//! zsh writes a multi-line command as several physical lines, each but the
//! last ending in a backslash. Joining them with a run-unique placeholder turns
//! every record into exactly one logical line; the placeholder is turned back
//! into `\` + newline when the record is emitted.
//!
//! Whether a trailing backslash is a continuation is a guess: if the next line
//! looks like the start of a record, the backslash is kept as part of the
//! command. A multi-line command whose continuation line happens to start like
//! a record is therefore split in two.

use regex::Regex;
use std::sync::LazyLock;

static RECORD_START_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:\s*[0-9]{10,}:").unwrap());

const CONTINUATION: &str = "\\\n";

/// Run-unique stand-in for a continuation line break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder(String);

impl Placeholder {
    /// Create a token from the current time.
    pub fn generate() -> Self {
        let now = chrono::Utc::now();
        let stamp = now
            .timestamp_nanos_opt()
            .unwrap_or_else(|| now.timestamp());
        Placeholder(format!("\u{1f}HISTMERGE_CONTINUATION_{stamp}\u{1f}"))
    }

    /// Use a fixed token.
    pub fn from_token(token: impl Into<String>) -> Self {
        Placeholder(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Turn every placeholder in `command` back into `\` + newline.
    pub fn restore(&self, command: &str) -> String {
        command.replace(&self.0, CONTINUATION)
    }
}

/// Whether `line` starts like a history record (`: <timestamp>:`).
pub fn starts_record(line: &str) -> bool {
    RECORD_START_REGEX.is_match(line)
}

/// Join continued physical lines into logical lines.
///
/// Every logical line of the result is terminated by `\n`.
pub fn join_continuations(content: &str, placeholder: &Placeholder) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let mut joined = String::with_capacity(content.len());

    for (i, line) in lines.iter().enumerate() {
        let continued = line
            .strip_suffix('\\')
            .filter(|_| lines.get(i + 1).is_some_and(|next| !starts_record(next)));

        match continued {
            Some(head) => {
                joined.push_str(head);
                joined.push_str(placeholder.as_str());
            }
            None => {
                joined.push_str(line);
                joined.push('\n');
            }
        }
    }

    joined
}
