//! A single merged history record.

/// One logical entry of a zsh extended history file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Command text after the first ';'. May hold continuation placeholders
    /// until it is emitted.
    pub command: String,
    /// Unix timestamp when the command was executed.
    pub executed_at: i64,
    /// Elapsed seconds as recorded by the shell.
    pub duration: u64,
}

impl Record {
    pub fn new(command: impl Into<String>, executed_at: i64, duration: u64) -> Self {
        Record {
            command: command.into(),
            executed_at,
            duration,
        }
    }
}
