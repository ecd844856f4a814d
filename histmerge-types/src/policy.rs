//! Policies that decide how the merge reacts to bad input.

use serde::{Deserialize, Serialize};

/// How logical lines that fail the record grammar are handled.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMode {
    /// Skip lines that do not parse and keep going.
    #[default]
    Lenient,
    /// Any line that does not parse aborts the run.
    Strict,
}

/// What happens once a fatal error is seen.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Stop at the first fatal error.
    #[default]
    FailFast,
    /// Process every file, then report all fatal errors together.
    CollectAll,
}
