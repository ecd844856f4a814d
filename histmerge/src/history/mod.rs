//! History record handling.
//!
//! This module provides:
//! - Continuation joining for commands that span several physical lines
//! - Record grammar validation and parsing
//! - The merge table that keeps the latest execution of each command
//!
//! # Module Structure
//!
//! - [`continuation`] - Placeholder token and line joining
//! - [`record`] - Record grammar and parser
//! - [`merge`] - Merge table (MergeTable struct)

pub mod continuation;
pub mod merge;
pub mod record;


pub use continuation::{Placeholder, join_continuations};
pub use merge::{MergeOutcome, MergeTable};
pub use record::{is_well_formed, parse_line};
