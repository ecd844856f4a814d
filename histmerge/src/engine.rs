//! Merge driver.
//!
//! A [`Merger`] owns the merge table and the placeholder token for one run.
//! Files are fed in lexical path order; nothing is emitted until
//! [`Merger::finish`] is called.

use crate::emit;
use crate::history::{MergeOutcome, MergeTable, Placeholder, join_continuations, record};
use crate::loader;
use histmerge_types::{ErrorPolicy, MergeError, MergeResult, Record, ValidationMode};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_REPAIR_MARKER: char = '#';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    pub validation: ValidationMode,
    pub error_policy: ErrorPolicy,
    pub repair_marker: char,
}

impl Default for MergeOptions {
    fn default() -> Self {
        MergeOptions {
            validation: ValidationMode::default(),
            error_policy: ErrorPolicy::default(),
            repair_marker: DEFAULT_REPAIR_MARKER,
        }
    }
}

/// Counters collected over a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeStats {
    pub files: usize,
    pub logical_lines: usize,
    pub parsed: usize,
    pub skipped: usize,
    pub inserted: usize,
    pub replaced: usize,
    pub discarded: usize,
    pub repaired_bytes: usize,
}

impl MergeStats {
    fn record(&mut self, outcome: MergeOutcome) {
        match outcome {
            MergeOutcome::Inserted => self.inserted += 1,
            MergeOutcome::Replaced => self.replaced += 1,
            MergeOutcome::Discarded => self.discarded += 1,
        }
    }
}

pub struct Merger {
    options: MergeOptions,
    placeholder: Placeholder,
    table: MergeTable,
    stats: MergeStats,
}

impl Merger {
    pub fn new(options: MergeOptions) -> Self {
        Self::with_placeholder(options, Placeholder::generate())
    }

    pub fn with_placeholder(options: MergeOptions, placeholder: Placeholder) -> Self {
        Merger {
            options,
            placeholder,
            table: MergeTable::new(),
            stats: MergeStats::default(),
        }
    }

    pub fn stats(&self) -> &MergeStats {
        &self.stats
    }

    pub fn table(&self) -> &MergeTable {
        &self.table
    }

    /// Merge every path, in ascending lexical order of the path string.
    pub fn merge_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> MergeResult<()> {
        let mut paths: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
        paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

        let mut errors = Vec::new();
        for path in &paths {
            if let Err(err) = self.merge_file(path) {
                match self.options.error_policy {
                    ErrorPolicy::FailFast => return Err(err),
                    ErrorPolicy::CollectAll => {
                        warn!("{err}");
                        errors.push(err);
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(MergeError::aggregate(errors))
        }
    }

    /// Load one file and merge its records.
    pub fn merge_file(&mut self, path: &Path) -> MergeResult<()> {
        eprintln!("Parsing '{}'", path.display());

        let loaded = loader::load_history(path, self.options.repair_marker)?;
        self.stats.repaired_bytes += loaded.repaired;
        self.merge_str(path, &loaded.content)
    }

    /// Merge history text that was read from `origin`.
    ///
    /// Under [`ValidationMode::Strict`] the file is merged only if every line
    /// parses; otherwise every offending line is reported.
    pub fn merge_str(&mut self, origin: &Path, content: &str) -> MergeResult<()> {
        self.stats.files += 1;

        if content.contains(self.placeholder.as_str()) {
            warn!(
                "{} already contains the continuation placeholder, multi-line commands may be garbled",
                origin.display()
            );
        }

        let logical = join_continuations(content, &self.placeholder);
        let mut records = Vec::new();
        let mut errors = Vec::new();
        let mut skipped = 0;

        for line in logical.lines().filter(|line| !line.is_empty()) {
            self.stats.logical_lines += 1;
            match record::parse_record(line) {
                Ok(record) => records.push(record),
                Err(source) => match self.options.validation {
                    ValidationMode::Lenient => {
                        debug!("skipping '{}': {source}", self.placeholder.restore(line));
                        skipped += 1;
                    }
                    ValidationMode::Strict => errors.push(MergeError::MalformedRecord {
                        path: origin.to_path_buf(),
                        line: self.placeholder.restore(line),
                        source,
                    }),
                },
            }
        }

        if !errors.is_empty() {
            return Err(MergeError::aggregate(errors));
        }

        let file_stats = self.absorb(records);
        self.stats.skipped += skipped;
        debug!(
            "{}: {} parsed, {skipped} skipped, {} inserted, {} replaced, {} discarded",
            origin.display(),
            file_stats.parsed,
            file_stats.inserted,
            file_stats.replaced,
            file_stats.discarded
        );
        Ok(())
    }

    fn absorb(&mut self, records: Vec<Record>) -> MergeStats {
        let mut file_stats = MergeStats::default();
        for record in records {
            file_stats.parsed += 1;
            file_stats.record(self.table.insert(record));
        }
        self.stats.parsed += file_stats.parsed;
        self.stats.inserted += file_stats.inserted;
        self.stats.replaced += file_stats.replaced;
        self.stats.discarded += file_stats.discarded;
        file_stats
    }

    /// Consume the merger, returning the records ready to be written.
    pub fn finish(self) -> (Vec<Record>, MergeStats) {
        let records = emit::sorted_records(self.table, &self.placeholder);
        (records, self.stats)
    }
}

/// Merge `paths` with `options` and return the ordered records.
pub fn merge_paths<P: AsRef<Path>>(paths: &[P], options: MergeOptions) -> MergeResult<Vec<Record>> {
    let mut merger = Merger::new(options);
    merger.merge_files(paths)?;
    Ok(merger.finish().0)
}
