//! Merge table.
//!
//! Keeps one record per distinct command text: the one with the greatest
//! timestamp. On equal timestamps the record seen first wins.

use histmerge_types::Record;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// What [`MergeTable::insert`] did with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Inserted,
    Replaced,
    Discarded,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    executed_at: i64,
    duration: u64,
    /// Encounter order of the retained record, used to order equal timestamps.
    seq: u64,
}

/// Command text to latest record.
#[derive(Debug, Default, Clone)]
pub struct MergeTable {
    entries: HashMap<String, Slot>,
    next_seq: u64,
}

impl MergeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge one record. A stored record is replaced only by a strictly newer one.
    pub fn insert(&mut self, record: Record) -> MergeOutcome {
        let seq = self.next_seq;
        self.next_seq += 1;

        let slot = Slot {
            executed_at: record.executed_at,
            duration: record.duration,
            seq,
        };
        match self.entries.entry(record.command) {
            Entry::Vacant(entry) => {
                entry.insert(slot);
                MergeOutcome::Inserted
            }
            Entry::Occupied(mut entry) => {
                if slot.executed_at > entry.get().executed_at {
                    entry.insert(slot);
                    MergeOutcome::Replaced
                } else {
                    MergeOutcome::Discarded
                }
            }
        }
    }

    /// Look up the retained record for `command`.
    pub fn get(&self, command: &str) -> Option<Record> {
        self.entries
            .get(command)
            .map(|slot| Record::new(command, slot.executed_at, slot.duration))
    }

    /// Consume the table, returning records ordered by timestamp.
    ///
    /// Records with the same timestamp keep the order in which they were
    /// encountered.
    pub fn into_sorted(self) -> Vec<Record> {
        let mut slots: Vec<(String, Slot)> = self.entries.into_iter().collect();
        slots.sort_unstable_by_key(|(_, slot)| (slot.executed_at, slot.seq));
        slots
            .into_iter()
            .map(|(command, slot)| Record {
                command,
                executed_at: slot.executed_at,
                duration: slot.duration,
            })
            .collect()
    }
}
