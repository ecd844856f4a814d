//! Output of merged history in zsh extended history format.

use crate::history::{MergeTable, Placeholder};
use histmerge_types::Record;
use std::io::{self, Write};

/// Drain `table` into timestamp order with continuations restored.
pub fn sorted_records(table: MergeTable, placeholder: &Placeholder) -> Vec<Record> {
    table
        .into_sorted()
        .into_iter()
        .map(|mut record| {
            if record.command.contains(placeholder.as_str()) {
                record.command = placeholder.restore(&record.command);
            }
            record
        })
        .collect()
}

/// Canonical line for a record, including the trailing newline.
///
/// The timestamp is zero-padded to the 10 digits the record grammar requires.
pub fn format_record(record: &Record) -> String {
    format!(
        ": {:010}:{};{}\n",
        record.executed_at, record.duration, record.command
    )
}

pub fn write_records<W: Write>(writer: &mut W, records: &[Record]) -> io::Result<()> {
    for record in records {
        writer.write_all(format_record(record).as_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_is_canonical() {
        let record = Record::new("ls -la", 1000000000, 3);
        assert_eq!(format_record(&record), ": 1000000000:3;ls -la\n");
    }

    #[test]
    fn wide_timestamps_keep_single_space() {
        let record = Record::new("ls", 16250976001, 0);
        assert_eq!(format_record(&record), ": 16250976001:0;ls\n");
    }

    #[test]
    fn short_timestamps_are_zero_padded() {
        let record = Record::new("old", 1, 0);
        assert_eq!(format_record(&record), ": 0000000001:0;old\n");
    }

    #[test]
    fn placeholders_are_restored() {
        let placeholder = Placeholder::from_token("<NL>");
        let mut table = MergeTable::new();
        table.insert(Record::new("echo a <NL>b", 1000000001, 0));
        table.insert(Record::new("pwd", 1000000000, 0));

        let records = sorted_records(table, &placeholder);
        let mut out = Vec::new();
        write_records(&mut out, &records).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            ": 1000000000:0;pwd\n: 1000000001:0;echo a \\\nb\n"
        );
    }
}
