//! Human-readable rendering of index results.

use std::io::{self, Write};

use file_index::{DuplicateGroup, GroupBy, InsertOutcome, KeyedRecord};

pub fn write_add_outcome<W: Write>(out: &mut W, outcome: InsertOutcome, path: &str) -> io::Result<()> {
    match outcome {
        InsertOutcome::Inserted => writeln!(out, "Added {path}"),
        InsertOutcome::RejectedDuplicate => writeln!(out, "Skipped {path}: key already indexed"),
    }
}

pub fn write_record<W: Write>(out: &mut W, record: &KeyedRecord) -> io::Result<()> {
    if record.key() == record.name() {
        writeln!(out, "{}\t{}", record.name(), record.path())
    } else {
        writeln!(out, "{}\t{}\t{}", record.name(), record.key(), record.path())
    }
}

pub fn write_records<'a, W, I>(out: &mut W, records: I) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a KeyedRecord>,
{
    let mut count = 0;
    for record in records {
        write_record(out, record)?;
        count += 1;
    }
    if count == 0 {
        writeln!(out, "Index is empty")?;
    }
    Ok(count)
}

pub fn write_duplicates<W: Write>(out: &mut W, group_by: GroupBy, groups: &[DuplicateGroup]) -> io::Result<()> {
    if groups.is_empty() {
        return writeln!(out, "No duplicates found");
    }
    for group in groups {
        writeln!(out, "Duplicate files ({}: {}):", group_by.as_str(), group.key)?;
        for path in &group.paths {
            writeln!(out, "  {path}")?;
        }
    }
    Ok(())
}
