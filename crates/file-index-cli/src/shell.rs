//! Interactive menu over a single index.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Context;
use file_index::{FileIndex, GroupBy};

use crate::ops;
use crate::output;

const MENU: &str = "\
1. Add File
2. Remove File
3. Find Duplicates
4. Save Index
5. Load Index
6. List Index
7. Exit";

enum Choice {
    Add,
    Remove,
    Duplicates,
    Save,
    Load,
    List,
    Exit,
}

impl Choice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Add),
            "2" => Some(Self::Remove),
            "3" => Some(Self::Duplicates),
            "4" => Some(Self::Save),
            "5" => Some(Self::Load),
            "6" => Some(Self::List),
            "7" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Runs the menu until the user exits or `input` ends.
///
/// Failed operations are reported on `out` and the loop continues.
pub fn run_shell<R: BufRead, W: Write>(
    index: &mut FileIndex,
    index_path: &Path,
    mut input: R,
    mut out: W,
) -> anyhow::Result<()> {
    loop {
        writeln!(out, "{MENU}")?;
        let Some(line) = prompt(&mut input, &mut out, "Enter choice: ")? else {
            break;
        };
        let Some(choice) = Choice::parse(&line) else {
            writeln!(out, "Invalid choice: {}", line.trim())?;
            continue;
        };
        if matches!(choice, Choice::Exit) {
            break;
        }
        if let Err(error) = dispatch(choice, index, index_path, &mut input, &mut out) {
            log::debug!("shell command failed: {error:?}");
            writeln!(out, "Error: {error:#}")?;
        }
    }
    Ok(())
}

fn dispatch<R: BufRead, W: Write>(
    choice: Choice,
    index: &mut FileIndex,
    index_path: &Path,
    input: &mut R,
    out: &mut W,
) -> anyhow::Result<()> {
    match choice {
        Choice::Add => {
            let Some(path) = prompt(input, out, "Enter file path: ")? else {
                return Ok(());
            };
            let outcome = ops::add_path(index, Path::new(&path), None)?;
            output::write_add_outcome(out, outcome, &path)?;
        }
        Choice::Remove => {
            let Some(target) = prompt(input, out, "Enter file to remove: ")? else {
                return Ok(());
            };
            match ops::remove_target(index, &target)? {
                Some(path) => writeln!(out, "Removed {path}")?,
                None => writeln!(out, "{target} is not in the index")?,
            }
        }
        Choice::Duplicates => {
            let groups = index.list_duplicates(GroupBy::Key);
            output::write_duplicates(out, GroupBy::Key, &groups)?;
        }
        Choice::Save => {
            let written = index
                .save_index(index_path)
                .with_context(|| format!("failed to save {}", index_path.display()))?;
            writeln!(out, "Saved {written} entries to {}", index_path.display())?;
        }
        Choice::Load => {
            let summary = index
                .load_index(index_path)
                .with_context(|| format!("failed to load {}", index_path.display()))?;
            writeln!(
                out,
                "Loaded {} entries from {} ({} malformed, {} rejected)",
                summary.loaded,
                index_path.display(),
                summary.malformed,
                summary.rejected
            )?;
        }
        Choice::List => {
            output::write_records(out, index.records())?;
        }
        Choice::Exit => {}
    }
    Ok(())
}

/// Reads one trimmed line; `None` at end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, message: &str) -> anyhow::Result<Option<String>> {
    write!(out, "{message}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}
