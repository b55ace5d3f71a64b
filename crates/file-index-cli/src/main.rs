mod cli;
mod ops;
mod output;
mod shell;

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use file_index::FileIndex;

use cli::{Cli, Command};

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config();
    let index_path = cli.index_path();
    log::debug!(
        "index {} keyed by {} ({} duplicates)",
        index_path.display(),
        config.key_kind.as_str(),
        config.policy.as_str()
    );

    let mut index = FileIndex::new(config);
    ops::open_index(&mut index, &index_path)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Add { path, name } => {
            let outcome = ops::add_path(&mut index, &path, name.as_deref())?;
            output::write_add_outcome(&mut out, outcome, &path.to_string_lossy())?;
            if outcome.is_inserted() {
                save(&index, &index_path)?;
            }
        }
        Command::Remove { target } => match ops::remove_target(&mut index, &target)? {
            Some(path) => {
                writeln!(out, "Removed {path}")?;
                save(&index, &index_path)?;
            }
            None => writeln!(out, "{target} is not in the index")?,
        },
        Command::Find { target } => {
            let identity = ops::identity_for_target(&index, &target)?;
            match index.find(&identity)? {
                Some(record) => output::write_record(&mut out, record)?,
                None => writeln!(out, "{target} is not in the index")?,
            }
        }
        Command::List => {
            output::write_records(&mut out, index.records())?;
        }
        Command::Duplicates { by } => {
            let groups = index.list_duplicates(by.into());
            output::write_duplicates(&mut out, by.into(), &groups)?;
        }
        Command::ExportSnapshot { file } => {
            index
                .save_snapshot(&file)
                .with_context(|| format!("failed to write snapshot {}", file.display()))?;
            writeln!(out, "Wrote {} entries to {}", index.len(), file.display())?;
        }
        Command::ImportSnapshot { file } => {
            let summary = index
                .load_snapshot(&file)
                .with_context(|| format!("failed to read snapshot {}", file.display()))?;
            save(&index, &index_path)?;
            writeln!(
                out,
                "Imported {} entries from {} ({} rejected)",
                summary.loaded,
                file.display(),
                summary.rejected
            )?;
        }
        Command::Shell => {
            let stdin = io::stdin();
            shell::run_shell(&mut index, &index_path, stdin.lock(), &mut out)?;
        }
    }

    Ok(())
}

fn save(index: &FileIndex, path: &Path) -> anyhow::Result<()> {
    let written = index
        .save_index(path)
        .with_context(|| format!("failed to save {}", path.display()))?;
    log::info!("saved {written} entries to {}", path.display());
    Ok(())
}
