//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use file_index::{DuplicatePolicy, GroupBy, IndexConfig, KeyKind, TraversalOrder};

/// Default index file for name-keyed indexes.
pub const DEFAULT_NAME_INDEX_FILE: &str = "fileIndex.txt";

/// Default index file for digest-keyed indexes.
pub const DEFAULT_DIGEST_INDEX_FILE: &str = "index.dat";

/// Index files by name or content digest and report duplicates
#[derive(Parser, Debug)]
#[command(
    name = "file-index",
    version,
    after_help = "EXAMPLES:\n    \
        file-index add ./notes.txt\n    \
        file-index --mode digest add ~/Pictures/cat.jpg\n    \
        file-index --mode digest duplicates\n    \
        file-index --mode digest shell"
)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// What files are keyed by
    #[arg(long, value_enum, default_value_t = Mode::Name, global = true)]
    pub mode: Mode,

    /// Index file [default: fileIndex.txt (name) or index.dat (digest)]
    #[arg(long, env = "FILE_INDEX_PATH", global = true, value_name = "FILE")]
    pub index: Option<PathBuf>,

    /// Keep files whose key is already indexed (default in digest mode)
    #[arg(long, global = true, conflicts_with = "reject_duplicates")]
    pub allow_duplicates: bool,

    /// Refuse files whose key is already indexed (default in name mode)
    #[arg(long, global = true)]
    pub reject_duplicates: bool,

    /// Save records node-first so a reload rebuilds the same tree shape
    #[arg(long, global = true)]
    pub pre_order: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a file to the index
    Add {
        /// File to add; must exist
        path: PathBuf,
        /// Index under this name instead of the path's file name
        #[arg(long)]
        name: Option<String>,
    },
    /// Remove a file from the index
    ///
    /// Files with identical content share a digest key, so in digest mode the
    /// removed entry may belong to another copy; its path is printed.
    Remove {
        /// File name (name mode) or path of the file to hash (digest mode)
        target: String,
    },
    /// Show the entry for a file
    Find {
        /// File name (name mode) or path of the file to hash (digest mode)
        target: String,
    },
    /// List every entry in key order
    List,
    /// Report groups of entries sharing a key, path or name
    Duplicates {
        #[arg(long, value_enum, default_value_t = GroupArg::Key)]
        by: GroupArg,
    },
    /// Write the index as a compressed binary snapshot
    ExportSnapshot {
        file: PathBuf,
    },
    /// Replace the index with a compressed binary snapshot
    ImportSnapshot {
        file: PathBuf,
    },
    /// Interactive menu
    Shell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Key entries by file name
    Name,
    /// Key entries by SHA-256 of the file contents
    Digest,
}

impl From<Mode> for KeyKind {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Name => KeyKind::Name,
            Mode::Digest => KeyKind::Digest,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupArg {
    Key,
    Path,
    Name,
}

impl From<GroupArg> for GroupBy {
    fn from(arg: GroupArg) -> Self {
        match arg {
            GroupArg::Key => GroupBy::Key,
            GroupArg::Path => GroupBy::Path,
            GroupArg::Name => GroupBy::Name,
        }
    }
}

impl Cli {
    /// Index configuration selected by the flags.
    pub fn config(&self) -> IndexConfig {
        let mut config = IndexConfig::for_key_kind(self.mode.into());
        if self.allow_duplicates {
            config = config.with_policy(DuplicatePolicy::Allow);
        } else if self.reject_duplicates {
            config = config.with_policy(DuplicatePolicy::Reject);
        }
        if self.pre_order {
            config = config.with_save_order(TraversalOrder::PreOrder);
        }
        config
    }

    /// Index file to load from and save to.
    pub fn index_path(&self) -> PathBuf {
        self.index.clone().unwrap_or_else(|| {
            PathBuf::from(match self.mode {
                Mode::Name => DEFAULT_NAME_INDEX_FILE,
                Mode::Digest => DEFAULT_DIGEST_INDEX_FILE,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_follow_mode() {
        let cli = Cli::try_parse_from(["file-index", "list"]).unwrap();
        assert_eq!(cli.index_path(), PathBuf::from(DEFAULT_NAME_INDEX_FILE));
        assert_eq!(cli.config(), IndexConfig::for_key_kind(KeyKind::Name));

        let cli = Cli::try_parse_from(["file-index", "--mode", "digest", "list"]).unwrap();
        assert_eq!(cli.index_path(), PathBuf::from(DEFAULT_DIGEST_INDEX_FILE));
        assert_eq!(cli.config().policy, DuplicatePolicy::Allow);
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "file-index",
            "duplicates",
            "--by",
            "path",
            "--allow-duplicates",
            "--pre-order",
            "--index",
            "/tmp/idx.txt",
        ])
        .unwrap();
        let config = cli.config();
        assert_eq!(config.policy, DuplicatePolicy::Allow);
        assert_eq!(config.save_order, TraversalOrder::PreOrder);
        assert_eq!(cli.index_path(), PathBuf::from("/tmp/idx.txt"));
        assert!(matches!(cli.command, Command::Duplicates { by: GroupArg::Path }));
    }

    #[test]
    fn duplicate_flags_conflict() {
        let result = Cli::try_parse_from([
            "file-index",
            "--allow-duplicates",
            "--reject-duplicates",
            "list",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn add_takes_optional_name() {
        let cli = Cli::try_parse_from(["file-index", "add", "./a.txt", "--name", "alias"]).unwrap();
        match cli.command {
            Command::Add { path, name } => {
                assert_eq!(path, PathBuf::from("./a.txt"));
                assert_eq!(name.as_deref(), Some("alias"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
