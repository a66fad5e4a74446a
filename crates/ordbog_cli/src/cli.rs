//! Command-line surface.

use clap::{Parser, Subcommand};
use ordbog_core::{StorageBackend, StoreNamespace};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ordbog", version, about = "Dictionary stores and whole-word text conversion")]
pub struct Cli {
    /// Store to operate on (dictionary|phonetic).
    ///
    /// Defaults to `dictionary` for management commands and `phonetic` for
    /// text commands.
    #[arg(long, short = 's', global = true)]
    pub store: Option<StoreNamespace>,

    /// Directory holding the database or JSON store files.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Storage backend (sqlite|json).
    #[arg(long, global = true)]
    pub backend: Option<StorageBackend>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the meaning of one word.
    Lookup { word: String },
    /// Add a word or overwrite its meaning.
    Add { word: String, meaning: String },
    /// Remove a word.
    Remove { word: String },
    /// List words page by page.
    List {
        #[arg(long, short = 'p', default_value_t = 1)]
        page: usize,
    },
    /// Search words and meanings (case-insensitive substring).
    Search {
        term: String,
        #[arg(long, short = 'p', default_value_t = 1)]
        page: usize,
    },
    /// Merge a flat JSON object of word -> meaning into the store.
    Import { file: PathBuf },
    /// Write the store as pretty JSON (`-` for stdout).
    Export {
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },
    /// Replace store words inside text with their meanings.
    Convert { file: Option<PathBuf> },
    /// Convert text line by line into annotation records.
    Annotate { file: Option<PathBuf> },
    /// Render annotation records for display.
    Render { file: Option<PathBuf> },
    /// List distinct words of a text and which ones the store lacks.
    Scrub {
        file: Option<PathBuf>,
        /// Only print the missing-word template.
        #[arg(long)]
        missing_only: bool,
    },
    /// Compare the dictionary and phonetic stores.
    Diff,
    /// Copy words into the target store from the other one.
    Sync {
        #[arg(required = true)]
        words: Vec<String>,
        #[arg(long)]
        to: StoreNamespace,
    },
    /// Copy every word missing from the target store.
    SyncAll {
        #[arg(long)]
        to: StoreNamespace,
    },
    /// Show word counts of both stores.
    Stats,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Lookup { .. } => "lookup",
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::List { .. } => "list",
            Self::Search { .. } => "search",
            Self::Import { .. } => "import",
            Self::Export { .. } => "export",
            Self::Convert { .. } => "convert",
            Self::Annotate { .. } => "annotate",
            Self::Render { .. } => "render",
            Self::Scrub { .. } => "scrub",
            Self::Diff => "diff",
            Self::Sync { .. } => "sync",
            Self::SyncAll { .. } => "sync_all",
            Self::Stats => "stats",
        }
    }

    /// Store used when `--store` is not given.
    pub fn default_store(&self) -> StoreNamespace {
        match self {
            Self::Convert { .. } | Self::Annotate { .. } | Self::Scrub { .. } => {
                StoreNamespace::Phonetic
            }
            _ => StoreNamespace::Dictionary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};
    use ordbog_core::StoreNamespace;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn text_commands_default_to_phonetic_store() {
        let cli = Cli::try_parse_from(["ordbog", "convert"]).unwrap();
        assert_eq!(cli.command.default_store(), StoreNamespace::Phonetic);

        let cli = Cli::try_parse_from(["ordbog", "list", "--page", "3"]).unwrap();
        assert!(matches!(cli.command, Command::List { page: 3 }));
        assert_eq!(cli.command.default_store(), StoreNamespace::Dictionary);
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli =
            Cli::try_parse_from(["ordbog", "sync-all", "--to", "phonetic", "--backend", "json"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Command::SyncAll {
                to: StoreNamespace::Phonetic
            }
        ));
        assert_eq!(cli.backend, Some(ordbog_core::StorageBackend::Json));
    }
}
