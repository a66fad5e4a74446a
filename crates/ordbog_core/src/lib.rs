//! Core logic for ordbog: word stores, whole-word substitution, line
//! annotation, text scrubbing and store reconciliation.
//! Front ends own the stores and call in through these modules.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod text;

pub use config::{ConfigError, CoreConfig, StorageBackend};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entry::{normalize_key, Entry, StoreNamespace};
pub use repo::entry_repo::{EntryRepository, RepoError, RepoResult, SqliteEntryRepository};
pub use repo::json_file_repo::JsonFileEntryRepository;
pub use search::filter::search;
pub use search::paging::{page_window, Page, PageMarker, PAGE_SIZE};
pub use service::reconcile::{diff, sync_all, sync_one, DiffResult, ReconcileError, SyncReport};
pub use service::stats::StoreStats;
pub use service::word_store::{StoreError, StoreResult, WordStore};
pub use text::annotate::{
    annotate, annotate_line, parse_annotation, render, render_line, Annotation, RenderedLine,
};
pub use text::scrub::{distinct_words, scrub, ScrubReport};
pub use text::substitute::{substitute, SubstitutionEngine};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
