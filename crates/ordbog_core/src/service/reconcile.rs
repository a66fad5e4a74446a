//! Reconciliation between two word stores.
//!
//! # Responsibility
//! - Compute case-insensitive key-set differences between two stores.
//! - Copy entries from one store to another, one key or a batch at a time.
//!
//! # Invariants
//! - `DiffResult` sets are disjoint, lowercased and sorted.
//! - A failing key never aborts a batch; earlier writes are not rolled back.
//! - No locking across stores: later mutations may revise synced keys.

use crate::repo::entry_repo::EntryRepository;
use crate::service::word_store::{StoreError, WordStore};
use log::{info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Per-key reconciliation error.
#[derive(Debug)]
pub enum ReconcileError {
    /// Source key vanished between diff and sync.
    SyncRace(String),
    /// Destination store write failed.
    Store(StoreError),
}

impl Display for ReconcileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SyncRace(key) => write!(f, "`{key}` is no longer present in the source store"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReconcileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SyncRace(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for ReconcileError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Key-set comparison of store A against store B.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    pub only_in_a: Vec<String>,
    pub only_in_b: Vec<String>,
    pub in_both: Vec<String>,
}

impl DiffResult {
    pub fn is_reconciled(&self) -> bool {
        self.only_in_a.is_empty() && self.only_in_b.is_empty()
    }
}

/// Outcome of a best-effort batch sync.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Keys written into the destination, in request order.
    pub synced: Vec<String>,
    /// Keys that failed, with the reason.
    pub failed: Vec<(String, ReconcileError)>,
}

impl SyncReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Compares the lowercased key sets of two stores.
pub fn diff<A, B>(a: &WordStore<A>, b: &WordStore<B>) -> DiffResult
where
    A: EntryRepository,
    B: EntryRepository,
{
    let keys_a = lowercase_keys(a);
    let keys_b = lowercase_keys(b);

    DiffResult {
        only_in_a: keys_a.difference(&keys_b).cloned().collect(),
        only_in_b: keys_b.difference(&keys_a).cloned().collect(),
        in_both: keys_a.intersection(&keys_b).cloned().collect(),
    }
}

/// Copies `key` from `from` into `to`.
///
/// The source key is resolved exactly first, then case-insensitively, since
/// diff output is lowercased. An empty meaning counts as absent. The
/// destination is written under `key`.
///
/// # Errors
/// - `ReconcileError::SyncRace` when `from` no longer holds the key, or
///   holds it with an empty meaning.
/// - `ReconcileError::Store` when writing `to` fails.
pub fn sync_one<A, B>(
    from: &WordStore<A>,
    to: &mut WordStore<B>,
    key: &str,
) -> Result<(), ReconcileError>
where
    A: EntryRepository,
    B: EntryRepository,
{
    let Some(value) = resolve(from, key) else {
        return Err(ReconcileError::SyncRace(key.to_string()));
    };
    let value = value.to_string();
    to.add(key, value)?;
    Ok(())
}

/// Applies [`sync_one`] to every key independently.
pub fn sync_all<A, B, K>(from: &WordStore<A>, to: &mut WordStore<B>, keys: K) -> SyncReport
where
    A: EntryRepository,
    B: EntryRepository,
    K: IntoIterator,
    K::Item: AsRef<str>,
{
    let mut report = SyncReport::default();
    for key in keys {
        let key = key.as_ref();
        match sync_one(from, to, key) {
            Ok(()) => report.synced.push(key.to_string()),
            Err(err) => {
                warn!(
                    "event=sync_key module=reconcile status=error from={} to={} error_code={}",
                    from.namespace(),
                    to.namespace(),
                    error_code(&err)
                );
                report.failed.push((key.to_string(), err));
            }
        }
    }

    info!(
        "event=sync_all module=reconcile status={} from={} to={} synced={} failed={}",
        if report.is_complete() { "ok" } else { "partial" },
        from.namespace(),
        to.namespace(),
        report.synced.len(),
        report.failed.len()
    );
    report
}

fn lowercase_keys<R: EntryRepository>(store: &WordStore<R>) -> BTreeSet<String> {
    store
        .entries()
        .iter()
        .map(|entry| entry.key.to_lowercase())
        .collect()
}

fn resolve<'s, R: EntryRepository>(store: &'s WordStore<R>, key: &str) -> Option<&'s str> {
    if let Some(value) = store.lookup(key).filter(|value| !value.is_empty()) {
        return Some(value);
    }
    let wanted = key.to_lowercase();
    store
        .entries()
        .iter()
        .filter(|entry| !entry.value.is_empty())
        .find(|entry| entry.key.to_lowercase() == wanted)
        .map(|entry| entry.value.as_str())
}

fn error_code(err: &ReconcileError) -> &'static str {
    match err {
        ReconcileError::SyncRace(_) => "sync_race",
        ReconcileError::Store(StoreError::Persistence(_)) => "persistence_failure",
        ReconcileError::Store(StoreError::MalformedImport(_)) => "malformed_import",
    }
}
