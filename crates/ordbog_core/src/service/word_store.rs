//! Word store: in-memory snapshot with write-through persistence.
//!
//! # Responsibility
//! - Own one namespace's entries in memory for synchronous lookup and
//!   enumeration.
//! - Write every mutation through to the backing repository before it
//!   becomes visible.
//! - Validate and apply JSON imports; produce JSON exports.
//!
//! # Invariants
//! - At most one value per key; last write wins.
//! - Memory changes only after the repository write succeeded.
//! - Imports are validated before anything is written.
//! - Keys keep insertion order; overwriting keeps the original position.

use crate::model::entry::{Entry, StoreNamespace};
use crate::repo::entry_repo::{EntryRepository, RepoError};
use crate::repo::json_file_repo::json_kind;
use log::{debug, error, info};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for mutation and import/export operations.
#[derive(Debug)]
pub enum StoreError {
    /// Import payload is not a flat JSON object.
    MalformedImport(String),
    /// Backing repository read/write failed.
    Persistence(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedImport(message) => write!(f, "malformed import: {message}"),
            Self::Persistence(err) => write!(f, "persistence failure: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MalformedImport(_) => None,
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Persistence(value)
    }
}

/// Persisted word → meaning mapping bound to one namespace.
pub struct WordStore<R: EntryRepository> {
    namespace: StoreNamespace,
    repo: R,
    entries: Vec<Entry>,
    positions: HashMap<String, usize>,
}

impl<R: EntryRepository> WordStore<R> {
    /// Loads every entry of `namespace` from `repo` into memory.
    pub fn open(repo: R, namespace: StoreNamespace) -> StoreResult<Self> {
        let loaded = match repo.load_entries(namespace) {
            Ok(loaded) => loaded,
            Err(err) => {
                error!(
                    "event=store_open module=store status=error namespace={} error={}",
                    namespace, err
                );
                return Err(err.into());
            }
        };

        let mut store = Self {
            namespace,
            repo,
            entries: Vec::with_capacity(loaded.len()),
            positions: HashMap::with_capacity(loaded.len()),
        };
        for entry in loaded {
            store.apply(entry);
        }

        info!(
            "event=store_open module=store status=ok namespace={} entries={}",
            namespace,
            store.len()
        );
        Ok(store)
    }

    pub fn namespace(&self) -> StoreNamespace {
        self.namespace
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact, case-sensitive lookup. Callers lowercase for case-insensitive
    /// behavior.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.positions
            .get(key)
            .map(|&position| self.entries[position].value.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    /// Snapshot of all keys in storage order.
    pub fn all_keys(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Borrowed view of all entries in storage order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Inserts or overwrites one entry.
    ///
    /// # Errors
    /// - `StoreError::Persistence` when the repository write fails; the
    ///   in-memory state is left unchanged.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> StoreResult<()> {
        let entry = Entry::new(key, value);
        if let Err(err) = self.repo.upsert_entry(self.namespace, &entry) {
            error!(
                "event=store_add module=store status=error namespace={} error={}",
                self.namespace, err
            );
            return Err(err.into());
        }

        let replaced = self.apply(entry);
        debug!(
            "event=store_add module=store status=ok namespace={} replaced={}",
            self.namespace, replaced
        );
        Ok(())
    }

    /// Removes `key`. Returns `false` (not an error) when it was absent.
    pub fn remove(&mut self, key: &str) -> StoreResult<bool> {
        let Some(position) = self.positions.get(key).copied() else {
            return Ok(false);
        };

        if let Err(err) = self.repo.delete_entry(self.namespace, key) {
            error!(
                "event=store_remove module=store status=error namespace={} error={}",
                self.namespace, err
            );
            return Err(err.into());
        }

        self.entries.remove(position);
        self.positions.remove(key);
        for slot in self.positions.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        debug!(
            "event=store_remove module=store status=ok namespace={}",
            self.namespace
        );
        Ok(true)
    }

    /// Full snapshot as owned entries.
    pub fn export_all(&self) -> Vec<Entry> {
        self.entries.clone()
    }

    /// Full snapshot as a flat, order-preserving JSON object.
    pub fn export_value(&self) -> Value {
        let map = self
            .entries
            .iter()
            .map(|entry| (entry.key.clone(), Value::String(entry.value.clone())))
            .collect::<Map<String, Value>>();
        Value::Object(map)
    }

    /// Full snapshot as pretty-printed JSON text.
    pub fn export_json(&self) -> StoreResult<String> {
        serde_json::to_string_pretty(&self.export_value())
            .map_err(|err| StoreError::Persistence(RepoError::Json(err)))
    }

    /// Merges a flat `key -> string` JSON object into the store.
    ///
    /// Returns the number of entries written. Non-string values are skipped
    /// and not counted.
    ///
    /// # Errors
    /// - `StoreError::MalformedImport` when `payload` is not an object;
    ///   nothing is written.
    /// - `StoreError::Persistence` when the batch write fails; nothing is
    ///   applied in memory.
    pub fn import_all(&mut self, payload: &Value) -> StoreResult<usize> {
        let Value::Object(map) = payload else {
            return Err(StoreError::MalformedImport(format!(
                "expected a JSON object of word -> meaning, found {}",
                json_kind(payload)
            )));
        };

        let accepted = map
            .iter()
            .filter_map(|(key, value)| match value {
                Value::String(value) => Some(Entry::new(key.clone(), value.clone())),
                _ => None,
            })
            .collect::<Vec<_>>();
        let skipped = map.len() - accepted.len();

        if let Err(err) = self.repo.upsert_entries(self.namespace, &accepted) {
            error!(
                "event=store_import module=store status=error namespace={} error={}",
                self.namespace, err
            );
            return Err(err.into());
        }

        let written = accepted.len();
        for entry in accepted {
            self.apply(entry);
        }
        info!(
            "event=store_import module=store status=ok namespace={} written={} skipped={}",
            self.namespace, written, skipped
        );
        Ok(written)
    }

    /// Parses `text` as JSON and imports it.
    ///
    /// Unparsable text is reported as `StoreError::MalformedImport`.
    pub fn import_json(&mut self, text: &str) -> StoreResult<usize> {
        let payload = serde_json::from_str::<Value>(text)
            .map_err(|err| StoreError::MalformedImport(format!("invalid JSON: {err}")))?;
        self.import_all(&payload)
    }

    /// Applies one entry in memory. Returns whether an existing key was
    /// overwritten.
    fn apply(&mut self, entry: Entry) -> bool {
        match self.positions.get(&entry.key) {
            Some(&position) => {
                self.entries[position].value = entry.value;
                true
            }
            None => {
                self.positions.insert(entry.key.clone(), self.entries.len());
                self.entries.push(entry);
                false
            }
        }
    }
}
