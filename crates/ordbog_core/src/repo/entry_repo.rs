//! Entry repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide load/upsert/delete APIs over the `entries` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `upsert_entries` runs in one transaction: all entries land or none do.
//! - Overwriting an existing key keeps its original storage position.

use crate::db::DbError;
use crate::model::entry::{Entry, StoreNamespace};
use rusqlite::{params, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence-layer error shared by all entry backends.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Io(std::io::Error),
    Json(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "store file i/o failed: {err}"),
            Self::Json(err) => write!(f, "store file encoding failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted entry data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Durable key/value medium behind a word store.
///
/// Implementations never retry; failures surface to the store caller.
pub trait EntryRepository {
    /// Loads every entry of `namespace` in storage order.
    fn load_entries(&self, namespace: StoreNamespace) -> RepoResult<Vec<Entry>>;

    /// Inserts or overwrites `entries` atomically.
    fn upsert_entries(&self, namespace: StoreNamespace, entries: &[Entry]) -> RepoResult<()>;

    /// Deletes one key. Returns `false` when the key was not stored.
    fn delete_entry(&self, namespace: StoreNamespace, key: &str) -> RepoResult<bool>;

    /// Inserts or overwrites one entry.
    fn upsert_entry(&self, namespace: StoreNamespace, entry: &Entry) -> RepoResult<()> {
        self.upsert_entries(namespace, std::slice::from_ref(entry))
    }
}

impl<R: EntryRepository + ?Sized> EntryRepository for &R {
    fn load_entries(&self, namespace: StoreNamespace) -> RepoResult<Vec<Entry>> {
        (**self).load_entries(namespace)
    }

    fn upsert_entries(&self, namespace: StoreNamespace, entries: &[Entry]) -> RepoResult<()> {
        (**self).upsert_entries(namespace, entries)
    }

    fn delete_entry(&self, namespace: StoreNamespace, key: &str) -> RepoResult<bool> {
        (**self).delete_entry(namespace, key)
    }
}

/// SQLite-backed entry repository.
///
/// Several repositories (one per namespace) may share one connection.
#[derive(Clone, Copy)]
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn load_entries(&self, namespace: StoreNamespace) -> RepoResult<Vec<Entry>> {
        let mut stmt = self.conn.prepare(
            "SELECT key, value
             FROM entries
             WHERE namespace = ?1
             ORDER BY rowid ASC;",
        )?;
        let mut rows = stmt.query([namespace.as_str()])?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next()? {
            entries.push(Entry {
                key: row.get("key")?,
                value: row.get("value")?,
            });
        }

        Ok(entries)
    }

    fn upsert_entries(&self, namespace: StoreNamespace, entries: &[Entry]) -> RepoResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        // unchecked_transaction: the repository only holds a shared borrow.
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO entries (namespace, key, value)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT (namespace, key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = (strftime('%s', 'now') * 1000);",
            )?;
            for entry in entries {
                stmt.execute(params![
                    namespace.as_str(),
                    entry.key.as_str(),
                    entry.value.as_str()
                ])?;
            }
        }
        tx.commit()?;

        Ok(())
    }

    fn delete_entry(&self, namespace: StoreNamespace, key: &str) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM entries WHERE namespace = ?1 AND key = ?2;",
            params![namespace.as_str(), key],
        )?;
        Ok(changed > 0)
    }
}
