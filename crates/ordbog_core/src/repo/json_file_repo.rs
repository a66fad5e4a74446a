//! JSON file entry repository.
//!
//! # Responsibility
//! - Persist each namespace as one flat, pretty-printed JSON object in the
//!   same shape as the export format.
//!
//! # Invariants
//! - Every write rewrites the whole namespace file through a temp file in the
//!   same directory and an atomic rename; a failed write leaves the previous
//!   file untouched.
//! - A missing file is an empty namespace.

use crate::model::entry::{Entry, StoreNamespace};
use crate::repo::entry_repo::{EntryRepository, RepoError, RepoResult};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File-backed entry repository rooted at one directory.
#[derive(Debug, Clone)]
pub struct JsonFileEntryRepository {
    root: PathBuf,
}

impl JsonFileEntryRepository {
    /// Creates the repository, creating `root` when missing.
    pub fn open(root: impl Into<PathBuf>) -> RepoResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Path of the file holding `namespace`.
    pub fn file_path(&self, namespace: StoreNamespace) -> PathBuf {
        self.root.join(namespace.export_file_name())
    }

    fn read_map(&self, namespace: StoreNamespace) -> RepoResult<Map<String, Value>> {
        let path = self.file_path(namespace);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_reader(BufReader::new(file))? {
            Value::Object(map) => Ok(map),
            other => Err(RepoError::InvalidData(format!(
                "`{}` must hold a JSON object, found {}",
                path.display(),
                json_kind(&other)
            ))),
        }
    }

    fn write_map(&self, namespace: StoreNamespace, map: &Map<String, Value>) -> RepoResult<()> {
        let target = self.file_path(namespace);
        let temp = NamedTempFile::new_in(parent_dir(&target))?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, map)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&target).map_err(|err| RepoError::Io(err.error))?;
        Ok(())
    }
}

impl EntryRepository for JsonFileEntryRepository {
    fn load_entries(&self, namespace: StoreNamespace) -> RepoResult<Vec<Entry>> {
        self.read_map(namespace)?
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(value) => Ok(Entry { key, value }),
                other => Err(RepoError::InvalidData(format!(
                    "value of `{key}` in {} must be a string, found {}",
                    namespace.export_file_name(),
                    json_kind(&other)
                ))),
            })
            .collect()
    }

    fn upsert_entries(&self, namespace: StoreNamespace, entries: &[Entry]) -> RepoResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut map = self.read_map(namespace)?;
        for entry in entries {
            map.insert(entry.key.clone(), Value::String(entry.value.clone()));
        }
        self.write_map(namespace, &map)
    }

    fn delete_entry(&self, namespace: StoreNamespace, key: &str) -> RepoResult<bool> {
        let mut map = self.read_map(namespace)?;
        // shift_remove keeps the order of the remaining keys.
        if map.shift_remove(key).is_none() {
            return Ok(false);
        }
        self.write_map(namespace, &map)?;
        Ok(true)
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
