//! Entry and namespace model.
//!
//! # Responsibility
//! - Define the `key -> value` record persisted by every backend.
//! - Map each logical dictionary to a stable namespace id and export name.
//!
//! # Invariants
//! - `StoreNamespace::as_str()` values are persisted and must never change.
//! - Key normalization is a caller concern; `Entry` stores keys verbatim.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One word and its meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Dictionary word, normalized by the caller before writing.
    pub key: String,
    /// Meaning, synonym list or phonetic rendering.
    pub value: String,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Logical dictionary a store is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreNamespace {
    /// Main word → meaning dictionary.
    Dictionary,
    /// Word → phonetic rendering / translation dictionary.
    Phonetic,
}

impl StoreNamespace {
    pub const ALL: [StoreNamespace; 2] = [Self::Dictionary, Self::Phonetic];

    /// Stable persisted id.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dictionary => "dictionary",
            Self::Phonetic => "phonetic",
        }
    }

    /// Default file name for exports (and for the JSON file backend).
    pub fn export_file_name(self) -> &'static str {
        match self {
            Self::Dictionary => "dictionary.json",
            Self::Phonetic => "phonetic-dictionary.json",
        }
    }

    /// The namespace on the other side of a reconciliation.
    pub fn counterpart(self) -> Self {
        match self {
            Self::Dictionary => Self::Phonetic,
            Self::Phonetic => Self::Dictionary,
        }
    }
}

impl Display for StoreNamespace {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreNamespace {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dictionary" | "dict" => Ok(Self::Dictionary),
            "phonetic" => Ok(Self::Phonetic),
            other => Err(format!(
                "unknown store `{other}`; expected dictionary|phonetic"
            )),
        }
    }
}

/// Normalizes user-entered words the way add/edit flows store them.
///
/// Trims surrounding whitespace and lowercases.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}
