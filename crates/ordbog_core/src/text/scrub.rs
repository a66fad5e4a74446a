//! Distinct-word extraction and store partitioning.
//!
//! # Responsibility
//! - Tokenize free text into a normalized, sorted distinct-word list.
//! - Split that list into words present in / missing from a store.
//! - Seed new store entries from the missing words.
//!
//! # Invariants
//! - Tokens are lowercase and contain only `[a-z0-9_]` and extended letters.
//! - `distinct_words` is sorted by code point and free of duplicates, so it
//!   does not depend on word order or repetition in the input.

use crate::repo::entry_repo::EntryRepository;
use crate::service::word_store::WordStore;
use crate::text::is_extended_letter;
use std::collections::{BTreeSet, HashSet};

/// Result of scrubbing one text against one store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrubReport {
    pub distinct_words: Vec<String>,
    pub present_in_store: Vec<String>,
    pub missing_from_store: Vec<String>,
}

impl ScrubReport {
    /// Renders missing words as `"word": "**word**",` lines, a template for
    /// authoring new entries.
    pub fn missing_template(&self) -> String {
        self.missing_from_store
            .iter()
            .map(|word| format!("\"{word}\": \"**{word}**\","))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Extracts the sorted distinct-word list from `text`.
pub fn distinct_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|token| {
            token
                .chars()
                .filter(|&c| is_token_char(c))
                .collect::<String>()
        })
        .filter(|token| !token.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Tokenizes `text` and partitions it against the store's lowercased keys.
pub fn scrub<R: EntryRepository>(store: &WordStore<R>, text: &str) -> ScrubReport {
    let known = store
        .entries()
        .iter()
        .map(|entry| entry.key.to_lowercase())
        .collect::<HashSet<_>>();

    let distinct_words = distinct_words(text);
    let (present_in_store, missing_from_store): (Vec<String>, Vec<String>) = distinct_words
        .iter()
        .cloned()
        .partition(|word| known.contains(word));

    ScrubReport {
        distinct_words,
        present_in_store,
        missing_from_store,
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || is_extended_letter(c)
}
