//! Substring search over a word store.
//!
//! # Invariants
//! - Results keep store order.
//! - A blank term matches every key.

use crate::repo::entry_repo::EntryRepository;
use crate::service::word_store::WordStore;

/// Returns keys whose key or value contains `term`, ignoring case.
pub fn search<R: EntryRepository>(store: &WordStore<R>, term: &str) -> Vec<String> {
    let needle = term.trim().to_lowercase();
    store
        .entries()
        .iter()
        .filter(|entry| {
            needle.is_empty()
                || entry.key.to_lowercase().contains(&needle)
                || entry.value.to_lowercase().contains(&needle)
        })
        .map(|entry| entry.key.clone())
        .collect()
}
