//! Per-store entry counts for dashboard views.

use crate::repo::entry_repo::EntryRepository;
use crate::service::word_store::WordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub dictionary_words: usize,
    pub phonetic_words: usize,
}

impl StoreStats {
    pub fn collect<A, B>(dictionary: &WordStore<A>, phonetic: &WordStore<B>) -> Self
    where
        A: EntryRepository,
        B: EntryRepository,
    {
        Self {
            dictionary_words: dictionary.len(),
            phonetic_words: phonetic.len(),
        }
    }

    pub fn total(&self) -> usize {
        self.dictionary_words + self.phonetic_words
    }
}
