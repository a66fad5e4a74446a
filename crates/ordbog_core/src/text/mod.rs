//! Free-text processing over word stores.
//!
//! # Responsibility
//! - Whole-word substitution of store keys inside free text.
//! - Line annotation and its restricted display renderer.
//! - Distinct-word extraction and partitioning against a store.
//!
//! # Invariants
//! - Word characters are ASCII letters plus `æ ø å Æ Ø Å`; everything else
//!   (digits, underscore, punctuation, whitespace) is a boundary.

pub mod annotate;
pub mod scrub;
pub mod substitute;

/// Danish/Norwegian letters treated as part of a word.
pub const EXTENDED_LETTERS: [char; 6] = ['æ', 'ø', 'å', 'Æ', 'Ø', 'Å'];

/// Returns whether `c` is one of [`EXTENDED_LETTERS`].
pub fn is_extended_letter(c: char) -> bool {
    EXTENDED_LETTERS.contains(&c)
}

/// Returns whether `c` continues a word for substitution boundaries.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphabetic() || is_extended_letter(c)
}
