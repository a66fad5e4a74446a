//! Longest-key-first whole-word substitution.
//!
//! # Responsibility
//! - Compile a store snapshot into ordered replacement rules.
//! - Rewrite text by replacing whole-word, case-insensitive key matches with
//!   stored values.
//!
//! # Invariants
//! - Rules run in descending key length (in chars); equal lengths keep store
//!   order.
//! - Each rule scans the current text once, left to right, without overlap.
//! - Values are inserted verbatim; characters outside matches are untouched.
//! - Entries with an empty value never become rules.
//! - Case folding maps each char to its single-char uppercase form, except
//!   that a non-ASCII char never folds onto an ASCII one: `ſ` does not match
//!   `s` and the Kelvin sign does not match `k`.
//! - Cost is bounded by O(text length × rule count).

use crate::model::entry::Entry;
use crate::repo::entry_repo::EntryRepository;
use crate::service::word_store::WordStore;
use crate::text::is_word_char;
use log::{debug, warn};
use regex::{Regex, RegexBuilder};

struct Rule {
    key: String,
    matcher: Regex,
    value: String,
}

/// Replacement rules compiled from one store snapshot.
///
/// Later store mutations do not affect an existing engine.
pub struct SubstitutionEngine {
    rules: Vec<Rule>,
}

impl SubstitutionEngine {
    /// Snapshots `store` and compiles its rules.
    pub fn from_store<R: EntryRepository>(store: &WordStore<R>) -> Self {
        Self::from_entries(store.entries())
    }

    /// Compiles rules from entries in store order.
    ///
    /// Entries with an empty key or an empty value are skipped.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        let mut ordered = entries
            .into_iter()
            .filter(|entry| !entry.key.is_empty() && !entry.value.is_empty())
            .collect::<Vec<_>>();
        // sort_by is stable, so equal lengths keep store order.
        ordered.sort_by(|a, b| b.key.chars().count().cmp(&a.key.chars().count()));

        let mut rules = Vec::with_capacity(ordered.len());
        for entry in ordered {
            match build_matcher(&entry.key) {
                Ok(matcher) => rules.push(Rule {
                    key: entry.key.clone(),
                    matcher,
                    value: entry.value.clone(),
                }),
                Err(err) => warn!(
                    "event=substitute_compile module=text status=skipped key_chars={} error={}",
                    entry.key.chars().count(),
                    err
                ),
            }
        }

        Self { rules }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Applies every rule in order and returns the rewritten text.
    pub fn apply(&self, text: &str) -> String {
        let mut current = text.to_string();
        let mut replacements = 0usize;

        for rule in &self.rules {
            if let Some((rewritten, count)) = replace_whole_words(rule, &current) {
                current = rewritten;
                replacements += count;
            }
        }

        debug!(
            "event=substitute module=text status=ok input_bytes={} rules={} replacements={}",
            text.len(),
            self.rules.len(),
            replacements
        );
        current
    }
}

/// One-shot substitution over a fresh snapshot of `store`.
pub fn substitute<R: EntryRepository>(store: &WordStore<R>, text: &str) -> String {
    SubstitutionEngine::from_store(store).apply(text)
}

fn build_matcher(key: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&regex::escape(key))
        .case_insensitive(true)
        .build()
}

/// Replaces every bounded match of `rule` in `text` with its value.
///
/// Returns `None` when nothing was replaced.
fn replace_whole_words(rule: &Rule, text: &str) -> Option<(String, usize)> {
    let mut output = String::new();
    let mut copied = 0;
    let mut cursor = 0;
    let mut count = 0;

    while cursor <= text.len() {
        let Some(found) = rule.matcher.find_at(text, cursor) else {
            break;
        };
        if found.is_empty() {
            break;
        }

        if is_bounded(text, found.start(), found.end())
            && same_ignoring_case(found.as_str(), &rule.key)
        {
            output.push_str(&text[copied..found.start()]);
            output.push_str(&rule.value);
            copied = found.end();
            cursor = found.end();
            count += 1;
        } else {
            // Retry one char later, so "xcat cat" still finds the second "cat".
            let skipped = text[found.start()..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            cursor = found.start() + skipped;
        }
    }

    if count == 0 {
        return None;
    }
    output.push_str(&text[copied..]);
    Some((output, count))
}

/// Confirms a `regex` candidate under [`fold_case`], which is narrower than
/// Unicode simple case folding.
fn same_ignoring_case(candidate: &str, key: &str) -> bool {
    candidate.chars().map(fold_case).eq(key.chars().map(fold_case))
}

fn fold_case(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(folded), None) if c.is_ascii() || !folded.is_ascii() => folded,
        _ => c,
    }
}

fn is_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

#[cfg(test)]
mod tests {
    use super::SubstitutionEngine;
    use crate::model::entry::Entry;

    fn engine(pairs: &[(&str, &str)]) -> SubstitutionEngine {
        let entries = pairs
            .iter()
            .map(|(key, value)| Entry::new(*key, *value))
            .collect::<Vec<_>>();
        SubstitutionEngine::from_entries(&entries)
    }

    #[test]
    fn longer_keys_win_over_contained_shorter_keys() {
        let engine = engine(&[("to", "X"), ("tomorrow", "Y")]);
        assert_eq!(engine.apply("tomorrow"), "Y");
        assert_eq!(engine.apply("to tomorrow"), "X Y");
    }

    #[test]
    fn multi_word_keys_are_matched_before_their_parts() {
        let engine = engine(&[("god", "good"), ("god morgen", "good morning")]);
        assert_eq!(engine.apply("God morgen, god dag"), "good morning, good dag");
    }

    #[test]
    fn extended_letters_are_not_boundaries() {
        let engine = engine(&[("or", "X")]);
        assert_eq!(engine.apply("ør"), "ør");
        assert_eq!(engine.apply("orå"), "orå");
        assert_eq!(engine.apply("or!"), "X!");
    }

    #[test]
    fn digits_and_underscores_are_boundaries() {
        let engine = engine(&[("cat", "Kat")]);
        assert_eq!(engine.apply("1cat_2"), "1Kat_2");
    }

    #[test]
    fn match_is_case_insensitive_and_value_is_verbatim() {
        let engine = engine(&[("cat", "Kat")]);
        assert_eq!(engine.apply("The CAT sat"), "The Kat sat");
    }

    #[test]
    fn failed_candidate_does_not_hide_later_match() {
        let engine = engine(&[("cat", "Kat")]);
        assert_eq!(engine.apply("concat cat"), "concat Kat");
    }

    #[test]
    fn special_characters_in_keys_are_literal() {
        let engine = engine(&[("a.b", "dot"), ("(x)", "paren")]);
        assert_eq!(engine.apply("a.b axb"), "dot axb");
        assert_eq!(engine.apply("f (x)"), "f paren");
    }

    #[test]
    fn dollar_signs_in_values_are_not_expanded() {
        let engine = engine(&[("price", "$1 $&")]);
        assert_eq!(engine.apply("the price"), "the $1 $&");
    }

    #[test]
    fn empty_keys_are_ignored() {
        let engine = engine(&[("", "boom"), ("hi", "hej")]);
        assert_eq!(engine.rule_count(), 1);
        assert_eq!(engine.apply("hi there"), "hej there");
    }

    #[test]
    fn later_rules_see_earlier_replacements() {
        let engine = engine(&[("hund", "dog"), ("dog", "hound")]);
        assert_eq!(engine.apply("hund"), "hound");
    }

    #[test]
    fn empty_values_are_not_rules() {
        let engine = engine(&[("cat", ""), ("dog", "hund")]);
        assert_eq!(engine.rule_count(), 1);
        assert_eq!(engine.apply("the cat and dog"), "the cat and hund");
    }

    #[test]
    fn non_ascii_lookalikes_do_not_fold_onto_ascii_keys() {
        let engine = engine(&[("s", "X"), ("k", "Y")]);
        assert_eq!(engine.apply("\u{17F} \u{212A}"), "\u{17F} \u{212A}");
        assert_eq!(engine.apply("S K"), "X Y");
    }

    #[test]
    fn danish_letters_still_match_across_case() {
        let engine = engine(&[("øl", "beer"), ("ÅR", "year")]);
        assert_eq!(engine.apply("Øl og år"), "beer og year");
    }
}
