//! Command execution against the two word stores.
//!
//! # Invariants
//! - Words typed by the user are normalized before lookup and writes.
//! - Add rejects blank words or meanings.

use crate::cli::Command;
use anyhow::{bail, Context, Result};
use log::info;
use ordbog_core::{
    annotate, diff, normalize_key, page_window, render, scrub, search, sync_all, sync_one,
    EntryRepository, Page, PageMarker, RenderedLine, StoreNamespace, StoreStats,
    SubstitutionEngine, WordStore,
};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// Both stores of one session, on the same backend.
pub struct Stores<R: EntryRepository> {
    pub dictionary: WordStore<R>,
    pub phonetic: WordStore<R>,
}

impl<R: EntryRepository> Stores<R> {
    pub fn open(dictionary_repo: R, phonetic_repo: R) -> Result<Self> {
        Ok(Self {
            dictionary: WordStore::open(dictionary_repo, StoreNamespace::Dictionary)
                .context("failed to open dictionary store")?,
            phonetic: WordStore::open(phonetic_repo, StoreNamespace::Phonetic)
                .context("failed to open phonetic store")?,
        })
    }

    fn get(&self, namespace: StoreNamespace) -> &WordStore<R> {
        match namespace {
            StoreNamespace::Dictionary => &self.dictionary,
            StoreNamespace::Phonetic => &self.phonetic,
        }
    }

    fn get_mut(&mut self, namespace: StoreNamespace) -> &mut WordStore<R> {
        match namespace {
            StoreNamespace::Dictionary => &mut self.dictionary,
            StoreNamespace::Phonetic => &mut self.phonetic,
        }
    }

    /// Splits into `(source, target)` for a copy into `target`.
    fn towards(&mut self, target: StoreNamespace) -> (&WordStore<R>, &mut WordStore<R>) {
        match target {
            StoreNamespace::Dictionary => (&self.phonetic, &mut self.dictionary),
            StoreNamespace::Phonetic => (&self.dictionary, &mut self.phonetic),
        }
    }
}

/// Runs `command` against `stores`, writing results to `out`.
pub fn execute<R: EntryRepository>(
    command: &Command,
    store: Option<StoreNamespace>,
    stores: &mut Stores<R>,
    out: &mut impl Write,
) -> Result<()> {
    let namespace = store.unwrap_or_else(|| command.default_store());
    info!(
        "event=cli_command module=cli status=start command={} namespace={}",
        command.name(),
        namespace
    );

    match command {
        Command::Lookup { word } => {
            let key = normalize_key(word);
            match stores.get(namespace).lookup(&key) {
                Some(meaning) => writeln!(out, "{meaning}")?,
                None => writeln!(out, "Word not found in {namespace}")?,
            }
        }
        Command::Add { word, meaning } => {
            let key = normalize_key(word);
            let meaning = meaning.trim();
            if key.is_empty() || meaning.is_empty() {
                bail!("word and meaning must both be non-empty");
            }
            stores.get_mut(namespace).add(key.as_str(), meaning)?;
            writeln!(out, "Saved `{key}` in {namespace}")?;
        }
        Command::Remove { word } => {
            let key = normalize_key(word);
            if stores.get_mut(namespace).remove(&key)? {
                writeln!(out, "Removed `{key}` from {namespace}")?;
            } else {
                writeln!(out, "`{key}` is not in {namespace}")?;
            }
        }
        Command::List { page } => {
            let store = stores.get(namespace);
            print_page(out, store, &store.all_keys(), *page)?;
        }
        Command::Search { term, page } => {
            let store = stores.get(namespace);
            print_page(out, store, &search(store, term), *page)?;
        }
        Command::Import { file } => {
            let text = std::fs::read_to_string(file)
                .with_context(|| format!("failed to read `{}`", file.display()))?;
            let written = stores.get_mut(namespace).import_json(&text)?;
            writeln!(out, "Imported {written} words into {namespace}")?;
        }
        Command::Export { out: target } => {
            let json = stores.get(namespace).export_json()?;
            match target.as_deref() {
                Some(path) if path == Path::new("-") => writeln!(out, "{json}")?,
                Some(path) => write_export(path, &json)?,
                None => write_export(Path::new(namespace.export_file_name()), &json)?,
            }
        }
        Command::Convert { file } => {
            let text = read_input(file.as_deref())?;
            let engine = SubstitutionEngine::from_store(stores.get(namespace));
            write!(out, "{}", engine.apply(&text))?;
        }
        Command::Annotate { file } => {
            let text = read_input(file.as_deref())?;
            let engine = SubstitutionEngine::from_store(stores.get(namespace));
            write!(out, "{}", annotate(&engine, &text))?;
        }
        Command::Render { file } => {
            let text = read_input(file.as_deref())?;
            for line in render(&text) {
                match line {
                    RenderedLine::Break => writeln!(out, "<br>")?,
                    RenderedLine::Html(html) => writeln!(out, "<div>{html}</div>")?,
                }
            }
        }
        Command::Scrub { file, missing_only } => {
            let text = read_input(file.as_deref())?;
            let report = scrub(stores.get(namespace), &text);
            if !missing_only {
                writeln!(out, "# distinct words ({})", report.distinct_words.len())?;
                for word in &report.distinct_words {
                    writeln!(out, "{word}")?;
                }
                writeln!(out, "# in {namespace} ({})", report.present_in_store.len())?;
                for word in &report.present_in_store {
                    writeln!(out, "{word}")?;
                }
                writeln!(out, "# missing ({})", report.missing_from_store.len())?;
            }
            if !report.missing_from_store.is_empty() {
                writeln!(out, "{}", report.missing_template())?;
            }
        }
        Command::Diff => {
            let result = diff(&stores.dictionary, &stores.phonetic);
            print_word_group(out, "dictionary only", &result.only_in_a)?;
            print_word_group(out, "phonetic only", &result.only_in_b)?;
            print_word_group(out, "in both", &result.in_both)?;
        }
        Command::Sync { words, to } => {
            let (from, target) = stores.towards(*to);
            let mut failures = 0;
            for word in words {
                let key = normalize_key(word);
                match sync_one(from, target, &key) {
                    Ok(()) => writeln!(out, "synced `{key}` -> {to}")?,
                    Err(err) => {
                        failures += 1;
                        writeln!(out, "skipped `{key}`: {err}")?;
                    }
                }
            }
            if failures > 0 {
                bail!("{failures} of {} words could not be synced", words.len());
            }
        }
        Command::SyncAll { to } => {
            let (from, target) = stores.towards(*to);
            let pending = diff(from, target).only_in_a;
            let report = sync_all(from, target, &pending);
            writeln!(
                out,
                "Synced {} words into {to}, {} failed",
                report.synced.len(),
                report.failed.len()
            )?;
            for (key, err) in &report.failed {
                writeln!(out, "skipped `{key}`: {err}")?;
            }
        }
        Command::Stats => {
            let stats = StoreStats::collect(&stores.dictionary, &stores.phonetic);
            writeln!(out, "dictionary words: {}", stats.dictionary_words)?;
            writeln!(out, "phonetic words:   {}", stats.phonetic_words)?;
            writeln!(out, "total:            {}", stats.total())?;
        }
    }

    Ok(())
}

fn print_page<R: EntryRepository>(
    out: &mut impl Write,
    store: &WordStore<R>,
    keys: &[String],
    page: usize,
) -> Result<()> {
    let page = Page::of(keys, page);
    for key in &page.items {
        writeln!(out, "{key}\t{}", store.lookup(key).unwrap_or("N/A"))?;
    }

    if page.total_items == 0 {
        writeln!(out, "No words found")?;
        return Ok(());
    }

    let strip = page_window(page.page, page.total_pages)
        .into_iter()
        .map(|marker| match marker {
            PageMarker::Number(n) if n == page.page => format!("[{n}]"),
            PageMarker::Number(n) => n.to_string(),
            PageMarker::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(
        out,
        "Showing {}-{} of {} words  {strip}",
        page.start, page.end, page.total_items
    )?;
    Ok(())
}

fn print_word_group(out: &mut impl Write, title: &str, words: &[String]) -> Result<()> {
    writeln!(out, "# {title} ({})", words.len())?;
    for word in words {
        writeln!(out, "{word}")?;
    }
    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

fn write_export(path: &Path, json: &str) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create `{}`", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    writer
        .flush()
        .with_context(|| format!("failed to write `{}`", path.display()))?;
    info!("event=export module=cli status=ok bytes={}", json.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{execute, Stores};
    use crate::cli::Command;
    use ordbog_core::db::open_db_in_memory;
    use ordbog_core::{SqliteEntryRepository, StoreNamespace};
    use std::path::PathBuf;

    fn run(
        command: Command,
        store: Option<StoreNamespace>,
        stores: &mut Stores<SqliteEntryRepository<'_>>,
    ) -> String {
        let mut out = Vec::new();
        execute(&command, store, stores, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn add_normalizes_and_lookup_finds_word() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteEntryRepository::new(&conn);
        let mut stores = Stores::open(repo, repo).unwrap();

        run(
            Command::Add {
                word: "  Hund ".to_string(),
                meaning: " dog ".to_string(),
            },
            None,
            &mut stores,
        );
        assert_eq!(stores.dictionary.lookup("hund"), Some("dog"));

        let output = run(
            Command::Lookup {
                word: "HUND".to_string(),
            },
            None,
            &mut stores,
        );
        assert_eq!(output, "dog\n");
    }

    #[test]
    fn add_rejects_blank_meaning() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteEntryRepository::new(&conn);
        let mut stores = Stores::open(repo, repo).unwrap();

        let mut out = Vec::new();
        let command = Command::Add {
            word: "hund".to_string(),
            meaning: "   ".to_string(),
        };
        assert!(execute(&command, None, &mut stores, &mut out).is_err());
        assert!(stores.dictionary.is_empty());
    }

    #[test]
    fn sync_all_fills_target_store() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteEntryRepository::new(&conn);
        let mut stores = Stores::open(repo, repo).unwrap();
        stores.dictionary.add("sol", "sun").unwrap();
        stores.dictionary.add("måne", "moon").unwrap();

        let output = run(
            Command::SyncAll {
                to: StoreNamespace::Phonetic,
            },
            None,
            &mut stores,
        );
        assert_eq!(output, "Synced 2 words into phonetic, 0 failed\n");
        assert_eq!(stores.phonetic.lookup("måne"), Some("moon"));
    }

    #[test]
    fn export_writes_pretty_json_file() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteEntryRepository::new(&conn);
        let mut stores = Stores::open(repo, repo).unwrap();
        stores.phonetic.add("hej", "hai").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.json");

        run(
            Command::Export {
                out: Some(target.clone()),
            },
            Some(StoreNamespace::Phonetic),
            &mut stores,
        );
        let written = std::fs::read_to_string(&target).unwrap();
        assert_eq!(written, "{\n  \"hej\": \"hai\"\n}\n");
    }

    #[test]
    fn import_then_convert_file() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteEntryRepository::new(&conn);
        let mut stores = Stores::open(repo, repo).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let import = dir.path().join("phonetic-dictionary.json");
        let text = dir.path().join("input.txt");
        std::fs::write(&import, r#"{"god": "goo", "dag": 7}"#).unwrap();
        std::fs::write(&text, "God dag").unwrap();

        let output = run(
            Command::Import {
                file: import.clone(),
            },
            Some(StoreNamespace::Phonetic),
            &mut stores,
        );
        assert_eq!(output, "Imported 1 words into phonetic\n");

        let output = run(
            Command::Convert {
                file: Some(PathBuf::from(&text)),
            },
            None,
            &mut stores,
        );
        assert_eq!(output, "goo dag");
    }

    #[test]
    fn list_prints_page_summary() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteEntryRepository::new(&conn);
        let mut stores = Stores::open(repo, repo).unwrap();
        for n in 0..25 {
            stores
                .dictionary
                .add(format!("ord{n:02}"), format!("word {n}"))
                .unwrap();
        }

        let output = run(Command::List { page: 3 }, None, &mut stores);
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "ord20\tword 20");
        assert_eq!(lines[5], "Showing 21-25 of 25 words  1 2 [3]");
    }
}
