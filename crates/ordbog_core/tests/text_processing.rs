use ordbog_core::db::open_db_in_memory;
use ordbog_core::{
    annotate, distinct_words, parse_annotation, render, scrub, substitute, RenderedLine,
    SqliteEntryRepository, StoreNamespace, SubstitutionEngine, WordStore,
};
use rusqlite::Connection;

fn phonetic_store<'c>(
    conn: &'c Connection,
    pairs: &[(&str, &str)],
) -> WordStore<SqliteEntryRepository<'c>> {
    let mut store =
        WordStore::open(SqliteEntryRepository::new(conn), StoreNamespace::Phonetic).unwrap();
    for (key, value) in pairs {
        store.add(*key, *value).unwrap();
    }
    store
}

#[test]
fn longest_key_is_matched_first() {
    let conn = open_db_in_memory().unwrap();
    let store = phonetic_store(&conn, &[("to", "X"), ("tomorrow", "Y")]);
    assert_eq!(substitute(&store, "tomorrow"), "Y");
}

#[test]
fn extended_letters_block_boundaries() {
    let conn = open_db_in_memory().unwrap();
    let store = phonetic_store(&conn, &[("or", "X")]);
    assert_eq!(substitute(&store, "ør"), "ør");
    assert_eq!(substitute(&store, "or!"), "X!");
}

#[test]
fn case_insensitive_match_inserts_stored_case() {
    let conn = open_db_in_memory().unwrap();
    let store = phonetic_store(&conn, &[("cat", "Kat")]);
    assert_eq!(substitute(&store, "The CAT sat"), "The Kat sat");
}

#[test]
fn unmatched_characters_are_preserved() {
    let conn = open_db_in_memory().unwrap();
    let store = phonetic_store(&conn, &[("hej", "hi")]);
    let input = "  Hej!\tvenner,\n\nhejsa ... 123 hej ";
    assert_eq!(substitute(&store, input), "  hi!\tvenner,\n\nhejsa ... 123 hi ");
}

#[test]
fn empty_store_returns_input_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let store = phonetic_store(&conn, &[]);
    assert_eq!(substitute(&store, "intet at se her"), "intet at se her");
}

#[test]
fn words_with_empty_meaning_are_left_in_place() {
    let conn = open_db_in_memory().unwrap();
    let store = phonetic_store(&conn, &[("cat", "")]);
    assert_eq!(substitute(&store, "the cat sat"), "the cat sat");
}

#[test]
fn long_s_and_kelvin_sign_are_not_case_variants() {
    let conn = open_db_in_memory().unwrap();
    let store = phonetic_store(&conn, &[("s", "X"), ("k", "Y")]);
    assert_eq!(substitute(&store, "\u{17F} \u{212A}"), "\u{17F} \u{212A}");
}

#[test]
fn engine_is_a_snapshot_of_the_store() {
    let conn = open_db_in_memory().unwrap();
    let mut store = phonetic_store(&conn, &[("sol", "sun")]);
    let engine = SubstitutionEngine::from_store(&store);

    store.add("måne", "moon").unwrap();

    assert_eq!(engine.apply("sol og måne"), "sun og måne");
    assert_eq!(substitute(&store, "sol og måne"), "sun og moon");
}

#[test]
fn annotated_output_round_trips_through_renderer() {
    let conn = open_db_in_memory().unwrap();
    let store = phonetic_store(&conn, &[("god", "goo"), ("morgen", "moren")]);
    let engine = SubstitutionEngine::from_store(&store);

    let annotated = annotate(&engine, "God morgen\n\nfarvel");
    let lines = annotated.split('\n').collect::<Vec<_>>();
    assert_eq!(lines[0], "God morgen - **goo moren** - Meaning  ## \\");
    assert_eq!(lines[1], "");
    assert_eq!(lines[2], "farvel - **farvel** - Meaning  ## \\");

    let parsed = parse_annotation(lines[0]).unwrap();
    assert_eq!(parsed.original, "God morgen");
    assert_eq!(parsed.converted, "goo moren");

    assert_eq!(
        render(&annotated),
        vec![
            RenderedLine::Html("God morgen - <strong>goo moren</strong>".to_string()),
            RenderedLine::Break,
            RenderedLine::Html("farvel - <strong>farvel</strong>".to_string()),
        ]
    );
}

#[test]
fn scrub_partitions_against_store_keys() {
    let conn = open_db_in_memory().unwrap();
    let store = phonetic_store(&conn, &[("hej", "hai"), ("Verden", "veruden")]);

    let report = scrub(&store, "Hej verden! Hej igen, kære verden.");

    assert_eq!(report.distinct_words, vec!["hej", "igen", "kære", "verden"]);
    assert_eq!(report.present_in_store, vec!["hej", "verden"]);
    assert_eq!(report.missing_from_store, vec!["igen", "kære"]);
    assert_eq!(
        report.missing_template(),
        "\"igen\": \"**igen**\",\n\"kære\": \"**kære**\","
    );
}

#[test]
fn scrub_is_invariant_under_reordering_and_duplication() {
    let base = distinct_words("æble pære banan");
    assert_eq!(distinct_words("banan æble pære"), base);
    assert_eq!(distinct_words("pære pære banan æble æble"), base);
}

#[test]
fn scrub_of_whitespace_only_text_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let store = phonetic_store(&conn, &[("hej", "hai")]);
    let report = scrub(&store, " \n\t ");
    assert!(report.distinct_words.is_empty());
    assert!(report.missing_template().is_empty());
}
