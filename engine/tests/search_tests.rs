use engine::html::{extract_span_text, normalize_for_phrase};
use engine::query::to_postfix;
use engine::{Document, Error, QueryError, SearchEngine, TsvFile};
use std::fs;
use tempfile::tempdir;

fn cat_dog_engine() -> SearchEngine {
    let mut engine = SearchEngine::new();
    engine.set_documents(vec![
        Document::new("u0", "<span>cat dog</span>"),
        Document::new("u1", "<span>dog only</span>"),
    ]);
    engine.build_index(true);
    engine
}

fn urls(engine: &SearchEngine, query: &str) -> Vec<String> {
    engine.search(query, 50).unwrap().into_iter().map(|r| r.url).collect()
}

#[test]
fn boolean_operators_end_to_end() {
    let engine = cat_dog_engine();
    assert_eq!(urls(&engine, "cat AND dog"), vec!["u0"]);
    assert_eq!(urls(&engine, "cat OR dog"), vec!["u0", "u1"]);
    assert_eq!(urls(&engine, "NOT cat"), vec!["u1"]);
    assert_eq!(urls(&engine, "\"cat dog\""), vec!["u0"]);
    assert_eq!(urls(&engine, "dog AND NOT (cat OR fish)"), vec!["u1"]);
    assert_eq!(urls(&engine, "cats and DOGS"), vec!["u0"]);
    assert!(urls(&engine, "fish").is_empty());
    assert!(urls(&engine, "").is_empty());
}

#[test]
fn non_breaking_space_does_not_split_a_term() {
    let engine = cat_dog_engine();
    // one query word; its first sub-token is "cat"
    assert_eq!(urls(&engine, "cat\u{a0}dog"), vec!["u0"]);
    assert_eq!(urls(&engine, "cat\tOR\x0bdog"), vec!["u0", "u1"]);
}

#[test]
fn snippets_come_from_plain_text() {
    let engine = cat_dog_engine();
    let results = engine.search("cat", 10).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].snippet, "cat dog");
}

#[test]
fn long_documents_get_truncated_snippets() {
    let mut engine = SearchEngine::new();
    let body = "word ".repeat(100);
    engine.set_documents(vec![Document::new("long", format!("<span>{body}</span>"))]);
    engine.build_index(false);
    let results = engine.search("word", 1).unwrap();
    let snippet = &results[0].snippet;
    assert!(snippet.ends_with("..."));
    assert_eq!(snippet.chars().count(), 203);
}

#[test]
fn malformed_queries_fail_without_touching_the_index() {
    let engine = cat_dog_engine();
    match engine.search("(cat AND dog", 10) {
        Err(Error::Query(QueryError::MismatchedParentheses)) => {}
        other => panic!("expected parse error, got {other:?}"),
    }
    assert!(matches!(engine.search("cat)", 10), Err(Error::Query(_))));
    assert_eq!(urls(&engine, "cat AND dog"), vec!["u0"]);
}

#[test]
fn syntax_errors_are_reported_on_an_empty_engine() {
    let engine = SearchEngine::new();
    assert!(engine.search("(", 10).is_err());
    assert!(engine.search("anything", 10).unwrap().is_empty());
}

#[test]
fn build_pipeline_matches_normalizer() {
    let htmls = [
        "<html><span>Tom &amp; Jerry</span><p>skip</p><span>  chase\n&#65;gain </span></html>",
        "<span>x<script>var y = 1;</script>y</span>",
        "no spans at all",
    ];
    let mut engine = SearchEngine::new();
    engine.set_documents(
        htmls
            .iter()
            .enumerate()
            .map(|(i, h)| Document::new(i.to_string(), *h))
            .collect(),
    );
    engine.build_index(true);
    for (doc, html) in engine.documents().iter().zip(htmls) {
        assert_eq!(doc.normalized, normalize_for_phrase(&extract_span_text(html)));
    }
}

#[test]
fn parser_examples() {
    let render = |q: &str| {
        to_postfix(q)
            .unwrap()
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    };
    assert_eq!(render("a AND b OR c"), "a b AND c OR");
    assert_eq!(render("NOT a AND b"), "a NOT b AND");
    assert_eq!(render("(a OR b) AND c"), "a b OR c AND");
    assert!(to_postfix("(a AND b").is_err());
}

#[test]
fn tsv_load_then_build_and_export() {
    let dir = tempdir().unwrap();
    let sample = dir.path().join("sample.tsv");
    fs::write(
        &sample,
        "http://a\t2024-01-01T00:00:00Z\t<span>alpha beta beta</span>\n\
         http://b\t2024-01-02T00:00:00Z\t<span>beta gamma</span>\n",
    )
    .unwrap();

    let mut engine = SearchEngine::new();
    assert_eq!(engine.load(&TsvFile::new(&sample)).unwrap(), 2);
    let stats = engine.build_index(false);
    assert_eq!(stats.docs_indexed, 2);
    assert_eq!(stats.unique_terms, 3);
    assert_eq!(engine.documents()[1].id, 1);
    assert_eq!(urls(&engine, "beta AND NOT alpha"), vec!["http://b"]);

    let csv = dir.path().join("out").join("zipf.csv");
    assert_eq!(engine.export_zipf_csv(&csv, 0).unwrap(), 3);
    assert_eq!(fs::read_to_string(&csv).unwrap(), "rank,term,tf\n1,beta,3\n2,alpha,1\n3,gamma,1\n");
}

#[test]
fn empty_source_is_a_load_error() {
    let dir = tempdir().unwrap();
    let sample = dir.path().join("empty.tsv");
    fs::write(&sample, "\nnot enough fields\n").unwrap();
    let mut engine = SearchEngine::new();
    assert!(matches!(engine.load(&TsvFile::new(&sample)), Err(Error::NoDocuments { .. })));
}
