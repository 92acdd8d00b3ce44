use engine::html::{extract_span_text, normalize_for_phrase};
use engine::stemmer::stem;
use engine::tokenizer::tokenize;

#[test]
fn it_lowercases_and_splits_on_punctuation() {
    let words = tokenize("Running Runners RUN! The café's menu.");
    assert_eq!(words, vec!["running", "runners", "run", "the", "caf", "s", "menu"]);
}

#[test]
fn it_keeps_stopwords_and_digits() {
    let words = tokenize("The 3 quick brown foxes and the lazy dog");
    assert!(words.contains(&"the".to_string()));
    assert!(words.contains(&"and".to_string()));
    assert!(words.contains(&"3".to_string()));
}

#[test]
fn stemmed_tokens_match_pipeline_order() {
    let stems: Vec<String> = tokenize("Runners running quickly").iter().map(|t| stem(t)).collect();
    assert_eq!(stems, vec!["runner", "runn", "quick"]);
}

#[test]
fn phrase_normalization_agrees_with_tokenizer() {
    let plain = extract_span_text("<span>Hello, <em>World</em>! It&#39;s 2024.</span>");
    let normalized = normalize_for_phrase(&plain);
    assert_eq!(normalized, tokenize(&plain).join(" "));
}
