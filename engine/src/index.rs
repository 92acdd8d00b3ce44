use crate::document::Document;
use crate::hash_table::HashTable;
use crate::html::{normalize_for_phrase, Extraction};
use crate::posting::PostingList;
use crate::stemmer::stem;
use crate::tokenizer::{tokenize_into, TokenizationStats};
use crate::DocId;

/// Per-term statistics stored in the inverted index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermData {
    /// Occurrences across all documents (not document-distinct).
    pub total_tf: u32,
    pub postings: PostingList,
}

pub type InvertedIndex = HashTable<TermData>;

/// Initial bucket count of an engine's index.
pub const INDEX_CAPACITY: usize = 1 << 16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub stemming: bool,
    pub extraction: Extraction,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BuildStats {
    pub tokenization: TokenizationStats,
    pub docs_indexed: u64,
    pub unique_terms: u64,
}

/// Normalize the query side of a term exactly like the build did.
pub(crate) fn index_term(token: String, stemming: bool) -> String {
    if stemming {
        stem(&token)
    } else {
        token
    }
}

/// Fill `index` from `docs`, which must already carry their final ids in
/// increasing order. The index is not cleared here.
///
/// Each document's `plain` and `normalized` text is (re)computed. Every token
/// occurrence bumps `total_tf`; the posting gets the document once.
pub fn build(
    docs: &mut [Document],
    index: &mut InvertedIndex,
    options: BuildOptions,
) -> BuildStats {
    let mut stats = BuildStats::default();
    let mut tokens: Vec<String> = Vec::with_capacity(4096);

    for doc in docs.iter_mut() {
        doc.plain = options.extraction.extract(&doc.html);
        doc.normalized = normalize_for_phrase(&doc.plain);

        tokens.clear();
        tokenize_into(&doc.plain, &mut tokens, Some(&mut stats.tokenization));
        if options.stemming {
            for t in tokens.iter_mut() {
                *t = stem(t);
            }
        }

        for t in tokens.iter().filter(|t| !t.is_empty()) {
            index.get_or_create(t).total_tf += 1;
        }

        tokens.sort_unstable();
        tokens.dedup();
        for t in tokens.iter().filter(|t| !t.is_empty()) {
            index.get_or_create(t).postings.add_sorted_unique(doc.id);
        }

        stats.docs_indexed += 1;
    }

    stats.unique_terms = index.len() as u64;
    tracing::info!(
        docs = stats.docs_indexed,
        unique_terms = stats.unique_terms,
        tokens = stats.tokenization.total_tokens,
        avg_token_len = stats.tokenization.avg_token_len(),
        kb_per_sec = stats.tokenization.kb_per_sec(),
        stemming = options.stemming,
        "index built"
    );
    stats
}

/// Assign dense ids `0..n` in slice order.
pub(crate) fn assign_ids(docs: &mut [Document]) {
    for (i, doc) in docs.iter_mut().enumerate() {
        doc.id = i as DocId;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(htmls: &[&str]) -> Vec<Document> {
        let mut docs: Vec<Document> = htmls
            .iter()
            .enumerate()
            .map(|(i, h)| Document::new(format!("u{i}"), *h))
            .collect();
        assign_ids(&mut docs);
        docs
    }

    #[test]
    fn total_tf_counts_occurrences_postings_count_documents() {
        let mut docs = docs(&["<span>dog dog cat</span>", "<span>dog</span>", "<p>dog</p>"]);
        let mut index = InvertedIndex::with_capacity(16);
        let stats = build(&mut docs, &mut index, BuildOptions::default());

        let dog = index.find("dog").expect("dog indexed");
        assert_eq!(dog.total_tf, 3);
        assert_eq!(dog.postings.docs(), &[0, 1]);
        let cat = index.find("cat").expect("cat indexed");
        assert_eq!(cat.total_tf, 1);
        assert_eq!(cat.postings.docs(), &[0]);

        assert_eq!(stats.docs_indexed, 3);
        assert_eq!(stats.unique_terms, 2);
        assert_eq!(stats.tokenization.total_tokens, 4);
    }

    #[test]
    fn stemming_merges_variants() {
        let mut docs = docs(&["<span>cats</span>", "<span>cat</span>"]);
        let mut index = InvertedIndex::new();
        build(&mut docs, &mut index, BuildOptions { stemming: true, ..Default::default() });
        assert_eq!(index.find("cat").map(|t| t.postings.docs().to_vec()), Some(vec![0, 1]));
        assert!(!index.contains("cats"));

        let mut unstemmed = InvertedIndex::new();
        build(&mut docs, &mut unstemmed, BuildOptions::default());
        assert!(unstemmed.contains("cats"));
    }

    #[test]
    fn derived_text_is_filled_in() {
        let mut docs = docs(&["<div><span>Hello, <b>World</b>!</span></div>"]);
        let mut index = InvertedIndex::new();
        build(&mut docs, &mut index, BuildOptions::default());
        assert_eq!(docs[0].plain, "Hello, World !");
        assert_eq!(docs[0].normalized, "hello world");
    }

    #[test]
    fn all_text_extraction_indexes_outside_spans() {
        let mut docs = docs(&["<p>outside</p><span>inside</span>"]);
        let mut index = InvertedIndex::new();
        let options = BuildOptions { extraction: Extraction::AllText, ..Default::default() };
        build(&mut docs, &mut index, options);
        assert!(index.contains("outside"));
        assert!(index.contains("inside"));
    }
}
