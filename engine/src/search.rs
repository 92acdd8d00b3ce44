use crate::document::{Document, DocumentSource, SearchResult};
use crate::error::{Error, QueryError, Result};
use crate::export::save_zipf_csv;
use crate::html::{normalize_for_phrase, Extraction};
use crate::index::{self, index_term, BuildOptions, BuildStats, InvertedIndex, INDEX_CAPACITY};
use crate::posting::PostingList;
use crate::query::{to_postfix, QueryToken};
use crate::tokenizer::tokenize;
use std::path::Path;

pub const SNIPPET_CHARS: usize = 200;
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// First `n` characters of `text`, with `...` appended when cut.
pub fn make_snippet(text: &str, n: usize) -> String {
    match text.char_indices().nth(n) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

/// Owns the document collection, the inverted index and the universe list.
///
/// Use it in three phases: load documents, build the index, then query.
/// Queries only need `&self`; loading and building need `&mut self`.
#[derive(Debug)]
pub struct SearchEngine {
    index: InvertedIndex,
    documents: Vec<Document>,
    universe: PostingList,
    options: BuildOptions,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchEngine {
    pub fn new() -> Self {
        Self {
            index: InvertedIndex::with_capacity(INDEX_CAPACITY),
            documents: Vec::new(),
            universe: PostingList::new(),
            options: BuildOptions::default(),
        }
    }

    /// Which part of each page the next build indexes.
    pub fn set_extraction(&mut self, extraction: Extraction) {
        self.options.extraction = extraction;
    }

    /// Replace the document set with whatever `source` yields. On failure the
    /// current documents and index are left untouched.
    pub fn load<S: DocumentSource + ?Sized>(&mut self, source: &S) -> Result<usize> {
        let docs = source.load()?;
        if docs.is_empty() {
            return Err(Error::NoDocuments { source_name: source.describe() });
        }
        tracing::info!(source = %source.describe(), documents = docs.len(), "documents loaded");
        self.set_documents(docs);
        Ok(self.documents.len())
    }

    /// Replace the document set. The index is stale until the next build.
    pub fn set_documents(&mut self, documents: Vec<Document>) {
        self.documents = documents;
    }

    /// Reassign ids and rebuild the index and universe from scratch.
    pub fn build_index(&mut self, stemming: bool) -> BuildStats {
        self.options.stemming = stemming;
        self.index.clear();
        index::assign_ids(&mut self.documents);
        self.universe = PostingList::universe(self.documents.len());
        index::build(&mut self.documents, &mut self.index, self.options)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn stemming(&self) -> bool {
        self.options.stemming
    }

    pub fn extraction(&self) -> Extraction {
        self.options.extraction
    }

    /// Evaluate a boolean query and return up to `max_results` matches in
    /// ascending document id order.
    pub fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let matches = self.evaluate(query)?;
        let results = self.results(&matches, max_results);
        tracing::debug!(query, hits = matches.len(), returned = results.len(), "search");
        Ok(results)
    }

    /// Materialize the first `max_results` ids of `matches` as url + snippet.
    pub fn results(&self, matches: &PostingList, max_results: usize) -> Vec<SearchResult> {
        matches
            .iter()
            .filter_map(|id| self.documents.get(id as usize))
            .take(max_results)
            .map(|d| SearchResult {
                url: d.url.clone(),
                snippet: make_snippet(&d.plain, SNIPPET_CHARS),
            })
            .collect()
    }

    /// The full matching posting list for `query`.
    pub fn evaluate(&self, query: &str) -> Result<PostingList, QueryError> {
        let postfix = to_postfix(query)?;
        let mut stack: Vec<PostingList> = Vec::with_capacity(postfix.len());

        for token in postfix {
            match token {
                QueryToken::Term(text) => stack.push(self.eval_term(&text)),
                QueryToken::Phrase(text) => stack.push(self.eval_phrase(&text)),
                QueryToken::Not => {
                    let operand = stack.pop().ok_or(QueryError::MissingNotOperand)?;
                    stack.push(PostingList::not(&self.universe, &operand));
                }
                QueryToken::And | QueryToken::Or => {
                    let (Some(right), Some(left)) = (stack.pop(), stack.pop()) else {
                        return Err(QueryError::MissingBinaryOperand);
                    };
                    let combined = if token == QueryToken::And {
                        PostingList::and(&left, &right)
                    } else {
                        PostingList::or(&left, &right)
                    };
                    stack.push(combined);
                }
                QueryToken::LParen | QueryToken::RParen => {}
            }
        }
        Ok(stack.pop().unwrap_or_default())
    }

    pub fn export_zipf_csv(&self, path: &Path, max_terms: usize) -> Result<usize> {
        save_zipf_csv(&self.index, path, max_terms)
    }

    fn postings_for(&self, term: &str) -> PostingList {
        self.index.find(term).map(|t| t.postings.clone()).unwrap_or_default()
    }

    /// A bare word goes through the same tokenizer and stemmer as the index;
    /// only its first sub-token is looked up.
    fn eval_term(&self, raw: &str) -> PostingList {
        match tokenize(raw).into_iter().next() {
            Some(token) => self.postings_for(&index_term(token, self.options.stemming)),
            None => PostingList::new(),
        }
    }

    /// Intersect the postings of every word, then keep the candidates whose
    /// normalized text contains the normalized phrase.
    fn eval_phrase(&self, phrase: &str) -> PostingList {
        let needle = normalize_for_phrase(phrase);
        let mut terms = tokenize(&needle)
            .into_iter()
            .map(|t| index_term(t, self.options.stemming));

        let Some(first) = terms.next() else {
            return PostingList::new();
        };
        let mut candidates = self.postings_for(&first);
        for term in terms {
            if candidates.is_empty() {
                break;
            }
            candidates = PostingList::and(&candidates, &self.postings_for(&term));
        }

        let mut out = PostingList::new();
        for id in candidates.iter() {
            let Some(doc) = self.documents.get(id as usize) else { continue };
            if doc.normalized.contains(&needle) {
                out.add_sorted_unique(id);
            }
        }
        out
    }
}
