//! Boolean full-text search over an in-memory document collection.
//!
//! Documents are loaded from a [`DocumentSource`], indexed with
//! [`SearchEngine::build_index`] and queried with [`SearchEngine::search`]
//! using `AND`, `OR`, `NOT`, parentheses and quoted phrases.

pub mod document;
pub mod error;
pub mod export;
pub mod hash_table;
pub mod html;
pub mod index;
pub mod posting;
pub mod query;
pub mod search;
pub mod stemmer;
pub mod tokenizer;

pub type DocId = u32;

pub use document::{Document, DocumentSource, JsonLines, SearchResult, TsvFile};
pub use error::{Error, QueryError, Result};
pub use hash_table::HashTable;
pub use html::Extraction;
pub use index::{BuildOptions, BuildStats, TermData};
pub use posting::PostingList;
pub use search::SearchEngine;
