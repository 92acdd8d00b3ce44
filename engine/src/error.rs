use std::io;
use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read document source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed record at {path}:{line}: {source}")]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("no documents loaded from {source_name} (bad format?)")]
    NoDocuments { source_name: String },

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("cannot write zipf export to {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure of a single query. Never affects the index or other queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("mismatched parentheses in query")]
    MismatchedParentheses,

    #[error("binary operator operand missing")]
    MissingBinaryOperand,

    #[error("NOT operand missing")]
    MissingNotOperand,
}
