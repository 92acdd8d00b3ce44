use crate::error::{Error, Result};
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// A crawled page. `plain` and `normalized` are derived by the index build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(skip)]
    pub id: DocId,
    pub html: String,
    pub url: String,
    #[serde(default)]
    pub crawled_at: String,
    #[serde(skip)]
    pub plain: String,
    #[serde(skip)]
    pub normalized: String,
}

impl Document {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self { url: url.into(), html: html.into(), ..Self::default() }
    }
}

/// What a query hands back for each matching document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub snippet: String,
}

/// Anything that can produce the raw documents to index.
pub trait DocumentSource {
    fn load(&self) -> Result<Vec<Document>>;

    /// Human-readable origin used in logs and errors.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

impl<F> DocumentSource for F
where
    F: Fn() -> Result<Vec<Document>>,
{
    fn load(&self) -> Result<Vec<Document>> {
        self()
    }
}

/// Tab separated sample file: `url \t crawled_at \t html` per line.
/// Blank lines and lines with fewer than three fields are skipped.
#[derive(Debug, Clone)]
pub struct TsvFile {
    pub path: PathBuf,
}

impl TsvFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let f = File::open(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
    Ok(BufReader::new(f))
}

fn parse_tsv_line(line: &str) -> Option<Document> {
    let mut fields = line.splitn(3, '\t');
    let url = fields.next()?;
    let crawled_at = fields.next()?;
    let html = fields.next()?;
    Some(Document {
        url: url.to_string(),
        crawled_at: crawled_at.to_string(),
        html: html.to_string(),
        ..Document::default()
    })
}

impl DocumentSource for TsvFile {
    fn load(&self) -> Result<Vec<Document>> {
        let reader = open(&self.path)?;
        let mut docs = Vec::new();
        for (n, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| Error::Io { path: self.path.clone(), source })?;
            if line.is_empty() {
                continue;
            }
            match parse_tsv_line(&line) {
                Some(doc) => docs.push(doc),
                None => tracing::warn!(
                    path = %self.path.display(),
                    line = n + 1,
                    "skipping malformed line"
                ),
            }
        }
        Ok(docs)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// One JSON object per line with `url`, `html` and optional `crawled_at`.
#[derive(Debug, Clone)]
pub struct JsonLines {
    pub path: PathBuf,
}

impl JsonLines {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl DocumentSource for JsonLines {
    fn load(&self) -> Result<Vec<Document>> {
        let reader = open(&self.path)?;
        let mut docs = Vec::new();
        for (n, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| Error::Io { path: self.path.clone(), source })?;
            if line.trim().is_empty() {
                continue;
            }
            let doc: Document = serde_json::from_str(&line).map_err(|source| Error::Json {
                path: self.path.clone(),
                line: n + 1,
                source,
            })?;
            docs.push(doc);
        }
        Ok(docs)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
