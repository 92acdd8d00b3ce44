use crate::error::{Error, Result};
use crate::index::InvertedIndex;
use std::fs::{create_dir_all, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipfRow<'a> {
    pub term: &'a str,
    pub tf: u32,
}

/// Terms by descending total frequency, ties by ascending term.
pub fn zipf_rows(index: &InvertedIndex) -> Vec<ZipfRow<'_>> {
    let mut rows: Vec<ZipfRow<'_>> = index
        .iter()
        .map(|(term, data)| ZipfRow { term, tf: data.total_tf })
        .collect();
    rows.sort_unstable_by(|a, b| b.tf.cmp(&a.tf).then_with(|| a.term.cmp(b.term)));
    rows
}

/// Write `rank,term,tf` rows; `max_terms == 0` means all of them. Returns the
/// number of rows written.
pub fn write_zipf_csv<W: Write>(
    index: &InvertedIndex,
    out: W,
    max_terms: usize,
) -> io::Result<usize> {
    let rows = zipf_rows(index);
    let limit = if max_terms == 0 { rows.len() } else { max_terms.min(rows.len()) };

    let mut out = BufWriter::new(out);
    writeln!(out, "rank,term,tf")?;
    for (rank, row) in rows.iter().take(limit).enumerate() {
        writeln!(out, "{},{},{}", rank + 1, row.term, row.tf)?;
    }
    out.flush()?;
    Ok(limit)
}

pub fn save_zipf_csv(index: &InvertedIndex, path: &Path, max_terms: usize) -> Result<usize> {
    let export_err = |source| Error::Export { path: path.to_path_buf(), source };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir).map_err(export_err)?;
    }
    let f = File::create(path).map_err(export_err)?;
    let rows = write_zipf_csv(index, f, max_terms).map_err(export_err)?;
    tracing::info!(path = %path.display(), rows, "zipf csv exported");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with(counts: &[(&str, u32)]) -> InvertedIndex {
        let mut index = InvertedIndex::new();
        for (term, tf) in counts {
            index.get_or_create(term).total_tf = *tf;
        }
        index
    }

    #[test]
    fn rows_sorted_by_frequency_then_term() {
        let index = index_with(&[("b", 2), ("a", 2), ("c", 5), ("d", 1)]);
        let terms: Vec<&str> = zipf_rows(&index).iter().map(|r| r.term).collect();
        assert_eq!(terms, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn csv_respects_limit() {
        let index = index_with(&[("x", 3), ("y", 2), ("z", 1)]);
        let mut buf = Vec::new();
        assert_eq!(write_zipf_csv(&index, &mut buf, 2).unwrap(), 2);
        assert_eq!(String::from_utf8(buf).unwrap(), "rank,term,tf\n1,x,3\n2,y,2\n");

        let mut all = Vec::new();
        assert_eq!(write_zipf_csv(&index, &mut all, 0).unwrap(), 3);
    }

    #[test]
    fn unwritable_path_is_an_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let index = index_with(&[("x", 1)]);
        // a directory cannot be opened as a file
        let err = save_zipf_csv(&index, dir.path(), 0).unwrap_err();
        assert!(matches!(err, Error::Export { .. }));
    }
}
