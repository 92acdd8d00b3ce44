//! Sorted, duplicate-free document id lists and their set algebra.
//!
//! Every operation assumes its inputs are strictly increasing. That is not
//! re-checked: a list built out of order gives sorted but wrong results.

use crate::DocId;
use std::cmp::Ordering;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingList {
    docs: Vec<DocId>,
}

impl PostingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// `0..n`, the operand of NOT.
    pub fn universe(n: usize) -> Self {
        Self { docs: (0..n).map(|id| id as DocId).collect() }
    }

    /// Insert keeping order, ignoring duplicates. Works in any order.
    pub fn add(&mut self, doc_id: DocId) {
        if self.docs.last().map_or(true, |&last| doc_id > last) {
            self.docs.push(doc_id);
            return;
        }
        if let Err(pos) = self.docs.binary_search(&doc_id) {
            self.docs.insert(pos, doc_id);
        }
    }

    /// Append unless equal to the last id. Only valid when ids arrive in
    /// non-decreasing order; never mix with [`PostingList::add`].
    pub fn add_sorted_unique(&mut self, doc_id: DocId) {
        if self.docs.last() != Some(&doc_id) {
            self.docs.push(doc_id);
        }
    }

    pub fn docs(&self) -> &[DocId] {
        &self.docs
    }

    pub fn iter(&self) -> impl Iterator<Item = DocId> + '_ {
        self.docs.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Intersection.
    pub fn and(a: &Self, b: &Self) -> Self {
        let (a, b) = (&a.docs, &b.docs);
        let mut out = Vec::with_capacity(a.len().min(b.len()));
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                Ordering::Equal => {
                    out.push(a[i]);
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        Self { docs: out }
    }

    /// Union.
    pub fn or(a: &Self, b: &Self) -> Self {
        let (a, b) = (&a.docs, &b.docs);
        let mut out = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                Ordering::Equal => {
                    out.push(a[i]);
                    i += 1;
                    j += 1;
                }
                Ordering::Less => {
                    out.push(a[i]);
                    i += 1;
                }
                Ordering::Greater => {
                    out.push(b[j]);
                    j += 1;
                }
            }
        }
        out.extend_from_slice(&a[i..]);
        out.extend_from_slice(&b[j..]);
        Self { docs: out }
    }

    /// `universe \ a`. Ids of `a` missing from the universe are skipped.
    pub fn not(universe: &Self, a: &Self) -> Self {
        let (u, a) = (&universe.docs, &a.docs);
        let mut out = Vec::with_capacity(u.len());
        let (mut i, mut j) = (0, 0);
        while i < u.len() && j < a.len() {
            match u[i].cmp(&a[j]) {
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
                Ordering::Less => {
                    out.push(u[i]);
                    i += 1;
                }
                Ordering::Greater => j += 1,
            }
        }
        out.extend_from_slice(&u[i..]);
        Self { docs: out }
    }
}

/// Sorts and deduplicates, so any id list becomes a valid posting list.
impl From<Vec<DocId>> for PostingList {
    fn from(mut docs: Vec<DocId>) -> Self {
        docs.sort_unstable();
        docs.dedup();
        Self { docs }
    }
}
