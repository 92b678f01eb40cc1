//! Fixed-length subsequences repeated (with overlap) across a record set.


use crate::seq::bytes::count_overlapping;
use crate::seq::location::IndexPair;
use crate::seq::record::SeqRecord;
use crate::seq::traits::SeqBytes;

use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

/// Every occurrence of one subsequence across the records.
///
/// `ids[i]` is the record holding the occurrence at `index_pairs[i]`; a record
/// id repeats once per occurrence inside that record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepeatEntry {
    ids: Vec<Box<str>>,
    index_pairs: Vec<IndexPair>,
}

impl RepeatEntry {
    pub fn ids(&self) -> &[Box<str>] {
        &self.ids
    }

    pub fn index_pairs(&self) -> &[IndexPair] {
        &self.index_pairs
    }

    /// Total occurrences across the whole record set.
    pub fn count(&self) -> usize {
        self.ids.len()
    }

    /// `(id, occurrence)` pairs in record traversal order.
    pub fn occurrences(&self) -> impl Iterator<Item = (&str, IndexPair)> {
        self.ids
            .iter()
            .map(|id| id.as_ref())
            .zip(self.index_pairs.iter().copied())
    }

    /// Number of distinct records with at least one occurrence.
    pub fn record_count(&self) -> usize {
        self.ids.iter().collect::<HashSet<_>>().len()
    }
}

/// Repeat entries keyed by subsequence, in byte-lexicographic order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepeatReport {
    length: usize,
    entries: BTreeMap<Box<[u8]>, RepeatEntry>,
}

impl RepeatReport {
    /// Subsequence length the report was built for.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn get(&self, subseq: &[u8]) -> Option<&RepeatEntry> {
        self.entries.get(subseq)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &RepeatEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v))
    }

    /// Entries occurring at least `min_count` times.
    pub fn with_min_count(&self, min_count: usize) -> impl Iterator<Item = (&[u8], &RepeatEntry)> {
        self.iter().filter(move |(_, entry)| entry.count() >= min_count)
    }

    /// Entries occurring more than once anywhere in the record set.
    pub fn repeated(&self) -> impl Iterator<Item = (&[u8], &RepeatEntry)> {
        self.with_min_count(2)
    }
}

impl<'a> IntoIterator for &'a RepeatReport {
    type Item = (&'a Box<[u8]>, &'a RepeatEntry);
    type IntoIter = btree_map::Iter<'a, Box<[u8]>, RepeatEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Distinct windows of exactly `length` symbols, sliding by one.
///
/// A sequence shorter than `length` has no windows.
pub fn distinct_subsequences(seq: &[u8], length: usize) -> BTreeSet<&[u8]> {
    if length == 0 {
        return BTreeSet::from([&seq[..0]]);
    }
    seq.windows(length).collect()
}

/// Find every length-`length` subsequence of any record and where it occurs.
///
/// Candidates are the union of each record's distinct windows. Each candidate
/// is then searched for, with overlap, in every record in slice order, so the
/// order of an entry's `ids`/`index_pairs` follows the order of `records`.
pub fn find_repeating_subsequences<S>(records: &[SeqRecord<S>], length: usize) -> RepeatReport
where
    S: SeqBytes + Sync,
{
    let candidates: BTreeSet<&[u8]> = records
        .iter()
        .flat_map(|record| distinct_subsequences(record.seq.as_bytes(), length))
        .collect();
    let candidates: Vec<&[u8]> = candidates.into_iter().collect();

    debug!(
        records = records.len(),
        length,
        candidates = candidates.len(),
        "searching for repeated subsequences"
    );

    let scanned: Vec<RepeatEntry> =
        par_map!(&candidates, |subseq: &&[u8]| scan_records(records, subseq));

    let entries = candidates
        .into_iter()
        .map(Box::<[u8]>::from)
        .zip(scanned)
        .collect();

    RepeatReport { length, entries }
}

fn scan_records<S: SeqBytes>(records: &[SeqRecord<S>], subseq: &[u8]) -> RepeatEntry {
    let mut entry = RepeatEntry::default();
    let mut seen: HashSet<(&str, IndexPair)> = HashSet::new();

    for record in records {
        let occurrences = count_overlapping(record.seq.as_bytes(), subseq);
        for pair in occurrences.into_index_pairs() {
            if !seen.insert((record.id(), pair)) {
                continue;
            }
            entry.ids.push(record.id.clone());
            entry.index_pairs.push(pair);
        }
    }

    entry
}
