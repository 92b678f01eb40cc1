use crate::error::{SeqError, SeqResult};
use crate::io::SequenceSource;
use crate::orf::{find_forward_orfs, OrfConfig, OrfsByFrame};
use crate::repeats::{find_repeating_subsequences, RepeatReport};
use crate::seq::record::SeqRecord;
use crate::seq::traits::SeqBytes;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::ops::Index;
use tracing::debug;

/// Records sorted by sequence length, shortest first, with an id index.
///
/// Records of equal length keep their input order. The collection is built
/// once and never mutated, so the id index always matches the sort order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceCollection<S: SeqBytes> {
    records: Vec<SeqRecord<S>>,
    positions: HashMap<Box<str>, usize>,
}

impl<S: SeqBytes> SequenceCollection<S> {
    pub fn new(mut records: Vec<SeqRecord<S>>) -> SeqResult<Self> {
        records.sort_by_key(|record| record.len());

        let mut positions = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            match positions.entry(record.id.clone()) {
                Entry::Occupied(_) => {
                    return Err(SeqError::DuplicateIdentifier {
                        id: record.id.clone(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(idx);
                }
            }
        }

        debug!(
            records = records.len(),
            shortest = records.first().map(|r| r.len()),
            longest = records.last().map(|r| r.len()),
            "built sequence collection"
        );

        Ok(Self { records, positions })
    }

    /// Load every record from `source` and build a collection from them.
    pub fn from_source(source: &impl SequenceSource) -> SeqResult<Self> {
        Self::new(source.load()?)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, shortest first.
    pub fn records(&self) -> &[SeqRecord<S>] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SeqRecord<S>> {
        self.records.iter()
    }

    pub fn get(&self, i: usize) -> Option<&SeqRecord<S>> {
        self.records.get(i)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.id())
    }

    pub fn lengths(&self) -> Vec<usize> {
        self.records.iter().map(|record| record.len()).collect()
    }

    /// Sorted position of the record with `id`.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&SeqRecord<S>> {
        self.position_of(id).map(|idx| &self.records[idx])
    }

    /// All records whose sequence is exactly `length` symbols long.
    pub fn records_of_length(&self, length: usize) -> &[SeqRecord<S>] {
        let lower = self.records.partition_point(|record| record.len() < length);
        let upper = self.records.partition_point(|record| record.len() <= length);
        &self.records[lower..upper]
    }

    pub fn longest(&self) -> SeqResult<&[SeqRecord<S>]> {
        let last = self.records.last().ok_or(SeqError::EmptyCollection)?;
        Ok(self.records_of_length(last.len()))
    }

    pub fn shortest(&self) -> SeqResult<&[SeqRecord<S>]> {
        let first = self.records.first().ok_or(SeqError::EmptyCollection)?;
        Ok(self.records_of_length(first.len()))
    }
}

impl<S: SeqBytes + Sync> SequenceCollection<S> {
    /// Forward ORF candidates of every record, shortest record first.
    pub fn forward_orfs(&self, config: &OrfConfig) -> Vec<(&str, OrfsByFrame)> {
        par_map!(&self.records, |record| {
            (record.id(), find_forward_orfs(record.seq.as_bytes(), config))
        })
    }

    pub fn forward_orfs_by_id(&self, id: &str, config: &OrfConfig) -> Option<OrfsByFrame> {
        self.get_by_id(id)
            .map(|record| find_forward_orfs(record.seq.as_bytes(), config))
    }

    /// Subsequences of `length` symbols and their occurrences across the
    /// collection; occurrence order follows the length-sorted record order.
    pub fn repeating_subsequences(&self, length: usize) -> RepeatReport {
        find_repeating_subsequences(&self.records, length)
    }
}

impl<S: SeqBytes> Index<usize> for SequenceCollection<S> {
    type Output = SeqRecord<S>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

impl<'a, S: SeqBytes> IntoIterator for &'a SequenceCollection<S> {
    type Item = &'a SeqRecord<S>;
    type IntoIter = std::slice::Iter<'a, SeqRecord<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl<S: SeqBytes> TryFrom<Vec<SeqRecord<S>>> for SequenceCollection<S> {
    type Error = SeqError;

    fn try_from(records: Vec<SeqRecord<S>>) -> SeqResult<Self> {
        Self::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orf::ReadingFrame;
    use crate::seq::sequence::Sequence;

    fn record(id: &str, seq: &str) -> SeqRecord<Sequence> {
        SeqRecord::new(id, seq.parse::<Sequence>().unwrap())
    }

    fn ids(records: &[SeqRecord<Sequence>]) -> Vec<&str> {
        records.iter().map(|r| r.id()).collect()
    }

    fn sample() -> SequenceCollection<Sequence> {
        SequenceCollection::new(vec![
            record("long1", "ATGAAATAGCC"),
            record("mid1", "ACGTAC"),
            record("short", "AC"),
            record("mid2", "TTTTTT"),
            record("long2", "CCCCCCCCCCC"),
        ])
        .unwrap()
    }

    #[test]
    fn sorted_by_length_stable() {
        let collection = sample();
        assert_eq!(
            collection.ids().collect::<Vec<_>>(),
            vec!["short", "mid1", "mid2", "long1", "long2"]
        );
        assert_eq!(collection.lengths(), vec![2, 6, 6, 11, 11]);
        assert_eq!(collection.len(), 5);
        assert_eq!(collection[0].id(), "short");
    }

    #[test]
    fn id_index_matches_sorted_positions() {
        let collection = sample();
        for (idx, record) in collection.iter().enumerate() {
            assert_eq!(collection.position_of(record.id()), Some(idx));
            assert_eq!(collection.get_by_id(record.id()), Some(record));
        }
        assert!(collection.get_by_id("missing").is_none());
    }

    #[test]
    fn range_by_length() {
        let collection = sample();
        assert_eq!(ids(collection.records_of_length(6)), vec!["mid1", "mid2"]);
        assert_eq!(ids(collection.records_of_length(2)), vec!["short"]);
        assert!(collection.records_of_length(7).is_empty());
        assert!(collection.records_of_length(0).is_empty());
        assert!(collection.records_of_length(100).is_empty());
    }

    #[test]
    fn longest_and_shortest() {
        let collection = sample();
        assert_eq!(ids(collection.longest().unwrap()), vec!["long1", "long2"]);
        assert_eq!(ids(collection.shortest().unwrap()), vec!["short"]);
    }

    #[test]
    fn empty_collection() {
        let collection = SequenceCollection::<Sequence>::new(Vec::new()).unwrap();
        assert!(collection.is_empty());
        assert!(collection.records_of_length(3).is_empty());
        assert!(matches!(collection.longest(), Err(SeqError::EmptyCollection)));
        assert!(matches!(collection.shortest(), Err(SeqError::EmptyCollection)));
        assert!(collection.forward_orfs(&OrfConfig::default()).is_empty());
        assert!(collection.repeating_subsequences(2).is_empty());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = SequenceCollection::new(vec![record("a", "ACGT"), record("a", "AC")]).unwrap_err();
        match err {
            SeqError::DuplicateIdentifier { id } => assert_eq!(id.as_ref(), "a"),
            other => panic!("expected duplicate identifier, got {other:?}"),
        }
    }

    #[test]
    fn empty_sequences_sort_first() {
        let collection =
            SequenceCollection::try_from(vec![record("x", "ACG"), record("empty", "")]).unwrap();
        assert_eq!(ids(collection.shortest().unwrap()), vec!["empty"]);
        assert_eq!(ids(collection.records_of_length(0)), vec!["empty"]);
    }

    #[test]
    fn corpus_orfs_follow_sorted_order() {
        let collection = sample();
        let orfs = collection.forward_orfs(&OrfConfig::default());
        let order: Vec<&str> = orfs.iter().map(|(id, _)| *id).collect();
        assert_eq!(order, vec!["short", "mid1", "mid2", "long1", "long2"]);

        let (_, long1) = &orfs[3];
        let frame_one: Vec<(usize, usize)> =
            long1.get(ReadingFrame::One).iter().map(|&p| p.into()).collect();
        assert_eq!(frame_one, vec![(0, 9)]);
        assert!(orfs[0].1.is_empty());
    }

    #[test]
    fn orfs_by_id() {
        let collection = sample();
        let config = OrfConfig::default();
        let found = collection.forward_orfs_by_id("long1", &config).unwrap();
        assert_eq!(found.total(), 1);
        assert!(collection.forward_orfs_by_id("missing", &config).is_none());
    }

    #[test]
    fn corpus_repeats_use_sorted_order() {
        let collection =
            SequenceCollection::new(vec![record("four", "AAAA"), record("three", "AAA")]).unwrap();
        let report = collection.repeating_subsequences(2);
        let entry = report.get(b"AA").unwrap();
        assert_eq!(entry.count(), 5);
        let ids: Vec<&str> = entry.ids().iter().map(|id| id.as_ref()).collect();
        assert_eq!(ids, vec!["three", "three", "four", "four", "four"]);
    }

    #[test]
    fn queries_are_idempotent() {
        let collection = sample();
        assert_eq!(collection.longest().unwrap(), collection.longest().unwrap());
        assert_eq!(collection.records_of_length(6), collection.records_of_length(6));
        assert_eq!(
            collection.repeating_subsequences(3),
            collection.repeating_subsequences(3)
        );
        let config = OrfConfig::default();
        assert_eq!(collection.forward_orfs(&config), collection.forward_orfs(&config));
    }
}
