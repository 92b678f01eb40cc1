use crate::error::{SeqError, SeqResult};
use std::fmt;

/// A 0-based, half-open `[start, end)` range of sequence indices.
///
/// Codon windows, ORF candidates and subsequence occurrences are all
/// expressed as index pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexPair {
    start: usize,
    end: usize,
}

impl IndexPair {
    pub fn new(start: usize, end: usize) -> SeqResult<Self> {
        if start > end {
            return Err(SeqError::InvalidLocation { start, end });
        }
        Ok(Self { start, end })
    }

    #[inline]
    pub(crate) fn new_unchecked(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn slice<'a>(&self, bytes: &'a [u8]) -> &'a [u8] {
        let end = self.end.min(bytes.len());
        let start = self.start.min(end);
        &bytes[start..end]
    }

    /// Reporting form: 1-based, inclusive on both ends.
    ///
    /// Nothing inside this crate computes with the converted values.
    pub fn to_one_based_inclusive(&self) -> (usize, usize) {
        (self.start + 1, self.end)
    }
}

impl From<IndexPair> for (usize, usize) {
    fn from(pair: IndexPair) -> Self {
        (pair.start, pair.end)
    }
}

impl fmt::Display for IndexPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
