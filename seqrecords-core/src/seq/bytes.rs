use crate::seq::location::IndexPair;

use memchr::memmem;

/// Every (possibly overlapping) occurrence of a pattern within a haystack.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Occurrences {
    count: usize,
    index_pairs: Vec<IndexPair>,
}

impl Occurrences {
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn index_pairs(&self) -> &[IndexPair] {
        &self.index_pairs
    }

    pub fn into_index_pairs(self) -> Vec<IndexPair> {
        self.index_pairs
    }
}

/// Find every overlapping occurrence of `pat` in `hay`.
///
/// After a match at `pos` the search resumes at `pos + 1`, so `AA` occurs
/// three times in `AAAA`. An empty haystack or an empty pattern never matches.
pub fn count_overlapping(hay: &[u8], pat: &[u8]) -> Occurrences {
    if hay.is_empty() || pat.is_empty() {
        return Occurrences::default();
    }

    let finder = memmem::Finder::new(pat);
    let mut count = 0usize;
    let mut index_pairs = Vec::new();
    let mut i = 0usize;

    while i < hay.len() {
        match finder.find(&hay[i..]) {
            Some(offset) => {
                let pos = i + offset;
                index_pairs.push(IndexPair::new_unchecked(pos, pos + pat.len()));
                count += 1;
                // overlap: advance by 1 past the start of the match
                i = pos + 1;
            }
            None => break,
        }
    }

    debug_assert_eq!(count, index_pairs.len());
    Occurrences { count, index_pairs }
}
