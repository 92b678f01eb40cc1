use crate::alphabets;
use crate::error::{SeqError, SeqResult};
use crate::orf::frame::{ReadingFrame, CODON_LENGTH};
use crate::seq::location::IndexPair;

use std::fmt;
use vector_map::VecMap;

/// Half-open range of one codon window.
pub type CodonIndexPair = IndexPair;

/// Half-open range from a start codon's first symbol to a stop codon's last.
pub type OrfCandidate = IndexPair;

pub const START_CODONS: &[&[u8]] = &[b"ATG"];
pub const STOP_CODONS: &[&[u8]] = &[b"TAA", b"TAG", b"TGA"];

/// A set of codons matched by exact, case-sensitive comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodonSet {
    codons: Vec<[u8; CODON_LENGTH]>,
}

impl CodonSet {
    pub fn new<C, T>(codons: T) -> SeqResult<Self>
    where
        C: AsRef<[u8]>,
        T: IntoIterator<Item = C>,
    {
        let mut out: Vec<[u8; CODON_LENGTH]> = Vec::new();
        for codon in codons {
            let codon = codon.as_ref();
            let parsed: [u8; CODON_LENGTH] = codon
                .try_into()
                .ok()
                .filter(|c: &[u8; CODON_LENGTH]| alphabets::symbols().is_word(c))
                .ok_or_else(|| SeqError::InvalidCodon {
                    codon: String::from_utf8_lossy(codon).into_owned(),
                    expected: CODON_LENGTH,
                })?;
            if !out.contains(&parsed) {
                out.push(parsed);
            }
        }
        Ok(Self { codons: out })
    }

    pub fn standard_starts() -> Self {
        Self::from_static(START_CODONS)
    }

    pub fn standard_stops() -> Self {
        Self::from_static(STOP_CODONS)
    }

    fn from_static(codons: &[&[u8]]) -> Self {
        let codons = codons
            .iter()
            .filter_map(|c| <[u8; CODON_LENGTH]>::try_from(*c).ok())
            .collect();
        Self { codons }
    }

    /// True when `window` is exactly one of the codons. Short boundary
    /// windows never match.
    #[inline]
    pub fn contains(&self, window: &[u8]) -> bool {
        self.codons.iter().any(|c| c.as_slice() == window)
    }

    pub fn len(&self) -> usize {
        self.codons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codons.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.codons.iter().map(|c| c.as_slice())
    }
}

/// Start and stop codons used when scanning reading frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrfConfig {
    pub starts: CodonSet,
    pub stops: CodonSet,
}

impl OrfConfig {
    pub fn new(starts: CodonSet, stops: CodonSet) -> Self {
        Self { starts, stops }
    }
}

impl Default for OrfConfig {
    fn default() -> Self {
        Self {
            starts: CodonSet::standard_starts(),
            stops: CodonSet::standard_stops(),
        }
    }
}

/// ORF candidates of one sequence keyed by forward reading frame.
pub struct OrfsByFrame {
    frames: VecMap<ReadingFrame, Vec<OrfCandidate>>,
}

impl Default for OrfsByFrame {
    fn default() -> Self {
        Self {
            frames: VecMap::new(),
        }
    }
}

impl Clone for OrfsByFrame {
    fn clone(&self) -> Self {
        let mut out = Self::default();
        for (frame, orfs) in self.iter() {
            out.insert(frame, orfs.to_vec());
        }
        out
    }
}

impl fmt::Debug for OrfsByFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl OrfsByFrame {
    pub(crate) fn insert(&mut self, frame: ReadingFrame, orfs: Vec<OrfCandidate>) {
        self.frames.insert(frame, orfs);
    }

    /// Candidates found in `frame`; empty when none were found.
    pub fn get(&self, frame: ReadingFrame) -> &[OrfCandidate] {
        self.frames.get(&frame).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (ReadingFrame, &[OrfCandidate])> {
        ReadingFrame::ALL
            .into_iter()
            .map(move |frame| (frame, self.get(frame)))
    }

    /// Total number of candidates across all frames.
    pub fn total(&self) -> usize {
        self.iter().map(|(_, orfs)| orfs.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl PartialEq for OrfsByFrame {
    fn eq(&self, other: &Self) -> bool {
        ReadingFrame::ALL
            .iter()
            .all(|&frame| self.get(frame) == other.get(frame))
    }
}

impl Eq for OrfsByFrame {}
