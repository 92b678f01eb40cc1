use crate::error::{SeqError, SeqResult};
use crate::seq::location::IndexPair;
use std::fmt;

/// Number of symbols in a codon.
pub const CODON_LENGTH: usize = 3;

/// One of the three forward reading frames, numbered 1 to 3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReadingFrame {
    One,
    Two,
    Three,
}

impl ReadingFrame {
    pub const ALL: [ReadingFrame; 3] = [ReadingFrame::One, ReadingFrame::Two, ReadingFrame::Three];

    /// Reverse-strand frames are not supported; anything outside 1..=3 is an error.
    pub fn from_number(frame: usize) -> SeqResult<Self> {
        match frame {
            1 => Ok(ReadingFrame::One),
            2 => Ok(ReadingFrame::Two),
            3 => Ok(ReadingFrame::Three),
            _ => Err(SeqError::UnsupportedFrame { frame }),
        }
    }

    pub fn number(self) -> usize {
        self.offset() + 1
    }

    /// Index of the first full codon in this frame.
    pub fn offset(self) -> usize {
        match self {
            ReadingFrame::One => 0,
            ReadingFrame::Two => 1,
            ReadingFrame::Three => 2,
        }
    }
}

impl TryFrom<usize> for ReadingFrame {
    type Error = SeqError;

    fn try_from(frame: usize) -> SeqResult<Self> {
        ReadingFrame::from_number(frame)
    }
}

impl fmt::Display for ReadingFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Codon breakpoints for one forward reading frame.
///
/// The breakpoints start at 0, end at the sequence length and increase
/// strictly, so consecutive pairs tile `[0, len)` without gaps. Frames 2 and 3
/// begin with a short leading window `[0, offset)`; every frame may end with a
/// short trailing window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadingFrameTable {
    frame: ReadingFrame,
    breakpoints: Vec<usize>,
}

impl ReadingFrameTable {
    pub fn build(sequence_length: usize, frame: usize) -> SeqResult<Self> {
        let frame = ReadingFrame::from_number(frame)?;
        Ok(Self::for_frame(sequence_length, frame))
    }

    pub fn for_frame(sequence_length: usize, frame: ReadingFrame) -> Self {
        let offset = frame.offset();
        let mut breakpoints = Vec::with_capacity(sequence_length / CODON_LENGTH + 3);
        if offset != 0 {
            breakpoints.push(0);
        }
        breakpoints.extend((offset..=sequence_length).step_by(CODON_LENGTH));
        if breakpoints.last() != Some(&sequence_length) {
            breakpoints.push(sequence_length);
        }
        Self { frame, breakpoints }
    }

    pub fn frame(&self) -> ReadingFrame {
        self.frame
    }

    pub fn breakpoints(&self) -> &[usize] {
        &self.breakpoints
    }

    pub fn sequence_length(&self) -> usize {
        self.breakpoints.last().copied().unwrap_or(0)
    }

    /// Consecutive breakpoint pairs, left to right.
    pub fn windows(&self) -> impl Iterator<Item = IndexPair> + '_ {
        self.breakpoints
            .windows(2)
            .map(|w| IndexPair::new_unchecked(w[0], w[1]))
    }
}

/// Tables for frames 1, 2 and 3, in that order.
pub fn forward_frame_tables(sequence_length: usize) -> [ReadingFrameTable; 3] {
    ReadingFrame::ALL.map(|frame| ReadingFrameTable::for_frame(sequence_length, frame))
}
