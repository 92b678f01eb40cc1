//! Length-sorted sequence record collections with forward ORF detection and
//! overlapping repeat search.

#[macro_use]
mod par;

pub mod alphabets;
pub mod error;
pub mod io;
pub mod orf;
pub mod repeats;
pub mod seq;

pub use error::{SeqError, SeqResult};
pub use io::{BytesSource, FileSource, SeqFormat, SequenceSource};
pub use orf::{OrfConfig, OrfsByFrame, ReadingFrame, ReadingFrameTable};
pub use repeats::{RepeatEntry, RepeatReport};
pub use seq::{IndexPair, SeqRecord, Sequence, SequenceCollection};
