pub mod bytes;
pub mod collection;
pub mod location;
pub mod record;
pub mod sequence;
pub mod traits;

pub use bytes::{count_overlapping, Occurrences};
pub use collection::SequenceCollection;
pub use location::IndexPair;
pub use record::SeqRecord;
pub use sequence::Sequence;
pub use traits::SeqBytes;
