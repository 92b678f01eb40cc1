use crate::alphabets;
use crate::error::{SeqError, SeqResult};
use crate::seq::traits::SeqBytes;

/// A sequence over the printable symbol alphabet.
///
/// No biological alphabet is enforced: gap characters and ambiguity codes are
/// kept verbatim and compared like any other symbol.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sequence {
    bytes: Vec<u8>,
}

impl Sequence {
    pub fn new(bytes: Vec<u8>) -> SeqResult<Self> {
        if let Some((pos, b)) = alphabets::symbols().first_foreign(&bytes) {
            return Err(SeqError::InvalidChar { ch: b as char, pos });
        }
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The symbols of `[start, end)`, clamped to the sequence bounds.
    pub fn window(&self, start: usize, end: usize) -> &[u8] {
        let end = end.min(self.bytes.len());
        let start = start.min(end);
        &self.bytes[start..end]
    }

    pub fn as_str(&self) -> &str {
        // the symbol alphabet is pure ASCII
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }
}

impl SeqBytes for Sequence {
    fn as_bytes(&self) -> &[u8] {
        Sequence::as_bytes(self)
    }

    fn from_bytes(bytes: Vec<u8>) -> SeqResult<Self> {
        Sequence::new(bytes)
    }
}

impl std::str::FromStr for Sequence {
    type Err = SeqError;

    fn from_str(s: &str) -> SeqResult<Self> {
        Sequence::new(s.as_bytes().to_vec())
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_symbol_seq() {
        let seq = Sequence::new(b"AC-GT.Nn".to_vec()).unwrap();
        assert_eq!(seq.as_bytes(), b"AC-GT.Nn");
        assert_eq!(seq.len(), 8);
        assert!(!seq.is_empty());
        assert_eq!(seq.to_string(), "AC-GT.Nn");
    }

    #[test]
    fn whitespace_rejected() {
        let err = Sequence::new(b"AC GT".to_vec()).unwrap_err();
        match err {
            SeqError::InvalidChar { ch, pos } => {
                assert_eq!(ch, ' ');
                assert_eq!(pos, 2);
            }
            _ => panic!("expected InvalidChar"),
        }
    }

    #[test]
    fn empty_seq() {
        let seq = Sequence::new(Vec::new()).unwrap();
        assert!(seq.is_empty());
        assert_eq!(seq.len(), 0);
    }

    #[test]
    fn window_is_clamped() {
        let seq: Sequence = "ATGAAATAG".parse().unwrap();
        assert_eq!(seq.window(0, 3), b"ATG");
        assert_eq!(seq.window(6, 9), b"TAG");
        assert_eq!(seq.window(8, 12), b"G");
        assert_eq!(seq.window(12, 15), b"");
    }
}
