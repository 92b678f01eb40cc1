use bit_set::BitSet;
use std::borrow::Borrow;
use std::sync::LazyLock;

#[derive(Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Alphabet {
    pub symbols: BitSet,
}

impl Alphabet {
    pub fn new<C, T>(symbols: T) -> Self
    where
        C: Borrow<u8>,
        T: IntoIterator<Item = C>,
    {
        let mut s = BitSet::new();
        s.extend(symbols.into_iter().map(|c| *c.borrow() as usize));

        Alphabet { symbols: s }
    }

    pub fn insert(&mut self, a: u8) {
        self.symbols.insert(a as usize);
    }

    #[inline]
    pub fn contains(&self, a: u8) -> bool {
        self.symbols.contains(a as usize)
    }

    pub fn is_word<C, T>(&self, text: T) -> bool
    where
        C: Borrow<u8>,
        T: IntoIterator<Item = C>,
    {
        text.into_iter().all(|c| self.contains(*c.borrow()))
    }

    /// Position and value of the first byte of `text` outside the alphabet.
    pub fn first_foreign(&self, text: &[u8]) -> Option<(usize, u8)> {
        text.iter()
            .enumerate()
            .find(|&(_, &b)| !self.contains(b))
            .map(|(pos, &b)| (pos, b))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

static SYMBOLS: LazyLock<Alphabet> = LazyLock::new(|| Alphabet::new(0x21u8..=0x7e));

/// Every printable, non-whitespace ASCII byte.
///
/// Nucleotides, IUPAC ambiguity codes and gap characters (`-`, `.`) are all
/// ordinary members; no symbol is given special meaning.
pub fn symbols() -> &'static Alphabet {
    &SYMBOLS
}
