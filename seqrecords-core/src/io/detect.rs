/// Input format selection for sequence sources.
///
/// Rules (deterministic):
/// - Explicit names: `fasta|fa|fna`, `fastq|fq`, `csv` (case-insensitive)
/// - By path: the same names as file extensions
/// - By content: first non-blank byte `>` → FASTA, `@` → FASTQ, else CSV
use crate::error::SeqError;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SeqFormat {
    Fasta,
    Fastq,
    Csv,
}

impl SeqFormat {
    /// Format implied by the file extension, if it is a known one.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        ext.parse().ok()
    }

    pub fn name(self) -> &'static str {
        match self {
            SeqFormat::Fasta => "fasta",
            SeqFormat::Fastq => "fastq",
            SeqFormat::Csv => "csv",
        }
    }
}

impl FromStr for SeqFormat {
    type Err = SeqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fasta" | "fa" | "fna" => Ok(SeqFormat::Fasta),
            "fastq" | "fq" => Ok(SeqFormat::Fastq),
            "csv" => Ok(SeqFormat::Csv),
            _ => Err(SeqError::UnknownFormat {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SeqFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sniff the format from the leading content of a file.
pub fn detect_format(bytes: &[u8]) -> SeqFormat {
    match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'>') => SeqFormat::Fasta,
        Some(b'@') => SeqFormat::Fastq,
        _ => SeqFormat::Csv,
    }
}
