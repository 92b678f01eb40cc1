use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeqError {
    #[error("invalid character '{ch}' at position {pos}")]
    InvalidChar { ch: char, pos: usize },

    #[error("invalid location: start {start} is after end {end}")]
    InvalidLocation { start: usize, end: usize },

    #[error("invalid codon '{codon}' (expected {expected} printable symbols)")]
    InvalidCodon { codon: String, expected: usize },

    #[error("unsupported reading frame: {frame} (only forward frames 1, 2, or 3)")]
    UnsupportedFrame { frame: usize },

    #[error("collection is empty")]
    EmptyCollection,

    #[error("duplicate record identifier '{id}'")]
    DuplicateIdentifier { id: Box<str> },

    #[error("sequence source not found: {path}")]
    SourceNotFound { path: String },

    #[error("unknown sequence format '{name}' (expected fasta, fastq, or csv)")]
    UnknownFormat { name: String },

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("fasta format error at line {line}: {msg}")]
    FastaFormat { msg: &'static str, line: usize },

    #[error("fastq format error at line {line}: {msg}")]
    FastqFormat { msg: &'static str, line: usize },

    #[error("csv missing column '{name}' in {path}. headers: {headers:?}")]
    CsvMissingColumn {
        name: String,
        headers: Vec<String>,
        path: String,
    },

    #[error("csv column index {index} out of range (ncols={ncols}) in {path}")]
    CsvColumnIndexOutOfRange {
        index: usize,
        ncols: usize,
        path: String,
    },

    #[error("csv missing field at row {row} for column {column} in {path}")]
    CsvMissingField {
        row: usize,
        column: String,
        path: String,
    },

    #[error("csv invalid sequence at row {row} for column {column} in {path}: {source}")]
    CsvInvalidSequence {
        row: usize,
        column: String,
        path: String,
        #[source]
        source: Box<SeqError>,
    },

    #[error("csv parse error in {path}: {source}")]
    CsvParse {
        path: String,
        #[source]
        source: csv::Error,
    },
}

impl SeqError {
    /// True for errors raised by a [`SequenceSource`](crate::io::SequenceSource)
    /// rather than by the analyses themselves.
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            SeqError::SourceNotFound { .. }
                | SeqError::UnknownFormat { .. }
                | SeqError::Io(_)
                | SeqError::FastaFormat { .. }
                | SeqError::FastqFormat { .. }
                | SeqError::CsvMissingColumn { .. }
                | SeqError::CsvColumnIndexOutOfRange { .. }
                | SeqError::CsvMissingField { .. }
                | SeqError::CsvInvalidSequence { .. }
                | SeqError::CsvParse { .. }
        )
    }
}

pub type SeqResult<T> = Result<T, SeqError>;
