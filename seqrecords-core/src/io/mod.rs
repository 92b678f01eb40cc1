//! Loading sequence records from FASTA, FASTQ and CSV input.

pub mod csv;
pub mod detect;
pub mod fasta;
pub mod fastq;

pub use self::csv::{ColumnSel, CsvColumns};
pub use detect::{detect_format, SeqFormat};

use crate::error::{SeqError, SeqResult};
use crate::seq::record::SeqRecord;
use crate::seq::traits::SeqBytes;

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OnError {
    #[default]
    Raise,
    Skip,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedRecord {
    pub row: usize,
    pub id: Option<Box<str>>,
    pub column: Box<str>,
    pub message: Box<str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadReport<T> {
    pub data: T,
    pub skipped: Vec<SkippedRecord>,
}

/// Anything able to produce an ordered list of sequence records.
pub trait SequenceSource {
    fn load<S: SeqBytes>(&self) -> SeqResult<Vec<SeqRecord<S>>>;
}

impl<T: SequenceSource> SequenceSource for &T {
    fn load<S: SeqBytes>(&self) -> SeqResult<Vec<SeqRecord<S>>> {
        (**self).load()
    }
}

/// Records stored in a file of a known format.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
    format: SeqFormat,
    csv: CsvColumns,
    on_error: OnError,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, format: SeqFormat) -> Self {
        Self {
            path: path.into(),
            format,
            csv: CsvColumns::default(),
            on_error: OnError::Raise,
        }
    }

    /// Pick the format from the file extension, falling back to the first
    /// non-blank byte of the file.
    pub fn detect(path: impl Into<PathBuf>) -> SeqResult<Self> {
        let path = path.into();
        let format = match SeqFormat::from_path(&path) {
            Some(format) => format,
            None => {
                let mut head = Vec::with_capacity(512);
                open_source(&path)?.take(512).read_to_end(&mut head)?;
                detect_format(&head)
            }
        };
        Ok(Self::new(path, format))
    }

    pub fn with_csv_columns(mut self, columns: CsvColumns) -> Self {
        self.csv = columns;
        self
    }

    pub fn with_on_error(mut self, on_error: OnError) -> Self {
        self.on_error = on_error;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> SeqFormat {
        self.format
    }
}

impl SequenceSource for FileSource {
    fn load<S: SeqBytes>(&self) -> SeqResult<Vec<SeqRecord<S>>> {
        let records = match self.format {
            SeqFormat::Fasta => fasta::read_fasta_records_from_path(&self.path)?,
            SeqFormat::Fastq => fastq::read_fastq_records_from_path(&self.path)?,
            SeqFormat::Csv => {
                let report = csv::read_csv(&self.path, &self.csv, self.on_error)?;
                log_skipped(&report.skipped);
                report.data
            }
        };
        debug!(
            path = %self.path.display(),
            format = %self.format,
            records = records.len(),
            "loaded sequence records"
        );
        Ok(records)
    }
}

/// Records held in memory, e.g. embedded test data or stdin contents.
#[derive(Clone, Debug)]
pub struct BytesSource<'a> {
    data: &'a [u8],
    format: SeqFormat,
    csv: CsvColumns,
    on_error: OnError,
}

impl<'a> BytesSource<'a> {
    pub fn new(data: &'a [u8], format: SeqFormat) -> Self {
        Self {
            data,
            format,
            csv: CsvColumns::default(),
            on_error: OnError::Raise,
        }
    }

    /// Sniff the format from the content itself.
    pub fn detect(data: &'a [u8]) -> Self {
        Self::new(data, detect_format(data))
    }

    pub fn with_csv_columns(mut self, columns: CsvColumns) -> Self {
        self.csv = columns;
        self
    }

    pub fn with_on_error(mut self, on_error: OnError) -> Self {
        self.on_error = on_error;
        self
    }
}

impl SequenceSource for BytesSource<'_> {
    fn load<S: SeqBytes>(&self) -> SeqResult<Vec<SeqRecord<S>>> {
        match self.format {
            SeqFormat::Fasta => fasta::read_fasta_records_from_bytes(self.data),
            SeqFormat::Fastq => fastq::read_fastq_records_from_bytes(self.data),
            SeqFormat::Csv => {
                let report = csv::read_csv_from_reader(
                    Cursor::new(self.data),
                    "<memory>",
                    &self.csv,
                    self.on_error,
                )?;
                log_skipped(&report.skipped);
                Ok(report.data)
            }
        }
    }
}

fn log_skipped(skipped: &[SkippedRecord]) {
    for record in skipped {
        warn!(row = record.row, id = ?record.id, "{}", record.message);
    }
}

/// Open `path` for buffered reading; a missing file is a
/// [`SeqError::SourceNotFound`].
pub(crate) fn open_source(path: &Path) -> SeqResult<BufReader<File>> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(SeqError::SourceNotFound {
            path: path.display().to_string(),
        }),
        Err(err) => Err(SeqError::Io(err)),
    }
}

pub fn normalize_seq_bytes(input: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    for b in input.bytes() {
        if !b.is_ascii_whitespace() {
            out.push(b);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seq::collection::SequenceCollection;
    use crate::seq::sequence::Sequence;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("seqrecords_{nanos}_{name}"));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_file_is_source_not_found() {
        let source = FileSource::new("/definitely/not/here.fasta", SeqFormat::Fasta);
        let err = source.load::<Sequence>().unwrap_err();
        assert!(err.is_source_error());
        match err {
            SeqError::SourceNotFound { path } => assert!(path.ends_with("here.fasta")),
            other => panic!("expected source not found, got {other:?}"),
        }
    }

    #[test]
    fn load_fasta_file_into_collection() {
        let path = write_temp("load.fa", ">a first\nATGAAA\nTAG\n>b\nAC\n");
        let source = FileSource::detect(&path).unwrap();
        assert_eq!(source.format(), SeqFormat::Fasta);
        let collection = SequenceCollection::<Sequence>::from_source(&source).unwrap();
        assert_eq!(collection.ids().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(collection.get_by_id("a").unwrap().desc(), Some("first"));
    }

    #[test]
    fn detect_by_content_without_extension() {
        let path = write_temp("reads", "@r1\nACGT\n+\nIIII\n");
        let source = FileSource::detect(&path).unwrap();
        assert_eq!(source.format(), SeqFormat::Fastq);
        let records = source.load::<Sequence>().unwrap();
        assert_eq!(records[0].seq().as_bytes(), b"ACGT");
    }

    #[test]
    fn csv_file_with_custom_columns() {
        let path = write_temp("table.csv", "name,dna\ns1,ACGT\ns2,A C\n");
        let source = FileSource::new(&path, SeqFormat::Csv).with_csv_columns(CsvColumns::new(
            ColumnSel::Name("name".to_string()),
            ColumnSel::Name("dna".to_string()),
        ));
        let records = source.load::<Sequence>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].seq().as_bytes(), b"AC");
    }

    #[test]
    fn bytes_source_detects_format() {
        let source = BytesSource::detect(b">x\nATG\n>y\nATGC\n");
        let collection = SequenceCollection::<Sequence>::from_source(&source).unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.longest().unwrap()[0].id(), "y");
    }

    #[test]
    fn bytes_source_csv_skip() {
        let source = BytesSource::new(b"id,seq\na,ACGT\nb,AC\x01\n", SeqFormat::Csv)
            .with_on_error(OnError::Skip);
        let records = source.load::<Sequence>().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), "a");
    }

    #[test]
    fn format_errors_pass_through() {
        let source = BytesSource::new(b"ACGT\n>x\nAC\n", SeqFormat::Fasta);
        let err = SequenceCollection::<Sequence>::from_source(&source).unwrap_err();
        assert!(matches!(err, SeqError::FastaFormat { .. }));
    }

    #[test]
    fn normalize_strips_whitespace() {
        assert_eq!(normalize_seq_bytes(" AC\tG T\n"), b"ACGT".to_vec());
    }
}
