use crate::error::{SeqError, SeqResult};
use crate::io::open_source;
use crate::seq::record::SeqRecord;
use crate::seq::traits::SeqBytes;
use std::io::{BufRead, BufReader, Cursor};
use std::marker::PhantomData;
use std::path::Path;

/// Streaming FASTQ parser over four-line records.
///
/// Quality strings are checked against the sequence length and then dropped;
/// only identifiers, descriptions and sequences are kept.
pub struct FastqRecords<R, S> {
    reader: R,
    line_no: usize,
    buf_line: String,
    _marker: PhantomData<S>,
}

impl<R: BufRead, S: SeqBytes> FastqRecords<R, S> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf_line: String::new(),
            _marker: PhantomData,
        }
    }

    fn next_line(&mut self) -> SeqResult<Option<(String, usize)>> {
        self.buf_line.clear();
        if self.reader.read_line(&mut self.buf_line)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        Ok(Some((std::mem::take(&mut self.buf_line), self.line_no)))
    }

    fn next_nonempty_line(&mut self) -> SeqResult<Option<(String, usize)>> {
        while let Some((line, line_no)) = self.next_line()? {
            if !line.trim().is_empty() {
                return Ok(Some((line, line_no)));
            }
        }
        Ok(None)
    }

    fn read_required_line(&mut self, msg: &'static str) -> SeqResult<(String, usize)> {
        let line = self.line_no + 1;
        self.next_line()?
            .ok_or(SeqError::FastqFormat { msg, line })
    }

    fn read_record(&mut self, header_line: &str, header_line_no: usize) -> SeqResult<SeqRecord<S>> {
        let (id, desc) = parse_header(header_line, header_line_no)?;

        let (seq_line, _) = self.read_required_line("missing sequence line")?;
        let (plus_line, plus_line_no) = self.read_required_line("missing '+' separator line")?;
        if !plus_line.starts_with('+') {
            return Err(SeqError::FastqFormat {
                msg: "expected '+' separator line",
                line: plus_line_no,
            });
        }
        let (qual_line, qual_line_no) = self.read_required_line("missing quality line")?;

        let seq_line = trim_eol(&seq_line);
        if seq_line.len() != trim_eol(&qual_line).len() {
            return Err(SeqError::FastqFormat {
                msg: "sequence and quality lengths differ",
                line: qual_line_no,
            });
        }

        let seq = S::from_bytes(seq_line.as_bytes().to_vec())?;
        Ok(SeqRecord { id, desc, seq })
    }
}

impl<R: BufRead, S: SeqBytes> Iterator for FastqRecords<R, S> {
    type Item = SeqResult<SeqRecord<S>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_nonempty_line() {
            Ok(Some((header_line, header_line_no))) => {
                Some(self.read_record(&header_line, header_line_no))
            }
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

pub fn fastq_records_from_reader<R: BufRead, S: SeqBytes>(reader: R) -> FastqRecords<R, S> {
    FastqRecords::new(reader)
}

pub fn read_fastq_records_from_reader<R: BufRead, S: SeqBytes>(
    reader: R,
) -> SeqResult<Vec<SeqRecord<S>>> {
    fastq_records_from_reader(reader).collect()
}

pub fn read_fastq_records_from_path<S: SeqBytes>(
    path: impl AsRef<Path>,
) -> SeqResult<Vec<SeqRecord<S>>> {
    read_fastq_records_from_reader(open_source(path.as_ref())?)
}

pub fn read_fastq_records_from_bytes<S: SeqBytes>(data: &[u8]) -> SeqResult<Vec<SeqRecord<S>>> {
    read_fastq_records_from_reader(BufReader::new(Cursor::new(data)))
}

fn parse_header(header_line: &str, line_no: usize) -> SeqResult<(Box<str>, Option<Box<str>>)> {
    let header = header_line.strip_prefix('@').ok_or(SeqError::FastqFormat {
        msg: "expected header line starting with '@'",
        line: line_no,
    })?;

    let header = trim_eol(header).trim_start();
    if header.is_empty() {
        return Err(SeqError::FastqFormat {
            msg: "empty header",
            line: line_no,
        });
    }

    let (id, desc) = match header.find(char::is_whitespace) {
        Some(idx) => {
            let desc = header[idx..].trim();
            (&header[..idx], (!desc.is_empty()).then_some(desc))
        }
        None => (header, None),
    };

    Ok((id.into(), desc.map(Into::into)))
}

fn trim_eol(line: &str) -> &str {
    line.trim_end_matches(&['\n', '\r'][..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seq::sequence::Sequence;

    #[test]
    fn parse_single_record() {
        let data = b"@seq1\nACGT\n+\n!!!!\n";
        let records = read_fastq_records_from_bytes::<Sequence>(data).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), "seq1");
        assert_eq!(records[0].desc(), None);
        assert_eq!(records[0].seq().as_bytes(), b"ACGT");
    }

    #[test]
    fn header_with_description() {
        let data = b"@seq1 some desc here\nACGT\n+\nIIII\n";
        let records = read_fastq_records_from_bytes::<Sequence>(data).unwrap();
        assert_eq!(records[0].id(), "seq1");
        assert_eq!(records[0].desc(), Some("some desc here"));
    }

    #[test]
    fn multiple_records_with_blank_lines() {
        let data = b"@seq1\nAC\n+\n!!\n\n@seq2\nGT\r\n+seq2\r\n##\r\n";
        let records = read_fastq_records_from_bytes::<Sequence>(data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id(), "seq1");
        assert_eq!(records[1].id(), "seq2");
        assert_eq!(records[1].seq().as_bytes(), b"GT");
    }

    #[test]
    fn empty_sequence_allowed() {
        let data = b"@seq1\n\n+\n\n";
        let records = read_fastq_records_from_bytes::<Sequence>(data).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].seq().as_bytes(), b"");
    }

    #[test]
    fn invalid_header() {
        let data = b">seq1\nAC\n+\n!!\n";
        let err = read_fastq_records_from_bytes::<Sequence>(data).unwrap_err();
        match err {
            SeqError::FastqFormat { line, .. } => assert_eq!(line, 1),
            other => panic!("expected fastq format error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_plus_separator() {
        let data = b"@seq1\nAC\n-\n!!\n";
        let err = read_fastq_records_from_bytes::<Sequence>(data).unwrap_err();
        match err {
            SeqError::FastqFormat { line, .. } => assert_eq!(line, 3),
            other => panic!("expected fastq format error, got {other:?}"),
        }
    }

    #[test]
    fn truncated_record() {
        let err = read_fastq_records_from_bytes::<Sequence>(b"@seq1\nACGT\n+\n").unwrap_err();
        match err {
            SeqError::FastqFormat { msg, line } => {
                assert_eq!(msg, "missing quality line");
                assert_eq!(line, 4);
            }
            other => panic!("expected fastq format error, got {other:?}"),
        }
    }

    #[test]
    fn quality_length_mismatch() {
        let data = b"@seq1\nACGT\n+\n!!!\n";
        let err = read_fastq_records_from_bytes::<Sequence>(data).unwrap_err();
        match err {
            SeqError::FastqFormat { .. } => {}
            other => panic!("expected fastq format error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_sequence_char() {
        let data = b"@seq1\nAC\x01\n+\n!!!\n";
        let err = read_fastq_records_from_bytes::<Sequence>(data).unwrap_err();
        match err {
            SeqError::InvalidChar { .. } => {}
            other => panic!("expected invalid char error, got {other:?}"),
        }
    }
}
