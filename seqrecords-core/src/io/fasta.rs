use crate::error::{SeqError, SeqResult};
use crate::io::open_source;
use crate::seq::record::SeqRecord;
use crate::seq::traits::SeqBytes;
use std::io::{BufRead, BufReader, Cursor};
use std::marker::PhantomData;
use std::path::Path;

/// Streaming FASTA parser yielding one record per `>` header.
pub struct FastaRecords<R, S> {
    reader: R,
    line_no: usize,
    pending_header: Option<(String, usize)>,
    buf_line: String,
    seq_buf: Vec<u8>,
    _marker: PhantomData<S>,
}

impl<R: BufRead, S: SeqBytes> FastaRecords<R, S> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            pending_header: None,
            buf_line: String::new(),
            seq_buf: Vec::new(),
            _marker: PhantomData,
        }
    }

    fn next_header(&mut self) -> Option<SeqResult<(String, usize)>> {
        if let Some(pending) = self.pending_header.take() {
            return Some(Ok(pending));
        }

        loop {
            self.buf_line.clear();
            match self.reader.read_line(&mut self.buf_line) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_no += 1;
                    if self.buf_line.starts_with('>') {
                        return Some(Ok((self.buf_line.clone(), self.line_no)));
                    }
                    if self.buf_line.trim().is_empty() {
                        continue;
                    }
                    return Some(Err(SeqError::FastaFormat {
                        msg: "expected header line starting with '>'",
                        line: self.line_no,
                    }));
                }
                Err(err) => return Some(Err(SeqError::Io(err))),
            }
        }
    }

    fn read_sequence_lines(&mut self) -> SeqResult<Vec<u8>> {
        self.seq_buf.clear();
        loop {
            self.buf_line.clear();
            if self.reader.read_line(&mut self.buf_line)? == 0 {
                break;
            }
            self.line_no += 1;
            if self.buf_line.starts_with('>') {
                self.pending_header = Some((self.buf_line.clone(), self.line_no));
                break;
            }
            self.seq_buf.extend(
                self.buf_line
                    .bytes()
                    .filter(|b| !b.is_ascii_whitespace()),
            );
        }
        Ok(std::mem::take(&mut self.seq_buf))
    }
}

impl<R: BufRead, S: SeqBytes> Iterator for FastaRecords<R, S> {
    type Item = SeqResult<SeqRecord<S>>;

    fn next(&mut self) -> Option<Self::Item> {
        let (header_line, header_line_no) = match self.next_header()? {
            Ok(header) => header,
            Err(err) => return Some(Err(err)),
        };

        let record = parse_header(&header_line, header_line_no).and_then(|(id, desc)| {
            let seq = S::from_bytes(self.read_sequence_lines()?)?;
            Ok(SeqRecord { id, desc, seq })
        });
        Some(record)
    }
}

pub fn fasta_records_from_reader<R: BufRead, S: SeqBytes>(reader: R) -> FastaRecords<R, S> {
    FastaRecords::new(reader)
}

pub fn read_fasta_records_from_reader<R: BufRead, S: SeqBytes>(
    reader: R,
) -> SeqResult<Vec<SeqRecord<S>>> {
    fasta_records_from_reader(reader).collect()
}

pub fn read_fasta_records_from_path<S: SeqBytes>(
    path: impl AsRef<Path>,
) -> SeqResult<Vec<SeqRecord<S>>> {
    read_fasta_records_from_reader(open_source(path.as_ref())?)
}

pub fn read_fasta_records_from_bytes<S: SeqBytes>(data: &[u8]) -> SeqResult<Vec<SeqRecord<S>>> {
    read_fasta_records_from_reader(BufReader::new(Cursor::new(data)))
}

fn parse_header(header_line: &str, line_no: usize) -> SeqResult<(Box<str>, Option<Box<str>>)> {
    let header = header_line.strip_prefix('>').ok_or(SeqError::FastaFormat {
        msg: "expected header line starting with '>'",
        line: line_no,
    })?;

    let header = header.trim_end_matches(&['\n', '\r'][..]).trim_start();
    if header.is_empty() {
        return Err(SeqError::FastaFormat {
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
