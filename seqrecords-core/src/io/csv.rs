use crate::error::{SeqError, SeqResult};
use crate::io::{normalize_seq_bytes, open_source, OnError, ReadReport, SkippedRecord};
use crate::seq::record::SeqRecord;
use crate::seq::traits::SeqBytes;
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColumnSel {
    Name(String),
    Index(usize),
}

impl ColumnSel {
    fn label(&self) -> String {
        match self {
            ColumnSel::Name(name) => name.clone(),
            ColumnSel::Index(index) => format!("#{index}"),
        }
    }

    fn resolve(&self, headers: &StringRecord, path: &str) -> SeqResult<usize> {
        match self {
            ColumnSel::Name(name) => headers.iter().position(|h| h == name).ok_or_else(|| {
                SeqError::CsvMissingColumn {
                    name: name.clone(),
                    headers: headers.iter().map(|s| s.to_string()).collect(),
                    path: path.to_string(),
                }
            }),
            ColumnSel::Index(index) if *index < headers.len() => Ok(*index),
            ColumnSel::Index(index) => Err(SeqError::CsvColumnIndexOutOfRange {
                index: *index,
                ncols: headers.len(),
                path: path.to_string(),
            }),
        }
    }
}

/// Which columns hold the identifier, sequence and optional description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvColumns {
    pub id: ColumnSel,
    pub seq: ColumnSel,
    pub desc: Option<ColumnSel>,
}

impl CsvColumns {
    pub fn new(id: ColumnSel, seq: ColumnSel) -> Self {
        Self {
            id,
            seq,
            desc: None,
        }
    }

    pub fn with_desc(mut self, desc: ColumnSel) -> Self {
        self.desc = Some(desc);
        self
    }
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self::new(
            ColumnSel::Name("id".to_string()),
            ColumnSel::Name("seq".to_string()),
        )
    }
}

pub fn csv_columns(path: impl AsRef<Path>) -> SeqResult<Vec<String>> {
    let path_ref = path.as_ref();
    let path_str = path_ref.display().to_string();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(open_source(path_ref)?);
    let headers = reader.headers().map_err(|e| SeqError::CsvParse {
        path: path_str,
        source: e,
    })?;
    Ok(headers.iter().map(|s| s.to_string()).collect())
}

pub fn read_csv<S: SeqBytes>(
    path: impl AsRef<Path>,
    columns: &CsvColumns,
    on_error: OnError,
) -> SeqResult<ReadReport<Vec<SeqRecord<S>>>> {
    let path_ref = path.as_ref();
    let file = open_source(path_ref)?;
    read_csv_from_reader(file, &path_ref.display().to_string(), columns, on_error)
}

/// Parse headered CSV from any reader; `label` names the input in errors.
pub fn read_csv_from_reader<R: Read, S: SeqBytes>(
    reader: R,
    label: &str,
    columns: &CsvColumns,
    on_error: OnError,
) -> SeqResult<ReadReport<Vec<SeqRecord<S>>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| SeqError::CsvParse {
            path: label.to_string(),
            source: e,
        })?
        .clone();
    let id_idx = columns.id.resolve(&headers, label)?;
    let seq_idx = columns.seq.resolve(&headers, label)?;
    let desc = columns
        .desc
        .as_ref()
        .map(|sel| sel.resolve(&headers, label).map(|idx| (sel, idx)))
        .transpose()?;

    let mut data = Vec::new();
    let mut skipped = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| SeqError::CsvParse {
            path: label.to_string(),
            source: e,
        })?;
        let row = row_idx + 1;

        let id_value = field(&record, label, id_idx, &columns.id, row)?;
        let seq_field = field(&record, label, seq_idx, &columns.seq, row)?;
        let seq = match S::from_bytes(normalize_seq_bytes(seq_field)) {
            Ok(seq) => seq,
            Err(err) => match on_error {
                OnError::Raise => {
                    return Err(SeqError::CsvInvalidSequence {
                        row,
                        column: columns.seq.label(),
                        path: label.to_string(),
                        source: Box::new(err),
                    });
                }
                OnError::Skip => {
                    let message = format!(
                        "invalid sequence at row {row}, column {}: {err}",
                        columns.seq.label()
                    );
                    skipped.push(SkippedRecord {
                        row,
                        id: (!id_value.is_empty()).then(|| id_value.into()),
                        column: columns.seq.label().into_boxed_str(),
                        message: message.into_boxed_str(),
                    });
                    continue;
                }
            },
        };

        let mut seq_record = SeqRecord::new(id_value, seq);
        if let Some((sel, idx)) = desc {
            let value = field(&record, label, idx, sel, row)?;
            if !value.is_empty() {
                seq_record = seq_record.with_desc(value);
            }
        }
        data.push(seq_record);
    }

    Ok(ReadReport { data, skipped })
}

fn field<'r>(
    record: &'r StringRecord,
    label: &str,
    idx: usize,
    sel: &ColumnSel,
    row: usize,
) -> SeqResult<&'r str> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| SeqError::CsvMissingField {
            row,
            column: sel.label(),
            path: label.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::seq::sequence::Sequence;

    fn write_temp_csv(contents: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("seqrecords_csv_test_{nanos}.csv"));
        fs::write(&path, contents).unwrap();
        path
    }

    fn read_str(
        contents: &str,
        columns: &CsvColumns,
        on_error: OnError,
    ) -> SeqResult<ReadReport<Vec<SeqRecord<Sequence>>>> {
        read_csv_from_reader(Cursor::new(contents.as_bytes()), "<test>", columns, on_error)
    }

    #[test]
    fn read_csv_basic() {
        let path = write_temp_csv("id,seq,desc\ns1,ACGT,first\ns2,TT,");
        let columns = CsvColumns::default().with_desc(ColumnSel::Name("desc".to_string()));
        let report = read_csv::<Sequence>(&path, &columns, OnError::Raise).unwrap();
        assert_eq!(report.data.len(), 2);
        assert_eq!(report.data[0].id(), "s1");
        assert_eq!(report.data[0].desc(), Some("first"));
        assert_eq!(report.data[0].seq().as_bytes(), b"ACGT");
        assert_eq!(report.data[1].desc(), None);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn header_names() {
        let path = write_temp_csv("name,dna,notes\n");
        assert_eq!(csv_columns(&path).unwrap(), vec!["name", "dna", "notes"]);
    }

    #[test]
    fn missing_file() {
        let err = read_csv::<Sequence>("/no/such/table.csv", &CsvColumns::default(), OnError::Raise)
            .unwrap_err();
        assert!(matches!(err, SeqError::SourceNotFound { .. }));
    }

    #[test]
    fn missing_column_name() {
        let columns = CsvColumns::new(
            ColumnSel::Name("id".to_string()),
            ColumnSel::Name("missing".to_string()),
        );
        let err = read_str("id,seq\ns1,ACGT\n", &columns, OnError::Raise).unwrap_err();
        match err {
            SeqError::CsvMissingColumn { name, headers, .. } => {
                assert_eq!(name, "missing");
                assert_eq!(headers, vec!["id", "seq"]);
            }
            other => panic!("expected missing column error, got {other:?}"),
        }
    }

    #[test]
    fn column_index_out_of_range() {
        let columns = CsvColumns::new(ColumnSel::Index(0), ColumnSel::Index(5));
        let err = read_str("id,seq\ns1,ACGT\n", &columns, OnError::Raise).unwrap_err();
        match err {
            SeqError::CsvColumnIndexOutOfRange { index, ncols, .. } => {
                assert_eq!((index, ncols), (5, 2));
            }
            other => panic!("expected column index error, got {other:?}"),
        }
    }

    #[test]
    fn columns_by_index() {
        let columns = CsvColumns::new(ColumnSel::Index(1), ColumnSel::Index(0));
        let report = read_str("seq,id\nAC GT,s1\n", &columns, OnError::Raise).unwrap();
        assert_eq!(report.data[0].id(), "s1");
        assert_eq!(report.data[0].seq().as_bytes(), b"ACGT");
    }

    #[test]
    fn invalid_sequence_char() {
        let err = read_str("id,seq\ns1,AC\x01\n", &CsvColumns::default(), OnError::Raise)
            .unwrap_err();
        match err {
            SeqError::CsvInvalidSequence { row, source, .. } => {
                assert_eq!(row, 1);
                assert!(matches!(*source, SeqError::InvalidChar { .. }));
            }
            other => panic!("expected invalid sequence error, got {other:?}"),
        }
    }

    #[test]
    fn missing_field_error() {
        let columns = CsvColumns::default().with_desc(ColumnSel::Name("desc".to_string()));
        let err = read_str("id,seq,desc\ns1,ACGT\n", &columns, OnError::Raise).unwrap_err();
        match err {
            SeqError::CsvMissingField { column, .. } => assert_eq!(column, "desc"),
            other => panic!("expected missing field error, got {other:?}"),
        }
    }

    #[test]
    fn skip_invalid_sequence() {
        let report = read_str(
            "id,seq\ns1,ACGT\ns2,AC\x01\ns3,TT\n",
            &CsvColumns::default(),
            OnError::Skip,
        )
        .unwrap();
        assert_eq!(report.data.len(), 2);
        assert_eq!(report.data[1].id(), "s3");
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].row, 2);
        assert_eq!(report.skipped[0].id.as_deref(), Some("s2"));
        assert!(report.skipped[0].message.contains("invalid sequence"));
    }
}
