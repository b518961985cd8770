//! Lazy reader for comma-separated transaction files.
//!
//! The expected layout is a header line followed by `title,type,value,category`
//! rows. The header is always skipped, whatever it contains. Fields are
//! trimmed and rows with a missing or empty field are dropped silently.

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// One kept row, every field trimmed and non-empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// 1-based line in the source file.
    pub line: u64,
    pub title: String,
    pub kind: String,
    pub value: String,
    pub category: String,
}

impl RawRow {
    fn from_record(record: &StringRecord, line: u64) -> Option<Self> {
        let mut fields = record.iter().map(str::trim);
        let mut next = || fields.next().filter(|field| !field.is_empty());
        let title = next()?.to_string();
        let kind = next()?.to_string();
        let value = next()?.to_string();
        let category = next()?.to_string();
        Some(Self {
            line,
            title,
            kind,
            value,
            category,
        })
    }
}

/// Pull-based sequence of [`RawRow`]s. Single pass: once it returns `None`
/// or an error, it is exhausted.
pub struct RowReader {
    path: PathBuf,
    records: StringRecordsIntoIter<File>,
    done: bool,
}

/// Opens `path` for streaming. Nothing beyond the open happens until the
/// returned iterator is polled.
pub fn read_rows(path: impl AsRef<Path>) -> ResultEngine<RowReader> {
    let path = path.as_ref();
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|err| EngineError::FileRead(format!("{}: {err}", path.display())))?;

    Ok(RowReader {
        path: path.to_path_buf(),
        records: reader.into_records(),
        done: false,
    })
}

impl Iterator for RowReader {
    type Item = ResultEngine<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let record = match self.records.next() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(EngineError::FileRead(format!(
                        "{}: {err}",
                        self.path.display()
                    ))));
                }
                Some(Ok(record)) => record,
            };

            let line = record.position().map_or(0, |pos| pos.line());
            match RawRow::from_record(&record, line) {
                Some(row) => return Some(Ok(row)),
                None => tracing::debug!(line, "dropping incomplete row"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn file_with(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn skips_header_and_trims_fields() {
        let file = file_with(
            "title, type, value, category\n  Salary , income,5000 ,Job\nBus,outcome, 3.5,  Transport \n",
        );
        let rows: Vec<RawRow> = read_rows(file.path())
            .unwrap()
            .collect::<ResultEngine<_>>()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            RawRow {
                line: 2,
                title: "Salary".to_string(),
                kind: "income".to_string(),
                value: "5000".to_string(),
                category: "Job".to_string(),
            }
        );
        assert_eq!(rows[1].value, "3.5");
        assert_eq!(rows[1].category, "Transport");
        assert_eq!(rows[1].line, 3);
    }

    #[test]
    fn header_is_skipped_even_when_it_looks_like_data() {
        let file = file_with("Coffee,outcome,2,Food\nTea,outcome,1,Food\n");
        let rows: Vec<RawRow> = read_rows(file.path())
            .unwrap()
            .collect::<ResultEngine<_>>()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Tea");
    }

    #[test]
    fn drops_rows_with_empty_or_missing_fields() {
        let file = file_with(
            "title,type,value,category\nGift,income,,Misc\n ,income,1,Misc\nShort,income,1\nOk,income,1,Misc\nBlank,income,1,   \n",
        );
        let rows: Vec<RawRow> = read_rows(file.path())
            .unwrap()
            .collect::<ResultEngine<_>>()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Ok");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let file = file_with("h\nRent,outcome,900,Home,note\n");
        let rows: Vec<RawRow> = read_rows(file.path())
            .unwrap()
            .collect::<ResultEngine<_>>()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "Home");
    }

    #[test]
    fn header_only_file_yields_nothing() {
        let file = file_with("title,type,value,category\n");
        assert_eq!(read_rows(file.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_rows(dir.path().join("nope.csv"));
        assert!(matches!(result, Err(EngineError::FileRead(_))));
    }

    #[test]
    fn invalid_utf8_surfaces_once_then_stops() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"title,type,value,category\nOk,income,1,Misc\nBad,income,1,\xff\xfe\n")
            .unwrap();

        let mut rows = read_rows(file.path()).unwrap();
        assert!(matches!(rows.next(), Some(Ok(_))));
        assert!(matches!(rows.next(), Some(Err(EngineError::FileRead(_)))));
        assert!(rows.next().is_none());
    }
}
