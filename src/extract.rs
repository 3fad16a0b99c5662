use std::io;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::info;

use crate::error::EtlError;
use crate::record::RawRecord;

/// Read the product catalog CSV into raw records.
///
/// A missing file is `SourceNotFound`; anything the CSV reader rejects
/// (bad UTF-8, ragged rows) is `SourceParse`. Both abort the run.
pub fn extract(path: &Path) -> Result<Vec<RawRecord>, EtlError> {
    if !path.is_file() {
        return Err(EtlError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }
    let rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Headers)
        .from_path(path)?;
    let rows = read_records(rdr)?;
    info!(rows = rows.len(), path = %path.display(), "extracted rows");
    Ok(rows)
}

fn read_records<R: io::Read>(mut rdr: csv::Reader<R>) -> Result<Vec<RawRecord>, EtlError> {
    let mut rows = Vec::new();
    for rec in rdr.deserialize() {
        let row: RawRecord = rec?;
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(text: &str) -> csv::Reader<Cursor<&str>> {
        ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::Headers)
            .from_reader(Cursor::new(text))
    }

    #[test]
    fn reads_rows_keyed_by_header() {
        let rows = read_records(reader("title,price\nShirt,19.99\nShorts,25\n")).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["title"], "Shirt");
        assert_eq!(rows[1]["price"], "25");
    }

    #[test]
    fn ragged_row_is_a_parse_error() {
        let err = read_records(reader("title,price\nShirt\n")).unwrap_err();
        assert!(matches!(err, EtlError::SourceParse(_)));
    }

    #[test]
    fn missing_file_is_source_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        let err = extract(&path).unwrap_err();
        assert!(matches!(err, EtlError::SourceNotFound { .. }));
    }
}
