//! Streaming CSV reader producing typed rows.
//!
//! The reader opens the header eagerly so callers can merge it into the
//! template schema before any data row is coerced. Rows are pulled one at a
//! time; nothing beyond the current record is buffered.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use csv::StringRecord;

use crate::error::Result;
use crate::row::Row;
use crate::schema::{Field, Schema};

/// Pull-based reader over a CSV byte stream.
pub struct TableReader<R: Read> {
    reader: csv::Reader<R>,
    header: Vec<String>,
    schema: Arc<Schema>,
    record: StringRecord,
    rows_read: usize,
    done: bool,
}

impl TableReader<File> {
    /// Open a CSV file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(File::open(path)?)
    }
}

impl<R: Read> TableReader<R> {
    /// Read the header row of `data`.
    ///
    /// Until `with_schema` is called every column is read as a string field.
    pub fn open(data: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(data);
        let header: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let schema = Arc::new(Schema::new(header.iter().map(Field::string).collect()));
        Ok(Self {
            reader,
            header,
            schema,
            record: StringRecord::new(),
            rows_read: 0,
            done: false,
        })
    }

    /// Header labels, trimmed, in file order.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Coerce subsequent rows against `schema`.
    ///
    /// Fields are matched to columns by position.
    pub fn with_schema(mut self, schema: Arc<Schema>) -> Self {
        self.schema = schema;
        self
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Number of data rows read so far.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Read the next data row, or `None` at end of input.
    pub fn read_row(&mut self) -> Result<Option<Row>> {
        if !self.reader.read_record(&mut self.record)? {
            return Ok(None);
        }
        self.rows_read += 1;
        Ok(Some(Row::from_record(
            self.rows_read,
            Arc::clone(&self.schema),
            self.record.iter(),
        )))
    }
}

impl<R: Read> Iterator for TableReader<R> {
    type Item = Result<Row>;

    /// Stops after the first decoding error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_row() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;
    use crate::value::Value;

    const CSV: &str = "siteID, count\nS1,3\nS2,\nS3,4,surplus\n";

    #[test]
    fn reads_header_and_rows() {
        let reader = TableReader::open(CSV.as_bytes()).unwrap();
        assert_eq!(reader.header(), &["siteID".to_string(), "count".to_string()]);

        let schema = Arc::new(Schema::new(vec![
            Field::string("siteID"),
            Field::new("count", FieldType::Integer),
        ]));
        let rows: Vec<Row> = reader
            .with_schema(schema)
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].number(), 1);
        assert_eq!(rows[0].get("count"), Some(&Value::Integer(3)));
        assert!(rows[1].is_blank("count"));
        assert_eq!(rows[2].errors().len(), 1);
    }

    #[test]
    fn empty_input_has_no_rows() {
        let mut reader = TableReader::open("a,b\n".as_bytes()).unwrap();
        assert!(reader.read_row().unwrap().is_none());
        assert_eq!(reader.rows_read(), 0);
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let bytes: &[u8] = b"a\n\xff\xfe\n";
        let results: Vec<_> = TableReader::open(bytes).unwrap().collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
