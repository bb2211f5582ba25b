//! CSV/TSV codec for sheets exported as plain text

use crate::codec::SpreadsheetCodec;
use crate::error::{MaxScoresError, Result};
use crate::model::{Cell, RawGrid, ScoreTable};

#[derive(Debug, Clone, Copy)]
pub struct CsvCodec {
    delimiter: u8,
}

impl Default for CsvCodec {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvCodec {
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl SpreadsheetCodec for CsvCodec {
    /// Every non-empty field becomes text; score coercion happens later.
    ///
    /// The csv reader skips blank lines; they are padded back so that line N
    /// is grid row N-1.
    fn parse(&self, bytes: &[u8]) -> Result<RawGrid> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(bytes);

        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| MaxScoresError::MalformedInput(e.to_string()))?;
            if let Some(line) = record.position().map(|p| p.line() as usize) {
                while rows.len() + 1 < line {
                    rows.push(Vec::new());
                }
            }
            rows.push(record.iter().map(Cell::from).collect());
        }
        Ok(RawGrid::new(rows))
    }

    fn serialize(&self, table: &ScoreTable, _sheet_name: &str) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());

        writer.write_record(&table.headers)?;
        for cells in table.cell_rows() {
            writer.write_record(cells.iter().map(|c| c.to_string()))?;
        }

        writer
            .into_inner()
            .map_err(|e| MaxScoresError::Io(e.into_error()))
    }

    fn extension(&self) -> &'static str {
        if self.delimiter == b'\t' {
            "tsv"
        } else {
            "csv"
        }
    }

    fn mime_type(&self) -> &'static str {
        if self.delimiter == b'\t' {
            "text/tab-separated-values"
        } else {
            "text/csv"
        }
    }
}
