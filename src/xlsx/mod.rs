pub mod reader;
pub mod writer;

pub use reader::read_first_sheet;
pub use writer::write_score_table;

use crate::codec::SpreadsheetCodec;
use crate::error::Result;
use crate::model::{RawGrid, ScoreTable};

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Reads any workbook calamine understands, writes `.xlsx`
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxCodec;

impl SpreadsheetCodec for XlsxCodec {
    fn parse(&self, bytes: &[u8]) -> Result<RawGrid> {
        read_first_sheet(bytes)
    }

    fn serialize(&self, table: &ScoreTable, sheet_name: &str) -> Result<Vec<u8>> {
        write_score_table(table, sheet_name)
    }

    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn mime_type(&self) -> &'static str {
        XLSX_MIME
    }
}
