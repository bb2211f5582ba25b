//! Spreadsheet codec boundary

use crate::delimited::CsvCodec;
use crate::error::Result;
use crate::model::{RawGrid, ScoreTable};
use crate::xlsx::XlsxCodec;

/// Turns uploaded bytes into a grid and a score table back into bytes.
///
/// The consolidation core only ever sees this trait.
pub trait SpreadsheetCodec {
    /// Parse the first worksheet. Failures surface as `MalformedInput`.
    fn parse(&self, bytes: &[u8]) -> Result<RawGrid>;

    fn serialize(&self, table: &ScoreTable, sheet_name: &str) -> Result<Vec<u8>>;

    /// File extension of serialized output, without the dot
    fn extension(&self) -> &'static str;

    fn mime_type(&self) -> &'static str;
}

/// Pick a codec for a file extension (case-insensitive)
pub fn codec_for_extension(ext: &str) -> Option<Box<dyn SpreadsheetCodec>> {
    match ext.to_lowercase().as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Box::new(XlsxCodec)),
        "csv" => Some(Box::new(CsvCodec::default())),
        "tsv" => Some(Box::new(CsvCodec::with_delimiter(b'\t'))),
        _ => None,
    }
}
