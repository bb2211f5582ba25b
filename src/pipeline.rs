//! One upload in, one consolidated workbook out

use crate::codec::SpreadsheetCodec;
use crate::detect::{header_names, DetectorConfig, LayoutDetector};
use crate::error::Result;
use crate::model::{Cell, Layout, RawGrid, ScoreTable};
use crate::pattern::IdentifierPattern;
use crate::reduce::{ReducerConfig, ScoreReducer};
use crate::xlsx::writer::DEFAULT_SHEET_NAME;
use std::path::Path;

/// Settings for a single consolidation run
#[derive(Debug, Clone)]
pub struct Options {
    pub pattern: IdentifierPattern,
    pub detector: DetectorConfig,
    pub reducer: ReducerConfig,
    pub sheet_name: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            pattern: IdentifierPattern::default(),
            detector: DetectorConfig::default(),
            reducer: ReducerConfig::default(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}

/// Detected layout plus the reduced table
#[derive(Debug, Clone)]
pub struct Consolidation {
    pub layout: Layout,
    /// Disambiguated names of every input column
    pub headers: Vec<String>,
    pub table: ScoreTable,
}

/// Serialized output ready to hand to the user
#[derive(Debug, Clone)]
pub struct Export {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: &'static str,
}

/// Split a grid into the header names and the rows below the header
pub fn split_at_header<'g>(grid: &'g RawGrid, layout: &Layout) -> (Vec<String>, &'g [Vec<Cell>]) {
    let header = grid.row(layout.header_row).unwrap_or(&[]);
    let headers = header_names(header, grid.width());
    let rows = grid.rows().get(layout.first_data_row()..).unwrap_or(&[]);
    (headers, rows)
}

/// Detect the layout and reduce to one row per student
pub fn consolidate(grid: &RawGrid, options: &Options) -> Result<Consolidation> {
    let layout = LayoutDetector::with_config(&options.pattern, options.detector.clone()).detect(grid)?;
    let (headers, rows) = split_at_header(grid, &layout);
    let table = ScoreReducer::new(&options.pattern, &options.reducer).reduce(&layout, &headers, rows)?;

    Ok(Consolidation {
        layout,
        headers,
        table,
    })
}

/// Parse, consolidate and serialize an uploaded sheet.
///
/// Any failure aborts the run; no partial output is produced.
pub fn process(
    bytes: &[u8],
    original_name: &str,
    input: &dyn SpreadsheetCodec,
    output: &dyn SpreadsheetCodec,
    options: &Options,
) -> Result<Export> {
    let grid = input.parse(bytes)?;
    let consolidation = consolidate(&grid, options)?;
    let bytes = output.serialize(&consolidation.table, &options.sheet_name)?;

    Ok(Export {
        bytes,
        filename: output_filename(original_name, output.extension()),
        mime_type: output.mime_type(),
    })
}

/// `maxscores_<base name>.<extension>`
pub fn output_filename(original_name: &str, extension: &str) -> String {
    let base = Path::new(original_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("sheet");
    format!("maxscores_{}.{}", base, extension)
}
