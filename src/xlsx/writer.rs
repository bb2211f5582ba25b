use crate::error::Result;
use crate::model::{Cell, ColumnValue, ScoreTable};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};

/// Default worksheet name for consolidated output
pub const DEFAULT_SHEET_NAME: &str = "Max Scores";

const MIN_COLUMN_WIDTH: usize = 8;
const MAX_COLUMN_WIDTH: usize = 40;

/// Write the score table to an in-memory `.xlsx` workbook
pub fn write_score_table(table: &ScoreTable, sheet_name: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let worksheet = workbook.add_worksheet();
    write_scores_sheet(worksheet, table)?;
    worksheet.set_name(sheet_name)?;

    Ok(workbook.save_to_buffer()?)
}

/// Write headers and one row per student
fn write_scores_sheet(sheet: &mut Worksheet, table: &ScoreTable) -> Result<()> {
    // Header format
    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border_bottom(FormatBorder::Thin);

    let center_format = Format::new().set_align(FormatAlign::Center);
    let left_format = Format::new().set_align(FormatAlign::Left);

    let widths = column_widths(table);
    for (col, header) in table.headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, header, &header_format)?;
        sheet.set_column_width(col as u16, widths[col] as f64)?;
    }

    for (row_idx, out_row) in table.rows.iter().enumerate() {
        let row = (row_idx + 1) as u32;

        sheet.write_string_with_format(row, 0, &out_row.identifier, &left_format)?;

        for (offset, value) in out_row.values.iter().enumerate() {
            let col = (offset + 1) as u16;
            match value {
                ColumnValue::Numeric(n) => {
                    sheet.write_number_with_format(row, col, *n, &center_format)?;
                }
                ColumnValue::Fallback(cell) => write_cell(sheet, row, col, cell, &left_format)?,
                // Left as an empty cell
                ColumnValue::NoScore => {}
            }
        }
    }

    sheet.set_freeze_panes(1, 1)?;

    Ok(())
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &Cell, format: &Format) -> Result<()> {
    match cell {
        Cell::Number(n) => {
            sheet.write_number_with_format(row, col, *n, format)?;
        }
        Cell::Bool(b) => {
            sheet.write_boolean_with_format(row, col, *b, format)?;
        }
        Cell::Text(s) if !s.is_empty() => {
            sheet.write_string_with_format(row, col, s, format)?;
        }
        _ => {}
    }
    Ok(())
}

/// Display width of every column, measured in one pass over the rows
fn column_widths(table: &ScoreTable) -> Vec<usize> {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();

    for row in &table.rows {
        if let Some(w) = widths.first_mut() {
            *w = (*w).max(row.identifier.chars().count());
        }
        for (offset, value) in row.values.iter().enumerate() {
            if let Some(w) = widths.get_mut(offset + 1) {
                *w = (*w).max(value.to_cell().to_string().chars().count());
            }
        }
    }

    widths
        .into_iter()
        .map(|w| (w + 2).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OutputRow;

    fn sample_table() -> ScoreTable {
        ScoreTable {
            headers: vec!["USN".to_string(), "Name".to_string(), "Q1".to_string()],
            rows: vec![OutputRow {
                identifier: "1BY21CS001".to_string(),
                values: vec![
                    ColumnValue::Fallback(Cell::text("A student with a rather long name")),
                    ColumnValue::Numeric(8.0),
                ],
            }],
        }
    }

    #[test]
    fn test_column_widths() {
        let table = sample_table();
        assert_eq!(column_widths(&table), vec![12, 35, MIN_COLUMN_WIDTH]);
    }

    #[test]
    fn test_column_widths_wide_table() {
        let headers: Vec<String> = std::iter::once("USN".to_string())
            .chain((1..=60).map(|q| format!("Q{}", q)))
            .collect();
        let rows = (0..500)
            .map(|i| OutputRow {
                identifier: format!("1BY21CS{:03}", i),
                values: (0..60).map(|q| ColumnValue::Numeric((q * i) as f64)).collect(),
            })
            .collect();
        let table = ScoreTable { headers, rows };

        let widths = column_widths(&table);
        assert_eq!(widths.len(), 61);
        assert_eq!(widths[0], 12);
        // 59 * 499 = 29441
        assert_eq!(widths[60], MIN_COLUMN_WIDTH);
    }

    #[test]
    fn test_write_score_table_produces_zip() {
        let bytes = write_score_table(&sample_table(), DEFAULT_SHEET_NAME).unwrap();
        // xlsx is a zip container
        assert_eq!(&bytes[..2], b"PK");
    }
}
