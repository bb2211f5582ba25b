use crate::error::{MaxScoresError, Result};
use crate::model::{Cell, RawGrid};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

/// Read the first worksheet of a workbook (xlsx, xlsm, xlsb, xls or ods).
///
/// calamine trims leading empty rows and columns from the range; they are
/// padded back so grid indices match sheet positions.
pub fn read_first_sheet(bytes: &[u8]) -> Result<RawGrid> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| MaxScoresError::MalformedInput(format!("not a readable workbook: {}", e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| MaxScoresError::MalformedInput("workbook has no worksheets".to_string()))?;

    let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
        MaxScoresError::MalformedInput(format!("cannot read worksheet '{}': {}", sheet_name, e))
    })?;

    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); start_row as usize];

    for row in range.rows() {
        let mut cells = vec![Cell::Empty; start_col as usize];
        cells.extend(row.iter().map(data_to_cell));
        rows.push(cells);
    }

    log::debug!(
        "Read {} rows from worksheet '{}'",
        rows.len(),
        sheet_name
    );
    Ok(RawGrid::new(rows))
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::from(s.as_str()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => {
            log::debug!("Treating cell error {} as empty", e);
            Cell::Empty
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_malformed_input() {
        let err = read_first_sheet(b"definitely not a workbook").unwrap_err();
        assert!(matches!(err, MaxScoresError::MalformedInput(_)));
    }

    #[test]
    fn test_data_to_cell() {
        assert_eq!(data_to_cell(&Data::Int(4)), Cell::Number(4.0));
        assert_eq!(data_to_cell(&Data::String(String::new())), Cell::Empty);
        assert_eq!(
            data_to_cell(&Data::String("1BY21CS001".to_string())),
            Cell::text("1BY21CS001")
        );
    }
}
