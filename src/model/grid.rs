use super::cell::Cell;

static EMPTY_CELL: Cell = Cell::Empty;

/// Headerless, row-major grid of cells as read from the first worksheet.
///
/// Rows may be ragged; out-of-range lookups read as [`Cell::Empty`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGrid {
    rows: Vec<Vec<Cell>>,
}

impl RawGrid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of the widest row
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }
}

/// Where the header row and the identifier column were found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub header_row: usize,
    pub identifier_column: usize,
}

impl Layout {
    pub fn new(header_row: usize, identifier_column: usize) -> Self {
        Self {
            header_row,
            identifier_column,
        }
    }

    /// Index of the first row below the header
    pub fn first_data_row(&self) -> usize {
        self.header_row + 1
    }
}
