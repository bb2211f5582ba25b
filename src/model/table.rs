use super::cell::Cell;
use std::fmt;

/// Outcome of reducing one column for one student
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    /// Maximum of the numeric cells in the column
    Numeric(f64),
    /// No numeric cell; value chosen by the column fallback policy
    Fallback(Cell),
    /// No numeric cell and nothing to fall back on
    NoScore,
}

impl ColumnValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ColumnValue::Numeric(n) => Some(*n),
            ColumnValue::Fallback(Cell::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnValue::Numeric(_))
    }

    /// Cell written to the output sheet
    pub fn to_cell(&self) -> Cell {
        match self {
            ColumnValue::Numeric(n) => Cell::Number(*n),
            ColumnValue::Fallback(cell) => cell.clone(),
            ColumnValue::NoScore => Cell::Empty,
        }
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Numeric(n) => write!(f, "{}", n),
            ColumnValue::Fallback(cell) => write!(f, "{}", cell),
            ColumnValue::NoScore => write!(f, "-"),
        }
    }
}

/// One consolidated row per student
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub identifier: String,
    /// One value per retained column, aligned with `ScoreTable::score_headers`
    pub values: Vec<ColumnValue>,
}

impl OutputRow {
    pub fn value(&self, index: usize) -> Option<&ColumnValue> {
        self.values.get(index)
    }
}

/// Consolidated output: identifier column first, then retained columns
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    pub headers: Vec<String>,
    pub rows: Vec<OutputRow>,
}

impl ScoreTable {
    pub fn identifier_header(&self) -> &str {
        self.headers.first().map(String::as_str).unwrap_or("")
    }

    pub fn score_headers(&self) -> &[String] {
        self.headers.get(1..).unwrap_or(&[])
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.score_headers().iter().position(|h| h == header)
    }

    pub fn row(&self, identifier: &str) -> Option<&OutputRow> {
        self.rows.iter().find(|r| r.identifier == identifier)
    }

    /// Look up a value by identifier and column name
    pub fn get(&self, identifier: &str, header: &str) -> Option<&ColumnValue> {
        let col = self.column_index(header)?;
        self.row(identifier)?.value(col)
    }

    /// Output rows as plain cells, identifier first
    pub fn cell_rows(&self) -> impl Iterator<Item = Vec<Cell>> + '_ {
        self.rows.iter().map(|row| {
            std::iter::once(Cell::Text(row.identifier.clone()))
                .chain(row.values.iter().map(ColumnValue::to_cell))
                .collect()
        })
    }
}
