//! Per-student max score reduction

use crate::error::{MaxScoresError, Result};
use crate::model::{Cell, ColumnValue, Layout, OutputRow, ScoreTable};
use crate::pattern::{default_exclusion, IdentifierPattern};
use regex::Regex;
use std::collections::HashMap;

/// What to emit for a column where no row of a student's group holds a number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fallback {
    /// The first row's original cell
    #[default]
    FirstSeen,
    /// The "no score" sentinel, written as an empty cell
    Blank,
    /// A literal 0
    Zero,
}

#[derive(Debug, Clone)]
pub struct ReducerConfig {
    /// Headers matching this are dropped from the output; `None` keeps every column
    pub exclude: Option<Regex>,
    pub fallback: Fallback,
}

impl Default for ReducerConfig {
    fn default() -> Self {
        Self {
            exclude: Some(default_exclusion()),
            fallback: Fallback::default(),
        }
    }
}

/// All rows sharing one normalized identifier, in sheet order
#[derive(Debug, Clone)]
pub struct Group<'r> {
    pub identifier: String,
    pub rows: Vec<&'r [Cell]>,
}

/// Admitted rows partitioned by identifier
#[derive(Debug, Clone, Default)]
pub struct Grouping<'r> {
    /// In order of each identifier's first appearance
    pub groups: Vec<Group<'r>>,
    pub admitted: usize,
    pub rejected: usize,
}

pub struct ScoreReducer<'a> {
    pattern: &'a IdentifierPattern,
    config: &'a ReducerConfig,
}

impl<'a> ScoreReducer<'a> {
    pub fn new(pattern: &'a IdentifierPattern, config: &'a ReducerConfig) -> Self {
        Self { pattern, config }
    }

    /// Reduce the rows below the header into one row per student.
    ///
    /// `headers` are the disambiguated column names; `rows` are every row below
    /// the header row.
    pub fn reduce(
        &self,
        layout: &Layout,
        headers: &[String],
        rows: &[Vec<Cell>],
    ) -> Result<ScoreTable> {
        let id_col = layout.identifier_column;
        let grouping = self.group_rows(layout, rows);

        if grouping.groups.is_empty() {
            return Err(MaxScoresError::NoRecordsFound {
                pattern: self.pattern.as_str().to_string(),
                column: column_name(headers, id_col),
                rows_examined: rows.len(),
            });
        }

        let retained = self.retained_columns(layout, headers);

        let mut out_headers = Vec::with_capacity(retained.len() + 1);
        out_headers.push(column_name(headers, id_col));
        out_headers.extend(retained.iter().map(|&col| column_name(headers, col)));

        let out_rows: Vec<OutputRow> = grouping
            .groups
            .iter()
            .map(|group| OutputRow {
                identifier: group.identifier.clone(),
                values: retained
                    .iter()
                    .map(|&col| self.reduce_column(&group.rows, col))
                    .collect(),
            })
            .collect();

        log::info!(
            "Reduced {} rows ({} rejected) to {} students over {} columns",
            grouping.admitted,
            grouping.rejected,
            out_rows.len(),
            retained.len()
        );

        Ok(ScoreTable {
            headers: out_headers,
            rows: out_rows,
        })
    }

    /// Admit rows whose identifier cell matches and group them by identifier
    pub fn group_rows<'r>(&self, layout: &Layout, rows: &'r [Vec<Cell>]) -> Grouping<'r> {
        let mut grouping = Grouping::default();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (offset, row) in rows.iter().enumerate() {
            let cell = row.get(layout.identifier_column).unwrap_or(&Cell::Empty);
            let Some(identifier) = self.pattern.identify_cell(cell) else {
                if !row.iter().all(Cell::is_empty) {
                    log::debug!(
                        "Skipping row {}: '{}' is not an identifier",
                        layout.first_data_row() + offset + 1,
                        cell
                    );
                }
                grouping.rejected += 1;
                continue;
            };

            grouping.admitted += 1;
            match index.get(&identifier) {
                Some(&pos) => grouping.groups[pos].rows.push(row.as_slice()),
                None => {
                    index.insert(identifier.clone(), grouping.groups.len());
                    grouping.groups.push(Group {
                        identifier,
                        rows: vec![row.as_slice()],
                    });
                }
            }
        }

        grouping
    }

    /// Indices of the non-identifier columns kept in the output, left to right
    pub fn retained_columns(&self, layout: &Layout, headers: &[String]) -> Vec<usize> {
        (0..headers.len())
            .filter(|&col| col != layout.identifier_column)
            .filter(|&col| match &self.config.exclude {
                Some(re) if re.is_match(&headers[col]) => {
                    log::debug!("Excluding column '{}'", headers[col]);
                    false
                }
                _ => true,
            })
            .collect()
    }

    fn reduce_column(&self, rows: &[&[Cell]], col: usize) -> ColumnValue {
        let max = rows
            .iter()
            .filter_map(|row| row.get(col).and_then(Cell::as_score))
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))));

        if let Some(max) = max {
            return ColumnValue::Numeric(max);
        }

        match self.config.fallback {
            Fallback::FirstSeen => ColumnValue::Fallback(
                rows.first()
                    .and_then(|row| row.get(col))
                    .cloned()
                    .unwrap_or_default(),
            ),
            Fallback::Blank => ColumnValue::NoScore,
            Fallback::Zero => ColumnValue::Fallback(Cell::Number(0.0)),
        }
    }
}

fn column_name(headers: &[String], col: usize) -> String {
    headers
        .get(col)
        .cloned()
        .unwrap_or_else(|| format!("Unnamed: {}", col))
}
