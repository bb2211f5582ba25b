//! Header row and identifier column detection

use crate::error::{LayoutFailure, MaxScoresError, Result};
use crate::model::{Cell, Layout, RawGrid};
use crate::pattern::IdentifierPattern;
use std::collections::HashSet;

/// Detection settings
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Rows scanned before giving up (or falling back to a full scan)
    pub scan_rows: usize,
    /// Scan the rest of the grid when the first `scan_rows` rows have no match
    pub full_scan: bool,
    /// Default to header row 0 / column 0 instead of failing when nothing matches
    pub lenient: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            scan_rows: 20,
            full_scan: true,
            lenient: false,
        }
    }
}

pub struct LayoutDetector<'a> {
    pattern: &'a IdentifierPattern,
    config: DetectorConfig,
}

impl<'a> LayoutDetector<'a> {
    pub fn new(pattern: &'a IdentifierPattern) -> Self {
        Self::with_config(pattern, DetectorConfig::default())
    }

    pub fn with_config(pattern: &'a IdentifierPattern, config: DetectorConfig) -> Self {
        Self { pattern, config }
    }

    /// Locate the header row and identifier column.
    ///
    /// The first identifier cell in row-major order decides both: its column is
    /// the identifier column and the row directly above it is the header.
    pub fn detect(&self, grid: &RawGrid) -> Result<Layout> {
        let bound = self.config.scan_rows.min(grid.len());
        let mut found = self.scan(grid, 0, bound);
        let mut rows_scanned = bound;

        if found.is_none() && self.config.full_scan && bound < grid.len() {
            log::debug!(
                "No identifier in the first {} rows, scanning remaining {}",
                bound,
                grid.len() - bound
            );
            found = self.scan(grid, bound, grid.len());
            rows_scanned = grid.len();
        }

        match found {
            Some((0, column)) => Err(self.not_found(LayoutFailure::NoHeaderAbove { column })),
            Some((row, column)) => {
                let layout = Layout::new(row - 1, column);
                log::info!(
                    "Detected header at row {}, identifier column {}",
                    layout.header_row + 1,
                    column + 1
                );
                Ok(layout)
            }
            None if self.config.lenient => {
                log::warn!(
                    "No cell matched '{}' in {} rows; assuming header row 1, column 1",
                    self.pattern.as_str(),
                    rows_scanned
                );
                Ok(Layout::new(0, 0))
            }
            None => Err(self.not_found(LayoutFailure::NoMatch { rows_scanned })),
        }
    }

    fn scan(&self, grid: &RawGrid, from: usize, to: usize) -> Option<(usize, usize)> {
        grid.rows()[from..to]
            .iter()
            .enumerate()
            .find_map(|(offset, row)| {
                row.iter()
                    .position(|cell| self.pattern.identify_cell(cell).is_some())
                    .map(|col| (from + offset, col))
            })
    }

    fn not_found(&self, reason: LayoutFailure) -> MaxScoresError {
        MaxScoresError::LayoutNotFound {
            pattern: self.pattern.as_str().to_string(),
            reason,
        }
    }
}

/// Column names for the header row, `width` columns wide.
///
/// Blank headers become `Unnamed: <index>`. Repeated names get `.1`, `.2`, ...
/// on the second and later occurrences, skipping any suffix already in use.
pub fn header_names(header: &[Cell], width: usize) -> Vec<String> {
    let width = width.max(header.len());
    let raw: Vec<String> = (0..width)
        .map(|idx| {
            let name = header
                .get(idx)
                .map(|c| c.to_string().trim().to_string())
                .unwrap_or_default();
            if name.is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                name
            }
        })
        .collect();

    let mut taken: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(raw.len());
    for name in &raw {
        if taken.insert(name.clone()) {
            names.push(name.clone());
            continue;
        }
        let mut suffix = 1;
        loop {
            let candidate = format!("{}.{}", name, suffix);
            // Don't steal a name that appears verbatim later in the header
            if !raw.contains(&candidate) && taken.insert(candidate.clone()) {
                names.push(candidate);
                break;
            }
            suffix += 1;
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Cell {
        Cell::text(s)
    }

    fn n(v: f64) -> Cell {
        Cell::Number(v)
    }

    #[test]
    fn test_detect_single_match() {
        let grid = RawGrid::new(vec![
            vec![t("Semester End Exam")],
            vec![],
            vec![t("Sl"), t("USN"), t("Q1")],
            vec![n(1.0), t("1BY21CS001"), n(5.0)],
        ]);
        let pattern = IdentifierPattern::strict();
        let layout = LayoutDetector::new(&pattern).detect(&grid).unwrap();
        assert_eq!(layout, Layout::new(2, 1));
        assert_eq!(layout.first_data_row(), 3);
    }

    #[test]
    fn test_first_match_in_row_major_order_wins() {
        let grid = RawGrid::new(vec![
            vec![t("Name"), t("USN")],
            vec![t("A"), t("1BY21CS001")],
            vec![t("1BY21CS002"), t("x")],
        ]);
        let pattern = IdentifierPattern::strict();
        let layout = LayoutDetector::new(&pattern).detect(&grid).unwrap();
        assert_eq!(layout, Layout::new(0, 1));
    }

    #[test]
    fn test_no_match_fails_loudly() {
        let grid = RawGrid::new(vec![vec![t("USN"), t("Q1")], vec![t("XYZ"), n(3.0)]]);
        let pattern = IdentifierPattern::strict();
        let err = LayoutDetector::new(&pattern).detect(&grid).unwrap_err();
        match err {
            MaxScoresError::LayoutNotFound { pattern, reason } => {
                assert_eq!(pattern, crate::pattern::STRICT_USN);
                assert_eq!(reason, LayoutFailure::NoMatch { rows_scanned: 2 });
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_grid_fails() {
        let pattern = IdentifierPattern::strict();
        let err = LayoutDetector::new(&pattern).detect(&RawGrid::default());
        assert!(matches!(err, Err(MaxScoresError::LayoutNotFound { .. })));
    }

    #[test]
    fn test_match_in_top_row_has_no_header() {
        let grid = RawGrid::new(vec![vec![t("1BY21CS001"), n(4.0)]]);
        let pattern = IdentifierPattern::strict();
        let err = LayoutDetector::new(&pattern).detect(&grid).unwrap_err();
        assert!(matches!(
            err,
            MaxScoresError::LayoutNotFound {
                reason: LayoutFailure::NoHeaderAbove { column: 0 },
                ..
            }
        ));
    }

    #[test]
    fn test_lenient_defaults_to_origin() {
        let grid = RawGrid::new(vec![vec![t("Roll")], vec![t("abc")]]);
        let pattern = IdentifierPattern::strict();
        let config = DetectorConfig {
            lenient: true,
            ..DetectorConfig::default()
        };
        let layout = LayoutDetector::with_config(&pattern, config)
            .detect(&grid)
            .unwrap();
        assert_eq!(layout, Layout::new(0, 0));
    }

    #[test]
    fn test_scan_bound_and_full_scan_fallback() {
        let mut rows: Vec<Vec<Cell>> = (0..30).map(|_| vec![t("filler")]).collect();
        rows.push(vec![t("USN")]);
        rows.push(vec![t("1BY21CS001")]);
        let grid = RawGrid::new(rows);
        let pattern = IdentifierPattern::strict();

        let layout = LayoutDetector::new(&pattern).detect(&grid).unwrap();
        assert_eq!(layout, Layout::new(30, 0));

        let bounded = DetectorConfig {
            scan_rows: 10,
            full_scan: false,
            lenient: false,
        };
        let err = LayoutDetector::with_config(&pattern, bounded)
            .detect(&grid)
            .unwrap_err();
        assert!(matches!(
            err,
            MaxScoresError::LayoutNotFound {
                reason: LayoutFailure::NoMatch { rows_scanned: 10 },
                ..
            }
        ));
    }

    #[test]
    fn test_header_names_disambiguates_duplicates() {
        let header = vec![t("USN"), t("Q1"), t("Q1"), t("Q2"), t("Q1")];
        assert_eq!(
            header_names(&header, 5),
            vec!["USN", "Q1", "Q1.1", "Q2", "Q1.2"]
        );
    }

    #[test]
    fn test_header_names_avoids_existing_suffix() {
        let header = vec![t("Q1"), t("Q1"), t("Q1.1")];
        assert_eq!(header_names(&header, 3), vec!["Q1", "Q1.2", "Q1.1"]);
    }

    #[test]
    fn test_header_names_fills_blanks_and_extra_width() {
        let header = vec![t("USN"), Cell::Empty, n(1.0)];
        assert_eq!(
            header_names(&header, 4),
            vec!["USN", "Unnamed: 1", "1", "Unnamed: 3"]
        );
    }
}
