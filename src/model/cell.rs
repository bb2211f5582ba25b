use std::fmt;

/// A single untyped spreadsheet cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Coerce to a score value.
    ///
    /// Numbers and numeric text (integers or decimals, surrounding whitespace
    /// allowed) succeed. Text, blanks, booleans, NaN and infinities do not.
    pub fn as_score(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Empty | Cell::Bool(_) => return None,
        };
        if value.is_finite() {
            Some(value)
        } else {
            None
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Bool(true) => write!(f, "TRUE"),
            Cell::Bool(false) => write!(f, "FALSE"),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i32> for Cell {
    fn from(n: i32) -> Self {
        Cell::Number(n as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_score_accepts_numbers_and_numeric_text() {
        assert_eq!(Cell::Number(7.5).as_score(), Some(7.5));
        assert_eq!(Cell::text(" 8 ").as_score(), Some(8.0));
        assert_eq!(Cell::text("4.25").as_score(), Some(4.25));
        assert_eq!(Cell::text("-1").as_score(), Some(-1.0));
    }

    #[test]
    fn test_as_score_rejects_non_numeric() {
        assert_eq!(Cell::Empty.as_score(), None);
        assert_eq!(Cell::text("").as_score(), None);
        assert_eq!(Cell::text("AB").as_score(), None);
        assert_eq!(Cell::text("NaN").as_score(), None);
        assert_eq!(Cell::text("inf").as_score(), None);
        assert_eq!(Cell::Bool(true).as_score(), None);
        assert_eq!(Cell::Number(f64::NAN).as_score(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Cell::Number(8.0).to_string(), "8");
        assert_eq!(Cell::Number(2.5).to_string(), "2.5");
        assert_eq!(Cell::Empty.to_string(), "");
        assert_eq!(Cell::Bool(false).to_string(), "FALSE");
    }
}
