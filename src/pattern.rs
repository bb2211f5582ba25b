//! Student identifier (USN) recognition and column exclusion patterns

use crate::error::Result;
use crate::model::Cell;
use lazy_static::lazy_static;
use regex::Regex;

/// Full USN: `1` + branch code + admission year + department + serial, e.g. `1BY21CS001`
pub const STRICT_USN: &str = r"1[A-Z]{2,4}\d{2}[A-Z]{2,3}\d{3}";

/// Early-format sheets sometimes carry only the prefix and branch code (`1BY`, `1TD`)
pub const LOOSE_USN: &str = r"1[A-Z]{2,4}(?:\d{2}(?:[A-Z]{2,3}(?:\d{3})?)?)?";

/// Evaluator name / paper version metadata columns
pub const DEFAULT_EXCLUSION: &str = r"(?i)(valuator|examiner|version|\bver\b)";

lazy_static! {
    static ref STRICT: IdentifierPattern = IdentifierPattern::compile(STRICT_USN, true).unwrap();
    static ref LOOSE: IdentifierPattern = IdentifierPattern::compile(LOOSE_USN, true).unwrap();
    static ref EXCLUSION: Regex = Regex::new(DEFAULT_EXCLUSION).unwrap();
}

/// How an identifier cell is compared against the pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// The whole trimmed cell must match
    #[default]
    Exact,
    /// The identifier may be embedded in a longer string (`"USN: 1BY21CS001 (re-eval)"`,
    /// `"1BY21CS001_R"`). Capture group 1 is used when the pattern has one, otherwise the
    /// whole match.
    ///
    /// The presets only refuse a match touching another digit, so `21BY21CS001` and
    /// `1BY21CS0012` are not read as identifiers. Custom patterns are used unguarded.
    Embedded,
}

/// Built-in identifier patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    #[default]
    Strict,
    Loose,
}

/// Case-insensitive identifier matcher
#[derive(Debug, Clone)]
pub struct IdentifierPattern {
    source: String,
    exact: Regex,
    embedded: Regex,
    mode: MatchMode,
}

impl IdentifierPattern {
    pub fn strict() -> Self {
        STRICT.clone()
    }

    pub fn loose() -> Self {
        LOOSE.clone()
    }

    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Strict => Self::strict(),
            Preset::Loose => Self::loose(),
        }
    }

    /// Compile a user-supplied pattern
    pub fn new(pattern: &str) -> Result<Self> {
        Self::compile(pattern, false)
    }

    fn compile(source: &str, digit_guarded: bool) -> Result<Self> {
        let exact = Regex::new(&format!("(?i)^(?:{})$", source))?;
        let embedded = if digit_guarded {
            Regex::new(&format!(r"(?i)(?:^|\D)({})(?:$|\D)", source))?
        } else {
            Regex::new(&format!("(?i)(?:{})", source))?
        };
        Ok(Self {
            source: source.to_string(),
            exact,
            embedded,
            mode: MatchMode::Exact,
        })
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Normalized (trimmed, upper-cased) identifier if `raw` is one
    pub fn identify(&self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        match self.mode {
            MatchMode::Exact => {
                if self.exact.is_match(trimmed) {
                    Some(trimmed.to_uppercase())
                } else {
                    None
                }
            }
            MatchMode::Embedded => {
                let caps = self.embedded.captures(trimmed)?;
                let found = caps.get(1).or_else(|| caps.get(0))?.as_str().trim();
                if found.is_empty() {
                    None
                } else {
                    Some(found.to_uppercase())
                }
            }
        }
    }

    pub fn identify_cell(&self, cell: &Cell) -> Option<String> {
        match cell {
            Cell::Text(_) | Cell::Number(_) => self.identify(&cell.to_string()),
            Cell::Empty | Cell::Bool(_) => None,
        }
    }
}

impl Default for IdentifierPattern {
    fn default() -> Self {
        Self::strict()
    }
}

/// Regex matching evaluator/version column headers
pub fn default_exclusion() -> Regex {
    EXCLUSION.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_matches_full_usn() {
        let p = IdentifierPattern::strict();
        assert_eq!(p.identify("1BY21CS001"), Some("1BY21CS001".to_string()));
        assert_eq!(p.identify("  1by22ai123 "), Some("1BY22AI123".to_string()));
        assert_eq!(p.identify("1TD20ECE045"), Some("1TD20ECE045".to_string()));
    }

    #[test]
    fn test_strict_rejects_partial_and_garbage() {
        let p = IdentifierPattern::strict();
        assert_eq!(p.identify("1BY"), None);
        assert_eq!(p.identify("1BY21CS01"), None);
        assert_eq!(p.identify("1BY21CS0011"), None);
        assert_eq!(p.identify("XYZ"), None);
        assert_eq!(p.identify("USN"), None);
        assert_eq!(p.identify(""), None);
    }

    #[test]
    fn test_loose_accepts_partial_forms() {
        let p = IdentifierPattern::loose();
        assert_eq!(p.identify("1BY"), Some("1BY".to_string()));
        assert_eq!(p.identify("1te21"), Some("1TE21".to_string()));
        assert_eq!(p.identify("1BY21CS"), Some("1BY21CS".to_string()));
        assert_eq!(p.identify("1BY21CS001"), Some("1BY21CS001".to_string()));
        assert_eq!(p.identify("12345"), None);
    }

    #[test]
    fn test_embedded_extracts_identifier() {
        let p = IdentifierPattern::strict().with_mode(MatchMode::Embedded);
        assert_eq!(
            p.identify("USN: 1by21cs001 (re-eval)"),
            Some("1BY21CS001".to_string())
        );
        assert_eq!(p.identify("no identifier here"), None);
        assert_eq!(p.identify("1BY21CS001_R"), Some("1BY21CS001".to_string()));
        assert_eq!(p.identify("1BY21CS001re"), Some("1BY21CS001".to_string()));
        assert_eq!(p.identify("1BY21CS0012"), None);
        assert_eq!(p.identify("21BY21CS001"), None);
        // Exact mode refuses the same cell
        assert_eq!(IdentifierPattern::strict().identify("USN: 1BY21CS001"), None);
    }

    #[test]
    fn test_custom_pattern_with_capture_group() {
        let p = IdentifierPattern::new(r"roll-(\d{4})")
            .unwrap()
            .with_mode(MatchMode::Embedded);
        assert_eq!(p.identify("Roll-0042 A"), Some("0042".to_string()));
    }

    #[test]
    fn test_invalid_custom_pattern() {
        assert!(IdentifierPattern::new("1BY(").is_err());
    }

    #[test]
    fn test_identify_cell_types() {
        let p = IdentifierPattern::new(r"\d{3}").unwrap();
        assert_eq!(p.identify_cell(&Cell::Number(123.0)), Some("123".to_string()));
        assert_eq!(p.identify_cell(&Cell::Empty), None);
        assert_eq!(p.identify_cell(&Cell::Bool(true)), None);
    }

    #[test]
    fn test_default_exclusion() {
        let re = default_exclusion();
        assert!(re.is_match("Evaluator Name"));
        assert!(re.is_match("Valuator"));
        assert!(re.is_match("QP Version"));
        assert!(re.is_match("Ver"));
        assert!(re.is_match("Examiner"));
        assert!(!re.is_match("Q1"));
        assert!(!re.is_match("USN"));
        assert!(!re.is_match("Total"));
        assert!(!re.is_match("Re-evaluation Marks"));
    }
}
