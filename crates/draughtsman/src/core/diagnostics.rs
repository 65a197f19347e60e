//! Diagnostics collection for tolerant parsing
//!
//! All parsers accumulate non-fatal problems here instead of aborting.
//! A diagnostic carries its severity, source position, and an optional
//! human-readable suggestion derived from keywords in the message.

use std::fmt;

/// Severity of a diagnostic record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Keyword → suggestion lookup used to enrich diagnostic messages.
///
/// Kept as a table rather than scattered conditionals so it can be
/// extended without touching the collection logic.
const SUGGESTION_HINTS: &[(&str, &str)] = &[
    (
        "missing",
        "check for missing punctuation such as '{', '}' or ':'",
    ),
    (
        "expected",
        "compare the line against the diagram syntax for this kind",
    ),
    (
        "unrecognized",
        "make sure the text starts with a diagram marker such as 'classDiagram'",
    ),
    (
        "unknown",
        "make sure the text starts with a diagram marker such as 'classDiagram'",
    ),
];

/// Derive an optional suggestion from keywords in an error message.
pub fn suggest(message: &str) -> Option<String> {
    let lower = message.to_lowercase();
    SUGGESTION_HINTS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, hint)| (*hint).to_string())
}

/// A single non-fatal diagnostic record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// 1-based source line; 0 when the record is not tied to a line
    pub line: usize,
    /// 1-based source column; 0 when unknown
    pub column: usize,
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>, line: usize, column: usize) -> Self {
        let message = message.into();
        let suggestion = suggest(&message);
        Self {
            severity,
            message,
            line,
            column,
            suggestion,
        }
    }

    pub fn error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::new(Severity::Error, message, line, column)
    }

    pub fn warning(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::new(Severity::Warning, message, line, column)
    }

    pub fn info(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::new(Severity::Info, message, line, column)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (line {}, column {})",
            self.severity, self.message, self.line, self.column
        )?;
        if let Some(hint) = &self.suggestion {
            write!(f, " - {}", hint)?;
        }
        Ok(())
    }
}

/// Ordered collector of diagnostics for a parse session
///
/// Records are accumulated and never thrown; callers inspect the collection
/// after parsing completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.records.push(diagnostic);
    }

    pub fn error(&mut self, message: impl Into<String>, line: usize, column: usize) {
        self.push(Diagnostic::error(message, line, column));
    }

    pub fn warning(&mut self, message: impl Into<String>, line: usize, column: usize) {
        self.push(Diagnostic::warning(message, line, column));
    }

    pub fn info(&mut self, message: impl Into<String>, line: usize, column: usize) {
        self.push(Diagnostic::info(message, line, column));
    }

    /// Move all records from another collector onto the end of this one.
    pub fn absorb(&mut self, mut other: Diagnostics) {
        self.records.append(&mut other.records);
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.records.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.records.iter().any(|d| d.severity == Severity::Warning)
    }
}

/// Aggregate outcome of a model-building session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStatus {
    /// Model obtained, no diagnostics above info
    Success,
    /// Model obtained despite error-level diagnostics
    Partial,
    /// Model obtained with warnings only
    Warnings,
    /// No usable class diagram; nothing to build on
    FatalError,
}

impl GenerationStatus {
    /// Compute the aggregate status from whether a class diagram was
    /// obtained at all and from the collected diagnostics.
    pub fn evaluate(has_class_diagram: bool, diagnostics: &Diagnostics) -> Self {
        if !has_class_diagram {
            GenerationStatus::FatalError
        } else if diagnostics.has_errors() {
            GenerationStatus::Partial
        } else if diagnostics.has_warnings() {
            GenerationStatus::Warnings
        } else {
            GenerationStatus::Success
        }
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationStatus::Success => write!(f, "SUCCESS"),
            GenerationStatus::Partial => write!(f, "PARTIAL"),
            GenerationStatus::Warnings => write!(f, "WARNINGS"),
            GenerationStatus::FatalError => write!(f, "FATAL_ERROR"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_from_keyword() {
        let diag = Diagnostic::warning("missing closing brace", 3, 1);
        assert!(diag.suggestion.is_some());
        assert!(diag.suggestion.unwrap().contains("punctuation"));
    }

    #[test]
    fn test_no_suggestion_without_keyword() {
        let diag = Diagnostic::warning("could not split attribute", 3, 1);
        assert!(diag.suggestion.is_none());
    }

    #[test]
    fn test_collector_order_preserved() {
        let mut diags = Diagnostics::new();
        diags.warning("first", 1, 0);
        diags.error("second", 2, 0);
        diags.info("third", 3, 0);

        let messages: Vec<_> = diags.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_has_errors_and_warnings() {
        let mut diags = Diagnostics::new();
        assert!(!diags.has_errors());
        diags.warning("w", 1, 0);
        assert!(diags.has_warnings());
        assert!(!diags.has_errors());
        diags.error("e", 2, 0);
        assert!(diags.has_errors());
    }

    #[test]
    fn test_absorb() {
        let mut a = Diagnostics::new();
        a.info("a", 1, 0);
        let mut b = Diagnostics::new();
        b.warning("b", 2, 0);
        a.absorb(b);
        assert_eq!(a.len(), 2);
        assert!(a.has_warnings());
    }

    #[test]
    fn test_status_success() {
        let diags = Diagnostics::new();
        assert_eq!(
            GenerationStatus::evaluate(true, &diags),
            GenerationStatus::Success
        );
    }

    #[test]
    fn test_status_warnings() {
        let mut diags = Diagnostics::new();
        diags.warning("w", 1, 0);
        assert_eq!(
            GenerationStatus::evaluate(true, &diags),
            GenerationStatus::Warnings
        );
    }

    #[test]
    fn test_status_partial_on_errors() {
        let mut diags = Diagnostics::new();
        diags.error("e", 1, 0);
        diags.warning("w", 2, 0);
        assert_eq!(
            GenerationStatus::evaluate(true, &diags),
            GenerationStatus::Partial
        );
    }

    #[test]
    fn test_status_fatal_without_class_diagram() {
        let diags = Diagnostics::new();
        assert_eq!(
            GenerationStatus::evaluate(false, &diags),
            GenerationStatus::FatalError
        );
    }

    #[test]
    fn test_status_display() {
        assert_eq!(GenerationStatus::Success.to_string(), "SUCCESS");
        assert_eq!(GenerationStatus::FatalError.to_string(), "FATAL_ERROR");
    }
}
