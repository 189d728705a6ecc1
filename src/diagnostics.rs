//! Positioned diagnostics and the result value of one analysis run
//!
//! Every problem the checker finds is a [`Diagnostic`]: a message, an
//! optional remediation hint, and the 1-based line/column it refers to.
//! Diagnostics are collected in a [`DiagnosticSink`] while a run is in
//! progress and handed to the caller inside an [`AnalysisResult`].

use crate::analysis::suggestions::SuggestionEngine;
use serde::Serialize;
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A single lexical, syntactic, or semantic finding.
///
/// `line` and `column` are the source of truth for the position. The
/// `Display` impl adds a `Line N:C - ` prefix for human consumption only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    pub line: usize,
    pub column: usize,
}

impl Diagnostic {
    pub fn new(location: SourceLocation, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            line: location.line,
            column: location.column,
        }
    }

    /// Attach a remediation hint. An empty hint leaves the diagnostic without one.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        let suggestion = suggestion.into();
        self.suggestion = if suggestion.is_empty() {
            None
        } else {
            Some(suggestion)
        };
        self
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}:{} - {}", self.line, self.column, self.message)
    }
}

/// The complete output of one analysis run.
///
/// Owned by the caller; nothing inside refers back to analyzer state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// Diagnostics raised by the tokenizer
    pub lexical: Vec<Diagnostic>,
    /// Syntactic and semantic diagnostics raised by the parser
    pub semantic: Vec<Diagnostic>,
    pub total: usize,
}

impl AnalysisResult {
    pub fn new(lexical: Vec<Diagnostic>, semantic: Vec<Diagnostic>) -> Self {
        let total = lexical.len() + semantic.len();
        Self {
            lexical,
            semantic,
            total,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.total == 0
    }

    /// All diagnostics, lexical first.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.lexical.iter().chain(self.semantic.iter())
    }
}

/// Append-only collector used while a run is in progress.
///
/// When a suggestion table is attached, every reported message is matched
/// against it and the hint is stored alongside the diagnostic.
#[derive(Debug)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
    suggestions: Option<&'static SuggestionEngine>,
}

impl DiagnosticSink {
    pub fn new(suggestions: Option<&'static SuggestionEngine>) -> Self {
        Self {
            diagnostics: Vec::new(),
            suggestions,
        }
    }

    pub fn report(&mut self, location: SourceLocation, message: impl Into<String>) {
        let message = message.into();
        let hint = self
            .suggestions
            .map(|engine| engine.suggestion_for(&message))
            .unwrap_or_default();
        self.diagnostics
            .push(Diagnostic::new(location, message).with_suggestion(hint));
    }

    /// Report without consulting the suggestion table.
    pub fn report_plain(&mut self, location: SourceLocation, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::new(location, message));
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefix() {
        let diag = Diagnostic::new(SourceLocation::new(3, 7), "Undeclared variable 'y'");
        assert_eq!(diag.to_string(), "Line 3:7 - Undeclared variable 'y'");
        assert_eq!(diag.location(), SourceLocation::new(3, 7));
    }

    #[test]
    fn test_empty_suggestion_is_none() {
        let diag = Diagnostic::new(SourceLocation::new(1, 1), "x").with_suggestion("");
        assert!(diag.suggestion.is_none());
    }

    #[test]
    fn test_result_total() {
        let loc = SourceLocation::new(1, 1);
        let result = AnalysisResult::new(
            vec![Diagnostic::new(loc, "a")],
            vec![Diagnostic::new(loc, "b"), Diagnostic::new(loc, "c")],
        );
        assert_eq!(result.total, 3);
        assert!(!result.is_clean());
        let messages: Vec<_> = result.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sink_attaches_suggestions() {
        let mut sink = DiagnosticSink::new(Some(SuggestionEngine::global()));
        sink.report(SourceLocation::new(2, 4), "Expected ';' but got '}'");
        sink.report_plain(SourceLocation::new(5, 1), "Parser stuck, aborting");

        let diags = sink.into_vec();
        assert!(diags[0].suggestion.is_some());
        assert!(diags[1].suggestion.is_none());
    }
}
