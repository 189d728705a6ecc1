//! Analysis facade
//!
//! One call is one self-contained run: a fresh [`Lexer`], a fresh
//! [`Parser`] and symbol table, and a returned [`AnalysisResult`] that owns
//! all of its data. The only state shared between runs is the read-only
//! builtin registry and suggestion table.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::analysis::builtins::BuiltinRegistry;
use crate::analysis::suggestions::SuggestionEngine;
use crate::diagnostics::{AnalysisResult, Diagnostic, SourceLocation};
use crate::parser::lexer::Lexer;
use crate::parser::parse::{Parser, DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_NESTING};

/// Host-level failures that keep a source buffer from being analyzed at all.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Could not open file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SourceError {
    /// The failure as a diagnostic at the start of the file.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(SourceLocation::new(1, 1), self.to_string())
    }
}

/// Limits and options for one [`Analyzer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Iterations allowed per parsing loop before `Parser stuck, aborting`
    pub max_iterations: usize,
    /// Recursion depth allowed before `Nesting too deep`
    pub max_nesting: usize,
    /// Attach remediation hints to diagnostics
    pub suggestions: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_nesting: DEFAULT_MAX_NESTING,
            suggestions: true,
        }
    }
}

/// Runs the tokenizer and parser over whole source buffers.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalyzerConfig,
    builtins: &'static BuiltinRegistry,
    suggestions: Option<&'static SuggestionEngine>,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        let suggestions = config.suggestions.then(SuggestionEngine::global);
        Self {
            config,
            builtins: BuiltinRegistry::global(),
            suggestions,
        }
    }

    /// Analyze one in-memory buffer.
    pub fn analyze(&self, source: &str) -> AnalysisResult {
        let mut lexer = Lexer::new(source).with_suggestions(self.suggestions);
        let tokens: Vec<_> = lexer.by_ref().collect();
        let lexical = lexer.into_diagnostics();

        let token_count = tokens.len();
        let mut parser = Parser::new(tokens, self.builtins)
            .with_limits(self.config.max_iterations, self.config.max_nesting)
            .with_suggestions(self.suggestions);
        parser.parse_program();
        let stuck = parser.is_stuck();
        let semantic = parser.into_diagnostics();

        let result = AnalysisResult::new(lexical, semantic);
        debug!(
            tokens = token_count,
            lexical = result.lexical.len(),
            semantic = result.semantic.len(),
            stuck,
            "analysis complete"
        );
        result
    }

    /// Read a file and analyze it. An unreadable file yields a result with a
    /// single lexical diagnostic describing the failure.
    pub fn analyze_file(&self, path: impl AsRef<Path>) -> AnalysisResult {
        match read_source(path.as_ref()) {
            Ok(source) => self.analyze(&source),
            Err(err) => {
                debug!(error = %err, "source unreadable");
                AnalysisResult::new(vec![err.to_diagnostic()], Vec::new())
            }
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

/// Read a whole source file as text.
pub fn read_source(path: &Path) -> Result<String, SourceError> {
    fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Analyze `source` with the default configuration.
pub fn analyze(source: &str) -> AnalysisResult {
    Analyzer::default().analyze(source)
}

/// Analyze the file at `path` with the default configuration.
pub fn analyze_file(path: impl AsRef<Path>) -> AnalysisResult {
    Analyzer::default().analyze_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_program() {
        let result = analyze("int main() { int x = 1; return x; }");
        assert!(result.is_clean());
        assert_eq!(result.total, 0);
    }

    #[test]
    fn test_lexical_and_semantic_split() {
        let result = analyze("int main() { int x = @; return y; }");
        assert_eq!(result.lexical.len(), 1);
        assert_eq!(result.lexical[0].message, "Invalid character: '@'");
        assert!(result
            .semantic
            .iter()
            .any(|d| d.message == "Undeclared variable 'y'"));
        assert_eq!(result.total, result.lexical.len() + result.semantic.len());
    }

    #[test]
    fn test_suggestions_can_be_disabled() {
        let source = "int main() { int x = 1 return x; }";
        let with = analyze(source);
        assert!(with.semantic[0].suggestion.is_some());

        let analyzer = Analyzer::new(AnalyzerConfig {
            suggestions: false,
            ..AnalyzerConfig::default()
        });
        let without = analyzer.analyze(source);
        assert_eq!(without.semantic[0].message, with.semantic[0].message);
        assert!(without.iter().all(|d| d.suggestion.is_none()));
    }

    #[test]
    fn test_iteration_limit_from_config() {
        let analyzer = Analyzer::new(AnalyzerConfig {
            max_iterations: 2,
            ..AnalyzerConfig::default()
        });
        let result = analyzer.analyze("int a; int b; int c; int d;");
        assert_eq!(result.semantic.len(), 1);
        assert_eq!(result.semantic[0].message, "Parser stuck, aborting");
    }

    #[test]
    fn test_missing_file() {
        let result = analyze_file("/definitely/not/here.c");
        assert_eq!(result.total, 1);
        assert!(result.semantic.is_empty());
        let diag = &result.lexical[0];
        assert!(diag.message.starts_with("Could not open file"));
        assert_eq!((diag.line, diag.column), (1, 1));
    }
}
