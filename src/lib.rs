//! # Introduction
//!
//! cguard is a single-pass static checker for a teaching subset of C. It
//! reads a whole source buffer, reports every lexical, syntactic and
//! semantic problem it can find with a line/column position, and pairs
//! most diagnostics with a remediation hint. Nothing is compiled or run.
//!
//! ## Analysis pipeline
//!
//! ```text
//! Source → Lexer → Parser (+ symbol table, type engine) → AnalysisResult
//! ```
//!
//! 1. [`parser::lexer`] tokenises the source and reports lexical problems.
//! 2. [`parser::Parser`] walks the tokens by recursive descent and checks
//!    scopes, types, calls and lvalues inline. It always finishes: a
//!    progress guard, an iteration cap and a nesting cap bound every run.
//! 3. [`analysis`] holds the type engine, the builtin registry, the scoped
//!    symbol table, the suggestion table and the [`analyze`] facade.
//! 4. [`cli`] is the `cguard` binary's argument model and report rendering;
//!    not part of the stable library API.
//!
//! ```
//! let result = cguard::analyze("int main() { y = 5; return 0; }");
//! assert_eq!(result.total, 1);
//! assert_eq!(result.semantic[0].message, "Undeclared variable 'y'");
//! assert_eq!((result.semantic[0].line, result.semantic[0].column), (1, 14));
//! ```

pub mod analysis;
pub mod cli;
pub mod diagnostics;
pub mod parser;

pub use analysis::{analyze, analyze_file, Analyzer, AnalyzerConfig, SourceError};
pub use diagnostics::{AnalysisResult, Diagnostic, SourceLocation};
