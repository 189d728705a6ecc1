//! Semantic side of the checker: types, builtins, scopes, hints, and the
//! facade that drives a complete run.

pub mod builtins;
pub mod engine;
pub mod suggestions;
pub mod symbols;
pub mod types;

pub use engine::{analyze, analyze_file, Analyzer, AnalyzerConfig, SourceError};
