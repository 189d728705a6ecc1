//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and the core parsing
//! infrastructure: cursor helpers, `expect`, diagnostics, and the two
//! termination guarantees every loop in the parser relies on.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and the program loop
//! - `declarations`: type specifiers, declarators, functions, typedef, struct
//! - `statements`: blocks and statements
//! - `expressions`: flat left-to-right expression chains
//!
//! Semantic checks run inline while productions are recognized; there is no
//! syntax tree. The parser owns the analysis context for one run: the token
//! cursor, the [`SymbolTable`], and the [`DiagnosticSink`].
//!
//! # Recovery
//!
//! - Progress guard: every statement or declaration attempt records the
//!   cursor first. If nothing was consumed, the current token is skipped
//!   with a `Skipping invalid token` diagnostic.
//! - Iteration cap: every loop counts iterations. Exceeding the cap emits a
//!   single `Parser stuck, aborting` diagnostic and all loops unwind.
//! - Nesting cap: recursion deeper than the configured limit emits
//!   `Nesting too deep` and skips to the next `;` or `}`. Follow-on
//!   diagnostics are suppressed until the enclosing loop resumes.
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::analysis::builtins::BuiltinRegistry;
use crate::analysis::suggestions::SuggestionEngine;
use crate::analysis::symbols::SymbolTable;
use crate::analysis::types::CType;
use crate::diagnostics::{Diagnostic, DiagnosticSink, SourceLocation};
use crate::parser::lexer::{Token, TokenKind};
use tracing::{debug, trace};

/// Loop iterations allowed per block or program before the parser gives up
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Recursion depth allowed for nested blocks and expressions
pub const DEFAULT_MAX_NESTING: usize = 128;

/// State of the function whose body is being parsed
#[derive(Debug, Clone)]
pub(crate) struct FunctionContext {
    pub(crate) name: String,
    pub(crate) return_type: CType,
    pub(crate) has_return: bool,
    pub(crate) loop_depth: usize,
    pub(crate) switch_depth: usize,
}

/// Recursive descent parser and inline semantic analyzer for the C subset
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) symbols: SymbolTable,
    pub(crate) diagnostics: DiagnosticSink,
    pub(crate) function: Option<FunctionContext>,
    pub(crate) max_iterations: usize,
    pub(crate) max_nesting: usize,
    pub(crate) nesting: usize,
    /// Suppress diagnostics while unwinding from a nesting overflow
    pub(crate) recovering: bool,
    /// The iteration cap was hit; every loop exits
    pub(crate) stuck: bool,
    pub(crate) anonymous_structs: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>, builtins: &'static BuiltinRegistry) -> Self {
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            let location = tokens
                .last()
                .map_or(SourceLocation::new(1, 1), |t| t.location);
            tokens.push(Token::new(TokenKind::Eof, "", location));
        }

        Self {
            tokens,
            position: 0,
            symbols: SymbolTable::new(builtins),
            diagnostics: DiagnosticSink::new(Some(SuggestionEngine::global())),
            function: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_nesting: DEFAULT_MAX_NESTING,
            nesting: 0,
            recovering: false,
            stuck: false,
            anonymous_structs: 0,
        }
    }

    pub fn with_limits(mut self, max_iterations: usize, max_nesting: usize) -> Self {
        self.max_iterations = max_iterations;
        self.max_nesting = max_nesting;
        self
    }

    pub fn with_suggestions(mut self, suggestions: Option<&'static SuggestionEngine>) -> Self {
        self.diagnostics = DiagnosticSink::new(suggestions);
        self
    }

    /// Parse the entire program (top-level declarations)
    pub fn parse_program(&mut self) {
        let mut iterations = 0;

        while !self.is_at_end() && self.tick(&mut iterations) {
            self.recovering = false;
            let before = self.position;
            self.parse_external_declaration();
            self.ensure_progress(before);
        }
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_vec()
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// The iteration cap was exceeded during the run.
    pub fn is_stuck(&self) -> bool {
        self.stuck
    }

    // ===== Recovery =====

    /// Count one loop iteration. Returns `false` once the cap is exceeded.
    pub(crate) fn tick(&mut self, iterations: &mut usize) -> bool {
        if self.stuck {
            return false;
        }
        *iterations += 1;
        if *iterations > self.max_iterations {
            self.stuck = true;
            let location = self.current_location();
            debug!(%location, limit = self.max_iterations, "parser stuck, aborting");
            self.diagnostics
                .report_plain(location, "Parser stuck, aborting");
            return false;
        }
        true
    }

    /// Force-skip one token if the last attempt consumed nothing.
    pub(crate) fn ensure_progress(&mut self, before: usize) {
        if self.position != before || self.is_at_end() || self.stuck {
            return;
        }
        let bad = self.peek().clone();
        trace!(token = %bad.lexeme, location = %bad.location, "skipping token");
        self.error(
            bad.location,
            format!("Skipping invalid token '{}'", bad.lexeme),
        );
        self.advance();
    }

    /// Enter one level of recursion; on overflow report, skip to the next
    /// `;` or `}`, and return `false`.
    pub(crate) fn enter_nested(&mut self) -> bool {
        if self.nesting >= self.max_nesting {
            if !self.recovering {
                let location = self.current_location();
                self.error(location, "Nesting too deep");
                self.recovering = true;
            }
            while !matches!(
                self.peek().kind,
                TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
            ) {
                self.advance();
            }
            return false;
        }
        self.nesting += 1;
        true
    }

    pub(crate) fn leave_nested(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }

    /// Report a diagnostic unless the parser is unwinding.
    pub(crate) fn error(&mut self, location: SourceLocation, message: impl Into<String>) {
        if self.recovering || self.stuck {
            return;
        }
        self.diagnostics.report(location, message);
    }

    // ===== Helper methods =====

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(crate) fn check_ahead(&self, n: usize, kind: TokenKind) -> bool {
        self.peek_ahead(n).kind == kind
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.position += 1;
        }
        token
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub(crate) fn peek(&self) -> &Token {
        // `new` guarantees a trailing Eof, which `advance` never moves past
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    /// Token `n` positions ahead, clamped to the trailing `Eof`.
    pub(crate) fn peek_ahead(&self, n: usize) -> &Token {
        let index = (self.position + n).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location
    }

    /// Consume `kind` or report `Expected X but got Y`. Never consumes on mismatch.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> bool {
        if self.match_token(kind) {
            return true;
        }
        let found = self.peek().clone();
        self.error(found.location, format!("Expected {} but got {}", kind, found));
        false
    }

    pub(crate) fn expect_identifier(&mut self) -> Option<Token> {
        if self.check(TokenKind::Ident) {
            return Some(self.advance());
        }
        let found = self.peek().clone();
        self.error(
            found.location,
            format!("Expected identifier but got {}", found),
        );
        None
    }

    /// Tokens that may begin an expression statement
    pub(crate) fn starts_expression(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Ident
                | TokenKind::Number
                | TokenKind::Str
                | TokenKind::CharLit
                | TokenKind::LParen
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Amp
                | TokenKind::Bang
                | TokenKind::Tilde
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::Sizeof
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    fn parse(source: &str) -> Parser {
        let (tokens, _) = tokenize(source);
        let mut parser = Parser::new(tokens, BuiltinRegistry::global());
        parser.parse_program();
        parser
    }

    fn messages(source: &str) -> Vec<String> {
        parse(source)
            .into_diagnostics()
            .into_iter()
            .map(|d| d.message)
            .collect()
    }

    #[test]
    fn test_parse_simple_function() {
        let parser = parse("int main() { return 0; }");
        assert!(parser.symbols().lookup("main").unwrap().is_function());
        assert!(parser.into_diagnostics().is_empty());
    }

    #[test]
    fn test_empty_token_stream_gets_eof() {
        let mut parser = Parser::new(Vec::new(), BuiltinRegistry::global());
        parser.parse_program();
        assert!(parser.into_diagnostics().is_empty());
    }

    #[test]
    fn test_expect_does_not_consume() {
        let diags = messages("int main() { int x = 1 return x; }");
        assert_eq!(diags, vec!["Expected ';' but got 'return'"]);
    }

    #[test]
    fn test_file_scope_garbage() {
        let diags = messages(")))))");
        assert_eq!(diags, vec!["Unexpected token ')' at file scope"]);
    }

    #[test]
    fn test_progress_guard_in_block() {
        let diags = messages("int main() { ) return 0; }");
        assert_eq!(diags, vec!["Skipping invalid token ')'"]);
    }

    #[test]
    fn test_iteration_cap() {
        let (tokens, _) = tokenize("int a; int b; int c; int d; int e;");
        let mut parser = Parser::new(tokens, BuiltinRegistry::global()).with_limits(3, 64);
        parser.parse_program();
        assert!(parser.is_stuck());
        let diags = parser.into_diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "Parser stuck, aborting");
        assert!(diags[0].suggestion.is_none());
    }

    #[test]
    fn test_nesting_cap() {
        let source = format!("int x = {}1{};", "(".repeat(500), ")".repeat(500));
        let diags = messages(&source);
        assert_eq!(diags, vec!["Nesting too deep"]);
    }
}
