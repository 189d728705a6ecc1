//! Lexer (tokenizer) for C source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the
//! parser. The lexer never fails: malformed input produces a lexical
//! [`Diagnostic`] plus an [`TokenKind::Error`] placeholder token, and scanning
//! always advances past the bad lexeme. The stream always ends with exactly
//! one [`TokenKind::Eof`].
//!
//! Preprocessor lines are captured whole as a single token. `#include`
//! targets are checked for `<name>` / `"name"` syntax and `#if`/`#endif`
//! nesting is balanced, but nothing is expanded.

use crate::analysis::suggestions::SuggestionEngine;
use crate::diagnostics::{Diagnostic, DiagnosticSink, SourceLocation};
use phf::phf_map;
use std::fmt;
use tracing::trace;

/// Terminal categories produced by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    Ident,
    Number,
    Str,
    CharLit,

    // Keywords
    Int,
    Float,
    Double,
    Char,
    Void,
    Short,
    Long,
    Signed,
    Unsigned,
    Struct,
    Typedef,
    Const,
    Static,
    Extern,
    Auto,
    If,
    Else,
    While,
    Do,
    For,
    Switch,
    Case,
    Default,
    Break,
    Continue,
    Return,
    Sizeof,

    // Arithmetic
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %

    // Comparison
    EqEq,  // ==
    NotEq, // !=
    Lt,    // <
    Le,    // <=
    Gt,    // >
    Ge,    // >=

    // Logical
    AndAnd, // &&
    OrOr,   // ||
    Bang,   // !

    // Bitwise
    Amp,   // &
    Pipe,  // |
    Caret, // ^
    Tilde, // ~
    LtLt,  // <<
    GtGt,  // >>

    // Assignment
    Eq,        // =
    PlusEq,    // +=
    MinusEq,   // -=
    StarEq,    // *=
    SlashEq,   // /=
    PercentEq, // %=
    AmpEq,     // &=
    PipeEq,    // |=
    CaretEq,   // ^=
    LtLtEq,    // <<=
    GtGtEq,    // >>=

    // Increment/Decrement
    PlusPlus,   // ++
    MinusMinus, // --

    // Member access
    Dot,   // .
    Arrow, // ->

    // Ternary
    Question, // ?
    Colon,    // :

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Semicolon, // ;
    Comma,     // ,
    Ellipsis,  // ...

    /// A whole `#...` line
    Preprocessor,
    /// Placeholder for a malformed lexeme that was already reported
    Error,
    Eof,
}

static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "int" => TokenKind::Int,
    "float" => TokenKind::Float,
    "double" => TokenKind::Double,
    "char" => TokenKind::Char,
    "void" => TokenKind::Void,
    "short" => TokenKind::Short,
    "long" => TokenKind::Long,
    "signed" => TokenKind::Signed,
    "unsigned" => TokenKind::Unsigned,
    "struct" => TokenKind::Struct,
    "typedef" => TokenKind::Typedef,
    "const" => TokenKind::Const,
    "static" => TokenKind::Static,
    "extern" => TokenKind::Extern,
    "auto" => TokenKind::Auto,
    "if" => TokenKind::If,
    "else" => TokenKind::Else,
    "while" => TokenKind::While,
    "do" => TokenKind::Do,
    "for" => TokenKind::For,
    "switch" => TokenKind::Switch,
    "case" => TokenKind::Case,
    "default" => TokenKind::Default,
    "break" => TokenKind::Break,
    "continue" => TokenKind::Continue,
    "return" => TokenKind::Return,
    "sizeof" => TokenKind::Sizeof,
};

/// Keyword lookup. `None` for ordinary identifiers.
pub fn keyword(ident: &str) -> Option<TokenKind> {
    KEYWORDS.get(ident).copied()
}

impl TokenKind {
    /// Source spelling for fixed tokens, a category name for the rest.
    pub fn text(self) -> &'static str {
        match self {
            TokenKind::Ident => "identifier",
            TokenKind::Number => "number",
            TokenKind::Str => "string literal",
            TokenKind::CharLit => "character literal",
            TokenKind::Int => "int",
            TokenKind::Float => "float",
            TokenKind::Double => "double",
            TokenKind::Char => "char",
            TokenKind::Void => "void",
            TokenKind::Short => "short",
            TokenKind::Long => "long",
            TokenKind::Signed => "signed",
            TokenKind::Unsigned => "unsigned",
            TokenKind::Struct => "struct",
            TokenKind::Typedef => "typedef",
            TokenKind::Const => "const",
            TokenKind::Static => "static",
            TokenKind::Extern => "extern",
            TokenKind::Auto => "auto",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::Do => "do",
            TokenKind::For => "for",
            TokenKind::Switch => "switch",
            TokenKind::Case => "case",
            TokenKind::Default => "default",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Return => "return",
            TokenKind::Sizeof => "sizeof",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Le => "<=",
            TokenKind::Gt => ">",
            TokenKind::Ge => ">=",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Bang => "!",
            TokenKind::Amp => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::Tilde => "~",
            TokenKind::LtLt => "<<",
            TokenKind::GtGt => ">>",
            TokenKind::Eq => "=",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::AmpEq => "&=",
            TokenKind::PipeEq => "|=",
            TokenKind::CaretEq => "^=",
            TokenKind::LtLtEq => "<<=",
            TokenKind::GtGtEq => ">>=",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::Dot => ".",
            TokenKind::Arrow => "->",
            TokenKind::Question => "?",
            TokenKind::Colon => ":",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Ellipsis => "...",
            TokenKind::Preprocessor => "preprocessor directive",
            TokenKind::Error => "invalid token",
            TokenKind::Eof => "end of input",
        }
    }

    /// Tokens with a fixed spelling are shown quoted, categories are not.
    fn is_category(self) -> bool {
        matches!(
            self,
            TokenKind::Ident
                | TokenKind::Number
                | TokenKind::Str
                | TokenKind::CharLit
                | TokenKind::Preprocessor
                | TokenKind::Error
                | TokenKind::Eof
        )
    }

    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::PlusEq
                | TokenKind::MinusEq
                | TokenKind::StarEq
                | TokenKind::SlashEq
                | TokenKind::PercentEq
                | TokenKind::AmpEq
                | TokenKind::PipeEq
                | TokenKind::CaretEq
                | TokenKind::LtLtEq
                | TokenKind::GtGtEq
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_category() {
            write!(f, "{}", self.text())
        } else {
            write!(f, "'{}'", self.text())
        }
    }
}

/// A lexeme with its category and starting position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            location,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            _ => write!(f, "'{}'", self.lexeme),
        }
    }
}

/// Lexer for C source code.
///
/// Implements [`Iterator`]; the sequence ends after the first `Eof` token.
/// Diagnostics are collected as a side effect and retrieved with
/// [`Lexer::into_diagnostics`].
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    diagnostics: DiagnosticSink,
    /// Locations of `#if`/`#ifdef`/`#ifndef` lines still waiting for `#endif`
    conditionals: Vec<SourceLocation>,
    finished: bool,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            diagnostics: DiagnosticSink::new(Some(SuggestionEngine::global())),
            conditionals: Vec::new(),
            finished: false,
        }
    }

    /// Replace the suggestion table used for lexical diagnostics.
    pub fn with_suggestions(mut self, suggestions: Option<&'static SuggestionEngine>) -> Self {
        self.diagnostics = DiagnosticSink::new(suggestions);
        self
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_vec()
    }

    /// Produce the next token. After the input is exhausted this keeps
    /// returning `Eof`.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let loc = self.current_location();
        let ch = match self.peek() {
            Some(ch) => ch,
            None => {
                self.close_conditionals();
                return Token::new(TokenKind::Eof, "", loc);
            }
        };

        match ch {
            '#' => self.preprocessor_line(),
            '"' => self.string_literal(),
            '\'' => self.char_literal(),
            '0'..='9' => self.number_literal(),
            '.' if self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.number_literal()
            }
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier_or_keyword(),
            _ => self.operator(),
        }
    }

    fn operator(&mut self) -> Token {
        let loc = self.current_location();
        let start = self.position;
        let ch = self.advance().unwrap_or('\0');

        let kind = match ch {
            '+' => self.pick(&[('+', TokenKind::PlusPlus), ('=', TokenKind::PlusEq)], TokenKind::Plus),
            '-' => self.pick(
                &[
                    ('-', TokenKind::MinusMinus),
                    ('=', TokenKind::MinusEq),
                    ('>', TokenKind::Arrow),
                ],
                TokenKind::Minus,
            ),
            '*' => self.pick(&[('=', TokenKind::StarEq)], TokenKind::Star),
            '/' => self.pick(&[('=', TokenKind::SlashEq)], TokenKind::Slash),
            '%' => self.pick(&[('=', TokenKind::PercentEq)], TokenKind::Percent),
            '=' => self.pick(&[('=', TokenKind::EqEq)], TokenKind::Eq),
            '!' => self.pick(&[('=', TokenKind::NotEq)], TokenKind::Bang),
            '^' => self.pick(&[('=', TokenKind::CaretEq)], TokenKind::Caret),
            '&' => self.pick(&[('&', TokenKind::AndAnd), ('=', TokenKind::AmpEq)], TokenKind::Amp),
            '|' => self.pick(&[('|', TokenKind::OrOr), ('=', TokenKind::PipeEq)], TokenKind::Pipe),
            '<' => {
                if self.peek() == Some('<') {
                    self.advance();
                    self.pick(&[('=', TokenKind::LtLtEq)], TokenKind::LtLt)
                } else {
                    self.pick(&[('=', TokenKind::Le)], TokenKind::Lt)
                }
            }
            '>' => {
                if self.peek() == Some('>') {
                    self.advance();
                    self.pick(&[('=', TokenKind::GtGtEq)], TokenKind::GtGt)
                } else {
                    self.pick(&[('=', TokenKind::Ge)], TokenKind::Gt)
                }
            }
            '.' => {
                if self.peek() == Some('.') && self.peek_ahead(1) == Some('.') {
                    self.advance();
                    self.advance();
                    TokenKind::Ellipsis
                } else {
                    TokenKind::Dot
                }
            }
            '~' => TokenKind::Tilde,
            '?' => TokenKind::Question,
            ':' => TokenKind::Colon,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            _ => {
                self.diagnostics
                    .report(loc, format!("Invalid character: '{}'", ch));
                TokenKind::Error
            }
        };

        Token::new(kind, self.slice(start), loc)
    }

    /// Consume the first follower that matches, or fall back to `single`.
    fn pick(&mut self, followers: &[(char, TokenKind)], single: TokenKind) -> TokenKind {
        for &(next, kind) in followers {
            if self.peek() == Some(next) {
                self.advance();
                return kind;
            }
        }
        single
    }

    /// Numbers: decimal, hex, one optional decimal point, exponent and
    /// `u`/`l`/`f` suffixes. A second decimal point or a stray letter makes
    /// the whole lexeme an error token.
    fn number_literal(&mut self) -> Token {
        let loc = self.current_location();
        let start = self.position;

        if self.peek() == Some('0') && matches!(self.peek_ahead(1), Some('x') | Some('X')) {
            self.advance();
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
            }
            return self.finish_number(start, loc, 0);
        }

        let mut dots = 0;
        while let Some(ch) = self.peek() {
            match ch {
                '0'..='9' => {
                    self.advance();
                }
                '.' => {
                    dots += 1;
                    self.advance();
                }
                'e' | 'E'
                    if self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit())
                        || (matches!(self.peek_ahead(1), Some('+') | Some('-'))
                            && self.peek_ahead(2).is_some_and(|c| c.is_ascii_digit())) =>
                {
                    self.advance();
                    self.advance();
                    while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                        self.advance();
                    }
                }
                _ => break,
            }
        }

        self.finish_number(start, loc, dots)
    }

    fn finish_number(&mut self, start: usize, loc: SourceLocation, dots: usize) -> Token {
        let mut suffix_len = 0;
        while let Some(ch) = self.peek() {
            if suffix_len < 3 && matches!(ch, 'u' | 'U' | 'l' | 'L' | 'f' | 'F') {
                suffix_len += 1;
                self.advance();
            } else {
                break;
            }
        }

        let trailing = self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
        if trailing {
            while self
                .peek()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
            {
                self.advance();
            }
        }

        let lexeme = self.slice(start);
        if dots > 1 || (trailing && lexeme.matches('.').count() > 1) {
            self.diagnostics
                .report(loc, "Invalid numeric literal: multiple decimal points");
            Token::new(TokenKind::Error, lexeme, loc)
        } else if trailing {
            self.diagnostics
                .report(loc, format!("Invalid numeric literal: '{}'", lexeme));
            Token::new(TokenKind::Error, lexeme, loc)
        } else {
            Token::new(TokenKind::Number, lexeme, loc)
        }
    }

    /// String literal, quotes included in the lexeme
    fn string_literal(&mut self) -> Token {
        let loc = self.current_location();
        let start = self.position;
        self.advance(); // opening quote

        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.diagnostics.report(loc, "Unterminated string literal");
                    return Token::new(TokenKind::Error, self.slice(start), loc);
                }
                Some('"') => {
                    self.advance();
                    return Token::new(TokenKind::Str, self.slice(start), loc);
                }
                Some('\\') => {
                    self.advance();
                    // An escaped newline continues the literal on the next line
                    if self.peek().is_some() {
                        self.advance();
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Character literal. Escape sequences count as one character.
    fn char_literal(&mut self) -> Token {
        let loc = self.current_location();
        let start = self.position;
        self.advance(); // opening quote

        let mut count = 0;
        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.diagnostics
                        .report(loc, "Unterminated character literal");
                    return Token::new(TokenKind::Error, self.slice(start), loc);
                }
                Some('\'') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    self.escape_sequence();
                    count += 1;
                }
                Some(_) => {
                    self.advance();
                    count += 1;
                }
            }
        }

        match count {
            0 => self.diagnostics.report(loc, "Empty character literal"),
            1 => {}
            _ => self.diagnostics.report(loc, "Multi-character constant"),
        }
        Token::new(TokenKind::CharLit, self.slice(start), loc)
    }

    /// Consume the body of an escape; the backslash is already consumed.
    fn escape_sequence(&mut self) {
        match self.peek() {
            None | Some('\n') => {}
            Some('x') => {
                self.advance();
                while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                    self.advance();
                }
            }
            Some('0'..='7') => {
                self.advance();
                for _ in 0..2 {
                    if self.peek().is_some_and(|c| ('0'..='7').contains(&c)) {
                        self.advance();
                    }
                }
            }
            Some(_) => {
                self.advance();
            }
        }
    }

    fn identifier_or_keyword(&mut self) -> Token {
        let loc = self.current_location();
        let start = self.position;

        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }

        let ident = self.slice(start);
        let kind = keyword(&ident).unwrap_or(TokenKind::Ident);
        Token::new(kind, ident, loc)
    }

    /// Capture a `#` line, honouring backslash continuations, and check it.
    fn preprocessor_line(&mut self) -> Token {
        let loc = self.current_location();
        let start = self.position;

        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            if ch == '\\' && self.continues_line() {
                self.advance();
                if self.peek() == Some('\r') {
                    self.advance();
                }
            }
            self.advance();
        }

        let line = self.slice(start);
        self.check_directive(&line, loc);
        Token::new(TokenKind::Preprocessor, line, loc)
    }

    fn continues_line(&self) -> bool {
        match self.peek_ahead(1) {
            Some('\n') => true,
            Some('\r') => self.peek_ahead(2) == Some('\n'),
            _ => false,
        }
    }

    fn check_directive(&mut self, line: &str, loc: SourceLocation) {
        let body = line.trim_start_matches('#').trim_start();
        let name_len = body
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .unwrap_or(body.len());
        let (name, rest) = body.split_at(name_len);

        match name {
            "include" => {
                if !valid_include_target(rest.trim()) {
                    self.diagnostics.report(loc, "Invalid #include syntax");
                }
            }
            "if" | "ifdef" | "ifndef" => self.conditionals.push(loc),
            "endif" => {
                if self.conditionals.pop().is_none() {
                    self.diagnostics.report(loc, "Unmatched #endif");
                }
            }
            _ => {}
        }
    }

    fn close_conditionals(&mut self) {
        for open in std::mem::take(&mut self.conditionals) {
            self.diagnostics.report(
                open,
                format!("Missing #endif for #if opened at line {}", open.line),
            );
        }
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment();
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Skip multi-line comment (/* ... */). A runaway comment is reported at
    /// its opening and consumes the rest of the input.
    fn skip_block_comment(&mut self) {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }

        trace!(line = start_loc.line, "unterminated block comment");
        self.diagnostics.report(start_loc, "Unterminated comment");
    }

    fn slice(&self, start: usize) -> String {
        self.input[start..self.position].iter().collect()
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(token)
    }
}

/// `<name>` or `"name"` with a non-empty name; anything may follow.
fn valid_include_target(target: &str) -> bool {
    let close = match target.chars().next() {
        Some('<') => '>',
        Some('"') => '"',
        _ => return false,
    };
    target[1..]
        .find(close)
        .is_some_and(|end| !target[1..1 + end].trim().is_empty())
}

/// Tokenize a whole buffer. The token list always ends with `Eof`.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut lexer = Lexer::new(source);
    let tokens: Vec<Token> = lexer.by_ref().collect();
    (tokens, lexer.into_diagnostics())
}
