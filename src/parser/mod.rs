//! C source code parser
//!
//! This module turns C source text into diagnostics in a single pass:
//! - [`lexer`]: Tokenization (source text → tokens, lexical diagnostics)
//! - [`parse`]: The [`Parser`] and its recovery machinery
//! - `declarations`, `statements`, `expressions`: the grammar, split into
//!   `impl Parser` blocks, with semantic checks run inline
//!
//! # Supported C Subset
//!
//! - Types: `int`, `float`, `double`, `char`, `void`, structs, pointers,
//!   arrays, typedef names, `const`
//! - Statements: declarations, control flow (`if`, `while`, `do`, `for`,
//!   `switch`), `return`, `break`, `continue`
//! - Expressions: arithmetic, comparison, logical, bitwise, ternary, casts,
//!   `sizeof`, function calls, member access
//! - Preprocessor lines are tokenized whole; only `#include` and the
//!   conditional nesting are checked
//! - No unions, enums, function pointers, or `goto`
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent with inline type checking. There is no
//! syntax tree and no operator precedence: binary operators chain left to
//! right. No external parser generator dependencies.

mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use parse::{Parser, DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_NESTING};
