//! Statement parsing implementation
//!
//! This module handles parsing of all C statement types:
//!
//! - Declarations: `int x = 42;`, block-scope `typedef`
//! - Control flow: `if`, `while`, `for`, `do-while`, `switch`
//! - Jump statements: `return`, `break`, `continue`
//! - Labels: `case`, `default`
//! - Compound statements: `{ ... }` (each opens a scope)
//! - Expression statements: function calls, assignments
//!
//! # Grammar
//!
//! ```text
//! statement ::= block | if_stmt | while_stmt | do_while_stmt | for_stmt
//!             | switch_stmt | case_label | default_label | return_stmt
//!             | break_stmt | continue_stmt | declaration | expr_stmt | ";"
//! ```
//!
//! A token that cannot start a statement is left in place; the enclosing
//! block loop skips it through the progress guard.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::analysis::types::{is_compatible, TypeDesc};
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;

impl Parser {
    /// Parse block statements (inside braces, excluding the braces themselves)
    pub(crate) fn parse_block_statements(&mut self) {
        let mut iterations = 0;

        while !self.check(TokenKind::RBrace) && !self.is_at_end() && self.tick(&mut iterations) {
            self.recovering = false;
            let before = self.position;
            self.parse_statement();
            self.ensure_progress(before);
        }
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) {
        if !self.enter_nested() {
            return;
        }
        self.parse_statement_inner();
        self.leave_nested();
    }

    fn parse_statement_inner(&mut self) {
        match self.peek().kind {
            TokenKind::LBrace => self.parse_compound_statement(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Do => self.parse_do_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Switch => self.parse_switch_statement(),
            TokenKind::Case | TokenKind::Default => self.parse_switch_label(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Break => self.parse_break_statement(),
            TokenKind::Continue => self.parse_continue_statement(),
            TokenKind::Typedef => self.parse_typedef(),
            TokenKind::Semicolon | TokenKind::Preprocessor | TokenKind::Error => {
                self.advance();
            }
            _ if self.is_type_start() => self.parse_declaration(),
            _ if self.starts_expression() => {
                self.parse_expression();
                self.expect(TokenKind::Semicolon);
            }
            // Left for the progress guard
            _ => {}
        }
    }

    /// `{ statements }` in its own scope
    fn parse_compound_statement(&mut self) {
        self.advance(); // '{'
        self.symbols.push_scope();
        self.parse_block_statements();
        self.expect(TokenKind::RBrace);
        self.symbols.pop_scope();
    }

    /// The statement governed by a control keyword.
    fn parse_body(&mut self, keyword: &str) {
        if matches!(self.peek().kind, TokenKind::RBrace | TokenKind::Eof) {
            let found = self.peek().clone();
            self.error(
                found.location,
                format!("Expected statement after '{}' but got {}", keyword, found),
            );
            return;
        }
        self.parse_statement();
    }

    /// `( expression )`
    fn parse_condition(&mut self) {
        self.expect(TokenKind::LParen);
        self.parse_expression();
        self.expect(TokenKind::RParen);
    }

    fn parse_if_statement(&mut self) {
        self.advance(); // 'if'
        self.parse_condition();
        self.parse_body("if");

        if self.match_token(TokenKind::Else) {
            self.parse_body("else");
        }
    }

    fn parse_while_statement(&mut self) {
        self.advance(); // 'while'
        self.parse_condition();
        self.parse_loop_body("while");
    }

    fn parse_do_while_statement(&mut self) {
        self.advance(); // 'do'
        self.parse_loop_body("do");
        self.expect(TokenKind::While);
        self.parse_condition();
        self.expect(TokenKind::Semicolon);
    }

    /// The init clause gets its own scope: `for (int i = 0; ...)`.
    fn parse_for_statement(&mut self) {
        self.advance(); // 'for'
        self.expect(TokenKind::LParen);
        self.symbols.push_scope();

        if self.is_type_start() {
            // Consumes its own ';'
            self.parse_declaration();
        } else {
            if !self.check(TokenKind::Semicolon) {
                self.parse_expression();
            }
            self.expect(TokenKind::Semicolon);
        }

        if !self.check(TokenKind::Semicolon) {
            self.parse_expression();
        }
        self.expect(TokenKind::Semicolon);

        if !self.check(TokenKind::RParen) {
            self.parse_expression();
        }
        self.expect(TokenKind::RParen);

        self.parse_loop_body("for");
        self.symbols.pop_scope();
    }

    fn parse_loop_body(&mut self, keyword: &str) {
        if let Some(function) = self.function.as_mut() {
            function.loop_depth += 1;
        }
        self.parse_body(keyword);
        if let Some(function) = self.function.as_mut() {
            function.loop_depth -= 1;
        }
    }

    fn parse_switch_statement(&mut self) {
        self.advance(); // 'switch'
        self.parse_condition();

        if let Some(function) = self.function.as_mut() {
            function.switch_depth += 1;
        }
        self.parse_body("switch");
        if let Some(function) = self.function.as_mut() {
            function.switch_depth -= 1;
        }
    }

    /// `case expr:` or `default:`
    fn parse_switch_label(&mut self) {
        let label = self.advance();
        let in_switch = self
            .function
            .as_ref()
            .is_some_and(|function| function.switch_depth > 0);
        if !in_switch {
            self.error(
                label.location,
                format!("'{}' label not within a switch statement", label.lexeme),
            );
        }

        if label.kind == TokenKind::Case {
            self.parse_conditional();
        }
        self.expect(TokenKind::Colon);
    }

    fn parse_break_statement(&mut self) {
        let keyword = self.advance();
        let breakable = self
            .function
            .as_ref()
            .is_some_and(|function| function.loop_depth + function.switch_depth > 0);
        if !breakable {
            self.error(
                keyword.location,
                "'break' statement not within a loop or switch",
            );
        }
        self.expect(TokenKind::Semicolon);
    }

    fn parse_continue_statement(&mut self) {
        let keyword = self.advance();
        let in_loop = self
            .function
            .as_ref()
            .is_some_and(|function| function.loop_depth > 0);
        if !in_loop {
            self.error(keyword.location, "'continue' statement not within a loop");
        }
        self.expect(TokenKind::Semicolon);
    }

    /// Marks the function as returning and checks the value against its
    /// return type.
    fn parse_return_statement(&mut self) {
        let keyword = self.advance();

        let current = self.function.as_mut().map(|function| {
            function.has_return = true;
            (function.name.clone(), function.return_type.clone())
        });
        let Some((name, return_type)) = current else {
            // Only reachable through recovery; statements live in bodies
            if !self.check(TokenKind::Semicolon) {
                self.parse_expression();
            }
            self.expect(TokenKind::Semicolon);
            return;
        };

        if self.check(TokenKind::Semicolon) {
            if !return_type.is_void_value() {
                self.error(
                    keyword.location,
                    format!("Return without a value in non-void function '{}'", name),
                );
            }
        } else {
            let value = self.parse_expression();
            if return_type.is_void_value() {
                self.error(
                    value.location,
                    format!("Return with a value in void function '{}'", name),
                );
            } else if !is_compatible(&TypeDesc::Known(return_type.value_type()), &value.ty) {
                self.error(
                    value.location,
                    format!(
                        "Type mismatch: cannot return '{}' from function '{}' returning '{}'",
                        value.ty, name, return_type
                    ),
                );
            }
        }

        self.expect(TokenKind::Semicolon);
    }
}
