//! Expression parsing implementation
//!
//! Expressions are parsed and type-checked in one pass. Every production
//! returns an [`Operand`]: the inferred [`TypeDesc`] of the value plus a
//! [`Place`] describing what it denotes, which is what the lvalue checks
//! for `=`, `+=`, `++` and `--` look at.
//!
//! # Supported Expressions
//!
//! - Literals: integers, floating point, characters, strings (adjacent
//!   string literals join)
//! - Identifiers, resolved against the builtin registry first and then
//!   the scopes innermost-first
//! - Binary operators: arithmetic, comparison, logical, bitwise, shifts
//! - Unary operators: `-`, `+`, `!`, `~`, `&`, `*`, `++`, `--`, `sizeof`
//! - Postfix: `[]`, `.`, `->`, `()`, `++`, `--`
//! - Ternary: `? :`, casts `(type)expr`, comma
//!
//! # Binary operators
//!
//! Binary operators form a flat chain with no precedence:
//! `a + b * c` groups as `(a + b) * c`. Each operator is applied to the
//! accumulated left-hand side before the next one is considered.
//! Assignment is right-associative and binds loosest.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::analysis::symbols::{FunctionSig, SymbolKind};
use crate::analysis::types::{is_compatible, result_type, BinOp, CType, TypeDesc};
use crate::diagnostics::SourceLocation;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::Parser;

/// What an expression denotes, as far as modifiability is concerned
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Place {
    /// A declared variable
    Variable { name: String, is_const: bool },
    /// `*p`, `a[i]`, `s.m`, `p->m`
    Storage { is_const: bool },
    /// A user-declared function name
    Function(String),
    /// A builtin function name
    Builtin(String),
    /// A builtin constant such as `NULL`
    Constant(String),
    /// An identifier already reported as undeclared
    Undeclared,
    /// Any other value
    Value,
}

/// A parsed expression: its type, what it denotes, and where it starts.
#[derive(Debug, Clone)]
pub(crate) struct Operand {
    pub(crate) ty: TypeDesc,
    pub(crate) place: Place,
    pub(crate) location: SourceLocation,
}

impl Operand {
    fn value(ty: TypeDesc, location: SourceLocation) -> Self {
        Operand {
            ty,
            place: Place::Value,
            location,
        }
    }

    fn unknown(location: SourceLocation) -> Self {
        Self::value(TypeDesc::Unknown, location)
    }

    fn storage(ty: TypeDesc, location: SourceLocation) -> Self {
        let is_const = ty.known().is_some_and(|ty| ty.is_const);
        Operand {
            ty,
            place: Place::Storage { is_const },
            location,
        }
    }
}

impl BinOp {
    /// Binary operator for a token, if it is one.
    pub fn from_token(kind: TokenKind) -> Option<BinOp> {
        let op = match kind {
            TokenKind::Plus | TokenKind::PlusEq => BinOp::Add,
            TokenKind::Minus | TokenKind::MinusEq => BinOp::Sub,
            TokenKind::Star | TokenKind::StarEq => BinOp::Mul,
            TokenKind::Slash | TokenKind::SlashEq => BinOp::Div,
            TokenKind::Percent | TokenKind::PercentEq => BinOp::Mod,
            TokenKind::EqEq => BinOp::Eq,
            TokenKind::NotEq => BinOp::Ne,
            TokenKind::Lt => BinOp::Lt,
            TokenKind::Le => BinOp::Le,
            TokenKind::Gt => BinOp::Gt,
            TokenKind::Ge => BinOp::Ge,
            TokenKind::AndAnd => BinOp::And,
            TokenKind::OrOr => BinOp::Or,
            TokenKind::Amp | TokenKind::AmpEq => BinOp::BitAnd,
            TokenKind::Pipe | TokenKind::PipeEq => BinOp::BitOr,
            TokenKind::Caret | TokenKind::CaretEq => BinOp::BitXor,
            TokenKind::LtLt | TokenKind::LtLtEq => BinOp::Shl,
            TokenKind::GtGt | TokenKind::GtGtEq => BinOp::Shr,
            _ => return None,
        };
        Some(op)
    }
}

/// Binary operators that may continue a chain (compound assignments excluded)
fn chain_operator(kind: TokenKind) -> Option<BinOp> {
    if kind.is_assignment() {
        None
    } else {
        BinOp::from_token(kind)
    }
}

impl Parser {
    /// Parse expression (top-level entry point, includes the comma operator)
    pub(crate) fn parse_expression(&mut self) -> Operand {
        let mut operand = self.parse_assignment();
        while self.match_token(TokenKind::Comma) {
            let location = operand.location;
            let next = self.parse_assignment();
            operand = Operand::value(next.ty, location);
        }
        operand
    }

    /// Parse assignment (right-associative) or a conditional expression
    pub(crate) fn parse_assignment(&mut self) -> Operand {
        let target = self.parse_conditional();

        if !self.peek().kind.is_assignment() {
            return target;
        }
        let op = self.advance();
        if !self.enter_nested() {
            return Operand::unknown(target.location);
        }
        let value = self.parse_assignment();
        self.leave_nested();

        self.check_modifiable(&target, "assign to");

        if op.kind == TokenKind::Eq {
            if let TypeDesc::Known(target_ty) = &target.ty {
                self.check_conversion(&target_ty.value_type(), &value);
            }
        } else if let Some(bin_op) = BinOp::from_token(op.kind) {
            match result_type(&target.ty, &value.ty, bin_op) {
                TypeDesc::Invalid => self.error(
                    op.location,
                    format!(
                        "Type mismatch: invalid operands to '{}' ('{}' and '{}')",
                        op.lexeme, target.ty, value.ty
                    ),
                ),
                // `x op= v` stores `x op v` back into `x`
                result => {
                    if let TypeDesc::Known(target_ty) = &target.ty {
                        self.check_conversion(
                            &target_ty.value_type(),
                            &Operand::value(result, value.location),
                        );
                    }
                }
            }
        }

        let ty = match target.ty {
            TypeDesc::Known(ty) => TypeDesc::Known(ty.value_type()),
            other => other,
        };
        Operand::value(ty, target.location)
    }

    /// `chain ? expression : conditional`
    pub(crate) fn parse_conditional(&mut self) -> Operand {
        let condition = self.parse_binary_chain();
        if !self.match_token(TokenKind::Question) {
            return condition;
        }
        if !self.enter_nested() {
            return Operand::unknown(condition.location);
        }

        let when_true = self.parse_expression();
        self.expect(TokenKind::Colon);
        let when_false = self.parse_conditional();
        self.leave_nested();

        let ty = if is_compatible(&when_true.ty, &when_false.ty) {
            when_true.ty
        } else if is_compatible(&when_false.ty, &when_true.ty) {
            when_false.ty
        } else {
            TypeDesc::Unknown
        };
        Operand::value(ty, condition.location)
    }

    /// `unary (binop unary)*`, applied strictly left to right
    fn parse_binary_chain(&mut self) -> Operand {
        let mut acc = self.parse_unary();

        while let Some(op) = chain_operator(self.peek().kind) {
            let op_token = self.advance();
            let rhs = self.parse_unary();

            let ty = match result_type(&acc.ty, &rhs.ty, op) {
                TypeDesc::Invalid => {
                    self.error(
                        op_token.location,
                        format!(
                            "Type mismatch: invalid operands to binary '{}' ('{}' and '{}')",
                            op, acc.ty, rhs.ty
                        ),
                    );
                    TypeDesc::Unknown
                }
                ty => ty,
            };
            acc = Operand::value(ty, acc.location);
        }

        acc
    }

    /// Prefix operators, casts and `sizeof`
    pub(crate) fn parse_unary(&mut self) -> Operand {
        let location = self.current_location();
        if !self.enter_nested() {
            return Operand::unknown(location);
        }
        let operand = self.parse_unary_inner(location);
        self.leave_nested();
        operand
    }

    fn parse_unary_inner(&mut self, location: SourceLocation) -> Operand {
        match self.peek().kind {
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let op = self.advance();
                let operand = self.parse_unary();
                self.check_modifiable(&operand, &format!("apply '{}' to", op.lexeme));
                Operand::value(operand.ty, location)
            }
            TokenKind::Minus | TokenKind::Plus | TokenKind::Tilde => {
                let op = self.advance();
                let operand = self.parse_unary();
                let integral_only = op.kind == TokenKind::Tilde;
                let ty = match operand.ty.known() {
                    Some(ty) if (integral_only && !ty.is_integer()) || !ty.is_numeric() => {
                        self.error(
                            op.location,
                            format!(
                                "Type mismatch: invalid operand to unary '{}' ('{}')",
                                op.lexeme, ty
                            ),
                        );
                        TypeDesc::Unknown
                    }
                    Some(ty) if ty.is_floating() && !integral_only => {
                        TypeDesc::Known(ty.value_type())
                    }
                    Some(_) => TypeDesc::Known(CType::int()),
                    None => TypeDesc::Unknown,
                };
                Operand::value(ty, location)
            }
            TokenKind::Bang => {
                self.advance();
                self.parse_unary();
                Operand::value(TypeDesc::Known(CType::int()), location)
            }
            TokenKind::Star => {
                let star = self.advance();
                let operand = self.parse_unary();
                self.dereference(operand, star.location, location)
            }
            TokenKind::Amp => {
                self.advance();
                let operand = self.parse_unary();
                let ty = match (&operand.place, operand.ty.known()) {
                    (Place::Function(_) | Place::Builtin(_), _) => TypeDesc::Unknown,
                    (_, Some(ty)) if ty.is_array => TypeDesc::Known(ty.decayed()),
                    (_, Some(ty)) => TypeDesc::Known(ty.clone().with_pointer()),
                    (_, None) => TypeDesc::Unknown,
                };
                Operand::value(ty, location)
            }
            TokenKind::Sizeof => {
                self.advance();
                if self.check(TokenKind::LParen) && self.is_type_start_at(1) {
                    self.advance();
                    self.parse_type_name();
                    self.expect(TokenKind::RParen);
                } else {
                    self.parse_unary();
                }
                Operand::value(TypeDesc::Known(CType::int().with_alias("size_t")), location)
            }
            TokenKind::LParen if self.is_type_start_at(1) => {
                self.advance();
                let ty = self.parse_type_name();
                self.expect(TokenKind::RParen);
                self.parse_unary();
                let ty = ty.map_or(TypeDesc::Unknown, TypeDesc::Known);
                Operand::value(ty, location)
            }
            _ => self.parse_postfix(),
        }
    }

    /// Type name inside a cast or `sizeof`: specifier plus `*`s.
    fn parse_type_name(&mut self) -> Option<CType> {
        let spec = self.parse_type_specifier()?;
        Some(self.parse_pointers(spec.ty))
    }

    fn dereference(
        &mut self,
        operand: Operand,
        at: SourceLocation,
        location: SourceLocation,
    ) -> Operand {
        let Some(ty) = operand.ty.known() else {
            return Operand::storage(TypeDesc::Unknown, location);
        };
        let decayed = ty.decayed();
        match decayed.element() {
            Some(element) if decayed.pointer_depth > 0 => {
                Operand::storage(TypeDesc::Known(element), location)
            }
            _ => {
                self.error(
                    at,
                    format!("Type mismatch: cannot dereference non-pointer type '{}'", ty),
                );
                Operand::storage(TypeDesc::Unknown, location)
            }
        }
    }

    /// Calls, subscripts, member access, postfix `++`/`--`
    fn parse_postfix(&mut self) -> Operand {
        let mut operand = self.parse_primary();

        loop {
            match self.peek().kind {
                TokenKind::LParen => operand = self.parse_call(operand),
                TokenKind::LBracket => operand = self.parse_subscript(operand),
                TokenKind::Dot | TokenKind::Arrow => operand = self.parse_member_access(operand),
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    let op = self.advance();
                    self.check_modifiable(&operand, &format!("apply '{}' to", op.lexeme));
                    operand = Operand::value(operand.ty, operand.location);
                }
                _ => break,
            }
        }

        operand
    }

    fn parse_subscript(&mut self, base: Operand) -> Operand {
        let bracket = self.advance(); // '['
        let index = self.parse_expression();
        self.expect(TokenKind::RBracket);

        if let Some(index_ty) = index.ty.known() {
            if !index_ty.is_integer() {
                self.error(
                    index.location,
                    format!("Type mismatch: array subscript is not an integer ('{}')", index_ty),
                );
            }
        }

        let Some(ty) = base.ty.known() else {
            return Operand::storage(TypeDesc::Unknown, base.location);
        };
        match ty.element() {
            Some(element) => Operand::storage(TypeDesc::Known(element), base.location),
            None => {
                self.error(
                    bracket.location,
                    format!(
                        "Type mismatch: subscripted value of type '{}' is not an array or pointer",
                        ty
                    ),
                );
                Operand::storage(TypeDesc::Unknown, base.location)
            }
        }
    }

    /// `.member` on a struct value, `->member` on a pointer to one
    fn parse_member_access(&mut self, base: Operand) -> Operand {
        let op = self.advance();
        let Some(member) = self.expect_identifier() else {
            return Operand::unknown(base.location);
        };
        let Some(ty) = base.ty.known().cloned() else {
            return Operand::storage(TypeDesc::Unknown, base.location);
        };

        let is_arrow = op.kind == TokenKind::Arrow;
        let Some(tag) = ty.struct_tag().map(str::to_string) else {
            self.error(
                op.location,
                format!("Member access on non-struct type '{}'", ty),
            );
            return Operand::storage(TypeDesc::Unknown, base.location);
        };

        if is_arrow && ty.decayed().pointer_depth != 1 {
            self.error(
                op.location,
                format!("Member access with '->' on non-pointer type '{}'; use '.'", ty),
            );
        } else if !is_arrow && ty.decayed().pointer_depth != 0 {
            self.error(
                op.location,
                format!("Member access with '.' on pointer type '{}'; use '->'", ty),
            );
        }

        // Outer `None`: the struct has no definition yet
        let resolved = self
            .symbols
            .lookup_struct(&tag)
            .filter(|def| def.is_complete())
            .map(|def| def.member(&member.lexeme).cloned());
        match resolved {
            Some(Some(member_ty)) => Operand::storage(TypeDesc::Known(member_ty), base.location),
            Some(None) => {
                self.error(
                    member.location,
                    format!("No member named '{}' in 'struct {}'", member.lexeme, tag),
                );
                Operand::storage(TypeDesc::Unknown, base.location)
            }
            None => {
                self.error(member.location, format!("Unknown struct '{}'", tag));
                Operand::storage(TypeDesc::Unknown, base.location)
            }
        }
    }

    /// `callee ( args )`
    fn parse_call(&mut self, callee: Operand) -> Operand {
        self.advance(); // '('

        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            let mut iterations = 0;
            while self.tick(&mut iterations) {
                args.push(self.parse_assignment());
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen);

        let builtins = self.symbols.builtins();
        let ty = match &callee.place {
            Place::Builtin(name) => match builtins.function(name) {
                Some(function) => {
                    if let Some(message) = function.check_arity(args.len()) {
                        self.error(callee.location, message);
                    }
                    TypeDesc::Known(function.return_type.clone())
                }
                None => TypeDesc::Unknown,
            },
            Place::Function(name) => {
                let sig = match self.symbols.lookup(name).map(|s| &s.kind) {
                    Some(SymbolKind::Function(sig)) => Some(sig.clone()),
                    _ => None,
                };
                match sig {
                    Some(sig) => {
                        self.check_arguments(name, &sig, &args, callee.location);
                        TypeDesc::Known(sig.return_type)
                    }
                    None => TypeDesc::Unknown,
                }
            }
            Place::Undeclared => TypeDesc::Unknown,
            Place::Variable { name, .. } | Place::Constant(name) => {
                if !callee.ty.is_unknown() {
                    self.error(
                        callee.location,
                        format!("Called object '{}' is not a function", name),
                    );
                }
                TypeDesc::Unknown
            }
            Place::Storage { .. } | Place::Value => TypeDesc::Unknown,
        };

        Operand::value(ty, callee.location)
    }

    fn check_arguments(
        &mut self,
        name: &str,
        sig: &FunctionSig,
        args: &[Operand],
        at: SourceLocation,
    ) {
        let Some(params) = &sig.params else {
            return;
        };

        if sig.variadic && args.len() < params.len() {
            self.error(
                at,
                format!(
                    "Argument count mismatch: '{}' expects at least {} argument(s) but got {}",
                    name,
                    params.len(),
                    args.len()
                ),
            );
        } else if !sig.variadic && args.len() != params.len() {
            self.error(
                at,
                format!(
                    "Argument count mismatch: '{}' expects {} argument(s) but got {}",
                    name,
                    params.len(),
                    args.len()
                ),
            );
        }

        for (index, (param, arg)) in params.iter().zip(args).enumerate() {
            if !is_compatible(&TypeDesc::Known(param.value_type()), &arg.ty) {
                self.error(
                    arg.location,
                    format!(
                        "Type mismatch: argument {} of '{}' expects '{}' but got '{}'",
                        index + 1,
                        name,
                        param,
                        arg.ty
                    ),
                );
            }
        }
    }

    /// Literals, identifiers and parenthesized expressions
    fn parse_primary(&mut self) -> Operand {
        let token = self.peek().clone();
        let location = token.location;

        match token.kind {
            TokenKind::Number => {
                self.advance();
                Operand::value(TypeDesc::Known(number_type(&token.lexeme)), location)
            }
            TokenKind::CharLit => {
                self.advance();
                Operand::value(TypeDesc::Known(CType::char()), location)
            }
            TokenKind::Str => {
                // "a" "b" is one literal
                while self.match_token(TokenKind::Str) {}
                Operand::value(TypeDesc::Known(CType::string()), location)
            }
            TokenKind::Ident => {
                self.advance();
                self.resolve_identifier(&token)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression();
                self.expect(TokenKind::RParen);
                // Parentheses keep the place: `(x) = 1` is an assignment to x
                Operand {
                    location,
                    ..inner
                }
            }
            TokenKind::Error => {
                // Already reported by the lexer
                self.advance();
                Operand::unknown(location)
            }
            TokenKind::Semicolon
            | TokenKind::RParen
            | TokenKind::RBrace
            | TokenKind::RBracket
            | TokenKind::Comma
            | TokenKind::Colon
            | TokenKind::Eof => {
                self.error(location, format!("Expected expression but got {}", token));
                Operand::unknown(location)
            }
            _ => {
                self.advance();
                self.error(location, format!("Unexpected token '{}'", token.lexeme));
                Operand::unknown(location)
            }
        }
    }

    /// Builtins resolve first, then user scopes innermost-first.
    fn resolve_identifier(&mut self, token: &Token) -> Operand {
        let name = token.lexeme.clone();
        let location = token.location;
        let builtins = self.symbols.builtins();

        if !self.symbols.exists(&name) {
            if builtins.type_name(&name).is_some() {
                self.error(
                    location,
                    format!("Unexpected type name '{}' in expression", name),
                );
                return Operand::unknown(location);
            }
            if self.check(TokenKind::LParen) {
                self.error(location, format!("Undeclared function '{}'", name));
            } else {
                self.error(location, format!("Undeclared variable '{}'", name));
            }
            return Operand {
                ty: TypeDesc::Unknown,
                place: Place::Undeclared,
                location,
            };
        }

        let ty = self.symbols.type_of(&name);
        let place = if builtins.is_function(&name) {
            Place::Builtin(name)
        } else if builtins.constant(&name).is_some() {
            Place::Constant(name)
        } else {
            let (is_function, is_typedef) = self
                .symbols
                .lookup(&name)
                .map_or((false, false), |symbol| (symbol.is_function(), symbol.is_typedef()));
            if is_typedef {
                self.error(
                    location,
                    format!("Unexpected type name '{}' in expression", name),
                );
                return Operand::unknown(location);
            }
            if is_function {
                Place::Function(name)
            } else {
                let is_const = ty.known().is_some_and(|ty| ty.is_const);
                Place::Variable { name, is_const }
            }
        };
        Operand {
            ty,
            place,
            location,
        }
    }

    /// Target of `=`, compound assignment, `++` or `--` must be a modifiable
    /// variable or storage location.
    pub(crate) fn check_modifiable(&mut self, target: &Operand, action: &str) {
        let problem = match &target.place {
            Place::Undeclared => None,
            Place::Variable { name, is_const } => {
                if *is_const {
                    Some(format!("const variable '{}'", name))
                } else if target.ty.known().is_some_and(|ty| ty.is_array) {
                    Some(format!("array '{}'", name))
                } else {
                    None
                }
            }
            Place::Storage { is_const } => {
                if *is_const {
                    Some("read-only location".to_string())
                } else if target.ty.known().is_some_and(|ty| ty.is_array) {
                    Some("an array".to_string())
                } else {
                    None
                }
            }
            Place::Function(name) | Place::Builtin(name) => Some(format!("function '{}'", name)),
            Place::Constant(name) => Some(format!("builtin constant '{}'", name)),
            Place::Value => Some("an rvalue".to_string()),
        };

        if let Some(problem) = problem {
            self.error(
                target.location,
                format!("Invalid lvalue: cannot {} {}", action, problem),
            );
        }
    }
}

/// Type of a numeric literal: `0` is the null constant, a decimal point or
/// exponent makes it floating (`f` suffix for float).
fn number_type(lexeme: &str) -> CType {
    let lower = lexeme.to_ascii_lowercase();
    let is_hex = lower.starts_with("0x");
    if !is_hex && (lower.contains('.') || lower.contains('e')) {
        if lower.ends_with('f') {
            CType::float()
        } else {
            CType::double()
        }
    } else if lexeme == "0" {
        CType::null_literal()
    } else {
        CType::int()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::builtins::BuiltinRegistry;
    use crate::parser::lexer::tokenize;

    fn messages(source: &str) -> Vec<String> {
        let (tokens, _) = tokenize(source);
        let mut parser = Parser::new(tokens, BuiltinRegistry::global());
        parser.parse_program();
        parser.into_diagnostics().into_iter().map(|d| d.message).collect()
    }

    fn in_main(body: &str) -> Vec<String> {
        messages(&format!("int main() {{ {} return 0; }}", body))
    }

    #[test]
    fn test_number_types() {
        assert_eq!(number_type("42"), CType::int());
        assert!(number_type("0").null_constant);
        assert_eq!(number_type("3.14"), CType::double());
        assert_eq!(number_type("2.5f"), CType::float());
        assert_eq!(number_type("1e9"), CType::double());
        assert_eq!(number_type("0xFF"), CType::int());
    }

    #[test]
    fn test_flat_chain_has_no_precedence() {
        // (p + 1) * 2 is pointer * int, which is invalid; with C precedence
        // this would be p + 2 and well-typed.
        assert_eq!(
            in_main("int *p; int *q = p + 1 * 2;"),
            vec!["Type mismatch: invalid operands to binary '*' ('int*' and 'int')"]
        );
    }

    #[test]
    fn test_binary_type_mismatch() {
        assert_eq!(
            in_main("int x = 1; char *s = \"a\"; int y = x & s;"),
            vec!["Type mismatch: invalid operands to binary '&' ('int' and 'char*')"]
        );
    }

    #[test]
    fn test_assignment_lvalues() {
        assert_eq!(
            in_main("const int k = 1; k = 2;"),
            vec!["Invalid lvalue: cannot assign to const variable 'k'"]
        );
        assert_eq!(
            in_main("int a[3]; int b[3]; a = b;"),
            vec!["Invalid lvalue: cannot assign to array 'a'"]
        );
        assert_eq!(
            in_main("int x; x + 1 = 2;"),
            vec!["Invalid lvalue: cannot assign to an rvalue"]
        );
        assert_eq!(
            in_main("NULL = 0;"),
            vec!["Invalid lvalue: cannot assign to builtin constant 'NULL'"]
        );
    }

    #[test]
    fn test_compound_assignment_converts_result() {
        assert_eq!(
            in_main("int x = 1; x += 2.5;"),
            vec!["Type mismatch: cannot convert 'double' to 'int'"]
        );
        assert!(in_main("double d = 1.0; d *= 2; int n = 7; n %= 3; int *p = &n; p += 1;")
            .is_empty());
    }

    #[test]
    fn test_increment_lvalues() {
        assert_eq!(
            in_main("printf++;"),
            vec!["Invalid lvalue: cannot apply '++' to function 'printf'"]
        );
        assert_eq!(
            in_main("--main;"),
            vec!["Invalid lvalue: cannot apply '--' to function 'main'"]
        );
        assert!(in_main("int i = 0; i++; ++i; int *p = &i; (*p)++;").is_empty());
    }

    #[test]
    fn test_builtin_arity() {
        assert_eq!(
            in_main("printf();"),
            vec!["Argument count mismatch: 'printf' expects at least 1 argument(s) but got 0"]
        );
        assert!(in_main("printf(\"%d %s\\n\", 1, \"x\");").is_empty());
        assert_eq!(
            in_main("strlen(\"a\", \"b\");"),
            vec!["Argument count mismatch: 'strlen' expects 1 argument(s) but got 2"]
        );
    }

    #[test]
    fn test_user_function_arguments() {
        let source = "int add(int a, int b) { return a + b; }\n\
                      int main() { add(1); add(1, \"two\"); return add(1, 2); }";
        assert_eq!(
            messages(source),
            vec![
                "Argument count mismatch: 'add' expects 2 argument(s) but got 1",
                "Type mismatch: argument 2 of 'add' expects 'int' but got 'char*'",
            ]
        );
    }

    #[test]
    fn test_undeclared_function_and_bad_callee() {
        assert_eq!(in_main("launch(1);"), vec!["Undeclared function 'launch'"]);
        assert_eq!(
            in_main("int n = 3; n(1);"),
            vec!["Called object 'n' is not a function"]
        );
    }

    #[test]
    fn test_struct_member_access() {
        let source = "struct Point { int x; int y; };\n\
                      int main() {\n\
                      struct Point p; struct Point *pp = &p;\n\
                      p.x = 1; pp->y = 2;\n\
                      p.z = 3; pp.x = 4; p->y = 5;\n\
                      return 0; }";
        assert_eq!(
            messages(source),
            vec![
                "No member named 'z' in 'struct Point'",
                "Member access with '.' on pointer type 'struct Point*'; use '->'",
                "Member access with '->' on non-pointer type 'struct Point'; use '.'",
            ]
        );
    }

    #[test]
    fn test_member_type_flows() {
        let source = "struct S { double ratio; };\n\
                      int main() { struct S s; int n = s.ratio; return 0; }";
        assert_eq!(
            messages(source),
            vec!["Type mismatch: cannot convert 'double' to 'int'"]
        );
    }

    #[test]
    fn test_subscript_and_dereference() {
        assert_eq!(
            in_main("int n = 1; n[0] = 2;"),
            vec!["Type mismatch: subscripted value of type 'int' is not an array or pointer"]
        );
        assert_eq!(
            in_main("int n = 1; *n = 2;"),
            vec!["Type mismatch: cannot dereference non-pointer type 'int'"]
        );
        assert!(in_main("int m[2][2]; m[1][1] = 4; char *s = \"ab\"; char c = s[0];").is_empty());
    }

    #[test]
    fn test_casts_sizeof_ternary() {
        assert!(in_main(
            "double d = 2.5; int i = (int)d; int n = sizeof(int) + sizeof d; int t = i > 0 ? 1 : 2;"
        )
        .is_empty());
    }

    #[test]
    fn test_null_and_zero_convert_to_pointers() {
        assert!(in_main("int *p = NULL; char *q = 0; void *v = p; p = v;").is_empty());
        assert_eq!(
            in_main("int *p = 5;"),
            vec!["Type mismatch: cannot convert 'int' to 'int*'"]
        );
    }

    #[test]
    fn test_expected_expression() {
        assert_eq!(in_main("int x = ;"), vec!["Expected expression but got ';'"]);
    }

    #[test]
    fn test_type_name_in_expression() {
        let source = "typedef int Count;\nint main() { int n = Count + 1; return 0; }";
        assert_eq!(
            messages(source),
            vec!["Unexpected type name 'Count' in expression"]
        );
    }
}
