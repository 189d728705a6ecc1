//! Declaration parsing implementation
//!
//! This module handles parsing of declarations at file and block scope:
//!
//! - Variables: `int x = 5, *p, arr[3] = {1, 2, 3};`
//! - Functions: prototypes and definitions, `(void)` and variadic parameters
//! - Typedefs: `typedef unsigned long Size;`, `typedef struct { ... } Point;`
//! - Structs: definitions, forward declarations, and `struct Tag` references
//!
//! A name followed by `(` is a function, anything else is a variable.
//!
//! # Grammar
//!
//! ```text
//! declaration  ::= type_spec ( ";" | declarator_list ";" | function )
//! function     ::= declarator "(" params ")" ( ";" | block )
//! declarator   ::= "*"* identifier ( "[" expr? "]" )* ( "=" initializer )?
//! typedef      ::= "typedef" type_spec declarator ( "," declarator )* ";"
//! struct_spec  ::= "struct" identifier? ( "{" member_decl* "}" )?
//! type_spec    ::= qualifier* ( base_type | struct_spec | typedef_name ) qualifier*
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::analysis::symbols::{FunctionSig, StructDeclared, Symbol, SymbolKind};
use crate::analysis::types::{is_compatible, BaseType, CType, TypeDesc};
use crate::diagnostics::SourceLocation;
use crate::parser::expressions::Operand;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::{FunctionContext, Parser};

/// A parsed type specifier
pub(crate) struct TypeSpec {
    pub(crate) ty: CType,
    /// The tag token of a `struct Tag` written without a body
    pub(crate) struct_reference: Option<Token>,
}

/// A parsed parameter list
pub(crate) struct Parameters {
    /// `None` for an empty `()` list, which leaves the parameters unspecified
    pub(crate) types: Option<Vec<CType>>,
    pub(crate) variadic: bool,
    pub(crate) named: Vec<(Token, CType)>,
}

impl Parameters {
    /// Whether this declaration disagrees with an earlier one. An
    /// unspecified `()` list on either side matches any parameters.
    fn conflicts_with(&self, return_type: &CType, sig: &FunctionSig) -> bool {
        if *return_type != sig.return_type {
            return true;
        }
        match (&self.types, &sig.params) {
            (Some(types), Some(earlier)) => types != earlier || self.variadic != sig.variadic,
            _ => false,
        }
    }
}

impl Parser {
    /// Parse one top-level item
    pub(crate) fn parse_external_declaration(&mut self) {
        match self.peek().kind {
            TokenKind::Preprocessor | TokenKind::Semicolon | TokenKind::Error => {
                self.advance();
            }
            TokenKind::Typedef => self.parse_typedef(),
            _ if self.is_type_start() => self.parse_declaration(),
            _ => {
                let bad = self.advance();
                self.error(
                    bad.location,
                    format!("Unexpected token '{}' at file scope", bad.lexeme),
                );
                self.skip_to_declaration_boundary();
            }
        }
    }

    /// Panic-mode recovery at file scope: stop after `;` or `}`, or before
    /// anything that can start a declaration.
    fn skip_to_declaration_boundary(&mut self) {
        while !self.is_at_end() {
            match self.peek().kind {
                TokenKind::Semicolon | TokenKind::RBrace => {
                    self.advance();
                    return;
                }
                TokenKind::Preprocessor | TokenKind::Typedef => return,
                _ if self.is_type_start() => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip the rest of a broken declaration, consuming its `;` if present.
    pub(crate) fn skip_past_semicolon(&mut self) {
        while !matches!(self.peek().kind, TokenKind::RBrace | TokenKind::Eof) {
            if self.advance().kind == TokenKind::Semicolon {
                return;
            }
        }
    }

    pub(crate) fn is_type_start(&self) -> bool {
        self.is_type_start_at(0)
    }

    /// Can the token `n` positions ahead begin a type specifier?
    pub(crate) fn is_type_start_at(&self, n: usize) -> bool {
        let token = self.peek_ahead(n);
        match token.kind {
            TokenKind::Int
            | TokenKind::Float
            | TokenKind::Double
            | TokenKind::Char
            | TokenKind::Void
            | TokenKind::Short
            | TokenKind::Long
            | TokenKind::Signed
            | TokenKind::Unsigned
            | TokenKind::Struct
            | TokenKind::Const
            | TokenKind::Static
            | TokenKind::Extern
            | TokenKind::Auto => true,
            TokenKind::Ident => self.symbols.is_type_name(&token.lexeme),
            _ => false,
        }
    }

    /// Parse qualifiers, storage classes and one base type.
    pub(crate) fn parse_type_specifier(&mut self) -> Option<TypeSpec> {
        let mut base: Option<CType> = None;
        let mut struct_reference = None;
        let mut is_const = false;
        let mut modifiers = 0;

        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Const => {
                    self.advance();
                    is_const = true;
                }
                TokenKind::Static
                | TokenKind::Extern
                | TokenKind::Auto
                | TokenKind::Signed
                | TokenKind::Unsigned
                | TokenKind::Short
                | TokenKind::Long => {
                    self.advance();
                    modifiers += 1;
                }
                TokenKind::Int
                | TokenKind::Float
                | TokenKind::Double
                | TokenKind::Char
                | TokenKind::Void
                    if base.is_none() =>
                {
                    self.advance();
                    base = Some(CType::new(match token.kind {
                        TokenKind::Float => BaseType::Float,
                        TokenKind::Double => BaseType::Double,
                        TokenKind::Char => BaseType::Char,
                        TokenKind::Void => BaseType::Void,
                        _ => BaseType::Int,
                    }));
                }
                TokenKind::Struct if base.is_none() => {
                    self.advance();
                    let (ty, reference) = self.parse_struct_specifier(&token)?;
                    base = Some(ty);
                    struct_reference = reference;
                }
                TokenKind::Ident if base.is_none() => {
                    match self.symbols.resolve_type_name(&token.lexeme) {
                        Some(ty) => {
                            self.advance();
                            base = Some(ty);
                        }
                        None => break,
                    }
                }
                _ => break,
            }
        }

        let mut ty = match base {
            Some(ty) => ty,
            // `unsigned x;`, `long y;`
            None if modifiers > 0 || is_const => CType::int(),
            None => {
                let found = self.peek().clone();
                self.error(found.location, format!("Expected type but got {}", found));
                return None;
            }
        };
        if is_const {
            ty.is_const = true;
        }

        Some(TypeSpec {
            ty,
            struct_reference,
        })
    }

    /// `struct` has been consumed. Returns the struct type and, for a bare
    /// `struct Tag`, the tag token.
    fn parse_struct_specifier(&mut self, keyword: &Token) -> Option<(CType, Option<Token>)> {
        let tag = if self.check(TokenKind::Ident) {
            Some(self.advance())
        } else {
            None
        };

        if !self.check(TokenKind::LBrace) {
            return match tag {
                Some(tag) => Some((CType::structure(tag.lexeme.clone()), Some(tag))),
                None => {
                    self.expect_identifier();
                    None
                }
            };
        }

        let (name, location) = match &tag {
            Some(tag) => (tag.lexeme.clone(), tag.location),
            None => {
                self.anonymous_structs += 1;
                (
                    format!("<anonymous {}>", self.anonymous_structs),
                    keyword.location,
                )
            }
        };

        let members = self.parse_struct_body(&name);
        let declared =
            self.symbols
                .declare_struct(&name, Some(members), location.line, location.column);
        if declared == StructDeclared::Redefined {
            self.error(location, format!("Redefinition of 'struct {}'", name));
        }

        Some((CType::structure(name), None))
    }

    /// Parse `{ member_decl* }`
    fn parse_struct_body(&mut self, tag: &str) -> Vec<(String, CType)> {
        if !self.enter_nested() {
            return Vec::new();
        }
        self.advance(); // '{'

        let mut members: Vec<(String, CType)> = Vec::new();
        let mut iterations = 0;

        while !self.check(TokenKind::RBrace) && !self.is_at_end() && self.tick(&mut iterations) {
            let before = self.position;

            if self.match_token(TokenKind::Semicolon) {
                continue;
            }
            if self.is_type_start() {
                if let Some(spec) = self.parse_type_specifier() {
                    loop {
                        let Some((name, ty)) = self.parse_declarator(&spec.ty) else {
                            break;
                        };
                        self.check_struct_complete(&ty, name.location);
                        if members.iter().any(|(member, _)| *member == name.lexeme) {
                            self.error(
                                name.location,
                                format!("Duplicate member '{}' in 'struct {}'", name.lexeme, tag),
                            );
                        } else {
                            members.push((name.lexeme, ty));
                        }
                        if !self.match_token(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::Semicolon);
            }

            self.ensure_progress(before);
        }

        self.expect(TokenKind::RBrace);
        self.leave_nested();
        members
    }

    /// `*`* identifier array-suffix
    pub(crate) fn parse_declarator(&mut self, base: &CType) -> Option<(Token, CType)> {
        let ty = self.parse_pointers(base.clone());
        let name = self.expect_identifier()?;
        let ty = self.parse_array_suffix(ty);
        Some((name, ty))
    }

    pub(crate) fn parse_pointers(&mut self, mut ty: CType) -> CType {
        while self.match_token(TokenKind::Star) {
            ty = ty.with_pointer();
            while self.match_token(TokenKind::Const) {
                ty.is_const = true;
            }
        }
        ty
    }

    /// `[N][M]...`; each extra dimension becomes one more level of indirection
    /// in the element type.
    pub(crate) fn parse_array_suffix(&mut self, mut ty: CType) -> CType {
        while self.match_token(TokenKind::LBracket) {
            if !self.check(TokenKind::RBracket) {
                let size = self.parse_expression();
                if let Some(size_ty) = size.ty.known() {
                    if !size_ty.is_integer() {
                        self.error(
                            size.location,
                            format!("Type mismatch: array size has non-integer type '{}'", size_ty),
                        );
                    }
                }
            }
            self.expect(TokenKind::RBracket);

            if ty.is_array {
                ty.pointer_depth += 1;
            } else {
                ty = ty.with_array();
            }
        }
        ty
    }

    /// Variable or function declaration; the type specifier comes first.
    pub(crate) fn parse_declaration(&mut self) {
        let Some(spec) = self.parse_type_specifier() else {
            self.skip_past_semicolon();
            return;
        };

        if self.match_token(TokenKind::Semicolon) {
            // `struct Tag;`
            if let Some(tag) = &spec.struct_reference {
                self.symbols.declare_struct(
                    &tag.lexeme,
                    None,
                    tag.location.line,
                    tag.location.column,
                );
            }
            return;
        }

        let mut iterations = 0;
        loop {
            if !self.tick(&mut iterations) {
                return;
            }

            let ty = self.parse_pointers(spec.ty.clone());
            let Some(name) = self.expect_identifier() else {
                self.skip_past_semicolon();
                return;
            };

            if self.check(TokenKind::LParen) {
                self.parse_function(ty, name);
                return;
            }

            let ty = self.parse_array_suffix(ty);
            self.declare_variable(&name, &ty);
            if self.match_token(TokenKind::Eq) {
                self.parse_initializer(Some(&ty));
            }

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        self.expect(TokenKind::Semicolon);
    }

    /// Declare a variable in the current scope, reporting void, incomplete
    /// struct and redeclaration problems.
    pub(crate) fn declare_variable(&mut self, name: &Token, ty: &CType) {
        if ty.is_void_value() {
            self.error(
                name.location,
                format!("Variable '{}' declared void", name.lexeme),
            );
        } else {
            self.check_struct_complete(ty, name.location);
        }

        let declared = self.symbols.declare(
            &name.lexeme,
            TypeDesc::Known(ty.clone()),
            name.location.line,
            name.location.column,
        );
        if !declared {
            self.report_redeclaration(name);
        }
    }

    fn report_redeclaration(&mut self, name: &Token) {
        let first = self
            .symbols
            .lookup_current(&name.lexeme)
            .map_or(name.location.line, |symbol| symbol.line);
        self.error(
            name.location,
            format!(
                "Redeclaration of '{}' (first declared at line {})",
                name.lexeme, first
            ),
        );
    }

    /// A struct used by value must be defined.
    fn check_struct_complete(&mut self, ty: &CType, at: SourceLocation) {
        if !ty.is_struct_value() {
            return;
        }
        let Some(tag) = ty.struct_tag() else {
            return;
        };
        let complete = self
            .symbols
            .lookup_struct(tag)
            .is_some_and(|def| def.is_complete());
        if !complete {
            self.error(at, format!("Unknown struct '{}'", tag));
        }
    }

    /// `= expr` or `= { ... }`; `target` is `None` when nothing is checked.
    pub(crate) fn parse_initializer(&mut self, target: Option<&CType>) {
        if self.check(TokenKind::LBrace) {
            self.parse_initializer_list(target);
            return;
        }
        let value = self.parse_assignment();
        if let Some(target) = target {
            self.check_conversion(&target.value_type(), &value);
        }
    }

    /// Report a value that cannot be converted to `target`.
    pub(crate) fn check_conversion(&mut self, target: &CType, value: &Operand) {
        if !is_compatible(&TypeDesc::Known(target.clone()), &value.ty) {
            self.error(
                value.location,
                format!(
                    "Type mismatch: cannot convert '{}' to '{}'",
                    value.ty, target
                ),
            );
        }
    }

    fn parse_initializer_list(&mut self, target: Option<&CType>) {
        if !self.enter_nested() {
            return;
        }
        self.advance(); // '{'

        let members = target
            .filter(|ty| ty.is_struct_value())
            .and_then(|ty| ty.struct_tag())
            .and_then(|tag| self.symbols.lookup_struct(tag))
            .and_then(|def| def.members.clone());
        let element = target.and_then(|ty| {
            if ty.is_array {
                ty.element()
            } else if ty.is_struct_value() {
                None
            } else {
                Some(ty.clone())
            }
        });

        let mut index = 0;
        let mut iterations = 0;
        while !self.check(TokenKind::RBrace) && !self.is_at_end() && self.tick(&mut iterations) {
            let mut slot = match &members {
                Some(members) => members.get(index).map(|(_, ty)| ty.clone()),
                None => element.clone(),
            };

            // `.member = value`
            if self.check(TokenKind::Dot) && self.check_ahead(1, TokenKind::Ident) {
                self.advance();
                let member = self.advance();
                if let Some(members) = &members {
                    match members.iter().position(|(name, _)| *name == member.lexeme) {
                        Some(found) => {
                            index = found;
                            slot = Some(members[found].1.clone());
                        }
                        None => {
                            let tag = target.and_then(|ty| ty.struct_tag()).unwrap_or_default();
                            self.error(
                                member.location,
                                format!("No member named '{}' in 'struct {}'", member.lexeme, tag),
                            );
                            slot = None;
                        }
                    }
                }
                self.expect(TokenKind::Eq);
            }

            self.parse_initializer(slot.as_ref());
            index += 1;

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        self.expect(TokenKind::RBrace);
        self.leave_nested();
    }

    /// `typedef type_spec declarator ("," declarator)* ";"`
    pub(crate) fn parse_typedef(&mut self) {
        self.advance(); // 'typedef'

        let Some(spec) = self.parse_type_specifier() else {
            self.skip_past_semicolon();
            return;
        };

        let mut iterations = 0;
        loop {
            if !self.tick(&mut iterations) {
                return;
            }
            let Some((name, ty)) = self.parse_declarator(&spec.ty) else {
                self.skip_past_semicolon();
                return;
            };

            let symbol = Symbol {
                name: name.lexeme.clone(),
                kind: SymbolKind::Typedef,
                ty: TypeDesc::Known(ty.with_alias(name.lexeme.clone())),
                line: name.location.line,
                column: name.location.column,
            };
            if !self.symbols.declare_symbol(symbol) {
                self.report_redeclaration(&name);
            }

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        self.expect(TokenKind::Semicolon);
    }

    /// The name has been consumed and `(` is next.
    pub(crate) fn parse_function(&mut self, return_type: CType, name: Token) {
        let params = self.parse_parameter_list();
        let is_definition = self.check(TokenKind::LBrace);

        if self.symbols.depth() > 0 {
            self.error(
                name.location,
                format!("Nested function '{}' not allowed", name.lexeme),
            );
        } else {
            self.declare_function(&name, &return_type, &params, is_definition);
        }

        if is_definition {
            self.parse_function_body(&name, return_type, params.named);
        } else {
            self.expect(TokenKind::Semicolon);
        }
    }

    fn declare_function(
        &mut self,
        name: &Token,
        return_type: &CType,
        params: &Parameters,
        is_definition: bool,
    ) {
        let existing = self
            .symbols
            .lookup_current(&name.lexeme)
            .map(|symbol| (symbol.kind.clone(), symbol.line));

        match existing {
            None => {
                self.symbols.declare_symbol(Symbol {
                    name: name.lexeme.clone(),
                    kind: SymbolKind::Function(FunctionSig {
                        return_type: return_type.clone(),
                        params: params.types.clone(),
                        variadic: params.variadic,
                        defined: is_definition,
                    }),
                    ty: TypeDesc::Unknown,
                    line: name.location.line,
                    column: name.location.column,
                });
            }
            Some((SymbolKind::Function(sig), line)) if sig.defined && is_definition => {
                self.error(
                    name.location,
                    format!(
                        "Function redeclaration: '{}' is already defined at line {}",
                        name.lexeme, line
                    ),
                );
            }
            Some((SymbolKind::Function(sig), _)) if params.conflicts_with(return_type, &sig) => {
                self.error(
                    name.location,
                    format!(
                        "Function redeclaration: conflicting types for '{}'",
                        name.lexeme
                    ),
                );
            }
            Some((SymbolKind::Function(_), _)) => {
                // Prototype followed by another prototype or the definition
                if let Some(symbol) = self.symbols.lookup_current_mut(&name.lexeme) {
                    if let SymbolKind::Function(sig) = &mut symbol.kind {
                        if sig.params.is_none() {
                            sig.params = params.types.clone();
                            sig.variadic = params.variadic;
                        }
                        if is_definition {
                            sig.defined = true;
                            symbol.line = name.location.line;
                            symbol.column = name.location.column;
                        }
                    }
                }
            }
            Some(_) => self.report_redeclaration(name),
        }
    }

    /// `( )`, `(void)`, or a comma-separated list, optionally ending in `...`
    fn parse_parameter_list(&mut self) -> Parameters {
        self.advance(); // '('

        let mut params = Parameters {
            types: None,
            variadic: false,
            named: Vec::new(),
        };
        if self.match_token(TokenKind::RParen) {
            return params;
        }

        let mut types = Vec::new();
        if self.check(TokenKind::Void) && self.check_ahead(1, TokenKind::RParen) {
            self.advance();
            self.advance();
            params.types = Some(types);
            return params;
        }

        let mut iterations = 0;
        while self.tick(&mut iterations) {
            if self.match_token(TokenKind::Ellipsis) {
                params.variadic = true;
                break;
            }
            if !self.is_type_start() {
                let found = self.peek().clone();
                self.error(found.location, format!("Expected type but got {}", found));
                while !matches!(
                    self.peek().kind,
                    TokenKind::RParen | TokenKind::LBrace | TokenKind::Semicolon | TokenKind::Eof
                ) {
                    self.advance();
                }
                break;
            }
            let Some(spec) = self.parse_type_specifier() else {
                break;
            };

            let ty = self.parse_pointers(spec.ty);
            let name = if self.check(TokenKind::Ident) {
                Some(self.advance())
            } else {
                None
            };
            let mut ty = self.parse_array_suffix(ty);
            if ty.is_array {
                ty = ty.decayed();
            }

            if let Some(name) = name {
                params.named.push((name, ty.clone()));
            }
            types.push(ty);

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        self.expect(TokenKind::RParen);
        params.types = Some(types);
        params
    }

    /// Parameters and body share one scope.
    fn parse_function_body(&mut self, name: &Token, return_type: CType, params: Vec<(Token, CType)>) {
        let context = FunctionContext {
            name: name.lexeme.clone(),
            return_type,
            has_return: false,
            loop_depth: 0,
            switch_depth: 0,
        };
        let enclosing = self.function.replace(context);

        self.symbols.push_scope();
        for (param, ty) in &params {
            self.declare_variable(param, ty);
        }

        self.advance(); // '{'
        self.parse_block_statements();
        self.expect(TokenKind::RBrace);
        self.symbols.pop_scope();

        let finished = std::mem::replace(&mut self.function, enclosing);
        if let Some(context) = finished {
            if !context.return_type.is_void_value() && !context.has_return {
                self.error(
                    name.location,
                    format!(
                        "Missing return statement in non-void function '{}'",
                        context.name
                    ),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::analysis::builtins::BuiltinRegistry;
    use crate::analysis::symbols::SymbolKind;
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::Parser;

    fn messages(source: &str) -> Vec<String> {
        let (tokens, _) = tokenize(source);
        let mut parser = Parser::new(tokens, BuiltinRegistry::global());
        parser.parse_program();
        parser.into_diagnostics().into_iter().map(|d| d.message).collect()
    }

    #[test]
    fn test_multiple_declarators() {
        assert!(messages("int a, *b, c[3] = {1, 2, 3};").is_empty());
        assert!(messages("char name[] = \"cguard\";").is_empty());
    }

    #[test]
    fn test_initializer_list_elements_checked() {
        assert_eq!(
            messages("int a[2] = {1, \"two\"};"),
            vec!["Type mismatch: cannot convert 'char*' to 'int'"]
        );
    }

    #[test]
    fn test_prototype_then_definition() {
        let source = "int add(int, int);\nint add(int a, int b) { return a + b; }";
        assert!(messages(source).is_empty());
    }

    #[test]
    fn test_function_redefinition() {
        let source = "int f(void) { return 1; }\nint f(void) { return 2; }";
        assert_eq!(
            messages(source),
            vec!["Function redeclaration: 'f' is already defined at line 1"]
        );
    }

    #[test]
    fn test_conflicting_function_types() {
        assert_eq!(
            messages("int f(int a);\nint f(double a, int b) { return 1; }"),
            vec!["Function redeclaration: conflicting types for 'f'"]
        );
        assert_eq!(
            messages("int g(void);\ndouble g(void);"),
            vec!["Function redeclaration: conflicting types for 'g'"]
        );
        // An unspecified list matches any later parameters
        assert!(messages("int h();\nint h(char *s) { return 0; }").is_empty());
    }

    #[test]
    fn test_nested_function() {
        let source = "int main() { int helper() { return 1; } return 0; }";
        assert_eq!(messages(source), vec!["Nested function 'helper' not allowed"]);
    }

    #[test]
    fn test_missing_return() {
        assert_eq!(
            messages("int f() { int x = 1; }"),
            vec!["Missing return statement in non-void function 'f'"]
        );
        assert!(messages("void g() { }").is_empty());
    }

    #[test]
    fn test_typedef_and_struct() {
        let source = "typedef struct { int x; int y; } Point;\n\
                      typedef unsigned long Size;\n\
                      Point origin = {0, 0};\n\
                      Size n = 4;";
        assert!(messages(source).is_empty());
    }

    #[test]
    fn test_struct_problems() {
        let source = "struct P { int x; int x; };\nstruct P { int y; };\nstruct Q q;";
        assert_eq!(
            messages(source),
            vec![
                "Duplicate member 'x' in 'struct P'",
                "Redefinition of 'struct P'",
                "Unknown struct 'Q'",
            ]
        );
    }

    #[test]
    fn test_forward_declared_struct() {
        let source = "struct Node;\nstruct Node *head;\nstruct Node { int value; struct Node *next; };\nstruct Node first;";
        assert!(messages(source).is_empty());
    }

    #[test]
    fn test_void_variable() {
        assert_eq!(messages("void v;"), vec!["Variable 'v' declared void"]);
    }

    #[test]
    fn test_variadic_prototype_recorded() {
        let (tokens, _) = tokenize("int log_msg(const char *fmt, ...);");
        let mut parser = Parser::new(tokens, BuiltinRegistry::global());
        parser.parse_program();
        let symbol = parser.symbols().lookup("log_msg").unwrap();
        match &symbol.kind {
            SymbolKind::Function(sig) => {
                assert!(sig.variadic);
                assert_eq!(sig.params.as_ref().unwrap().len(), 1);
                assert!(!sig.defined);
            }
            _ => panic!("Expected function symbol"),
        }
    }
}
