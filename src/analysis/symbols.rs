//! Scoped symbol table
//!
//! A LIFO stack of scopes. The outermost scope (file scope) is created with
//! the table and can never be popped; every other scope is opened for a
//! function body or a compound statement and closed at its matching `}`.
//!
//! Lookups resolve innermost scope first, so an inner declaration shadows an
//! outer one. Redeclaring a name inside the *same* scope is rejected by
//! [`SymbolTable::declare`] returning `false`.
//!
//! Value lookups ([`SymbolTable::exists`], [`SymbolTable::type_of`]) consult
//! the immutable [`BuiltinRegistry`] before any user scope.

use crate::analysis::builtins::BuiltinRegistry;
use crate::analysis::types::{CType, TypeDesc};
use rustc_hash::FxHashMap;
use tracing::trace;

/// Signature recorded for a user-declared function
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSig {
    pub return_type: CType,
    /// `None` for an old-style `f()` declaration that says nothing about parameters
    pub params: Option<Vec<CType>>,
    pub variadic: bool,
    /// A body has been seen (as opposed to only a prototype)
    pub defined: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    Variable,
    Function(FunctionSig),
    Typedef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: TypeDesc,
    pub line: usize,
    pub column: usize,
}

impl Symbol {
    pub fn variable(name: impl Into<String>, ty: TypeDesc, line: usize, column: usize) -> Self {
        Symbol {
            name: name.into(),
            kind: SymbolKind::Variable,
            ty,
            line,
            column,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, SymbolKind::Function(_))
    }

    pub fn is_typedef(&self) -> bool {
        matches!(self.kind, SymbolKind::Typedef)
    }
}

/// A struct tag. `members` is `None` until the definition has been seen.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    pub members: Option<Vec<(String, CType)>>,
    pub line: usize,
    pub column: usize,
}

impl StructDef {
    pub fn is_complete(&self) -> bool {
        self.members.is_some()
    }

    pub fn member(&self, name: &str) -> Option<&CType> {
        self.members
            .as_ref()?
            .iter()
            .find(|(member, _)| member == name)
            .map(|(_, ty)| ty)
    }
}

/// Outcome of registering a struct tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructDeclared {
    /// First mention of the tag in this scope
    New,
    /// A forward declaration was completed, or repeated
    Updated,
    /// A second full definition in the same scope
    Redefined,
}

#[derive(Debug, Default)]
struct Scope {
    symbols: Vec<Symbol>,
    index: FxHashMap<String, usize>,
    structs: FxHashMap<String, StructDef>,
}

impl Scope {
    fn get(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|&i| &self.symbols[i])
    }
}

#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    builtins: &'static BuiltinRegistry,
}

impl SymbolTable {
    pub fn new(builtins: &'static BuiltinRegistry) -> Self {
        SymbolTable {
            scopes: vec![Scope::default()],
            builtins,
        }
    }

    pub fn builtins(&self) -> &'static BuiltinRegistry {
        self.builtins
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
        trace!(depth = self.depth(), "push scope");
    }

    /// Close the innermost scope. Returns `false` (and does nothing) at file scope.
    pub fn pop_scope(&mut self) -> bool {
        if self.scopes.len() <= 1 {
            return false;
        }
        self.scopes.pop();
        trace!(depth = self.depth(), "pop scope");
        true
    }

    /// Nesting depth; 0 is file scope.
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    /// Declare a variable in the current scope. `false` if the name is taken there.
    pub fn declare(&mut self, name: &str, ty: TypeDesc, line: usize, column: usize) -> bool {
        self.declare_symbol(Symbol::variable(name, ty, line, column))
    }

    pub fn declare_symbol(&mut self, symbol: Symbol) -> bool {
        let scope = self.current_mut();
        if scope.index.contains_key(&symbol.name) {
            return false;
        }
        scope.index.insert(symbol.name.clone(), scope.symbols.len());
        scope.symbols.push(symbol);
        true
    }

    pub fn exists(&self, name: &str) -> bool {
        self.builtins.contains(name) || self.lookup(name).is_some()
    }

    /// Declared type of `name`, or `Unknown` when it is not declared.
    pub fn type_of(&self, name: &str) -> TypeDesc {
        if let Some(ty) = self.builtins.type_of(name) {
            return ty;
        }
        self.lookup(name)
            .map(|symbol| symbol.ty.clone())
            .unwrap_or(TypeDesc::Unknown)
    }

    /// User symbol, innermost scope first.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn lookup_current(&self, name: &str) -> Option<&Symbol> {
        self.current().get(name)
    }

    pub fn lookup_current_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        let scope = self.current_mut();
        let index = *scope.index.get(name)?;
        scope.symbols.get_mut(index)
    }

    /// Resolve a type name: builtin types first, then the innermost typedef.
    /// A variable shadowing a typedef hides it.
    pub fn resolve_type_name(&self, name: &str) -> Option<CType> {
        if let Some(ty) = self.builtins.type_name(name) {
            return Some(ty.clone());
        }
        let symbol = self.lookup(name)?;
        match (&symbol.kind, &symbol.ty) {
            (SymbolKind::Typedef, TypeDesc::Known(ty)) => Some(ty.clone()),
            (SymbolKind::Typedef, _) => Some(CType::int().with_alias(name)),
            _ => None,
        }
    }

    pub fn is_type_name(&self, name: &str) -> bool {
        self.resolve_type_name(name).is_some()
    }

    /// Register a struct tag in the current scope, with or without members.
    pub fn declare_struct(
        &mut self,
        tag: &str,
        members: Option<Vec<(String, CType)>>,
        line: usize,
        column: usize,
    ) -> StructDeclared {
        let scope = self.current_mut();
        match scope.structs.get_mut(tag) {
            Some(existing) => match (&existing.members, members) {
                (Some(_), Some(_)) => StructDeclared::Redefined,
                (None, Some(members)) => {
                    existing.members = Some(members);
                    existing.line = line;
                    existing.column = column;
                    StructDeclared::Updated
                }
                (_, None) => StructDeclared::Updated,
            },
            None => {
                scope.structs.insert(
                    tag.to_string(),
                    StructDef {
                        members,
                        line,
                        column,
                    },
                );
                StructDeclared::New
            }
        }
    }

    /// Struct tag, innermost scope first.
    pub fn lookup_struct(&self, tag: &str) -> Option<&StructDef> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.structs.get(tag))
    }

    fn current(&self) -> &Scope {
        // The file scope is never popped
        &self.scopes[self.scopes.len() - 1]
    }

    fn current_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SymbolTable {
        SymbolTable::new(BuiltinRegistry::global())
    }

    fn int() -> TypeDesc {
        TypeDesc::Known(CType::int())
    }

    #[test]
    fn test_redeclaration_in_same_scope() {
        let mut symbols = table();
        assert!(symbols.declare("x", int(), 1, 5));
        assert!(!symbols.declare("x", int(), 2, 5));
        assert_eq!(symbols.lookup("x").unwrap().line, 1);
    }

    #[test]
    fn test_shadowing() {
        let mut symbols = table();
        symbols.declare("x", int(), 1, 1);
        symbols.push_scope();
        assert!(symbols.declare("x", TypeDesc::Known(CType::double()), 2, 1));
        assert_eq!(symbols.type_of("x"), TypeDesc::Known(CType::double()));
        symbols.pop_scope();
        assert_eq!(symbols.type_of("x"), int());
    }

    #[test]
    fn test_pop_never_underflows() {
        let mut symbols = table();
        assert!(!symbols.pop_scope());
        assert!(!symbols.pop_scope());
        assert_eq!(symbols.depth(), 0);
        symbols.push_scope();
        assert_eq!(symbols.depth(), 1);
        assert!(symbols.pop_scope());
        assert_eq!(symbols.depth(), 0);
    }

    #[test]
    fn test_builtins_always_resolve() {
        let mut symbols = table();
        symbols.push_scope();
        symbols.declare("printf", int(), 3, 1);
        assert!(symbols.exists("printf"));
        assert_eq!(symbols.type_of("printf"), TypeDesc::Unknown);
        assert!(symbols.exists("NULL"));
        assert!(!symbols.exists("nothing"));
        assert_eq!(symbols.type_of("nothing"), TypeDesc::Unknown);
    }

    #[test]
    fn test_typedef_resolution() {
        let mut symbols = table();
        symbols.declare_symbol(Symbol {
            name: "Score".into(),
            kind: SymbolKind::Typedef,
            ty: TypeDesc::Known(CType::double().with_alias("Score")),
            line: 1,
            column: 1,
        });
        assert!(symbols.is_type_name("Score"));
        assert!(symbols.is_type_name("size_t"));

        symbols.push_scope();
        symbols.declare("Score", int(), 2, 1);
        assert!(!symbols.is_type_name("Score"));
    }

    #[test]
    fn test_struct_forward_then_define() {
        let mut symbols = table();
        assert_eq!(symbols.declare_struct("Node", None, 1, 1), StructDeclared::New);
        assert!(!symbols.lookup_struct("Node").unwrap().is_complete());

        let members = vec![("value".to_string(), CType::int())];
        assert_eq!(
            symbols.declare_struct("Node", Some(members.clone()), 2, 1),
            StructDeclared::Updated
        );
        let node = symbols.lookup_struct("Node").unwrap();
        assert_eq!(node.member("value"), Some(&CType::int()));
        assert_eq!(node.member("next"), None);

        assert_eq!(
            symbols.declare_struct("Node", Some(members), 3, 1),
            StructDeclared::Redefined
        );
    }
}
