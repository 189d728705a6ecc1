//! Builtin registry
//!
//! The fixed table of standard-library names the checker recognises without
//! any user declaration. It is built once on first use and never mutated
//! afterwards; the symbol table and the parser hold `&'static` references
//! to it.
//!
//! # Contents
//!
//! - Functions from `stdio.h`, `stdlib.h`, `string.h`, `math.h` and
//!   `ctype.h`, each with a return type, a minimum argument count and a
//!   variadic flag
//! - Constants: `NULL`, `EOF`, `RAND_MAX`, `stdin`, `stdout`, `stderr`
//! - Type names: `size_t`, `FILE`

use crate::analysis::types::{CType, TypeDesc};
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::fmt;

/// Header a builtin is declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Header {
    Stdio,
    Stdlib,
    String,
    Math,
    Ctype,
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Header::Stdio => "stdio.h",
            Header::Stdlib => "stdlib.h",
            Header::String => "string.h",
            Header::Math => "math.h",
            Header::Ctype => "ctype.h",
        };
        write!(f, "{}", name)
    }
}

/// Signature of a builtin function
#[derive(Debug, Clone)]
pub struct BuiltinFunction {
    pub name: &'static str,
    pub header: Header,
    pub return_type: CType,
    pub min_args: usize,
    pub variadic: bool,
}

impl BuiltinFunction {
    /// `None` when `count` is acceptable, otherwise the arity diagnostic.
    pub fn check_arity(&self, count: usize) -> Option<String> {
        if self.variadic {
            (count < self.min_args).then(|| {
                format!(
                    "Argument count mismatch: '{}' expects at least {} argument(s) but got {}",
                    self.name, self.min_args, count
                )
            })
        } else {
            (count != self.min_args).then(|| {
                format!(
                    "Argument count mismatch: '{}' expects {} argument(s) but got {}",
                    self.name, self.min_args, count
                )
            })
        }
    }
}

/// Immutable lookup tables for builtin functions, constants and type names
#[derive(Debug)]
pub struct BuiltinRegistry {
    functions: FxHashMap<&'static str, BuiltinFunction>,
    constants: FxHashMap<&'static str, CType>,
    types: FxHashMap<&'static str, CType>,
}

static REGISTRY: Lazy<BuiltinRegistry> = Lazy::new(BuiltinRegistry::build);

fn file_type() -> CType {
    CType::structure("FILE").with_alias("FILE")
}

impl BuiltinRegistry {
    /// The process-wide registry.
    pub fn global() -> &'static BuiltinRegistry {
        &REGISTRY
    }

    fn build() -> Self {
        use Header::*;

        let int = CType::int;
        let double = CType::double;
        let void = CType::void;
        let string = CType::string;
        let void_ptr = || CType::void().with_pointer();
        let file_ptr = || file_type().with_pointer();
        let size_t = || CType::int().with_alias("size_t");

        // (name, header, return type, minimum args, variadic)
        let table: Vec<(&'static str, Header, CType, usize, bool)> = vec![
            ("printf", Stdio, int(), 1, true),
            ("scanf", Stdio, int(), 1, true),
            ("fprintf", Stdio, int(), 2, true),
            ("fscanf", Stdio, int(), 2, true),
            ("sprintf", Stdio, int(), 2, true),
            ("sscanf", Stdio, int(), 2, true),
            ("fopen", Stdio, file_ptr(), 2, false),
            ("fclose", Stdio, int(), 1, false),
            ("fread", Stdio, size_t(), 4, false),
            ("fwrite", Stdio, size_t(), 4, false),
            ("fgets", Stdio, string(), 3, false),
            ("fputs", Stdio, int(), 2, false),
            ("getchar", Stdio, int(), 0, false),
            ("putchar", Stdio, int(), 1, false),
            ("gets", Stdio, string(), 1, false),
            ("puts", Stdio, int(), 1, false),
            ("perror", Stdio, void(), 1, false),
            ("malloc", Stdlib, void_ptr(), 1, false),
            ("calloc", Stdlib, void_ptr(), 2, false),
            ("realloc", Stdlib, void_ptr(), 2, false),
            ("free", Stdlib, void(), 1, false),
            ("exit", Stdlib, void(), 1, false),
            ("abort", Stdlib, void(), 0, false),
            ("atoi", Stdlib, int(), 1, false),
            ("atof", Stdlib, double(), 1, false),
            ("atol", Stdlib, int(), 1, false),
            ("rand", Stdlib, int(), 0, false),
            ("srand", Stdlib, void(), 1, false),
            ("qsort", Stdlib, void(), 4, false),
            ("abs", Stdlib, int(), 1, false),
            ("strcpy", String, string(), 2, false),
            ("strncpy", String, string(), 3, false),
            ("strlen", String, size_t(), 1, false),
            ("strcmp", String, int(), 2, false),
            ("strcat", String, string(), 2, false),
            ("strchr", String, string(), 2, false),
            ("strstr", String, string(), 2, false),
            ("memset", String, void_ptr(), 3, false),
            ("memcpy", String, void_ptr(), 3, false),
            ("memmove", String, void_ptr(), 3, false),
            ("sin", Math, double(), 1, false),
            ("cos", Math, double(), 1, false),
            ("tan", Math, double(), 1, false),
            ("sqrt", Math, double(), 1, false),
            ("floor", Math, double(), 1, false),
            ("ceil", Math, double(), 1, false),
            ("fabs", Math, double(), 1, false),
            ("pow", Math, double(), 2, false),
            ("isdigit", Ctype, int(), 1, false),
            ("isalpha", Ctype, int(), 1, false),
            ("toupper", Ctype, int(), 1, false),
            ("tolower", Ctype, int(), 1, false),
        ];

        let functions = table
            .into_iter()
            .map(|(name, header, return_type, min_args, variadic)| {
                (
                    name,
                    BuiltinFunction {
                        name,
                        header,
                        return_type,
                        min_args,
                        variadic,
                    },
                )
            })
            .collect();

        let mut null = void_ptr();
        null.null_constant = true;
        let constants = [
            ("NULL", null),
            ("EOF", int()),
            ("RAND_MAX", int()),
            ("stdin", file_ptr()),
            ("stdout", file_ptr()),
            ("stderr", file_ptr()),
        ]
        .into_iter()
        .collect();

        let types = [("size_t", size_t()), ("FILE", file_type())]
            .into_iter()
            .collect();

        BuiltinRegistry {
            functions,
            constants,
            types,
        }
    }

    pub fn function(&self, name: &str) -> Option<&BuiltinFunction> {
        self.functions.get(name)
    }

    pub fn constant(&self, name: &str) -> Option<&CType> {
        self.constants.get(name)
    }

    /// Builtin type name (`size_t`, `FILE`)
    pub fn type_name(&self, name: &str) -> Option<&CType> {
        self.types.get(name)
    }

    pub fn is_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Any builtin value name: function or constant.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name) || self.constants.contains_key(name)
    }

    /// Type of a builtin used as a value. Functions have no value type the
    /// checker models, so they resolve to `Unknown`.
    pub fn type_of(&self, name: &str) -> Option<TypeDesc> {
        if let Some(ty) = self.constants.get(name) {
            return Some(TypeDesc::Known(ty.clone()));
        }
        self.functions.get(name).map(|_| TypeDesc::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printf_is_variadic() {
        let printf = BuiltinRegistry::global().function("printf").unwrap();
        assert!(printf.variadic);
        assert!(printf.check_arity(1).is_none());
        assert!(printf.check_arity(5).is_none());
        let message = printf.check_arity(0).unwrap();
        assert!(message.starts_with("Argument count mismatch: 'printf' expects at least 1"));
    }

    #[test]
    fn test_fixed_arity() {
        let strcmp = BuiltinRegistry::global().function("strcmp").unwrap();
        assert!(strcmp.check_arity(2).is_none());
        assert!(strcmp.check_arity(1).is_some());
        assert!(strcmp.check_arity(3).is_some());
    }

    #[test]
    fn test_constants_and_types() {
        let registry = BuiltinRegistry::global();
        assert!(registry.constant("NULL").unwrap().null_constant);
        assert_eq!(registry.type_of("EOF"), Some(TypeDesc::Known(CType::int())));
        assert_eq!(registry.type_of("printf"), Some(TypeDesc::Unknown));
        assert_eq!(registry.type_of("user_fn"), None);
        assert_eq!(registry.type_name("FILE").unwrap().to_string(), "FILE");
        assert!(registry.type_name("int").is_none());
    }

    #[test]
    fn test_grouped_by_header() {
        let registry = BuiltinRegistry::global();
        assert_eq!(registry.function("sqrt").unwrap().header, Header::Math);
        assert_eq!(registry.function("printf").unwrap().header, Header::Stdio);
        assert_eq!(Header::Stdio.to_string(), "stdio.h");
    }
}
