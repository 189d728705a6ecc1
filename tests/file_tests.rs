// File-based analysis

use std::io::Write;
use std::path::PathBuf;

use cguard::{analyze, analyze_file};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_clean_fixture() {
    let result = analyze_file(fixture("clean.c"));
    let messages: Vec<_> = result.iter().map(|d| d.to_string()).collect();
    assert!(result.is_clean(), "{:#?}", messages);
}

#[test]
fn test_errors_fixture() {
    let result = analyze_file(fixture("errors.c"));
    assert!(result.lexical.is_empty());

    let found: Vec<(usize, &str)> = result
        .semantic
        .iter()
        .map(|d| (d.line, d.message.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![
            (9, "Return with a value in void function 'log_value'"),
            (14, "Redeclaration of 'total' (first declared at line 13)"),
            (16, "Type mismatch: cannot convert 'double' to 'int'"),
            (18, "Argument count mismatch: 'square' expects 1 argument(s) but got 2"),
            (19, "Argument count mismatch: 'printf' expects at least 1 argument(s) but got 0"),
            (20, "Invalid lvalue: cannot apply '++' to function 'square'"),
            (21, "Undeclared variable 'missing'"),
        ]
    );
    assert!(result.semantic.iter().all(|d| d.suggestion.is_some()));
}

#[test]
fn test_lexical_fixture() {
    let result = analyze_file(fixture("lexical.c"));
    let lexical: Vec<(usize, &str)> = result
        .lexical
        .iter()
        .map(|d| (d.line, d.message.as_str()))
        .collect();
    assert_eq!(
        lexical,
        vec![
            (1, "Invalid #include syntax"),
            (4, "Invalid numeric literal: multiple decimal points"),
            (5, "Empty character literal"),
            (6, "Invalid character: '@'"),
            (2, "Missing #endif for #if opened at line 2"),
        ]
    );
}

#[test]
fn test_file_matches_buffer() {
    let source = "int main() {\n    int x = 1;\n    x = \"text\";\n    return x;\n}\n";
    let mut file = tempfile::Builder::new().suffix(".c").tempfile().unwrap();
    file.write_all(source.as_bytes()).unwrap();
    file.flush().unwrap();

    let from_file = analyze_file(file.path());
    assert_eq!(from_file, analyze(source));
    assert_eq!(from_file.total, 1);
    assert_eq!(from_file.semantic[0].line, 3);
}

#[test]
fn test_missing_file_is_a_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone.c");

    let result = analyze_file(&path);
    assert_eq!(result.total, 1);
    assert!(result.semantic.is_empty());
    let diag = &result.lexical[0];
    assert!(diag.message.starts_with("Could not open file"));
    assert!(diag.message.contains("gone.c"));
    assert_eq!((diag.line, diag.column), (1, 1));
}
