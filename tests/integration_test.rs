// Integration tests for the analysis facade

use cguard::{analyze, AnalysisResult};

fn messages(result: &AnalysisResult) -> Vec<&str> {
    result.iter().map(|d| d.message.as_str()).collect()
}

#[test]
fn test_empty_input() {
    let result = analyze("");
    assert!(result.is_clean());
    assert_eq!(result.total, 0);
    assert!(result.lexical.is_empty());
    assert!(result.semantic.is_empty());
}

#[test]
fn test_whitespace_and_comments_only() {
    let result = analyze("  \n// nothing here\n/* or here */\n");
    assert_eq!(result.total, 0);
}

#[test]
fn test_redeclaration_reported_at_second_name() {
    let result = analyze("int main(){ int x; int x; return 0; }");
    assert_eq!(result.total, 1);
    let diag = &result.semantic[0];
    assert!(diag.message.contains("Redeclaration"));
    assert_eq!((diag.line, diag.column), (1, 24));
}

#[test]
fn test_shadowing_allowed() {
    let result = analyze("int main(){ int x; { int x; } return 0; }");
    assert!(result.is_clean(), "{:?}", messages(&result));
}

#[test]
fn test_undeclared_variable() {
    let result = analyze("int main(){ y = 5; return 0; }");
    assert_eq!(messages(&result), vec!["Undeclared variable 'y'"]);
    let diag = &result.semantic[0];
    assert_eq!((diag.line, diag.column), (1, 13));
}

#[test]
fn test_narrowing_rejected_widening_allowed() {
    let narrowing = analyze("int i = 3.5;");
    assert_eq!(narrowing.total, 1);
    assert!(narrowing.semantic[0].message.starts_with("Type mismatch"));

    assert_eq!(analyze("double d = 5;").total, 0);
    assert_eq!(analyze("float f = 'a';").total, 0);
}

#[test]
fn test_builtin_arity() {
    let wrong = analyze("int main(){ printf(); return 0; }");
    assert_eq!(wrong.total, 1);
    assert!(wrong.semantic[0].message.starts_with("Argument count mismatch"));

    let right = analyze("int main(){ printf(\"%d\\n\", 42); return 0; }");
    assert!(right.is_clean(), "{:?}", messages(&right));
}

#[test]
fn test_increment_of_function_rejected() {
    let result = analyze("int main(){ printf++; return 0; }");
    assert_eq!(result.total, 1);
    assert!(result.semantic[0].message.starts_with("Invalid lvalue"));
}

#[test]
fn test_repeated_runs_are_identical() {
    let source = "int main(){ int x; int x; y = 2.5; printf(); return \"s\"; }";
    let first = analyze(source);
    let second = analyze(source);
    assert_eq!(first, second);
    assert!(first.total > 0);
}

#[test]
fn test_diagnostics_have_suggestions() {
    let result = analyze("int main(){ int x = 1 return x; }");
    assert_eq!(result.total, 1);
    let hint = result.semantic[0].suggestion.as_deref().unwrap_or_default();
    assert!(hint.contains("semicolon"));
}

#[test]
fn test_missing_return() {
    let result = analyze("int main() { int x = 1; }");
    assert_eq!(
        messages(&result),
        vec!["Missing return statement in non-void function 'main'"]
    );
}

#[test]
fn test_nested_function_rejected() {
    let result = analyze("int main() { int inner() { return 1; } return 0; }");
    assert!(messages(&result).contains(&"Nested function 'inner' not allowed"));
}

#[test]
fn test_function_redefinition() {
    let source = "int f() { return 1; }\nint f() { return 2; }";
    let result = analyze(source);
    assert_eq!(
        messages(&result),
        vec!["Function redeclaration: 'f' is already defined at line 1"]
    );
    assert_eq!(result.semantic[0].line, 2);
}

#[test]
fn test_typedef_pointer_struct_program() {
    let source = r#"
        typedef struct Point { int x; int y; } Point;

        int manhattan(Point *a, Point *b) {
            int dx = a->x - b->x;
            int dy = a->y - b->y;
            if (dx < 0) dx = -dx;
            if (dy < 0) dy = -dy;
            return dx + dy;
        }

        int main() {
            Point origin = {0, 0};
            Point target = {.x = 3, .y = 4};
            return manhattan(&origin, &target);
        }
    "#;
    let result = analyze(source);
    assert!(result.is_clean(), "{:?}", messages(&result));
}

#[test]
fn test_flat_chain_left_to_right() {
    // (1 + p) * 2 is pointer * int once grouped left to right
    let result = analyze("int main() { int *p; int *q = 1 + p * 2; return 0; }");
    assert_eq!(result.total, 1);
    assert!(result.semantic[0].message.contains("binary '*'"));
}

#[test]
fn test_string_concatenation_and_adjacent_literals() {
    let result = analyze("int main() { char *s = \"a\" \"b\"; char *t = s + 1; return 0; }");
    assert!(result.is_clean(), "{:?}", messages(&result));
}
