// Termination and recovery on malformed input

use cguard::{analyze, Analyzer, AnalyzerConfig};

#[test]
fn test_only_closing_parens() {
    let result = analyze(")))))");
    assert_eq!(result.total, 1);
    assert_eq!(result.semantic[0].message, "Unexpected token ')' at file scope");
}

#[test]
fn test_stray_tokens_in_block_are_skipped() {
    let result = analyze("int main() { ] ] return 0; }");
    let skipped: Vec<_> = result
        .semantic
        .iter()
        .filter(|d| d.message == "Skipping invalid token ']'")
        .collect();
    assert_eq!(skipped.len(), 2);
    assert_eq!(result.total, 2);
}

#[test]
fn test_garbage_terminates() {
    let garbage = "@@ int ( ; } { ) ] [ , . -> ... ? : 'x 12.3.4 \" ".repeat(200);
    let result = analyze(&garbage);
    assert!(result.total > 0);
}

#[test]
fn test_deep_block_nesting() {
    let source = format!(
        "int main() {{ {} {} return 0; }}",
        "{".repeat(5000),
        "}".repeat(5000)
    );
    let result = analyze(&source);
    assert!(result.iter().any(|d| d.message == "Nesting too deep"));
}

#[test]
fn test_deep_unary_chain() {
    let source = format!("int main() {{ int x = {}1; return x; }}", "- ".repeat(10_000));
    let result = analyze(&source);
    assert_eq!(
        result
            .iter()
            .filter(|d| d.message == "Nesting too deep")
            .count(),
        1
    );
}

fn nesting_reports(source: &str) -> usize {
    analyze(source)
        .iter()
        .filter(|d| d.message == "Nesting too deep")
        .count()
}

#[test]
fn test_long_assignment_chain() {
    let source = format!("int main() {{ int x; {}1; return 0; }}", "x = ".repeat(2000));
    let result = analyze(&source);
    assert_eq!(result.total, 1);
    assert_eq!(result.semantic[0].message, "Nesting too deep");
}

#[test]
fn test_long_conditional_chain() {
    let source = format!(
        "int main() {{ int x = {}1; return x; }}",
        "1 ? 1 : ".repeat(4000)
    );
    let result = analyze(&source);
    assert_eq!(result.total, 1);
    assert_eq!(result.semantic[0].message, "Nesting too deep");

    let source = format!("int main() {{ int x = {}1; return x; }}", "1 ? ".repeat(4000));
    assert_eq!(nesting_reports(&source), 1);
}

#[test]
fn test_deep_struct_nesting() {
    let source = format!("{}int x;{}", "struct S { ".repeat(5000), "};".repeat(5000));
    assert_eq!(nesting_reports(&source), 1);
}

#[test]
fn test_unterminated_input() {
    let result = analyze("int main() { char *s = \"abc");
    assert!(result
        .lexical
        .iter()
        .any(|d| d.message == "Unterminated string literal"));

    let result = analyze("int main() { if (");
    assert!(result.total > 0);
}

#[test]
fn test_iteration_cap_reports_once() {
    let analyzer = Analyzer::new(AnalyzerConfig {
        max_iterations: 5,
        ..AnalyzerConfig::default()
    });
    let source = "int a;\n".repeat(50);
    let result = analyzer.analyze(&source);
    let stuck: Vec<_> = result
        .semantic
        .iter()
        .filter(|d| d.message == "Parser stuck, aborting")
        .collect();
    assert_eq!(stuck.len(), 1);
    assert!(stuck[0].suggestion.is_none());
}

#[test]
fn test_errors_after_recovery_still_found() {
    let source = "int main() { int x = ; y = 1; return 0; }";
    let result = analyze(source);
    let messages: Vec<_> = result.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec!["Expected expression but got ';'", "Undeclared variable 'y'"]
    );
}
