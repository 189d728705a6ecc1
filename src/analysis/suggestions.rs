//! Remediation hints for diagnostics
//!
//! The [`SuggestionEngine`] owns a fixed, ordered table of
//! (trigger substring, remedy, example) entries. A diagnostic message is
//! matched against the triggers in order and the first entry whose trigger
//! occurs in the message wins. Matching is case-sensitive.

use once_cell::sync::Lazy;

/// One row of the suggestion table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    pub trigger: &'static str,
    pub remedy: &'static str,
    pub example: Option<&'static str>,
}

impl Suggestion {
    const fn new(trigger: &'static str, remedy: &'static str, example: &'static str) -> Self {
        Self {
            trigger,
            remedy,
            example: Some(example),
        }
    }

    const fn bare(trigger: &'static str, remedy: &'static str) -> Self {
        Self {
            trigger,
            remedy,
            example: None,
        }
    }

    /// Render as a single line, e.g. `Add a semicolon ... | Example: int x = 5;`
    pub fn render(&self) -> String {
        match self.example {
            Some(example) => format!("{} | Example: {}", self.remedy, example),
            None => self.remedy.to_string(),
        }
    }
}

// First containment match wins, so keep specific triggers ahead of general ones.
const TABLE: &[Suggestion] = &[
    Suggestion::new(
        "Expected ';'",
        "Add a semicolon at the end of the statement",
        "int x = 5;",
    ),
    Suggestion::new(
        "Expected '('",
        "Control structures need parentheses around the condition",
        "if (x > 5) { }  while (y < 10) { }",
    ),
    Suggestion::new(
        "Expected ')'",
        "Close the opening parenthesis; check that parentheses are balanced",
        "func(arg1, arg2);",
    ),
    Suggestion::new(
        "Expected '{'",
        "A function body or block must start with '{'",
        "int main() { return 0; }",
    ),
    Suggestion::new(
        "Expected '}'",
        "Close the opening brace; every '{' needs a matching '}'",
        "void f() { int x = 5; }",
    ),
    Suggestion::new(
        "Expected ']'",
        "Close the array subscript or size with ']'",
        "int arr[10];  arr[0] = 1;",
    ),
    Suggestion::new(
        "Expected ':'",
        "Labels and the conditional operator need a ':'",
        "case 1: break;  x = c ? 1 : 2;",
    ),
    Suggestion::new(
        "Expected identifier",
        "A name is required here",
        "int count;  struct Point p;",
    ),
    Suggestion::new(
        "Expected expression",
        "An operand is missing; supply a value, variable, or call",
        "x = y + 1;",
    ),
    Suggestion::new(
        "Expected statement",
        "A control keyword must be followed by a statement or a block",
        "if (ok) { run(); }",
    ),
    Suggestion::new(
        "Expected type",
        "Type specifier needed: int, float, char, void, double",
        "int x;  float y;  char z;",
    ),
    Suggestion::new(
        "Undeclared variable",
        "Declare the variable before using it: type name;",
        "int x; x = 5;",
    ),
    Suggestion::new(
        "Undeclared function",
        "Declare or define the function before calling it, or include its header",
        "int add(int a, int b);",
    ),
    Suggestion::new(
        "Function redeclaration",
        "Define a function once and keep every declaration's signature identical",
        "int f(void);  int f(void) { return 0; }",
    ),
    Suggestion::new(
        "Redeclaration",
        "The name already exists in this scope; use a different name",
        "int x = 5; int y = 10;",
    ),
    Suggestion::new(
        "Redefinition",
        "The struct is already defined in this scope; define it once",
        "struct Point { int x; int y; };",
    ),
    Suggestion::new(
        "Type mismatch",
        "The value's type does not fit the target; convert explicitly or change a type",
        "int i = (int)3.5;  double d = 5;",
    ),
    Suggestion::new(
        "Argument count mismatch",
        "Pass exactly the arguments the function's signature asks for",
        "printf(\"%d\\n\", x);",
    ),
    Suggestion::new(
        "Invalid lvalue",
        "Only a modifiable variable (not a function, constant, or value) can be changed",
        "int i = 0; i++;",
    ),
    Suggestion::new(
        "Missing return",
        "A non-void function must return a value",
        "int f() { return 0; }",
    ),
    Suggestion::new(
        "Return with a value",
        "A void function cannot return a value; drop the expression or change the return type",
        "void f() { return; }",
    ),
    Suggestion::new(
        "Return without a value",
        "A non-void function must return a value of its return type",
        "int f() { return 0; }",
    ),
    Suggestion::new(
        "Nested function",
        "Functions cannot be declared inside other functions; move it to file scope",
        "int helper() { return 1; }\nint main() { return helper(); }",
    ),
    Suggestion::new(
        "declared void",
        "Only pointers to void can be declared; pick a concrete type",
        "int x;  void *p;",
    ),
    Suggestion::new(
        "Called object",
        "Only functions can be called",
        "int r = add(1, 2);",
    ),
    Suggestion::new(
        "No member named",
        "Check the member name against the struct definition",
        "struct Point { int x; }; p.x = 1;",
    ),
    Suggestion::new(
        "Member access",
        "Use '.' on a struct value and '->' on a pointer to a struct",
        "p.x = 1;  ptr->x = 1;",
    ),
    Suggestion::new(
        "Unknown struct",
        "Define the struct before declaring variables of that type",
        "struct Point { int x; int y; };  struct Point p;",
    ),
    Suggestion::new(
        "Duplicate member",
        "Each member of a struct needs a distinct name",
        "struct Point { int x; int y; };",
    ),
    Suggestion::new(
        "not within a loop",
        "'break' and 'continue' are only valid inside loops ('break' also inside switch)",
        "while (1) { if (done) break; }",
    ),
    Suggestion::new(
        "not within a switch",
        "'case' and 'default' labels belong inside a switch statement",
        "switch (x) { case 1: break; default: break; }",
    ),
    Suggestion::new(
        "Invalid numeric literal",
        "Check for multiple decimal points or stray letters",
        "float x = 3.14;",
    ),
    Suggestion::new(
        "Unterminated string",
        "String literals need an opening AND a closing quote on the same line",
        "char* s = \"hello\";",
    ),
    Suggestion::new(
        "Unterminated character",
        "Character literals need an opening AND a closing quote",
        "char c = 'A';",
    ),
    Suggestion::new(
        "Unterminated comment",
        "Close the block comment with */",
        "/* comment */",
    ),
    Suggestion::new(
        "Empty character literal",
        "A character literal must contain exactly one character",
        "char c = ' ';",
    ),
    Suggestion::new(
        "Multi-character constant",
        "Character literals can only contain ONE character; use a string for more",
        "char c = 'A';  char* s = \"AB\";",
    ),
    Suggestion::new(
        "Invalid character",
        "Remove the invalid character; '@', '$' and '`' are not C tokens",
        "int x = 5 + 10;",
    ),
    Suggestion::new(
        "Invalid #include",
        "The header name must be wrapped in <> or \"\"",
        "#include <stdio.h>",
    ),
    Suggestion::new(
        "Missing #endif",
        "Every #if/#ifdef/#ifndef needs a matching #endif",
        "#ifdef DEBUG\n/* code */\n#endif",
    ),
    Suggestion::bare(
        "Unmatched #endif",
        "Remove the #endif or add the #if it is meant to close",
    ),
    Suggestion::new(
        "Unexpected token",
        "This token is not expected here; check the statement's grammar",
        "int x = 5 * 10;",
    ),
    Suggestion::new(
        "Unexpected type name",
        "A type name cannot be used as a value",
        "int n = sizeof(MyInt);",
    ),
    Suggestion::bare(
        "Skipping invalid token",
        "The parser could not use this token; check the surrounding syntax",
    ),
    Suggestion::bare(
        "Nesting too deep",
        "Split deeply nested expressions or blocks into smaller pieces",
    ),
];

/// Static, ordered lookup from diagnostic text to a remediation hint.
#[derive(Debug)]
pub struct SuggestionEngine {
    entries: &'static [Suggestion],
}

static GLOBAL: Lazy<SuggestionEngine> = Lazy::new(|| SuggestionEngine { entries: TABLE });

impl SuggestionEngine {
    /// The shared, immutable table.
    pub fn global() -> &'static SuggestionEngine {
        &GLOBAL
    }

    /// First entry whose trigger occurs in `message`.
    pub fn lookup(&self, message: &str) -> Option<&'static Suggestion> {
        self.entries
            .iter()
            .find(|entry| message.contains(entry.trigger))
    }

    /// Rendered hint for `message`, or an empty string when nothing matches.
    pub fn suggestion_for(&self, message: &str) -> String {
        self.lookup(message)
            .map(Suggestion::render)
            .unwrap_or_default()
    }
}

/// Convenience wrapper over the global table.
pub fn suggestion_for(message: &str) -> String {
    SuggestionEngine::global().suggestion_for(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_wins() {
        let engine = SuggestionEngine::global();
        let hit = engine
            .lookup("Line 3:5 - Function redeclaration: 'main' is already defined")
            .unwrap();
        assert_eq!(hit.trigger, "Function redeclaration");

        let hit = engine.lookup("Redeclaration of 'x'").unwrap();
        assert_eq!(hit.trigger, "Redeclaration");
    }

    #[test]
    fn test_no_match_is_empty() {
        assert_eq!(suggestion_for("Parser stuck, aborting"), "");
        assert_eq!(suggestion_for(""), "");
    }

    #[test]
    fn test_render_includes_example() {
        let text = suggestion_for("Expected ';' but got 'return'");
        assert!(text.starts_with("Add a semicolon"));
        assert!(text.contains("Example: int x = 5;"));
    }

    #[test]
    fn test_triggers_are_unique() {
        for (i, a) in TABLE.iter().enumerate() {
            for b in &TABLE[i + 1..] {
                assert_ne!(a.trigger, b.trigger);
            }
        }
    }
}
