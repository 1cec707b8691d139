use super::*;

/// Recognizes `input` and hands the parser back for inspection. Panics on
/// fatal conditions, which none of these programs should hit.
fn recognize(input: &str) -> Parser {
    let mut parser = Parser::new(input).unwrap();
    parser.program().unwrap();
    parser
}

fn messages(parser: &Parser) -> Vec<String> {
    parser.errors().iter().map(|d| d.message.clone()).collect()
}

#[test]
fn test_clean_program() {
    let parser = recognize(r#"program p; void main() { int x = 5; printf("%d", x); }"#);

    assert!(!parser.errors().has_errors());
    assert_eq!(parser.symbols().len(), 1);
    assert_eq!(parser.symbols().lookup("x").unwrap().type_annotation(), "int");
}

#[test]
fn test_declarations_populate_table_in_order() {
    let parser = recognize(
        "program p;\n\
         void main() {\n\
           int a, b = 2, v[3] = {1, 2, 3};\n\
           int w[];\n\
           int u[2];\n\
         }",
    );

    assert!(!parser.errors().has_errors());
    assert_eq!(
        parser.symbols().render(),
        "Symbol table:\n  a -> int\n  b -> int\n  v -> int[3]\n  w -> int[]\n  u -> int[2]\n"
    );
}

#[test]
fn test_symbol_dump_is_idempotent() {
    let parser = recognize("program p; void main() { int a; int b[4]; }");
    assert_eq!(parser.symbols().render(), parser.symbols().render());
}

#[test]
fn test_duplicate_declaration() {
    let parser = recognize("program p; void main() { int x; int x; }");

    assert_eq!(
        messages(&parser),
        vec!["variable `x` already declared".to_string()]
    );
    // first declaration wins, the table is not touched again
    assert_eq!(parser.symbols().len(), 1);
    assert!(parser.symbols().exists("x"));
}

#[test]
fn test_duplicate_array_declaration() {
    let parser = recognize("program p; void main() { int v[2] = {1, 2}; int v[5]; }");

    assert_eq!(
        messages(&parser),
        vec!["variable `v` already declared".to_string()]
    );
    assert_eq!(parser.symbols().lookup("v").unwrap().size, Some(2));
}

#[test]
fn test_undeclared_in_assignment() {
    let parser = recognize("program p; void main() { y = 1; }");

    assert_eq!(messages(&parser), vec!["undeclared variable `y`".to_string()]);
    assert!(parser.symbols().is_empty());
}

#[test]
fn test_undeclared_in_expression() {
    let parser = recognize("program p; void main() { int x; x = y + 1; }");

    assert_eq!(messages(&parser), vec!["undeclared variable `y`".to_string()]);
}

#[test]
fn test_undeclared_does_not_abort() {
    // both uses are flagged and the parse still reaches the end
    let parser = recognize("program p; void main() { a = 1; b = 2; }");

    assert_eq!(
        messages(&parser),
        vec![
            "undeclared variable `a`".to_string(),
            "undeclared variable `b`".to_string(),
        ]
    );
}

#[test]
fn test_array_size_mismatch() {
    let parser = recognize("program p; void main() { int a[3] = {1, 2}; }");

    assert_eq!(
        messages(&parser),
        vec!["invalid size for array `a`: expected 3 elements, received 2".to_string()]
    );
    // the declaration is still registered with its declared size
    assert_eq!(parser.symbols().lookup("a").unwrap().type_annotation(), "int[3]");
}

#[test]
fn test_array_initializer_matches() {
    let parser = recognize("program p; void main() { int a[3] = {1, 2, 3}; }");
    assert!(!parser.errors().has_errors());
}

#[test]
fn test_unsized_array_initializer_is_unchecked() {
    let parser = recognize("program p; void main() { int a[] = {1, 2, 3, 4}; }");

    assert!(!parser.errors().has_errors());
    assert_eq!(parser.symbols().lookup("a").unwrap().type_annotation(), "int[]");
}

#[test]
fn test_indexed_assignment_and_access() {
    let parser = recognize(
        "program p; void main() { int v[2] = {1, 2}; int i; i = 0; v[i] = v[i + 1] * 2; }",
    );
    assert!(!parser.errors().has_errors());
}

#[test]
fn test_scanf_forms() {
    let parser = recognize(
        r#"program p; void main() { int x; scanf("%d", &x); scanf("%d", x); }"#,
    );
    assert!(!parser.errors().has_errors());
}

#[test]
fn test_printf_expression_arguments() {
    let parser = recognize(
        r#"program p; void main() { int x = 1; printf(x + 2); printf("%d %d", x, (x + 1) * 3); }"#,
    );
    assert!(!parser.errors().has_errors());
}

#[test]
fn test_missing_program_keyword_continues() {
    let parser = recognize("p; void main() { int x; }");

    let msgs = messages(&parser);
    assert_eq!(msgs.len(), 1);
    assert!(msgs[0].contains("expected `program`"));
    // best-effort continuation still registered the declaration
    assert!(parser.symbols().exists("x"));
}

#[test]
fn test_missing_semicolon_reports_and_continues() {
    let parser = recognize("program p void main() { int x; }");

    let msgs = messages(&parser);
    assert_eq!(msgs.len(), 1);
    assert!(msgs[0].contains("expected `;`"));
    assert!(parser.symbols().exists("x"));
}

#[test]
fn test_invalid_command_skips_one_token() {
    let parser = recognize("program p; void main() { + int x; }");

    let msgs = messages(&parser);
    assert_eq!(msgs, vec!["invalid command `+`".to_string()]);
    // recovery resumed at the declaration
    assert!(parser.symbols().exists("x"));
}

#[test]
fn test_invalid_factor_reports() {
    let parser = recognize("program p; void main() { int x; x = ); }");

    let msgs = messages(&parser);
    assert!(msgs
        .iter()
        .any(|m| m.contains("expected identifier, integer or `(`")));
}

#[test]
fn test_non_ascii_lexeme_in_diagnostic() {
    // the quoted lexeme crosses multibyte chars; slicing it must not panic
    let parser = recognize(r#"program p; void main() { int x; x = "¢¢"; }"#);

    let msgs = messages(&parser);
    assert_eq!(
        msgs[0],
        "expected identifier, integer or `(`, found `\"¢¢\"`"
    );
}

#[test]
fn test_diagnostic_positions() {
    let parser = recognize("program p;\nvoid main() {\n  int x;\n  int x;\n}");

    let diagnostic = parser.errors().iter().next().unwrap();
    assert_eq!(diagnostic.message, "variable `x` already declared");
    let position = diagnostic.position.unwrap();
    assert_eq!(position.line, 4);
    assert_eq!(position.column, 7);
}

#[test]
fn test_truncated_input_is_fatal() {
    let mut parser = Parser::new("program p; void main() { int x = ").unwrap();
    assert!(matches!(
        parser.program(),
        Err(ParseError::UnexpectedEof)
    ));
}

#[test]
fn test_empty_input_is_fatal() {
    let mut parser = Parser::new("").unwrap();
    assert!(matches!(parser.program(), Err(ParseError::UnexpectedEof)));
}

#[test]
fn test_unterminated_block_reports_then_fails() {
    let mut parser = Parser::new("program p; void main() { int x;").unwrap();
    let result = parser.program();

    assert!(matches!(result, Err(ParseError::UnexpectedEof)));
    // the block loop logged the truncation before the fatal bailout
    assert!(parser
        .errors()
        .iter()
        .any(|d| d.message == "unexpected end of file"));
}

#[test]
fn test_lexer_error_is_fatal() {
    let mut parser = Parser::new("program p; void main() { int x = @; }").unwrap();
    assert!(matches!(parser.program(), Err(ParseError::Lexer(_))));
}

#[test]
fn test_into_report() {
    let mut parser = Parser::new("program p; void main() { int x; int x; }").unwrap();
    parser.program().unwrap();

    let (errors, symbols) = parser.into_report();
    assert_eq!(errors.len(), 1);
    assert_eq!(symbols.len(), 1);
}
