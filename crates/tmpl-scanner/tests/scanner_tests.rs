use super::*;

fn kinds(text: &str) -> Vec<SyntaxKind> {
    tokenize(text).0.into_iter().map(|t| t.kind).collect()
}

#[test]
fn test_scan_member_chain_with_safe_navigation() {
    assert_eq!(
        kinds("a?.b.c"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::QuestionDotToken,
            SyntaxKind::Identifier,
            SyntaxKind::DotToken,
            SyntaxKind::Identifier,
            SyntaxKind::EndOfFileToken,
        ]
    );
}

#[test]
fn test_question_before_decimal_is_conditional() {
    assert_eq!(
        kinds("a?.5:1"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::QuestionToken,
            SyntaxKind::NumericLiteral,
            SyntaxKind::ColonToken,
            SyntaxKind::NumericLiteral,
            SyntaxKind::EndOfFileToken,
        ]
    );
}

#[test]
fn test_pipe_and_logical_or_are_distinct() {
    assert_eq!(
        kinds("a | b || c"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::BarToken,
            SyntaxKind::Identifier,
            SyntaxKind::BarBarToken,
            SyntaxKind::Identifier,
            SyntaxKind::EndOfFileToken,
        ]
    );
}

#[test]
fn test_longest_operator_match() {
    assert_eq!(
        kinds("!== === >>> >= <<"),
        vec![
            SyntaxKind::ExclamationEqualsEqualsToken,
            SyntaxKind::EqualsEqualsEqualsToken,
            SyntaxKind::GreaterThanGreaterThanGreaterThanToken,
            SyntaxKind::GreaterThanEqualsToken,
            SyntaxKind::LessThanLessThanToken,
            SyntaxKind::EndOfFileToken,
        ]
    );
}

#[test]
fn test_keywords_are_recognized() {
    let (tokens, _) = tokenize("let x as true");
    assert_eq!(tokens[0].kind, SyntaxKind::LetKeyword);
    assert_eq!(tokens[1].kind, SyntaxKind::Identifier);
    assert_eq!(tokens[2].kind, SyntaxKind::AsKeyword);
    assert_eq!(tokens[3].kind, SyntaxKind::TrueKeyword);
    assert!(tokens[2].kind.is_identifier_or_keyword());
}

#[test]
fn test_string_escapes_and_spans() {
    let (tokens, diagnostics) = tokenize(r#"  'it\'s A'"#);
    assert!(diagnostics.is_empty());
    assert_eq!(tokens[0].kind, SyntaxKind::StringLiteral);
    assert_eq!(tokens[0].text(), Some("it's A"));
    assert_eq!(tokens[0].span, Span::new(2, 11));
}

#[test]
fn test_unterminated_string_reports_error() {
    let (tokens, diagnostics) = tokenize("'abc");
    assert_eq!(tokens[0].kind, SyntaxKind::StringLiteral);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message_text(), "Unterminated quote");
}

#[test]
fn test_numbers() {
    let (tokens, _) = tokenize("1.5e2 .25 7");
    assert_eq!(tokens[0].number(), Some(150.0));
    assert_eq!(tokens[1].number(), Some(0.25));
    assert_eq!(tokens[2].number(), Some(7.0));
}

#[test]
fn test_invalid_exponent() {
    let (tokens, diagnostics) = tokenize("1e+");
    assert_eq!(tokens[0].kind, SyntaxKind::Unknown);
    assert_eq!(diagnostics[0].message_text(), "Invalid exponent");
}

#[test]
fn test_invalid_character_keeps_scanning() {
    let (tokens, diagnostics) = tokenize("a @ b");
    assert_eq!(tokens[1].kind, SyntaxKind::Unknown);
    assert_eq!(tokens[2].kind, SyntaxKind::Identifier);
    assert_eq!(diagnostics[0].message_text(), "Invalid character '@'");
}
