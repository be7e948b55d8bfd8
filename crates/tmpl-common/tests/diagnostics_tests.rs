use super::*;

#[test]
fn test_format_message_fills_placeholders() {
    let text = format_message(
        diagnostic_messages::IDENTIFIER_POSSIBLY_UNDEFINED.message,
        &["person", "person?.name", "person!.name"],
    );
    assert_eq!(
        text,
        "'person' is possibly undefined. Consider using the safe navigation operator (person?.name) or non-null assertion operator (person!.name)."
    );
}

#[test]
fn test_lookup_by_code() {
    let message = get_diagnostic_message(diagnostic_codes::IDENTIFIER_IS_PRIVATE)
        .expect("private member message should be registered");
    assert_eq!(message.category, DiagnosticCategory::Warning);
}

#[test]
fn test_codes_are_unique() {
    let mut codes: Vec<u32> = DIAGNOSTIC_MESSAGES.iter().map(|m| m.code).collect();
    let total = codes.len();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), total, "duplicate diagnostic code in message table");
}

#[test]
fn test_with_next_builds_chain() {
    let diagnostic = Diagnostic::new(
        Span::new(0, 4),
        &diagnostic_messages::TEMPLATE_CONTEXT_MISSING_MEMBER,
        &["NgForOf", "idx"],
    )
    .with_next("Consider refining the context type.");

    match &diagnostic.message {
        DiagnosticText::Chain(chain) => {
            assert_eq!(chain.text, "The template context of 'NgForOf' does not define idx.");
            assert_eq!(chain.next.len(), 1);
        }
        DiagnosticText::Plain(_) => panic!("expected a chained message"),
    }
    assert_eq!(
        diagnostic.message.render(),
        "The template context of 'NgForOf' does not define idx.\n  Consider refining the context type."
    );
}

#[test]
fn test_plain_text_serializes_as_string() {
    let diagnostic = Diagnostic::new(Span::new(1, 2), &diagnostic_messages::EXPECTED_A_NUMBER_TYPE, &[]);
    let json = serde_json::to_value(&diagnostic).expect("diagnostic should serialize");
    assert_eq!(json["message"], "Expected a number type");
    assert_eq!(json["category"], "Error");
}
