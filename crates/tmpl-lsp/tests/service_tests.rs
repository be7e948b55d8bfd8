use super::*;
use crate::test_fixture::{Heroes, OFFSET, ngfor_directive, position};
use serde_json::json;
use tmpl_common::span::Span;

#[test]
fn test_guarded_returns_the_value() {
    assert_eq!(guarded("test", 0, || 7), 7);
}

#[test]
#[cfg(not(debug_assertions))]
fn test_guarded_falls_back_after_a_panic() {
    let value = guarded("test", vec![1], || -> Vec<i32> { panic!("engine bug") });
    assert_eq!(value, [1]);
}

#[test]
#[cfg(debug_assertions)]
fn test_guarded_propagates_panics_in_debug_builds() {
    let result = std::panic::catch_unwind(|| guarded("test", 0, || -> i32 { panic!("engine bug") }));
    assert!(result.is_err());
}

#[test]
fn test_diagnostics_report_type_errors_in_file_coordinates() {
    let heroes = Heroes::new();
    let source = "{{title.nope}}";
    let document = heroes.text(source);
    let diagnostics = heroes.service.diagnostics(&document);
    assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
    let diagnostic = &diagnostics[0];
    assert!(diagnostic.message_text().contains("'nope'"), "{}", diagnostic.message_text());
    assert_eq!(diagnostic.span.start, position(source, "title.nope", 0));
}

#[test]
fn test_parse_errors_hide_type_errors() {
    let heroes = Heroes::new();
    let source = "{{title.nope}} {{count +}}";
    let document = heroes.text(source);
    let diagnostics = heroes.service.diagnostics(&document);
    assert!(!diagnostics.is_empty());
    assert!(
        diagnostics.iter().all(|d| !d.message_text().contains("nope")),
        "only parse errors: {diagnostics:?}"
    );
}

#[test]
fn test_clean_template_has_no_diagnostics() {
    let heroes = Heroes::new();
    let source = "{{selected?.name}} {{heroes[0].name}} {{count + 1}}";
    let document = heroes.text(source);
    assert_eq!(heroes.service.diagnostics(&document), []);
}

#[test]
fn test_long_expressions_are_answered() {
    let heroes = Heroes::new();
    let source = format!("{{{{{}}}}}", vec!["count"; 5000].join(" + "));
    let document = heroes.text(&source);
    assert_eq!(heroes.service.diagnostics(&document), []);

    let hover = heroes.service.hover_at(&document, position(&source, "count", 1));
    assert_eq!(hover.map(|h| h.name).as_deref(), Some("count"));
}

#[test]
fn test_scope_at_a_template_path() {
    let heroes = Heroes::new();
    let source = r#"<li *ngFor="let hero of heroes; let i = index">{{i}}</li>"#;
    let document = heroes.document(
        source,
        json!([{
            "kind": "element",
            "name": "li",
            "attrs": [{"name": "*ngFor", "value": "let hero of heroes; let i = index"}],
            "templateDirectives": [ngfor_directive()],
            "children": [{"kind": "text", "text": "{{i}}"}]
        }]),
    );
    let inside = document.path_at(position(source, "{{i}}", 2) - OFFSET);
    let scope = heroes.service.scope_at(&document, &inside);
    assert!(scope.has("hero") && scope.has("i") && scope.has("title"));
    let hero = scope.get("hero").and_then(|h| h.ty()).expect("hero type");
    assert_eq!(hero.name(), "Hero");

    let outside = document.path_at(source.len() as u32 + 1);
    assert!(!heroes.service.scope_at(&document, &outside).has("hero"));
}

#[test]
fn test_definition_of_members_and_variables() {
    let heroes = Heroes::new();
    let source = r#"<li *ngFor="let hero of heroes">{{hero.name}} {{title}}</li>"#;
    let document = heroes.document(
        source,
        json!([{
            "kind": "element",
            "name": "li",
            "attrs": [{"name": "*ngFor", "value": "let hero of heroes"}],
            "templateDirectives": [ngfor_directive()],
            "children": [{"kind": "text", "text": "{{hero.name}} {{title}}"}]
        }]),
    );

    let title = heroes
        .service
        .definition_at(&document, position(source, "title", 1))
        .expect("title definition");
    assert_eq!(title.definitions.len(), 1);
    assert_eq!(title.definitions[0].file_name, "app.component.ts");
    assert_eq!(title.definitions[0].span, Span::new(120, 125));
    assert_eq!(title.bound_span, Span::from_len(position(source, "title", 0), 5));

    let name = heroes
        .service
        .definition_at(&document, position(source, "name", 1))
        .expect("name definition");
    assert_eq!(name.definitions[0].file_name, "hero.ts");

    let variable = heroes
        .service
        .definition_at(&document, position(source, "hero.name", 1))
        .expect("variable definition");
    assert_eq!(variable.definitions[0].file_name, "app.component.ts");
    let declared = position(source, "let hero", 0);
    assert!(variable.definitions[0].span.contains(declared + 4), "{:?}", variable.definitions[0]);

    assert!(
        heroes.service.definition_at(&document, position(source, "heroes", 1)).is_none(),
        "heroes has no recorded location"
    );
}

#[test]
fn test_invalidate_keeps_answers() {
    let mut heroes = Heroes::new();
    let source = "{{title}}";
    let document = heroes.text(source);
    let before = heroes.service.completions_at(&document, position(source, "title", 1));
    heroes.service.invalidate();
    let after = heroes.service.completions_at(&document, position(source, "title", 1));
    assert_eq!(before, after);
}
