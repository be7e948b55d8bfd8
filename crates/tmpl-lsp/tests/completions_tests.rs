use super::*;
use crate::service::LanguageService;
use crate::test_fixture::{Heroes, OFFSET, hero_detail_directive, ng_model_directive, ngfor_directive, position};
use serde_json::json;

fn sorted(completions: &Completions) -> Vec<&str> {
    let mut names = completions.names();
    names.sort_unstable();
    names
}

const NG_FOR: &str = r#"<ul><li *ngFor="let hero of heroes; let i = index">{{hero.name}}</li></ul>"#;

fn ng_for_nodes() -> serde_json::Value {
    json!([{
        "kind": "element",
        "name": "ul",
        "children": [{
            "kind": "element",
            "name": "li",
            "attrs": [{"name": "*ngFor", "value": "let hero of heroes; let i = index"}],
            "templateDirectives": [ngfor_directive()],
            "children": [{"kind": "text", "text": "{{hero.name}}"}]
        }]
    }])
}

#[test]
fn test_member_access_offers_public_members_once() {
    let heroes = Heroes::new();
    let source = "{{selected.name}}";
    let document = heroes.text(source);
    let at = position(source, "name", 2);
    let completions = heroes.service.completions_at(&document, at).expect("completions");
    assert_eq!(sorted(&completions), ["id", "name", "nickname"], "private 'secret' is left out");
    assert_eq!(
        completions.replacement_span,
        Some(Span::from_len(position(source, "name", 0), 4))
    );
}

#[test]
fn test_scope_completions_filter_hidden_and_private_members() {
    let heroes = Heroes::new();
    let source = "{{title}}";
    let document = heroes.text(source);
    let completions = heroes
        .service
        .completions_at(&document, position(source, "title", 2))
        .expect("completions");
    let names = completions.names();
    for expected in ["title", "heroes", "heroes$", "selected", "select", "count"] {
        assert!(names.contains(&expected), "missing {expected}: {names:?}");
    }
    assert!(!names.contains(&"__internal"), "reserved prefix");
    assert!(!names.contains(&"token"), "private member");

    let select = completions.get("select").expect("select");
    assert_eq!(select.kind, SymbolKind::Method);
    assert_eq!(select.insert_text.as_deref(), Some("select()"));
    assert_eq!(completions.get("title").and_then(|e| e.insert_text.clone()), None);
    assert_eq!(select.sort_text, "select");
}

#[test]
fn test_options_can_offer_everything() {
    let heroes = Heroes::new();
    let service = LanguageService::new(heroes.query.clone().into_session()).with_options(ServiceOptions {
        hidden_member_prefix: String::new(),
        include_private: true,
    });
    let source = "{{title}}";
    let document = heroes.text(source);
    let completions = service
        .completions_at(&document, position(source, "title", 1))
        .expect("completions");
    assert!(completions.get("__internal").is_some());
    assert!(completions.get("token").is_some());
}

#[test]
fn test_pipe_name_completions() {
    let heroes = Heroes::new();
    let source = "{{title | uppercase}}";
    let document = heroes.text(source);
    let completions = heroes
        .service
        .completions_at(&document, position(source, "uppercase", 2))
        .expect("pipes");
    assert_eq!(sorted(&completions), ["async", "date", "slice", "uppercase"]);
    let uppercase = completions.get("uppercase").expect("uppercase");
    assert_eq!(uppercase.kind, SymbolKind::Pipe);
    assert_eq!(uppercase.insert_text, None, "pipes are not called");
}

#[test]
fn test_nothing_between_interpolations_or_outside_the_template() {
    let heroes = Heroes::new();
    let source = "{{title}} and {{count}}";
    let document = heroes.text(source);
    assert!(heroes.service.completions_at(&document, position(source, "and", 1)).is_none());
    assert!(heroes.service.completions_at(&document, OFFSET - 1).is_none());
    assert!(
        heroes
            .service
            .completions_at(&document, OFFSET + source.len() as u32 + 1)
            .is_none()
    );
}

#[test]
fn test_ng_for_variable_members() {
    let heroes = Heroes::new();
    let document = heroes.document(NG_FOR, ng_for_nodes());
    let completions = heroes
        .service
        .completions_at(&document, position(NG_FOR, "name}}", 1))
        .expect("members of hero");
    assert_eq!(sorted(&completions), ["id", "name", "nickname"]);
}

#[test]
fn test_microsyntax_value_completes_in_template_scope() {
    let heroes = Heroes::new();
    let document = heroes.document(NG_FOR, ng_for_nodes());
    let completions = heroes
        .service
        .completions_at(&document, position(NG_FOR, "heroes;", 2))
        .expect("scope");
    let names = completions.names();
    assert!(names.contains(&"heroes"), "{names:?}");
    assert!(names.contains(&"hero"), "template variables are visible: {names:?}");
}

#[test]
fn test_microsyntax_let_value_completes_context_members() {
    let heroes = Heroes::new();
    let document = heroes.document(NG_FOR, ng_for_nodes());
    let completions = heroes
        .service
        .completions_at(&document, position(NG_FOR, "index\"", 2))
        .expect("context members");
    let names = completions.names();
    for expected in ["$implicit", "index", "first", "last", "even", "odd"] {
        assert!(names.contains(&expected), "missing {expected}: {names:?}");
    }
}

#[test]
fn test_reference_value_offers_export_names() {
    let heroes = Heroes::new();
    let source = r#"<input #m="ngModel" [(ngModel)]="title">"#;
    let document = heroes.document(
        source,
        json!([{
            "kind": "element",
            "name": "input",
            "attrs": [{"name": "#m", "value": "ngModel"}, {"name": "[(ngModel)]", "value": "title"}],
            "directives": [ng_model_directive()]
        }]),
    );
    let completions = heroes
        .service
        .completions_at(&document, position(source, "\"ngModel\"", 3))
        .expect("export names");
    assert_eq!(completions.names(), ["ngModel"]);
    assert_eq!(completions.entries[0].kind, SymbolKind::Reference);
}

#[test]
fn test_event_handler_sees_event_variable() {
    let heroes = Heroes::new();
    let source = r#"<hero-detail [hero]="selected" (deleted)="select($event)"></hero-detail>"#;
    let document = heroes.document(
        source,
        json!([{
            "kind": "element",
            "name": "hero-detail",
            "attrs": [
                {"name": "[hero]", "value": "selected"},
                {"name": "(deleted)", "value": "select($event)"}
            ],
            "directives": [hero_detail_directive()]
        }]),
    );
    let completions = heroes
        .service
        .completions_at(&document, position(source, "$event", 2))
        .expect("scope");
    let event = completions.get("$event").expect("$event");
    assert_eq!(event.kind, SymbolKind::Variable);
    assert_eq!(
        completions.replacement_span,
        Some(Span::from_len(position(source, "$event", 0), 6))
    );
}
