use super::*;
use crate::test_fixture::{Heroes, hero_detail_directive, position};
use serde_json::json;

#[test]
fn test_display_includes_container_and_type() {
    let info = HoverInfo {
        kind: SymbolKind::Property,
        name: "title".to_string(),
        container: Some("AppComponent".to_string()),
        type_name: Some("string".to_string()),
        span: Span::new(0, 5),
        documentation: None,
    };
    assert_eq!(info.display(), "(property) AppComponent.title: string");
    assert_eq!(info.markdown(), "```\n(property) AppComponent.title: string\n```");

    let bare = HoverInfo {
        container: None,
        type_name: None,
        documentation: Some("Docs.".to_string()),
        ..info
    };
    assert_eq!(bare.display(), "(property) title");
    assert!(bare.markdown().ends_with("\n\nDocs."));
}

#[test]
fn test_hover_on_member_shows_docs() {
    let heroes = Heroes::new();
    let source = "{{selected.name}}";
    let document = heroes.text(source);
    let hover = heroes
        .service
        .hover_at(&document, position(source, "name", 2))
        .expect("hover");
    assert_eq!(hover.display(), "(property) Hero.name: string");
    assert_eq!(hover.documentation.as_deref(), Some("Display name."));
    assert_eq!(hover.span, Span::from_len(position(source, "name", 0), 4));
}

#[test]
fn test_hover_on_component_tag() {
    let heroes = Heroes::new();
    let source = r#"<hero-detail [hero]="selected"></hero-detail>"#;
    let document = heroes.document(
        source,
        json!([{
            "kind": "element",
            "name": "hero-detail",
            "attrs": [{"name": "[hero]", "value": "selected"}],
            "directives": [hero_detail_directive()]
        }]),
    );
    let hover = heroes
        .service
        .hover_at(&document, position(source, "detail", 0))
        .expect("hover");
    assert_eq!(hover.kind, SymbolKind::Component);
    assert_eq!(hover.name, "HeroDetailComponent");
    assert_eq!(hover.documentation.as_deref(), Some("Shows one hero."));

    let input = heroes
        .service
        .hover_at(&document, position(source, "hero]", 0))
        .expect("input hover");
    assert_eq!(input.display(), "(property) HeroDetailComponent.hero: Hero");
    assert_eq!(input.documentation.as_deref(), Some("The hero to show."));
}

#[test]
fn test_hover_serializes_camel_case() {
    let heroes = Heroes::new();
    let source = "{{title}}";
    let document = heroes.text(source);
    let hover = heroes
        .service
        .hover_at(&document, position(source, "title", 0))
        .expect("hover");
    let value = serde_json::to_value(&hover).expect("json");
    assert_eq!(value["kind"], "property");
    assert_eq!(value["typeName"], "string");
    assert_eq!(value["container"], "AppComponent");
    assert!(value.get("documentation").is_none());
}

#[test]
fn test_hover_shows_type_arguments() {
    let heroes = Heroes::new();
    let source = "{{heroes$ | async}}";
    let document = heroes.text(source);
    let hover = heroes
        .service
        .hover_at(&document, position(source, "heroes$", 1))
        .expect("hover");
    assert_eq!(hover.display(), "(property) AppComponent.heroes$: Observable<Hero[]>");
}
