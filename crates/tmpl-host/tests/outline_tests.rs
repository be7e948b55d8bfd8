use super::*;
use crate::query::HostQuery;
use serde_json::json;

fn outline(source: &str, nodes: serde_json::Value) -> TemplateOutline {
    serde_json::from_value(json!({
        "fileName": "app.component.html",
        "component": "AppComponent",
        "source": source,
        "nodes": nodes,
    }))
    .expect("outline json")
}

fn at(source: &str, needle: &str) -> u32 {
    source.find(needle).unwrap_or_else(|| panic!("{needle} in source")) as u32
}

fn only_element(nodes: &[TemplateNode]) -> &Element {
    match nodes {
        [TemplateNode::Element(element)] => element,
        other => panic!("expected one element, got {other:?}"),
    }
}

#[test]
fn test_element_attributes_are_located() {
    let source = r#"<div class="box" [title]="title" (click)="select(hero)" #box>{{title}}</div>"#;
    let outline = outline(
        source,
        json!([{
            "kind": "element",
            "name": "div",
            "attrs": [
                {"name": "class", "value": "box"},
                {"name": "[title]", "value": "title"},
                {"name": "(click)", "value": "select(hero)"},
                {"name": "#box"}
            ],
            "children": [{"kind": "text", "text": "{{title}}"}]
        }]),
    );
    let nodes = outline.build().expect("build");
    let div = only_element(&nodes);
    assert_eq!(div.span, Span::new(0, source.len() as u32));

    assert_eq!(div.attrs[0].name, "class");
    assert_eq!(div.attrs[0].value, "box");

    let input = &div.inputs[0];
    assert_eq!(input.name, "title");
    assert_eq!(input.key_span, Span::from_len(at(source, "[title]") + 1, 5));
    assert_eq!(input.span.slice(source), Some(r#"[title]="title""#));
    assert!(input.value.errors.is_empty());

    let output = &div.outputs[0];
    assert_eq!(output.name, "click");
    assert_eq!(output.handler_span.slice(source), Some("select(hero)"));

    assert_eq!(div.references[0].name, "box");
    assert!(matches!(div.children.as_slice(), [TemplateNode::BoundText(_)]));
}

#[test]
fn test_structural_attribute_desugars_to_template() {
    let source = r#"<ul><li *ngFor="let hero of heroes; let i = index">{{hero.name}}</li></ul>"#;
    let outline = outline(
        source,
        json!([{
            "kind": "element",
            "name": "ul",
            "children": [{
                "kind": "element",
                "name": "li",
                "attrs": [{"name": "*ngFor", "value": "let hero of heroes; let i = index"}],
                "templateDirectives": [{
                    "type": {"name": "NgForOf"},
                    "inputs": [{"field": "ngForOf", "binding": "ngForOf"}]
                }],
                "children": [{"kind": "text", "text": "{{hero.name}}"}]
            }]
        }]),
    );
    let nodes = outline.build().expect("build");
    let ul = only_element(&nodes);
    let [TemplateNode::Template(template)] = ul.children.as_slice() else {
        panic!("expected a template, got {:?}", ul.children);
    };
    let variables: Vec<(&str, &str)> = template
        .variables
        .iter()
        .map(|v| (v.name.as_str(), v.value.as_str()))
        .collect();
    assert_eq!(variables, [("hero", "$implicit"), ("i", "index")]);
    assert_eq!(template.template_bindings.len(), 1);
    assert_eq!(template.template_bindings[0].name, "ngForOf");
    assert_eq!(template.directives[0].type_ref.name, "NgForOf");
    let li = only_element(&template.children);
    assert_eq!(li.name, "li");
    assert!(li.directives.is_empty());
}

#[test]
fn test_ng_template_variables_and_inputs() {
    let source = r#"<ng-template let-hero let-i="index" [ngIf]="show"><span>{{hero}}</span></ng-template>"#;
    let outline = outline(
        source,
        json!([{
            "kind": "element",
            "name": "ng-template",
            "attrs": [
                {"name": "let-hero"},
                {"name": "let-i", "value": "index"},
                {"name": "[ngIf]", "value": "show"}
            ],
            "children": [{
                "kind": "element",
                "name": "span",
                "children": [{"kind": "text", "text": "{{hero}}"}]
            }]
        }]),
    );
    let nodes = outline.build().expect("build");
    let [TemplateNode::Template(template)] = nodes.as_slice() else {
        panic!("expected a template");
    };
    assert_eq!(template.span, Span::new(0, source.len() as u32));
    assert_eq!(template.variables[0].value, "$implicit");
    assert_eq!(template.variables[1].value, "index");
    assert_eq!(template.input("ngIf").map(|input| input.name.as_str()), Some("ngIf"));
    assert!(template.structural_attr.is_none());
}

#[test]
fn test_two_way_binding_and_void_elements() {
    let source = r#"<input [(ngModel)]="title"><span>plain</span>"#;
    let outline = outline(
        source,
        json!([
            {"kind": "element", "name": "input", "attrs": [{"name": "[(ngModel)]", "value": "title"}]},
            {"kind": "element", "name": "span", "children": [{"kind": "text", "text": "plain"}]}
        ]),
    );
    let nodes = outline.build().expect("build");
    let TemplateNode::Element(input) = &nodes[0] else {
        panic!("expected an element");
    };
    assert_eq!(input.span.slice(source), Some(r#"<input [(ngModel)]="title">"#));
    assert_eq!(input.inputs[0].name, "ngModel");
    assert_eq!(input.outputs[0].name, "ngModelChange");
    assert_eq!(input.inputs[0].key_span, Span::from_len(at(source, "ngModel"), 7));

    let TemplateNode::Element(span) = &nodes[1] else {
        panic!("expected an element");
    };
    assert!(matches!(span.children.as_slice(), [TemplateNode::Text(text)] if text.value == "plain"));
}

#[test]
fn test_missing_pieces_are_errors() {
    let outline = outline(
        "<div></div>",
        json!([{"kind": "element", "name": "div", "attrs": [{"name": "[title]", "value": "x"}]}]),
    );
    match outline.build() {
        Err(HostError::Outline { needle, .. }) => assert_eq!(needle, "[title]"),
        other => panic!("expected an outline error, got {other:?}"),
    }
}

#[test]
fn test_template_info_uses_component_members() {
    let query = HostQuery::from_json(include_str!("fixtures/heroes.json")).expect("fixture");
    let mut outline = outline("{{title}}", json!([{"kind": "text", "text": "{{title}}"}]));
    outline.offset = 40;
    let info = query.template_info(&outline).expect("info");
    assert!(info.members.has("title"));
    assert_eq!(info.offset, 40);
    assert_eq!(info.definition(Span::new(2, 7)).span, Span::new(42, 47));

    outline.component = "Missing".to_string();
    assert!(matches!(query.template_info(&outline), Err(HostError::UnknownType { .. })));
}
