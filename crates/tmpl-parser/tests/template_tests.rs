use super::*;
use crate::ast::ExprKind;

const TEMPLATE: &str = r#"<ul><li *ngFor="let item of items" (click)="select(item)">{{item.name}}</li></ul>"#;

fn span_of(text: &str, needle: &str) -> Span {
    let start = text.find(needle).expect("needle in template") as u32;
    Span::from_len(start, needle.len() as u32)
}

fn ng_for() -> DirectiveMatch {
    DirectiveMatch::new("NgForOf")
        .with_selector("[ngFor][ngForOf]")
        .with_input("ngForOf")
        .with_input("ngForTrackBy")
}

fn build() -> Vec<TemplateNode> {
    let li_span = span_of(TEMPLATE, r#"<li *ngFor="let item of items" (click)="select(item)">{{item.name}}</li>"#);
    let text_span = span_of(TEMPLATE, "{{item.name}}");
    let click_span = span_of(TEMPLATE, r#"(click)="select(item)""#);
    let li = Element::new("li", li_span)
        .with_output(BoundEvent::new(
            "click",
            click_span,
            span_of(TEMPLATE, "click"),
            span_of(TEMPLATE, "select(item)"),
            TEMPLATE,
        ))
        .with_child(BoundText::new(text_span, TEMPLATE).expect("interpolation"));
    let attr = TextAttribute::new(
        "*ngFor",
        "let item of items",
        span_of(TEMPLATE, r#"*ngFor="let item of items""#),
        Some(span_of(TEMPLATE, "let item of items")),
    );
    let template = EmbeddedTemplate::structural(attr, TEMPLATE, vec![ng_for()], li);
    let ul = Element::new("ul", Span::new(0, TEMPLATE.len() as u32)).with_child(template);
    vec![ul.into()]
}

fn only_template(nodes: &[TemplateNode]) -> &EmbeddedTemplate {
    let TemplateNode::Element(ul) = &nodes[0] else {
        panic!("expected ul");
    };
    let TemplateNode::Template(template) = &ul.children[0] else {
        panic!("expected template");
    };
    template
}

#[test]
fn test_structural_attribute_desugars_variables_and_inputs() {
    let nodes = build();
    let template = only_template(&nodes);

    assert_eq!(template.variables.len(), 1);
    assert_eq!(template.variables[0].name, "item");
    assert_eq!(template.variables[0].value, "$implicit");

    assert_eq!(template.template_bindings.len(), 1);
    let of = &template.template_bindings[0];
    assert_eq!(of.name, "ngForOf");
    let items_span = span_of(TEMPLATE, "items\"");
    assert_eq!(of.value_span, Span::from_len(items_span.start, 5));
    assert_eq!(of.value.base_offset, items_span.start);
    assert!(matches!(of.value.root_node().map(|n| &n.kind), Some(ExprKind::PropertyRead { name, .. }) if name == "items"));
    assert_eq!(template.input("ngForOf").map(|i| i.name.as_str()), Some("ngForOf"));
    assert!(template.microsyntax.as_ref().is_some_and(|m| m.errors.is_empty()));
}

#[test]
fn test_path_to_interpolation_passes_through_template() {
    let nodes = build();
    let position = span_of(TEMPLATE, "name}}").start;
    let path = find_template_path(&nodes, position);
    assert!(matches!(path.tail(), Some(NodeRef::BoundText(_))));
    assert_eq!(path.templates().count(), 1);
    assert_eq!(path.nearest_element().map(|e| e.name.as_str()), Some("li"));
    assert_eq!(path.position(), position);
}

#[test]
fn test_path_to_structural_attribute_and_event() {
    let nodes = build();
    let in_value = span_of(TEMPLATE, "of items").start;
    let path = find_template_path(&nodes, in_value);
    assert!(matches!(path.tail(), Some(NodeRef::StructuralAttribute(attr)) if attr.name == "*ngFor"));

    let in_handler = span_of(TEMPLATE, "select(item)").start + 2;
    let path = find_template_path(&nodes, in_handler);
    assert!(matches!(path.tail(), Some(NodeRef::Event(event)) if event.name == "click"));
    assert_eq!(path.nearest_directives().len(), 0);
}

#[test]
fn test_position_outside_everything_is_empty() {
    let nodes = build();
    let path = find_template_path(&nodes, TEMPLATE.len() as u32 + 10);
    assert!(path.is_empty());
    assert!(path.tail().is_none());
}

#[test]
fn test_selector_matching() {
    let directive = ng_for();
    assert!(directive.selects_attribute("ngForOf"));
    assert!(!directive.selects_attribute("ngIf"));
    assert!(!directive.selects_element("li"));

    let component = DirectiveMatch::new("HeroComponent")
        .component()
        .with_selector("app-hero, hero-card[big]");
    assert!(component.selects_element("app-hero"));
    assert!(component.selects_element("hero-card"));
    assert!(component.selects_attribute("big"));
}

#[test]
fn test_directive_property_lookup() {
    let directive = DirectiveMatch::new("Tooltip")
        .with_aliased_input("text", "tooltip")
        .with_output("shown")
        .with_export_as("tip");
    assert_eq!(directive.input_field("tooltip"), Some("text"));
    assert_eq!(directive.input_field("text"), None);
    assert_eq!(directive.output_field("shown"), Some("shown"));
    assert!(directive.exports("tip"));
}

#[test]
fn test_walk_visits_bindings_in_document_order() {
    let nodes = build();
    let mut seen = Vec::new();
    walk_template(&nodes, &mut |path| {
        let label = match path.tail() {
            Some(NodeRef::Element(el)) => format!("<{}>", el.name),
            Some(NodeRef::Template(_)) => "template".to_string(),
            Some(NodeRef::Property(p)) => format!("[{}]", p.name),
            Some(NodeRef::Event(e)) => format!("({})", e.name),
            Some(NodeRef::Variable(v)) => format!("let {}", v.name),
            Some(NodeRef::BoundText(_)) => "text".to_string(),
            _ => "other".to_string(),
        };
        seen.push(label);
    });
    assert_eq!(
        seen,
        vec!["<ul>", "template", "[ngForOf]", "let item", "<li>", "(click)", "text"]
    );
}
