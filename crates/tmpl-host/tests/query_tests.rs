use super::*;
use tmpl_checker::{ExpressionChecker, SymbolKind};
use tmpl_parser::parse_binding;

const HEROES: &str = include_str!("fixtures/heroes.json");

fn query() -> HostQuery {
    HostQuery::from_json(HEROES).expect("fixture loads")
}

fn component_member(query: &HostQuery, name: &str) -> SymbolRef {
    let app = query
        .get_type_symbol(&TypeReference::new("AppComponent"))
        .expect("AppComponent");
    app.members().get(name).unwrap_or_else(|| panic!("{name} is a member"))
}

#[test]
fn test_builtin_types_report_their_kind() {
    let query = query();
    for kind in BuiltinType::ALL {
        let builtin = query.get_builtin_type(kind);
        assert_eq!(query.get_type_kind(&builtin), kind, "{kind:?}");
    }
}

#[test]
fn test_value_symbols_are_classified_by_type() {
    let query = query();
    assert_eq!(query.get_type_kind(&component_member(&query, "title")), BuiltinType::String);
    assert_eq!(query.get_type_kind(&component_member(&query, "count")), BuiltinType::Number);
    assert_eq!(query.get_type_kind(&component_member(&query, "heroes")), BuiltinType::Other);
}

#[test]
fn test_non_nullable() {
    let query = query();
    let selected = component_member(&query, "selected");
    assert!(selected.is_nullable());
    let hero = query.get_non_nullable_type(&selected);
    assert!(!hero.is_nullable());
    assert_eq!(hero.name(), "Hero");

    let title = component_member(&query, "title");
    assert!(Arc::ptr_eq(&query.get_non_nullable_type(&title), &title));
}

#[test]
fn test_union_compares_types() {
    let query = query();
    let title = component_member(&query, "title");
    let string = query.get_builtin_type(BuiltinType::String);
    let same = query.get_type_union(&[Arc::clone(&title), Arc::clone(&string)]);
    assert!(Arc::ptr_eq(&same, &title));
    let mixed = query.get_type_union(&[title, component_member(&query, "count")]);
    assert_eq!(query.get_type_kind(&mixed), BuiltinType::Any);
    assert_eq!(query.get_type_kind(&query.get_type_union(&[])), BuiltinType::Any);
}

#[test]
fn test_array_and_element_types() {
    let query = query();
    let string = query.get_builtin_type(BuiltinType::String);
    let array = query.get_array_type(&string);
    assert_eq!(array.name(), "string[]");
    let element = query.get_element_type(&array).expect("element");
    assert!(Arc::ptr_eq(&element, &string), "interned types share symbols");

    let pair = component_member(&query, "pair");
    let element = query.get_element_type(&pair).expect("tuple element");
    assert_eq!(element.name(), "string | number");
    assert!(query.get_element_type(&component_member(&query, "count")).is_none());
}

#[test]
fn test_pipes() {
    let query = query();
    let pipes = query.get_pipes();
    assert_eq!(pipes.size(), 4);
    let uppercase = pipes.get("uppercase").expect("uppercase");
    assert_eq!(uppercase.kind(), SymbolKind::Pipe);
    assert!(uppercase.documentation().is_some());
    let string = query.get_builtin_type(BuiltinType::String);
    let signature = uppercase
        .select_signature(&[Arc::clone(&string)])
        .expect("one argument");
    assert_eq!(signature.result.name(), "string");
    assert!(uppercase.select_signature(&[]).is_none());

    let slice = pipes.get("slice").expect("slice");
    let number = query.get_builtin_type(BuiltinType::Number);
    assert!(slice.select_signature(&[Arc::clone(&string), Arc::clone(&number)]).is_some());
    assert!(slice.select_signature(&[string, Arc::clone(&number), number]).is_some());
}

#[test]
fn test_template_context_leaves_parameters_unbound() {
    let query = query();
    let context = query
        .get_template_context(&TypeReference::new("NgForOf"))
        .expect("NgForOf has a context");
    let implicit = context.get("$implicit").expect("$implicit");
    assert_eq!(query.get_type_kind(&implicit), BuiltinType::Unbound);
    assert!(context.has("index"));
    assert!(query.get_template_context(&TypeReference::new("Hero")).is_none());
}

#[test]
fn test_type_symbols_and_type_arguments() {
    let query = query();
    let detail = query
        .get_type_symbol(&TypeReference::new("HeroDetailComponent"))
        .expect("component");
    assert_eq!(detail.documentation().as_deref(), Some("Shows one hero."));
    let definition = detail.definition().expect("located");
    assert_eq!(definition[0].file_name, "hero-detail.component.ts");

    let deleted = detail.members().get("deleted").expect("deleted");
    assert_eq!(deleted.kind(), SymbolKind::Property);
    let container = deleted.container().expect("declared in a class");
    assert_eq!(container.name(), "HeroDetailComponent");
    let args = deleted.type_arguments().expect("EventEmitter<Hero>");
    assert_eq!(args.len(), 1);
    assert_eq!(args[0].name(), "Hero");
    assert!(query.get_type_symbol(&TypeReference::new("Nope")).is_none());
}

#[test]
fn test_generic_types_are_named_by_their_class() {
    let query = query();
    let ng_for = query
        .get_type_symbol(&TypeReference::new("NgForOf"))
        .expect("NgForOf");
    assert_eq!(ng_for.name(), "NgForOf");
    assert_eq!(ng_for.display_name(), "NgForOf<T>");

    let stream = component_member(&query, "heroes$").ty().expect("typed");
    assert_eq!(stream.name(), "Observable");
    assert_eq!(stream.display_name(), "Observable<Hero[]>");

    let list = component_member(&query, "heroes").ty().expect("typed");
    assert_eq!(list.name(), "Hero[]");
}

#[test]
fn test_private_members_are_not_public() {
    let query = query();
    assert!(!component_member(&query, "token").is_public());
    let select = component_member(&query, "select");
    assert!(select.is_public());
    assert_eq!(select.kind(), SymbolKind::Method);
    assert!(select.is_callable());
}

#[test]
fn test_checker_over_host_types() {
    let query = query();
    let members = query
        .get_type_symbol(&TypeReference::new("AppComponent"))
        .expect("AppComponent")
        .members();
    let session = query.into_session();
    let typed = |text: &str| {
        let parsed = parse_binding(text, "[test]", 0);
        assert!(parsed.errors.is_empty(), "{text}: {:?}", parsed.errors);
        let checker = ExpressionChecker::new(&session, Arc::clone(&members), &parsed.arena);
        let result = checker.check(parsed.root);
        (result.ty.name().to_string(), result.diagnostics.len())
    };
    assert_eq!(typed("heroes$ | async"), ("Hero[]".to_string(), 0));
    assert_eq!(typed("heroes[0].name"), ("string".to_string(), 0));
    assert_eq!(typed("title.toUpperCase()"), ("string".to_string(), 0));
    assert_eq!(typed("selected?.name"), ("string".to_string(), 0));
    assert_eq!(typed("heroes | slice:0:2"), ("Hero[]".to_string(), 0));
}
