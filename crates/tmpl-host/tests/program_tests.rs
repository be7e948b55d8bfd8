use super::*;

const HEROES: &str = include_str!("fixtures/heroes.json");

fn program() -> Arc<HostProgram> {
    HostProgram::from_json(HEROES).expect("fixture loads")
}

fn resolve(program: &HostProgram, text: &str) -> TypeId {
    let expr = parse_type(text).expect("type text");
    program.resolve(&expr, &TypeEnv::default(), "test").expect("resolves")
}

fn member_type(program: &HostProgram, owner: TypeId, name: &str) -> String {
    let member = program
        .members_of(owner)
        .into_iter()
        .find(|m| m.info.name == name)
        .unwrap_or_else(|| panic!("{name} is a member"));
    program.interner().display(member.ty)
}

fn load(json: &str) -> Result<Arc<HostProgram>> {
    HostProgram::from_json(json)
}

#[test]
fn test_fixture_loads() {
    let program = program();
    assert_eq!(program.classes().count(), 10);
    assert_eq!(program.pipes().len(), 4);
    assert!(program.class("AppComponent").is_some());
}

#[test]
fn test_generic_members_are_substituted() {
    let program = program();
    let emitter = resolve(&program, "EventEmitter<Hero>");
    assert_eq!(member_type(&program, emitter, "emit"), "(value?: Hero) => void");
    let context = program.context_type("NgForOf").expect("context");
    assert_eq!(program.interner().display(context), "NgForOfContext<T>");
    assert_eq!(member_type(&program, context, "$implicit"), "T");
}

#[test]
fn test_optional_members_include_undefined() {
    let program = program();
    let hero = program.instance_type("Hero").expect("Hero");
    assert_eq!(member_type(&program, hero, "nickname"), "string | undefined");
    assert_eq!(member_type(&program, hero, "id"), "number", "aliases resolve");
}

#[test]
fn test_builtin_members() {
    let program = program();
    let heroes = resolve(&program, "Hero[]");
    assert_eq!(member_type(&program, heroes, "length"), "number");
    assert_eq!(member_type(&program, heroes, "slice"), "(start?: number, end?: number) => Hero[]");
    assert_eq!(member_type(&program, TypeId::STRING, "toUpperCase"), "() => string");
    assert!(program.members_of(TypeId::NUMBER).is_empty());
}

#[test]
fn test_nullable_union_members_come_from_the_value_type() {
    let program = program();
    let maybe = resolve(&program, "Hero | null");
    let hero = program.instance_type("Hero").expect("Hero");
    let members = program.members_of(maybe);
    let name = members.iter().find(|m| m.info.name == "name").expect("name");
    assert_eq!(name.container, Some(hero));
}

#[test]
fn test_union_members_are_shared_members() {
    let program = program();
    let either = resolve(&program, "Hero | string");
    let names: Vec<&str> = program
        .members_of(either)
        .iter()
        .map(|m| m.info.name.as_str())
        .collect();
    assert!(names.is_empty(), "Hero and string share no member: {names:?}");
    let arrays = resolve(&program, "Hero[] | string[]");
    assert_eq!(member_type(&program, arrays, "length"), "number");
}

#[test]
fn test_type_symbols_are_shared_while_alive() {
    let program = program();
    let hero = program.instance_type("Hero").expect("Hero");
    let first = program.type_symbol(hero);
    let second = program.type_symbol(hero);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.name(), "Hero");
}

#[test]
fn test_duplicate_declarations_are_rejected() {
    let err = load(r#"{"classes": [{"name": "A"}, {"name": "A"}]}"#).expect_err("duplicate");
    assert!(matches!(err, HostError::Duplicate { ref name } if name == "A"), "{err}");
    let err = load(r#"{"classes": [{"name": "A", "members": [
        {"name": "x", "type": "string"}, {"name": "x", "type": "number"}]}]}"#)
    .expect_err("duplicate member");
    assert!(matches!(err, HostError::Duplicate { ref name } if name == "A.x"), "{err}");
}

#[test]
fn test_unknown_names_fail_at_load() {
    let err = load(r#"{"classes": [{"name": "A", "members": [{"name": "x", "type": "Missing[]"}]}]}"#)
        .expect_err("unknown");
    match err {
        HostError::UnknownType { name, context } => {
            assert_eq!(name, "Missing");
            assert_eq!(context, "A.x");
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_type_argument_count_is_checked() {
    let err = load(r#"{"classes": [
        {"name": "Box", "typeParameters": ["T"]},
        {"name": "A", "members": [{"name": "x", "type": "Box<string, number>"}]}]}"#)
    .expect_err("arity");
    assert!(matches!(err, HostError::TypeArity { expected: 1, found: 2, .. }), "{err}");
}

#[test]
fn test_cyclic_aliases_are_rejected() {
    let err = load(r#"{"aliases": [{"name": "A", "type": "B"}, {"name": "B", "type": "A[]"}]}"#)
        .expect_err("cycle");
    assert!(matches!(err, HostError::CyclicAlias { .. }), "{err}");
}

#[test]
fn test_pipes_need_function_types() {
    let err = load(r#"{"pipes": [{"name": "bad", "type": "string"}]}"#).expect_err("pipe type");
    assert!(err.to_string().contains("must have a function type"), "{err}");
}

#[test]
fn test_invalid_json() {
    assert!(matches!(load("{"), Err(HostError::Json(_))));
}
