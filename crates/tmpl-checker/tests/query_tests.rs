use super::*;
use crate::fixture_query::{TestMember, TestQuery, TestType};
use crate::symbols::global::ANY_CAST;

#[test]
fn test_builtins_are_cached_per_session() {
    let session = TestQuery::new().into_session();
    for kind in BuiltinType::ALL {
        let first = session.builtin(kind);
        let second = session.builtin(kind);
        assert!(Arc::ptr_eq(&first, &second), "{kind:?} must be identical");
        assert_eq!(session.type_kind(&first), kind);
    }
    assert!(Arc::ptr_eq(&session.any_type(), &session.builtin(BuiltinType::Any)));
}

#[test]
fn test_pipes_are_cached_until_invalidated() {
    let query = TestQuery::new();
    let string = query.builtin(BuiltinType::String);
    let mut session = query.pipe("uppercase", 1, &string).into_session();

    let first = session.pipes();
    let second = session.pipes();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(first.has("uppercase"));

    session.invalidate();
    let third = session.pipes();
    assert!(!Arc::ptr_eq(&first, &third), "invalidate drops the pipe table");
    assert!(third.has("uppercase"));
}

#[test]
fn test_globals_contain_any_cast() {
    let session = TestQuery::new().into_session();
    let globals = session.globals();
    assert_eq!(globals.size(), 1);
    assert!(globals.has(ANY_CAST));
}

#[test]
fn test_union_is_exact_or_any() {
    let session = TestQuery::new().into_session();
    let string = session.builtin(BuiltinType::String);
    let number = session.builtin(BuiltinType::Number);
    let same = session.union(&[Arc::clone(&string), Arc::clone(&string)]);
    assert!(Arc::ptr_eq(&same, &string));
    let mixed = session.union(&[string, number]);
    assert_eq!(session.type_kind(&mixed), BuiltinType::Any);
}

#[test]
fn test_non_nullable_strips_only_nullable_types() {
    let query = TestQuery::new();
    let string = query.builtin(BuiltinType::String);
    let nullable = TestType::nullable(&string, BuiltinType::String);
    let session = query.into_session();
    assert!(nullable.is_nullable());
    let stripped = session.non_nullable(&nullable);
    assert!(Arc::ptr_eq(&stripped, &string));
    assert!(Arc::ptr_eq(&session.non_nullable(&string), &string));
}

#[test]
fn test_default_table_construction_and_merge() {
    let query = TestQuery::new();
    let string = query.builtin(BuiltinType::String);
    let number = query.builtin(BuiltinType::Number);
    let session = query.into_session();
    let first = session.create_table(vec![TestMember::new("a", &string).into_ref()]);
    let second = session.create_table(vec![TestMember::new("a", &number).into_ref()]);
    let merged = session.merge_tables(&[first, second]);
    assert_eq!(merged.size(), 1);
    let a = merged.get("a").expect("a");
    assert!(Arc::ptr_eq(&a.ty().expect("typed"), &number));
}

#[test]
fn test_array_and_element_types() {
    let session = TestQuery::new().into_session();
    let number = session.builtin(BuiltinType::Number);
    let array = session.array_of(&number);
    let element = session.element_type(&array).expect("element");
    assert!(Arc::ptr_eq(&element, &number));
    assert!(session.element_type(&number).is_none());
}
