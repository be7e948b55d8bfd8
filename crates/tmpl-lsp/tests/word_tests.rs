use super::*;

fn word(source: &str, position: u32) -> Option<&str> {
    bounded_word_span(source, position).and_then(|span| span.slice(source))
}

#[test]
fn test_inside_a_member_chain_covers_only_the_member() {
    let source = "a.foo.b";
    for position in 2..=5 {
        assert_eq!(word(source, position), Some("foo"), "cursor at {position}");
    }
    assert_eq!(bounded_word_span(source, 3), Some(Span::new(2, 5)));
}

#[test]
fn test_word_on_either_side_of_the_cursor() {
    assert_eq!(word("key.entry", 6), Some("entry"));
    assert_eq!(word("key.", 3), Some("key"), "word before the dot");
    assert_eq!(word("title | upper", 13), Some("upper"), "end of text");
    assert_eq!(word("title", 0), Some("title"), "start of text");
    assert_eq!(word("$event.target", 3), Some("$event"));
}

#[test]
fn test_no_word() {
    assert_eq!(bounded_word_span("a..b", 2), None);
    assert_eq!(bounded_word_span("a + b", 2), None);
    assert_eq!(bounded_word_span("", 0), None);
    assert_eq!(bounded_word_span("abc", 4), None, "past the end");
}

#[test]
fn test_non_ascii_characters_end_a_word() {
    assert_eq!(word("naïve", 1), Some("na"));
    assert_eq!(word("naïve", 5), Some("ve"));
    assert_eq!(word("café.x", 2), Some("caf"));
    assert_eq!(bounded_word_span("café.x", 5), None, "between 'é' and '.'");
}
