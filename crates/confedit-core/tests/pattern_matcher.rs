use confedit_core::{compile_pattern, pattern_match, try_pattern_match, Source};
use test_case::test_case;

#[test_case("*", 1; "single wildcard run of one star")]
#[test_case("**", 1; "run of two stars collapses to one single wildcard")]
#[test_case("***", 1; "run of three stars collapses to one multi wildcard")]
#[test_case("*****", 2; "run of five stars yields a single then a multi wildcard")]
fn wildcard_runs_collapse_to_expected_element_count(text: &str, expected_elements: usize) {
    let pattern = compile_pattern(text);
    assert_eq!(pattern.elements.len(), expected_elements);
}

#[test]
fn non_greedy_multi_wildcard_stops_before_trailing_literal() {
    let source = Source::new("<test>", "a b c end".to_string());
    let pattern = compile_pattern("a *** end");
    let start = source.tokens.first_real().unwrap();
    let m = pattern_match(&source, start, &pattern).expect("pattern should match");
    assert_eq!(m.captures.len(), 1);
    let (begin, end) = m.captures[0];
    assert_eq!(&source.buffer[begin..end], "b c");
}

#[test]
fn capture_count_matches_wildcard_count() {
    let source = Source::new("<test>", "sub a { return (ok); }".to_string());
    let pattern = compile_pattern("sub ** {***}");
    let start = source.tokens.first_real().unwrap();
    let m = pattern_match(&source, start, &pattern).expect("pattern should match");
    let wildcard_count = pattern
        .elements
        .iter()
        .filter(|e| !matches!(e, confedit_core::PatternElement::Literal(_)))
        .count();
    assert_eq!(m.captures.len(), wildcard_count);
}

#[test]
fn multi_wildcard_never_closes_past_its_own_opening_depth() {
    // "{***}" opening a brace inside the multi-wildcard region must be
    // balanced before the pattern's own closing `}` can match.
    let source = Source::new("<test>", "acl x { \"1.0.0.0\"/8; }".to_string());
    let pattern = compile_pattern("acl ** {***}");
    let start = source.tokens.first_real().unwrap();
    let m = pattern_match(&source, start, &pattern).expect("pattern should match");
    let (begin, end) = m.captures[1];
    assert_eq!(&source.buffer[begin..end], "\"1.0.0.0\"/8;");
}

#[test]
fn dot_boundary_guard_rejects_mid_expression_match() {
    let source = Source::new("<test>", "foo.bar = baz;".to_string());
    let pattern = compile_pattern(".bar = **");
    let look_behind = compile_pattern("");
    let look_ahead = compile_pattern("");
    // The `.` token is preceded by `foo`, not `{` or `;`, so a pattern
    // starting with `.` must never match here even though the literal
    // text lines up past that point.
    let foo = source.tokens.first_real().unwrap();
    let dot = source.tokens.next_real(foo).unwrap();
    assert_eq!(source.text(dot), ".");
    assert!(try_pattern_match(&source, dot, &pattern, &look_behind, &look_ahead).is_none());
}
