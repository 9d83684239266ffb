use confedit_core::{FormatterState, Source};
use pretty_assertions::assert_eq;

fn format(input: &str) -> String {
    let source = Source::new("<test>", input.to_string());
    let mut state = FormatterState::new();
    state.emit_source(&source);
    state.finish()
}

#[test]
fn formats_backend_block_with_blank_line_and_indent() {
    let input = "vcl 4.1;\nbackend b { .host = \"1.1.1.1\"; }";
    let expected = "vcl 4.1;\n\nbackend b {\n    .host = \"1.1.1.1\";\n}\n";
    assert_eq!(format(input), expected);
}

#[test]
fn no_space_between_number_and_unit_suffix() {
    assert_eq!(format("x = 5s;"), "x = 5s;\n");
}

#[test]
fn formatting_is_idempotent() {
    let input = "vcl 4.1;\nbackend b { .host = \"1.1.1.1\"; .port = \"80\"; }";
    let once = format(input);
    let twice = format(&once);
    assert_eq!(once, twice);
}

#[test]
fn inline_host_source_block_forces_blank_line_like_semicolon() {
    let input = "C{ int x; }C\nx = 1;";
    let expected = "C{ int x; }C\n\nx = 1;\n";
    assert_eq!(format(input), expected);
}

#[test]
fn tight_spacing_around_semicolon_paren_and_dot() {
    let source = Source::new("<test>", "sub a { return (ok); }".to_string());
    let mut state = FormatterState::new();
    state.emit_source(&source);
    let out = state.finish();
    assert!(out.contains("return (ok);"));
    assert!(!out.contains("return ( ok )"));
}
