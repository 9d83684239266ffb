use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn confedit() -> Command {
    Command::cargo_bin("confedit").unwrap()
}

fn write_input(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn format_inserts_blank_line_and_indents_block() {
    let input = write_input("vcl 4.1;\nbackend b { .host = \"1.1.1.1\"; }");
    confedit()
        .arg(input.path())
        .arg("format")
        .assert()
        .success()
        .stdout("vcl 4.1;\n\nbackend b {\n    .host = \"1.1.1.1\";\n}\n");
}

#[test]
fn format_keeps_numeric_unit_suffix_tight() {
    let input = write_input("x = 5s;");
    confedit()
        .arg(input.path())
        .arg("format")
        .assert()
        .success()
        .stdout("x = 5s;\n");
}

#[test]
fn replace_substitutes_captured_host() {
    let input = write_input("vcl 4.1;\nbackend b { .host = \"1.1.1.1\"; }");
    confedit()
        .arg(input.path())
        .arg("replace")
        .arg(".host = **")
        .arg(".host = \"2.2.2.2\"")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"2.2.2.2\""));
}

#[test]
fn insert_after_look_behind_match() {
    let input = write_input("vcl 4.1;");
    confedit()
        .arg(input.path())
        .arg("insert")
        .arg("import std;")
        .arg("--look-behind")
        .arg("SOI vcl **;")
        .assert()
        .success()
        .stdout(predicate::str::contains("import std;"));
}

#[test]
fn extract_respects_offset_and_limit() {
    let input = write_input("sub a { return (ok); } sub b { return (ng); }");
    let output = confedit()
        .arg(input.path())
        .arg("extract")
        .arg("sub ** {***}")
        .arg("--limit")
        .arg("1")
        .arg("--offset")
        .arg("1")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("ng"));
    assert!(!text.contains("ok"));
}

#[test]
fn extract_can_match_a_comment_span() {
    let input = write_input("# keep\nx = 1;");
    confedit()
        .arg(input.path())
        .arg("extract")
        .arg("# keep")
        .assert()
        .success()
        .stdout("# keep\n");
}

#[test]
fn offset_without_limit_is_a_usage_error() {
    let input = write_input("x = 1;");
    confedit()
        .arg(input.path())
        .arg("extract")
        .arg("x = **")
        .arg("--offset")
        .arg("1")
        .assert()
        .failure();
}

#[test]
fn tokens_command_lists_kind_and_value_per_token() {
    let input = write_input("x = 1;");
    confedit()
        .arg(input.path())
        .arg("tokens")
        .assert()
        .success()
        .stdout(predicate::str::contains("ID"))
        .stdout(predicate::str::contains("x"));
}

#[test]
fn syntax_error_in_gap_fails_non_diagnostic_commands() {
    let input = write_input("x = 1; @ garbage");
    confedit()
        .arg(input.path())
        .arg("format")
        .assert()
        .failure();
}

#[test]
fn dry_run_exits_zero_when_reformatting_is_a_no_op() {
    let input = write_input("x = 1;\n");
    confedit()
        .arg("--dry-run")
        .arg(input.path())
        .arg("format")
        .assert()
        .success();
}
