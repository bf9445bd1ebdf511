#![allow(clippy::float_cmp)]

use yarrow::{LoadOptions, Scalar, Schema, Yaml};

fn load_str(source: &str) -> String {
    yarrow::load(source)
        .unwrap()
        .into_string()
        .unwrap_or_else(|| panic!("{source:?} is not a string"))
}

#[test]
fn test_plain_trimmed() {
    assert_eq!(load_str("  plain text  "), "plain text");
    assert_eq!(load_str("\n\n  spaced   out\t\n\n"), "spaced   out");
    assert_eq!(load_str("a\n  b\n\n\n  c # comment"), "a b\n\nc");
}

#[test]
fn test_quoted() {
    assert_eq!(load_str("'a''b'"), "a'b");
    assert_eq!(load_str("\"a\\tb\""), "a\tb");
    assert_eq!(load_str("\"\\u00e9\""), "é");
    assert_eq!(load_str("\"é\""), "é");
    assert_eq!(load_str("'  keep  inner  '"), "  keep  inner  ");
    assert_eq!(load_str("\"line\n   \n  next\""), "line\nnext");
}

#[test]
fn test_quoted_control_characters() {
    // Escapes may produce any character, the raw text may not.
    assert_eq!(load_str("\"\\0\\a\\e\""), "\0\x07\x1b");
    let error = yarrow::load("\"\x07\"").unwrap_err();
    assert!(error.to_string().starts_with("expected valid JSON character"));
    let error = yarrow::load("plain\x07").unwrap_err();
    assert!(error
        .to_string()
        .starts_with("the stream contains non-printable characters"));
}

#[test]
fn test_chomping() {
    let doc = yarrow::load("clip: |\n  a\n  b\n\n\nstrip: |-\n  a\n  b\n\n\nkeep: |+\n  a\n  b\n\n\n")
        .unwrap();
    assert_eq!(doc["clip"].as_str(), Some("a\nb\n"));
    assert_eq!(doc["strip"].as_str(), Some("a\nb"));
    assert_eq!(doc["keep"].as_str(), Some("a\nb\n\n\n"));
}

#[test]
fn test_block_scalar_indentation() {
    assert_eq!(load_str("|2\n   a\n  b\n"), "  a\n b\n");
    let doc = yarrow::load("k: |2\n   a\n").unwrap();
    assert_eq!(doc["k"].as_str(), Some(" a\n"));

    let error = yarrow::load("k: |0\n  a\n").unwrap_err();
    assert!(error.to_string().starts_with(
        "bad explicit indentation width of a block scalar; it cannot be less than one"
    ));
    let error = yarrow::load("k: |++\n  a\n").unwrap_err();
    assert!(error
        .to_string()
        .starts_with("repeat of a chomping mode identifier"));
    let error = yarrow::load("k: |1-2\n  a\n").unwrap_err();
    assert!(error
        .to_string()
        .starts_with("repeat of an indentation width identifier"));
}

#[test]
fn test_document_markers_end_block_scalars() {
    let docs = yarrow::load_all("--- |\na\n--- |\nb\n").unwrap();
    assert_eq!(docs, [Yaml::string("a\n"), Yaml::string("b\n")]);

    let docs = yarrow::load_all("--- >\nfolded\n...\n--- x\n").unwrap();
    assert_eq!(docs, [Yaml::string("folded\n"), Yaml::string("x")]);

    // Indented markers are content.
    assert_eq!(load_str("|\n  a\n  ---\n"), "a\n---\n");
}

#[test]
fn test_folded_more_indented() {
    assert_eq!(
        load_str(">\n  folded\n  text\n\n    kept\n    as is\n  back\n"),
        "folded text\n\n  kept\n  as is\nback\n"
    );
}

#[test]
fn test_canonical_round_trip() {
    for (text, expected) in [
        ("42", Yaml::Value(Scalar::Integer(42))),
        ("-17", Yaml::Value(Scalar::Integer(-17))),
        ("0x2A", Yaml::Value(Scalar::Integer(42))),
        ("true", Yaml::Value(Scalar::Boolean(true))),
        ("FALSE", Yaml::Value(Scalar::Boolean(false))),
        ("~", Yaml::null()),
        ("1.5", Yaml::Value(Scalar::from(1.5))),
    ] {
        let plain = yarrow::load(text).unwrap();
        assert_eq!(plain, expected, "plain {text}");
        let tagged = yarrow::load(&format!("!!{} '{text}'", tag_of(&expected))).unwrap();
        assert_eq!(tagged, expected, "tagged {text}");
    }
}

fn tag_of(value: &Yaml) -> &'static str {
    if value.is_integer() {
        "int"
    } else if value.is_boolean() {
        "bool"
    } else if value.is_floating_point() {
        "float"
    } else {
        "null"
    }
}

#[test]
fn test_failsafe_keeps_text() {
    let options = LoadOptions::new().schema(Schema::failsafe());
    let doc = yarrow::load_with_options("- 0x2A\n- ~\n- 'q'\n", options).unwrap();
    assert_eq!(doc[0].as_str(), Some("0x2A"));
    assert_eq!(doc[1].as_str(), Some("~"));
    assert_eq!(doc[2].as_str(), Some("q"));
}
