use yarrow::{LoadOptions, Scalar, Yaml};

#[test]
fn test_alias_equals_anchor() {
    let doc = yarrow::load("- &x [1, 2]\n- *x\n- &y {a: *x}\n- *y\n").unwrap();
    assert_eq!(doc[0], doc[1]);
    assert_eq!(doc[2], doc[3]);
    assert_eq!(doc[3]["a"][1].as_integer(), Some(2));
}

#[test]
fn test_alias_cannot_refer_to_its_own_node() {
    let error = yarrow::load("&a [*a]").unwrap_err();
    assert!(error.to_string().starts_with("unidentified alias \"a\""));
}

#[test]
fn test_merge_override() {
    let s = "
base: &base
  name: base
  size: 1
item:
  <<: *base
  size: 2
";
    let doc = yarrow::load(s).unwrap();
    assert_eq!(doc["item"]["name"].as_str(), Some("base"));
    assert_eq!(doc["item"]["size"].as_integer(), Some(2));

    // A key may be overridden once after a merge, not twice.
    let error = yarrow::load("a: &a {x: 1}\nb:\n  <<: *a\n  x: 2\n  x: 3\n").unwrap_err();
    assert!(error.to_string().starts_with("duplicated mapping key"));
}

#[test]
fn test_json_mode_overrides() {
    let options = LoadOptions::new().json(true);
    let doc = yarrow::load_with_options("a: 1\nb: 2\na: 3\n", options).unwrap();
    assert_eq!(doc["a"].as_integer(), Some(3));
    let keys: Vec<_> = doc.as_mapping().unwrap().keys().filter_map(Yaml::as_str).collect();
    assert_eq!(keys, ["a", "b"]);
}

#[test]
fn test_sequence_indentation() {
    // Less indented: the sequence ends.
    let doc = yarrow::load("a:\n  - 1\n  - 2\nb: 3\n").unwrap();
    assert_eq!(doc["a"].as_vec().map(Vec::len), Some(2));
    assert_eq!(doc["b"].as_integer(), Some(3));

    // Equally indented: a sequence may be the value of a mapping key.
    let doc = yarrow::load("a:\n- 1\n- 2\n").unwrap();
    assert_eq!(doc["a"][1].as_integer(), Some(2));

    // Equally indented mappings are siblings, not values.
    let doc = yarrow::load("a:\nb: 1\n").unwrap();
    assert!(doc["a"].is_null());
    assert_eq!(doc["b"].as_integer(), Some(1));
}

#[test]
fn test_complex_keys() {
    let doc = yarrow::load("? [a, b]\n: 1\n{c: d}: 2\n3: 4\n").unwrap();
    let map = doc.as_mapping().unwrap();
    let seq_key = Yaml::Sequence(vec![Yaml::string("a"), Yaml::string("b")]);
    assert_eq!(map.get(&seq_key).and_then(Yaml::as_integer), Some(1));
    assert_eq!(
        map.get(&Yaml::Value(Scalar::Integer(3))).and_then(Yaml::as_integer),
        Some(4)
    );
    assert_eq!(doc[3].as_integer(), Some(4));
}

#[test]
fn test_depth_limit() {
    let deep = format!("{}x{}", "[".repeat(200), "]".repeat(200));
    let error = yarrow::load(&deep).unwrap_err();
    assert!(error
        .to_string()
        .starts_with("nesting too deep; the limit is 128"));

    let options = LoadOptions::new().max_depth(256);
    let doc = yarrow::load_with_options(&deep, options).unwrap();
    assert!(doc.is_sequence());

    let mut block = String::new();
    for depth in 0..200 {
        block.push_str(&" ".repeat(depth));
        block.push_str("- \n");
    }
    assert!(yarrow::load(&block).is_err());
}

#[test]
fn test_alias_expansion_limit() {
    // Each level holds ten copies of the previous one.
    let mut source = "a0: &a0 [x, x, x, x, x, x, x, x, x, x]\n".to_owned();
    for level in 1..8 {
        let aliases = vec![format!("*a{}", level - 1); 10].join(", ");
        source.push_str(&format!("a{level}: &a{level} [{aliases}]\n"));
    }
    let error = yarrow::load(&source).unwrap_err();
    assert!(error
        .to_string()
        .starts_with("too many alias expansions; the limit is 1000000 nodes"));

    let options = LoadOptions::new().max_alias_nodes(1000);
    let error = yarrow::load_with_options(&source, options).unwrap_err();
    assert!(error
        .to_string()
        .starts_with("too many alias expansions; the limit is 1000 nodes"));

    // The budget is per document.
    let options = LoadOptions::new().max_alias_nodes(4);
    let docs =
        yarrow::load_all_with_options("- &a [1]\n- *a\n- *a\n---\n- &b [2]\n- *b\n", options)
            .unwrap();
    assert_eq!(docs[1][1][0].as_integer(), Some(2));
}
