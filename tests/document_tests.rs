//! Document loading and traversal-surface tests.

use yamlscout::document::node::{KeyValue, NodeKind, Scalar};
use yamlscout::document::parse_document;

#[test]
fn test_load_mapping_order() {
    let doc = parse_document("z: 1\na: 2\nm: 3").unwrap();
    let root = doc.root().unwrap();
    let children = doc.children(root);
    let values: Vec<String> = children
        .iter()
        .map(|id| doc.scalar(*id).unwrap().to_string())
        .collect();
    assert_eq!(values, vec!["1", "2", "3"]);
}

#[test]
fn test_load_scalar_types() {
    let doc = parse_document("i: 3\nf: 1.5\ns: text\nb: false\nn: null").unwrap();
    let root = doc.root().unwrap();
    let get = |key: &str| doc.scalar(doc.mapping_value_by_simple_key(root, key).unwrap());
    assert_eq!(get("i"), Some(&Scalar::Int(3)));
    assert_eq!(get("f"), Some(&Scalar::Float(1.5)));
    assert_eq!(get("s"), Some(&Scalar::Str("text".to_string())));
    assert_eq!(get("b"), Some(&Scalar::Bool(false)));
    assert_eq!(get("n"), Some(&Scalar::Null));
}

#[test]
fn test_parent_chain_to_root() {
    let doc = parse_document("a:\n  b:\n    - deep").unwrap();
    let root = doc.root().unwrap();
    let a = doc.mapping_value_by_simple_key(root, "a").unwrap();
    let b = doc.mapping_value_by_simple_key(a, "b").unwrap();
    let item = doc.sequence_item(b, 0).unwrap();

    assert_eq!(doc.parent(item), Some(b));
    assert_eq!(doc.parent(b), Some(a));
    assert_eq!(doc.parent(a), Some(root));
    assert_eq!(doc.parent(root), None);
}

#[test]
fn test_kinds() {
    let doc = parse_document("m: {}\ns: []\nv: 1").unwrap();
    let root = doc.root().unwrap();
    let kind = |key: &str| doc.kind(doc.mapping_value_by_simple_key(root, key).unwrap());
    assert_eq!(kind("m"), NodeKind::Mapping);
    assert_eq!(kind("s"), NodeKind::Sequence);
    assert_eq!(kind("v"), NodeKind::Scalar);
}

#[test]
fn test_anchor_extraction_block_value() {
    let yaml = "defaults: &config\n  timeout: 30\n  retries: 3\n";
    let doc = parse_document(yaml).unwrap();
    let root = doc.root().unwrap();
    let defaults = doc.mapping_value_by_simple_key(root, "defaults").unwrap();
    assert_eq!(doc.anchor("config"), Some(defaults));
}

#[test]
fn test_anchor_extraction_scalar_value() {
    let doc = parse_document("port: &p 8080\n").unwrap();
    let anchored = doc.anchor("p").unwrap();
    assert_eq!(doc.scalar(anchored), Some(&Scalar::Int(8080)));
}

#[test]
fn test_multiple_anchors() {
    let yaml = "a: &one 1\nb: &two 2\n";
    let doc = parse_document(yaml).unwrap();
    let names: Vec<&str> = doc.anchors().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["one", "two"]);
}

#[test]
fn test_alias_use_is_resolved_copy() {
    let yaml = "base: &b\n  k: 1\nother: *b\n";
    let doc = parse_document(yaml).unwrap();
    let root = doc.root().unwrap();
    let base = doc.mapping_value_by_simple_key(root, "base").unwrap();
    let other = doc.mapping_value_by_simple_key(root, "other").unwrap();
    // distinct nodes with equal structure
    assert_ne!(base, other);
    let k = doc.mapping_value_by_simple_key(other, "k").unwrap();
    assert_eq!(doc.scalar(k), Some(&Scalar::Int(1)));
    // the anchor table points at the definition site
    assert_eq!(doc.anchor("b"), Some(base));
}

#[test]
fn test_ampersand_in_string_is_not_an_anchor() {
    let doc = parse_document("cmd: \"a && b\"\nnote: 'x &y z'\n").unwrap();
    assert_eq!(doc.anchors().count(), 0);
}

#[test]
fn test_complex_key_lookup() {
    let doc = parse_document("[1, 2]: pair\nother: 3\n").unwrap();
    let root = doc.root().unwrap();
    let key = KeyValue::Sequence(vec![KeyValue::Int(1), KeyValue::Int(2)]);
    let hit = doc.mapping_value_by_key(root, &key).unwrap();
    assert_eq!(doc.scalar(hit), Some(&Scalar::Str("pair".to_string())));
}

#[test]
fn test_numeric_and_bool_keys() {
    let doc = parse_document("1: one\ntrue: yes\n").unwrap();
    let root = doc.root().unwrap();
    assert!(doc.mapping_value_by_key(root, &KeyValue::Int(1)).is_some());
    assert!(doc
        .mapping_value_by_key(root, &KeyValue::Bool(true))
        .is_some());
    // simple-key lookup only matches string keys
    assert!(doc.mapping_value_by_simple_key(root, "1").is_none());
}

#[test]
fn test_tagged_document_is_rejected() {
    assert!(parse_document("x: !custom 1").is_err());
}

#[test]
fn test_invalid_document_is_rejected() {
    assert!(parse_document("a: [1, 2").is_err());
}

#[test]
fn test_reemission_parses_back() {
    let yaml = "a: 1\nitems:\n  - x\n  - y\n";
    let doc = parse_document(yaml).unwrap();
    let root = doc.root().unwrap();
    let emitted = doc.to_yaml_string(root).unwrap();
    let reparsed = parse_document(&emitted).unwrap();
    let reroot = reparsed.root().unwrap();
    assert_eq!(doc.to_value(root), reparsed.to_value(reroot));
}
