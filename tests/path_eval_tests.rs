//! End-to-end evaluation tests: document literal in, matched nodes out.
//!
//! Every test parses a small YAML document, compiles a path expression, and
//! checks the matched nodes and their order.

use yamlscout::document::node::{Document, NodeKind};
use yamlscout::document::parse_document;
use yamlscout::path::{compile, evaluate, Evaluator, Results};

fn eval(doc: &Document, path: &str) -> Results {
    let expr = compile(path).expect("expression should compile");
    evaluate(&expr, doc, doc.root().expect("document should have a root"))
}

fn root_of(doc: &Document) -> yamlscout::NodeId {
    doc.root().unwrap()
}

fn scalars(doc: &Document, results: &Results) -> Vec<String> {
    results
        .iter()
        .map(|id| {
            doc.scalar(id)
                .expect("expected a scalar result")
                .to_string()
        })
        .collect()
}

#[test]
fn test_multi_keys_in_order() {
    let doc = parse_document("a: 1\nb: 2\nc: 3").unwrap();
    assert_eq!(scalars(&doc, &eval(&doc, "/a,b,c")), vec!["1", "2", "3"]);
}

#[test]
fn test_sequence_slice() {
    let doc = parse_document("items: [10, 20, 30, 40]").unwrap();
    assert_eq!(scalars(&doc, &eval(&doc, "/items/1:3")), vec!["20", "30"]);
}

#[test]
fn test_negative_index_misses() {
    let doc = parse_document("items: [10, 20, 30]").unwrap();
    assert!(eval(&doc, "/items/-1").is_empty());
}

#[test]
fn test_nested_key_chain() {
    let doc = parse_document("a: {b: {c: 7}}").unwrap();
    assert_eq!(scalars(&doc, &eval(&doc, "/a/b/c")), vec!["7"]);
}

#[test]
fn test_every_leaf_preorder() {
    let doc = parse_document("a: {b: 1, c: [ {d: 2}, {d: 3} ] }").unwrap();
    assert_eq!(scalars(&doc, &eval(&doc, "/**$")), vec!["1", "2", "3"]);
}

#[test]
fn test_alias_start() {
    let doc = parse_document("x: &A {k: 9}").unwrap();
    assert_eq!(scalars(&doc, &eval(&doc, "*A/k")), vec!["9"]);
}

#[test]
fn test_lone_slash_matches_root() {
    let doc = parse_document("root: {a: 1}").unwrap();
    let results = eval(&doc, "/");
    assert_eq!(results.as_slice(), &[doc.root().unwrap()]);
    assert_eq!(doc.kind(results.as_slice()[0]), NodeKind::Mapping);
}

#[test]
fn test_scalar_filter() {
    let doc = parse_document("a: 1").unwrap();
    assert_eq!(scalars(&doc, &eval(&doc, "/a$")), vec!["1"]);
}

#[test]
fn test_collection_filter() {
    let doc = parse_document("a: {b: 1}").unwrap();
    let results = eval(&doc, "/a%");
    assert_eq!(results.len(), 1);
    let node = results.as_slice()[0];
    assert_eq!(doc.kind(node), NodeKind::Mapping);
    assert_eq!(
        doc.mapping_value_by_simple_key(root_of(&doc), "a"),
        Some(node)
    );
}

#[test]
fn test_sibling_from_current_node() {
    let doc = parse_document("a: 1\nb: 2").unwrap();
    let a_value = doc
        .mapping_value_by_simple_key(root_of(&doc), "a")
        .unwrap();
    let expr = compile(":b").unwrap();
    let results = Evaluator::new(&doc).evaluate(&expr, a_value);
    assert_eq!(scalars(&doc, &results), vec!["2"]);
}

#[test]
fn test_sibling_from_root_has_no_parent() {
    // the root has no parent, so a root-anchored sibling chain misses
    let doc = parse_document("a: 1\nb: 2").unwrap();
    assert!(eval(&doc, "/:a").is_empty());
}

// Universal properties, spot-checked on concrete documents.

#[test]
fn test_results_have_no_duplicates() {
    let doc = parse_document("a: {b: 1, c: 2}").unwrap();
    let results = eval(&doc, "/**/.");
    let ids: Vec<_> = results.iter().collect();
    for (i, id) in ids.iter().enumerate() {
        assert!(!ids[i + 1..].contains(id), "duplicate node in results");
    }
}

#[test]
fn test_chain_is_flat_map_of_stages() {
    let doc = parse_document("a: {x: 1}\nb: {x: 2}\nc: {y: 3}").unwrap();
    // /*/x == for each child of root, lookup x
    let composed = eval(&doc, "/*/x");
    let mut expected = Vec::new();
    for child in eval(&doc, "/*").iter() {
        let expr = compile("x").unwrap();
        for found in Evaluator::new(&doc).evaluate(&expr, child).iter() {
            expected.push(found);
        }
    }
    assert_eq!(composed.iter().collect::<Vec<_>>(), expected);
}

#[test]
fn test_multi_is_dedup_concat() {
    let doc = parse_document("a: 1\nb: 2").unwrap();
    let union = eval(&doc, "/a,b,a,b");
    assert_eq!(scalars(&doc, &union), vec!["1", "2"]);
}

#[test]
fn test_this_is_idempotent() {
    let doc = parse_document("a: {b: [1, 2]}").unwrap();
    assert_eq!(eval(&doc, "/a/b/."), eval(&doc, "/a/b"));
    assert_eq!(eval(&doc, "/a/././."), eval(&doc, "/a"));
}

#[test]
fn test_parent_inverts_key_access() {
    let doc = parse_document("k:\n  inner: 1").unwrap();
    let results = eval(&doc, "/k/..");
    assert_eq!(results.as_slice(), &[doc.root().unwrap()]);
}

#[test]
fn test_recursive_dominates_leaves() {
    let doc = parse_document("a: {b: [1, {c: 2}], d: 3}").unwrap();
    let all = eval(&doc, "/**");
    let leaves = eval(&doc, "/**$");
    for leaf in leaves.iter() {
        assert!(all.contains(leaf));
    }
}

#[test]
fn test_compiled_span_covers_trimmed_input() {
    for input in ["/a/b/c", "  /items/0:3 ", "a,b", ":k", "/**$"] {
        let expr = compile(input).unwrap();
        let trimmed = input.trim();
        assert_eq!(
            expr.span().len(),
            trimmed.chars().count(),
            "span mismatch for {:?}",
            input
        );
        assert_eq!(expr.span().start, 0);
    }
}

#[test]
fn test_missing_key_is_not_an_error() {
    let doc = parse_document("present: 1").unwrap();
    assert!(eval(&doc, "/missing_key").is_empty());
    assert!(eval(&doc, "/present/deeper").is_empty());
}

#[test]
fn test_slice_output_length_formula() {
    let doc = parse_document("s: [0, 1, 2, 3, 4]").unwrap();
    let len = 5i32;
    for (start, end) in [(0, 5), (1, 3), (3, 3), (2, 9), (4, 5), (0, 1)] {
        let results = eval(&doc, &format!("/s/{}:{}", start, end));
        let expected = (end.min(len) - start).max(0) as usize;
        assert_eq!(results.len(), expected, "slice {}:{}", start, end);
    }
}

#[test]
fn test_dedup_preserves_first_occurrence() {
    let doc = parse_document("a: 1\nb: 2").unwrap();
    // b first, then a, then b again: first occurrence order wins
    let results = eval(&doc, "/b,a,b");
    assert_eq!(scalars(&doc, &results), vec!["2", "1"]);
}

#[test]
fn test_reusing_compiled_expression_across_documents() {
    let expr = compile("/name").unwrap();
    let first = parse_document("name: one").unwrap();
    let second = parse_document("name: two").unwrap();
    let one = evaluate(&expr, &first, first.root().unwrap());
    let two = evaluate(&expr, &second, second.root().unwrap());
    assert_eq!(scalars(&first, &one), vec!["one"]);
    assert_eq!(scalars(&second, &two), vec!["two"]);
}

#[test]
fn test_quoted_key_lookup() {
    let doc = parse_document("\"spaced key\": 5").unwrap();
    let results = eval(&doc, "/\"spaced key\"");
    assert_eq!(scalars(&doc, &results), vec!["5"]);
}

#[test]
fn test_flow_mapping_key_lookup() {
    let doc = parse_document("{a: 1}: found").unwrap();
    assert_eq!(scalars(&doc, &eval(&doc, "/{a: 1}")), vec!["found"]);
}

#[test]
fn test_every_child_of_sequence_then_key() {
    let doc = parse_document("list:\n  - name: x\n  - name: y").unwrap();
    assert_eq!(
        scalars(&doc, &eval(&doc, "/list/*/name")),
        vec!["x", "y"]
    );
}

#[test]
fn test_trailing_slash_requires_collection() {
    let doc = parse_document("m: {k: 1}\nv: 2").unwrap();
    assert_eq!(eval(&doc, "/m/").len(), 1);
    assert!(eval(&doc, "/v/").is_empty());
}
