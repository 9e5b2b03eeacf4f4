//! YAML loading into the arena document model.
//!
//! Parsing is delegated to `serde_yaml`; this module converts the resulting
//! `Value` tree into a [`Document`] arena. Because `serde_yaml` resolves
//! aliases during parsing and discards anchor names, the loader first runs a
//! lightweight pre-scan over the source text that rewrites each `&name`
//! anchor into `&name !__anchor_name`, smuggling the name through the parse
//! as a tag. The converter strips the reserved tag, registers the anchor on
//! the converted node (the first occurrence in document order is the
//! definition site and wins), and recurses.
//!
//! # Example
//!
//! ```
//! use yamlscout::document::parser::parse_document;
//!
//! let doc = parse_document("base: &b\n  retries: 3\n").unwrap();
//! assert!(doc.anchor("b").is_some());
//! ```
//!
//! # Limitations
//!
//! - Tagged values are not supported; a document using application tags is
//!   rejected.
//! - The anchor pre-scan does not track block scalars, so an `&` at a value
//!   position inside a `|` or `>` block could be rewritten by mistake.
//!   TODO: teach the pre-scan block-scalar indentation so those lines are
//!   skipped.

use anyhow::{bail, Context, Result};
use serde_yaml::Value;

use crate::document::node::{Document, KeyValue, NodeId, Scalar};

/// Reserved tag prefix carrying an anchor name through `serde_yaml`.
const ANCHOR_TAG_PREFIX: &str = "__anchor_";

/// Parses a YAML string into a [`Document`].
///
/// Anchors are preserved in the document's anchor table; aliases have already
/// been resolved by the parser, so the alias site holds a structural copy of
/// the anchored value.
///
/// # Errors
///
/// Returns an error if the input is not valid YAML or uses tagged values.
pub fn parse_document(source: &str) -> Result<Document> {
    let prepared = tag_anchors(source);
    let value: Value = serde_yaml::from_str(&prepared).context("failed to parse YAML")?;

    let mut doc = Document::new();
    let root = convert_value(&mut doc, value)?;
    doc.set_root(root);
    Ok(doc)
}

/// Parses a quoted or flow construct from a path expression into a
/// [`KeyValue`] fragment.
pub fn parse_key_fragment(text: &str) -> Result<KeyValue> {
    let value: Value = serde_yaml::from_str(text).context("failed to parse mapping key")?;
    convert_key(value)
}

fn convert_value(doc: &mut Document, value: Value) -> Result<NodeId> {
    match value {
        Value::Null => Ok(doc.push_scalar(Scalar::Null)),
        Value::Bool(b) => Ok(doc.push_scalar(Scalar::Bool(b))),
        Value::Number(n) => Ok(doc.push_scalar(convert_number(&n))),
        Value::String(s) => Ok(doc.push_scalar(Scalar::Str(s))),
        Value::Sequence(seq) => {
            let items = seq
                .into_iter()
                .map(|item| convert_value(doc, item))
                .collect::<Result<Vec<_>>>()?;
            Ok(doc.push_sequence(items))
        }
        Value::Mapping(map) => {
            let mut entries = Vec::with_capacity(map.len());
            for (key, value) in map {
                let key_id = convert_value(doc, key)?;
                let value_id = convert_value(doc, value)?;
                entries.push((key_id, value_id));
            }
            Ok(doc.push_mapping(entries))
        }
        Value::Tagged(tagged) => {
            let tag = tagged.tag.to_string();
            let tag = tag.trim_start_matches('!');
            match tag.strip_prefix(ANCHOR_TAG_PREFIX) {
                Some(name) => {
                    let name = name.to_string();
                    let id = convert_value(doc, tagged.value)?;
                    doc.set_anchor(name, id);
                    Ok(id)
                }
                None => bail!("tagged values are not supported: !{}", tag),
            }
        }
    }
}

fn convert_key(value: Value) -> Result<KeyValue> {
    match value {
        Value::Null => Ok(KeyValue::Null),
        Value::Bool(b) => Ok(KeyValue::Bool(b)),
        Value::Number(n) => Ok(match convert_number(&n) {
            Scalar::Int(i) => KeyValue::Int(i),
            Scalar::Float(x) => KeyValue::Float(x),
            _ => KeyValue::Null,
        }),
        Value::String(s) => Ok(KeyValue::Str(s)),
        Value::Sequence(seq) => Ok(KeyValue::Sequence(
            seq.into_iter().map(convert_key).collect::<Result<_>>()?,
        )),
        Value::Mapping(map) => {
            let mut pairs = Vec::with_capacity(map.len());
            for (key, value) in map {
                pairs.push((convert_key(key)?, convert_key(value)?));
            }
            Ok(KeyValue::Mapping(pairs))
        }
        Value::Tagged(tagged) => bail!("tagged mapping keys are not supported: {}", tagged.tag),
    }
}

fn convert_number(n: &serde_yaml::Number) -> Scalar {
    // preserve integers where possible, as the editor-side model does
    if let Some(i) = n.as_i64() {
        Scalar::Int(i)
    } else {
        Scalar::Float(n.as_f64().unwrap_or(0.0))
    }
}

fn is_anchor_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_anchor_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// True when `prev` can precede an anchor property: start of input,
/// whitespace, or a flow collection position.
fn at_value_position(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, '[' | '{' | ','),
    }
}

/// Rewrites `&name` anchors into `&name !__anchor_name` so the name survives
/// `serde_yaml`'s alias resolution. Quoted scalars and comments are left
/// untouched.
fn tag_anchors(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + 16);
    let mut chars = source.chars().peekable();
    let mut in_single = false;
    let mut in_double = false;
    let mut in_comment = false;
    let mut prev: Option<char> = None;

    while let Some(c) = chars.next() {
        if c == '\n' {
            in_comment = false;
            out.push(c);
            prev = Some(c);
            continue;
        }
        if in_comment {
            out.push(c);
            prev = Some(c);
            continue;
        }
        if in_double {
            if c == '\\' {
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                    prev = Some(escaped);
                    continue;
                }
            } else if c == '"' {
                in_double = false;
            }
            out.push(c);
            prev = Some(c);
            continue;
        }
        if in_single {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    // escaped quote
                    out.push(c);
                    let second = chars.next();
                    if let Some(second) = second {
                        out.push(second);
                        prev = Some(second);
                    }
                    continue;
                }
                in_single = false;
            }
            out.push(c);
            prev = Some(c);
            continue;
        }

        match c {
            '"' => in_double = true,
            '\'' => in_single = true,
            '#' if at_value_position(prev) => in_comment = true,
            '&' if at_value_position(prev) && chars.peek().copied().is_some_and(is_anchor_start) => {
                let mut name = String::new();
                while chars.peek().copied().is_some_and(is_anchor_char) {
                    name.push(chars.next().unwrap_or_default());
                }
                out.push('&');
                out.push_str(&name);
                out.push_str(" !");
                out.push_str(ANCHOR_TAG_PREFIX);
                out.push_str(&name);
                prev = name.chars().last();
                continue;
            }
            _ => {}
        }
        out.push(c);
        prev = Some(c);
    }

    out
}
