//! Arena-based YAML document model.
//!
//! A parsed document is stored as a flat arena of nodes addressed by
//! [`NodeId`]. Parent links are plain back-indices, so the tree owns its
//! nodes without reference cycles, and a `NodeId` doubles as the node
//! identity used when deduplicating query results. Mapping keys are nodes
//! too, which lets quoted and flow keys (`{...}`, `[...]`) compare
//! structurally.
//!
//! # Example
//!
//! ```
//! use yamlscout::document::node::{Document, Scalar};
//!
//! let mut doc = Document::new();
//! let name = doc.push_scalar(Scalar::Str("name".to_string()));
//! let value = doc.push_scalar(Scalar::Str("yamlscout".to_string()));
//! let root = doc.push_mapping(vec![(name, value)]);
//! doc.set_root(root);
//!
//! assert_eq!(doc.mapping_value_by_simple_key(root, "name"), Some(value));
//! assert_eq!(doc.parent(value), Some(root));
//! ```

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde_yaml::Value;
use std::fmt;

/// Reference to a node inside its owning [`Document`].
///
/// Ids are only meaningful against the document that produced them. Two equal
/// ids always denote the same node, which is what result deduplication
/// relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// The shape of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Scalar,
    Sequence,
    Mapping,
}

/// A scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Str(s) => write!(f, "{}", s),
        }
    }
}

/// One key/value pair of a mapping node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapEntry {
    pub key: NodeId,
    pub value: NodeId,
}

/// The payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Scalar(Scalar),
    Sequence(Vec<NodeId>),
    Mapping(Vec<MapEntry>),
}

#[derive(Debug, Clone, PartialEq)]
struct NodeData {
    value: NodeValue,
    parent: Option<NodeId>,
}

/// An owned YAML value tree used as a structural mapping key.
///
/// This is what a quoted or flow construct in a path expression parses into.
/// It lives outside any document arena so a compiled expression can be reused
/// across documents.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Sequence(Vec<KeyValue>),
    Mapping(Vec<(KeyValue, KeyValue)>),
}

/// A parsed YAML document: node arena, root, and anchor table.
///
/// Documents are built bottom-up: children are pushed first, then the
/// container that owns them, which fixes up the children's parent links.
/// The anchor table preserves insertion order; the first definition of a
/// name wins.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: Option<NodeId>,
    anchors: IndexMap<String, NodeId>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the arena (keys included).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a scalar node with no parent yet.
    pub fn push_scalar(&mut self, scalar: Scalar) -> NodeId {
        self.push_node(NodeValue::Scalar(scalar))
    }

    /// Adds a sequence node and reparents the items under it.
    pub fn push_sequence(&mut self, items: Vec<NodeId>) -> NodeId {
        let id = self.push_node(NodeValue::Sequence(items.clone()));
        for item in items {
            self.nodes[item.0].parent = Some(id);
        }
        id
    }

    /// Adds a mapping node and reparents both keys and values under it.
    pub fn push_mapping(&mut self, entries: Vec<(NodeId, NodeId)>) -> NodeId {
        let entries: Vec<MapEntry> = entries
            .into_iter()
            .map(|(key, value)| MapEntry { key, value })
            .collect();
        let id = self.push_node(NodeValue::Mapping(entries.clone()));
        for entry in entries {
            self.nodes[entry.key.0].parent = Some(id);
            self.nodes[entry.value.0].parent = Some(id);
        }
        id
    }

    fn push_node(&mut self, value: NodeValue) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            value,
            parent: None,
        });
        id
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Registers an anchor name for a node. The first definition of a name
    /// wins; returns whether this call registered it.
    pub fn set_anchor(&mut self, name: impl Into<String>, id: NodeId) -> bool {
        let name = name.into();
        if self.anchors.contains_key(&name) {
            return false;
        }
        self.anchors.insert(name, id);
        true
    }

    /// The document root, if one has been set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Looks up a node by anchor name.
    pub fn anchor(&self, name: &str) -> Option<NodeId> {
        self.anchors.get(name).copied()
    }

    /// All registered anchors in definition order.
    pub fn anchors(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.anchors.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        match self.nodes[id.0].value {
            NodeValue::Scalar(_) => NodeKind::Scalar,
            NodeValue::Sequence(_) => NodeKind::Sequence,
            NodeValue::Mapping(_) => NodeKind::Mapping,
        }
    }

    pub fn value(&self, id: NodeId) -> &NodeValue {
        &self.nodes[id.0].value
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// The scalar payload of a node, if it is a scalar.
    pub fn scalar(&self, id: NodeId) -> Option<&Scalar> {
        match &self.nodes[id.0].value {
            NodeValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn sequence_len(&self, id: NodeId) -> Option<usize> {
        match &self.nodes[id.0].value {
            NodeValue::Sequence(items) => Some(items.len()),
            _ => None,
        }
    }

    pub fn sequence_item(&self, id: NodeId, index: usize) -> Option<NodeId> {
        match &self.nodes[id.0].value {
            NodeValue::Sequence(items) => items.get(index).copied(),
            _ => None,
        }
    }

    /// Looks up a mapping value whose key is the plain scalar `name`.
    pub fn mapping_value_by_simple_key(&self, id: NodeId, name: &str) -> Option<NodeId> {
        let NodeValue::Mapping(entries) = &self.nodes[id.0].value else {
            return None;
        };
        entries
            .iter()
            .find(|entry| matches!(self.scalar(entry.key), Some(Scalar::Str(s)) if s == name))
            .map(|entry| entry.value)
    }

    /// Looks up a mapping value whose key structurally equals `key`.
    pub fn mapping_value_by_key(&self, id: NodeId, key: &KeyValue) -> Option<NodeId> {
        let NodeValue::Mapping(entries) = &self.nodes[id.0].value else {
            return None;
        };
        entries
            .iter()
            .find(|entry| self.matches_key(entry.key, key))
            .map(|entry| entry.value)
    }

    /// Structural equality between a node and a key fragment.
    ///
    /// Sequences compare element-wise in order; mappings compare as sets of
    /// pairs, since YAML key equality is order-insensitive.
    pub fn matches_key(&self, id: NodeId, key: &KeyValue) -> bool {
        match (&self.nodes[id.0].value, key) {
            (NodeValue::Scalar(Scalar::Null), KeyValue::Null) => true,
            (NodeValue::Scalar(Scalar::Bool(a)), KeyValue::Bool(b)) => a == b,
            (NodeValue::Scalar(Scalar::Int(a)), KeyValue::Int(b)) => a == b,
            (NodeValue::Scalar(Scalar::Float(a)), KeyValue::Float(b)) => a == b,
            (NodeValue::Scalar(Scalar::Str(a)), KeyValue::Str(b)) => a == b,
            (NodeValue::Sequence(items), KeyValue::Sequence(keys)) => {
                items.len() == keys.len()
                    && items
                        .iter()
                        .zip(keys)
                        .all(|(item, key)| self.matches_key(*item, key))
            }
            (NodeValue::Mapping(entries), KeyValue::Mapping(pairs)) => {
                entries.len() == pairs.len()
                    && pairs.iter().all(|(k, v)| {
                        entries.iter().any(|entry| {
                            self.matches_key(entry.key, k) && self.matches_key(entry.value, v)
                        })
                    })
            }
            _ => false,
        }
    }

    /// The traversal children of a node: sequence items, or mapping values
    /// in entry order. Scalars have none; keys are not children.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match &self.nodes[id.0].value {
            NodeValue::Scalar(_) => Vec::new(),
            NodeValue::Sequence(items) => items.clone(),
            NodeValue::Mapping(entries) => entries.iter().map(|entry| entry.value).collect(),
        }
    }

    /// Rebuilds a `serde_yaml::Value` for a subtree, for re-emission.
    pub fn to_value(&self, id: NodeId) -> Value {
        match &self.nodes[id.0].value {
            NodeValue::Scalar(Scalar::Null) => Value::Null,
            NodeValue::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
            NodeValue::Scalar(Scalar::Int(i)) => Value::Number(serde_yaml::Number::from(*i)),
            NodeValue::Scalar(Scalar::Float(x)) => Value::Number(serde_yaml::Number::from(*x)),
            NodeValue::Scalar(Scalar::Str(s)) => Value::String(s.clone()),
            NodeValue::Sequence(items) => {
                Value::Sequence(items.iter().map(|item| self.to_value(*item)).collect())
            }
            NodeValue::Mapping(entries) => {
                let mut map = serde_yaml::Mapping::new();
                for entry in entries {
                    map.insert(self.to_value(entry.key), self.to_value(entry.value));
                }
                Value::Mapping(map)
            }
        }
    }

    /// Serializes a subtree back to YAML text.
    pub fn to_yaml_string(&self, id: NodeId) -> Result<String> {
        serde_yaml::to_string(&self.to_value(id)).context("failed to serialize node to YAML")
    }
}
