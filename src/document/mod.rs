//! YAML document model and loader.
//!
//! The [`node`] module defines the arena-backed document the path engine
//! traverses; the [`parser`] module loads YAML text into it via `serde_yaml`.

pub mod node;
pub mod parser;

pub use node::{Document, KeyValue, MapEntry, NodeId, NodeKind, NodeValue, Scalar};
pub use parser::{parse_document, parse_key_fragment};
