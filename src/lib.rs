//! yamlscout - structural queries over YAML documents.
//!
//! The crate splits into three layers: the [`document`] module loads YAML
//! into an arena-backed tree, the [`path`] module compiles and evaluates
//! path expressions against it, and [`diag`] carries compile-time
//! diagnostics to a logger.
//!
//! # Example
//!
//! ```
//! use yamlscout::document::parse_document;
//! use yamlscout::path::{compile, evaluate};
//!
//! let doc = parse_document("a: 1\nb: 2\nc: 3").unwrap();
//! let expr = compile("/a,b,c").unwrap();
//! let results = evaluate(&expr, &doc, doc.root().unwrap());
//! assert_eq!(results.len(), 3);
//! ```

pub mod diag;
pub mod document;
pub mod path;

pub use document::node::{Document, NodeId, NodeKind, NodeValue, Scalar};
pub use document::parser::parse_document;
pub use path::{compile, evaluate, PathError, PathExpr, Results};
