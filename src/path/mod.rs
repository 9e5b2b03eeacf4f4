//! Path-expression engine for querying YAML documents by structure.
//!
//! A path expression selects an ordered, duplicate-free set of nodes from a
//! parsed document. Compilation and evaluation are separate: a compiled
//! [`PathExpr`] is immutable and reusable across documents and threads.
//!
//! # Supported Syntax
//!
//! - `/` - separator; leading `/` starts at the root, trailing `/` asserts
//!   a collection
//! - `^` - the document root
//! - `.` - the current node
//! - `..` - the parent node
//! - `*` - every immediate child
//! - `**` - the node and all descendants
//! - `key` - mapping lookup by plain key
//! - `"key"`, `'key'`, `{...}`, `[...]` - mapping lookup by quoted or flow key
//! - `*name` - start at the document anchor `name`
//! - `3`, `-1` - sequence index (negative indices never match)
//! - `0:3`, `2:` - sequence slice, end optional
//! - `a,b,c` - union of several expressions
//! - `:key` - sibling access (parent first, then key)
//! - `$` `%` `[]` `{}` - filter the result to scalars, collections,
//!   sequences, mappings
//!
//! # Examples
//!
//! ```
//! use yamlscout::document::parse_document;
//! use yamlscout::path::{compile, evaluate};
//!
//! let doc = parse_document("items: [10, 20, 30, 40]").unwrap();
//! let expr = compile("/items/1:3").unwrap();
//! let results = evaluate(&expr, &doc, doc.root().unwrap());
//! assert_eq!(results.len(), 2);
//! ```

pub mod error;
pub mod evaluator;
pub mod expr;
pub mod parser;
pub mod reader;
pub mod results;
pub mod scanner;
pub mod token;

pub use error::PathError;
pub use evaluator::Evaluator;
pub use expr::{ExprKind, PathExpr};
pub use parser::Parser;
pub use results::Results;
pub use scanner::Scanner;
pub use token::{Span, Token, TokenKind};

use crate::document::node::{Document, NodeId};

/// Compiles a path expression into a reusable expression tree.
pub fn compile(path: &str) -> Result<PathExpr, PathError> {
    Parser::parse(path)
}

/// Evaluates a compiled expression with `start` as the current node.
pub fn evaluate(expr: &PathExpr, doc: &Document, start: NodeId) -> Results {
    Evaluator::new(doc).evaluate(expr, start)
}
