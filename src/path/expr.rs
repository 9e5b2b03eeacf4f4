//! Expression tree for compiled path expressions.

use std::fmt;

use crate::document::node::KeyValue;

use super::token::Span;

/// The kind of an expression node. The set is closed; evaluation matches
/// exhaustively over it.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Produce the document root.
    Root,
    /// Pass the current node through.
    This,
    /// Produce the parent of the current node, if any.
    Parent,
    /// Each immediate child; a scalar passes itself through.
    EveryChild,
    /// The current node and every descendant, pre-order.
    EveryChildRecursive,
    /// Only the scalar descendants, pre-order.
    EveryLeaf,
    /// Pass through only non-scalars.
    AssertCollection,
    /// Pass through only scalars.
    AssertScalar,
    /// Pass through only sequences.
    AssertSequence,
    /// Pass through only mappings.
    AssertMapping,
    /// Mapping lookup by plain scalar key.
    SimpleMapKey(String),
    /// Mapping lookup by structural key fragment.
    MapKey(KeyValue),
    /// Start traversal at a document anchor.
    Alias(String),
    /// Sequence item by index; negative indices never match.
    SeqIndex(i32),
    /// Sequence items in `[start, end)`; `end` of `None` means "to end".
    SeqSlice { start: i32, end: Option<i32> },
    /// Union of the children evaluated against the same input.
    Multi,
    /// Sequential composition; each child consumes the previous output set.
    Chain,
}

impl ExprKind {
    /// Whether this kind is a map-key access (the only operands the sibling
    /// mark applies to).
    pub fn is_map_key(&self) -> bool {
        matches!(self, ExprKind::SimpleMapKey(_) | ExprKind::MapKey(_))
    }

    /// Kinds that can yield more than one node for a single input. Everything
    /// else maps an input to at most one output and can be folded without
    /// materializing an intermediate result list.
    pub(crate) fn yields_multiple(&self) -> bool {
        matches!(
            self,
            ExprKind::EveryChild
                | ExprKind::EveryChildRecursive
                | ExprKind::EveryLeaf
                | ExprKind::SeqSlice { .. }
                | ExprKind::Multi
                | ExprKind::Chain
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExprKind::Root => "root",
            ExprKind::This => "this",
            ExprKind::Parent => "parent",
            ExprKind::EveryChild => "every-child",
            ExprKind::EveryChildRecursive => "every-child-recursive",
            ExprKind::EveryLeaf => "every-leaf",
            ExprKind::AssertCollection => "assert-collection",
            ExprKind::AssertScalar => "assert-scalar",
            ExprKind::AssertSequence => "assert-sequence",
            ExprKind::AssertMapping => "assert-mapping",
            ExprKind::SimpleMapKey(_) => "simple-map-key",
            ExprKind::MapKey(_) => "map-key",
            ExprKind::Alias(_) => "alias",
            ExprKind::SeqIndex(_) => "seq-index",
            ExprKind::SeqSlice { .. } => "seq-slice",
            ExprKind::Multi => "multi",
            ExprKind::Chain => "chain",
        }
    }
}

/// A node of the compiled expression tree.
///
/// Immutable once compilation returns; a compiled expression can be shared
/// and evaluated concurrently against any number of documents. Only `Chain`
/// and `Multi` carry children; their span covers the span of their children.
#[derive(Debug, Clone, PartialEq)]
pub struct PathExpr {
    kind: ExprKind,
    span: Span,
    children: Vec<PathExpr>,
}

impl PathExpr {
    /// A childless expression covering the given span.
    pub fn leaf(kind: ExprKind, span: Span) -> Self {
        Self {
            kind,
            span,
            children: Vec::new(),
        }
    }

    /// A `Chain` or `Multi` over existing children.
    pub fn with_children(kind: ExprKind, children: Vec<PathExpr>) -> Self {
        let span = match (children.first(), children.last()) {
            (Some(first), Some(last)) => Span::new(first.span.start, last.span.end),
            _ => Span::new(0, 0),
        };
        Self {
            kind,
            span,
            children,
        }
    }

    /// Appends a child, widening the span.
    pub(crate) fn push_child(&mut self, child: PathExpr) {
        if self.children.is_empty() {
            self.span = child.span;
        } else {
            self.span = self.span.join(child.span);
        }
        self.children.push(child);
    }

    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn children(&self) -> &[PathExpr] {
        &self.children
    }

    pub(crate) fn into_children(self) -> Vec<PathExpr> {
        self.children
    }
}

impl fmt::Display for PathExpr {
    /// Indented tree dump, useful when debugging compiled expressions.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn dump(expr: &PathExpr, level: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            writeln!(
                f,
                "{:indent$}{} [{}]",
                "",
                expr.kind.name(),
                expr.span,
                indent = level * 2
            )?;
            for child in &expr.children {
                dump(child, level + 1, f)?;
            }
            Ok(())
        }
        dump(self, 0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_span() {
        let expr = PathExpr::leaf(ExprKind::Root, Span::new(0, 1));
        assert_eq!(expr.span(), Span::new(0, 1));
        assert!(expr.children().is_empty());
    }

    #[test]
    fn test_children_widen_span() {
        let mut chain = PathExpr::with_children(
            ExprKind::Chain,
            vec![PathExpr::leaf(ExprKind::Root, Span::new(0, 1))],
        );
        assert_eq!(chain.span(), Span::new(0, 1));
        chain.push_child(PathExpr::leaf(
            ExprKind::SimpleMapKey("foo".to_string()),
            Span::new(1, 4),
        ));
        assert_eq!(chain.span(), Span::new(0, 4));
    }

    #[test]
    fn test_is_map_key() {
        assert!(ExprKind::SimpleMapKey("k".to_string()).is_map_key());
        assert!(ExprKind::MapKey(crate::document::node::KeyValue::Null).is_map_key());
        assert!(!ExprKind::Root.is_map_key());
    }

    #[test]
    fn test_yields_multiple() {
        assert!(ExprKind::EveryChild.yields_multiple());
        assert!(ExprKind::Chain.yields_multiple());
        assert!(ExprKind::SeqSlice {
            start: 0,
            end: None
        }
        .yields_multiple());
        assert!(!ExprKind::SeqIndex(0).yields_multiple());
        assert!(!ExprKind::AssertScalar.yields_multiple());
    }
}
