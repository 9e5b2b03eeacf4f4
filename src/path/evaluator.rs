//! Evaluation of compiled path expressions against a document.
//!
//! Missing keys, out-of-range indices and kind mismatches are not errors;
//! they contribute nothing to the result set. Chains fold runs of
//! single-result steps without materializing intermediate lists and only
//! allocate when a step can fan out.

use crate::document::node::{Document, NodeId, NodeKind, NodeValue};

use super::expr::{ExprKind, PathExpr};
use super::results::Results;

pub struct Evaluator<'a> {
    doc: &'a Document,
}

impl<'a> Evaluator<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Evaluator { doc }
    }

    /// Evaluates an expression with `start` as the current node.
    pub fn evaluate(&self, expr: &PathExpr, start: NodeId) -> Results {
        let mut out = Results::new();
        self.eval_into(expr, start, &mut out);
        out
    }

    /// Evaluates from an optional starting node; `None` yields no matches.
    pub fn evaluate_from(&self, expr: &PathExpr, start: Option<NodeId>) -> Results {
        match start {
            Some(node) => self.evaluate(expr, node),
            None => Results::new(),
        }
    }

    fn eval_into(&self, expr: &PathExpr, node: NodeId, out: &mut Results) {
        match expr.kind() {
            ExprKind::Chain => self.eval_chain(expr.children(), node, out),
            ExprKind::Multi => {
                for child in expr.children() {
                    self.eval_into(child, node, out);
                }
            }
            ExprKind::EveryChild => match self.doc.value(node) {
                NodeValue::Scalar(_) => {
                    out.add(node);
                }
                NodeValue::Sequence(items) => {
                    for item in items {
                        out.add(*item);
                    }
                }
                NodeValue::Mapping(entries) => {
                    for entry in entries {
                        out.add(entry.value);
                    }
                }
            },
            ExprKind::EveryChildRecursive => self.add_recursive(node, false, out),
            ExprKind::EveryLeaf => self.add_recursive(node, true, out),
            ExprKind::SeqSlice { start, end } => self.add_slice(node, *start, *end, out),
            _ => {
                if let Some(next) = self.step_single(expr, node) {
                    out.add(next);
                }
            }
        }
    }

    /// Walks the stages of a chain. Single-result stages are folded in place;
    /// the first fan-out stage materializes its results and the remainder of
    /// the chain runs once per result.
    fn eval_chain(&self, stages: &[PathExpr], node: NodeId, out: &mut Results) {
        let mut current = node;
        for (i, stage) in stages.iter().enumerate() {
            if stage.kind().yields_multiple() {
                let mut intermediate = Results::new();
                self.eval_into(stage, current, &mut intermediate);
                let rest = &stages[i + 1..];
                if rest.is_empty() {
                    for found in intermediate.iter() {
                        out.add(found);
                    }
                } else {
                    for found in intermediate.iter() {
                        self.eval_chain(rest, found, out);
                    }
                }
                return;
            }
            match self.step_single(stage, current) {
                Some(next) => current = next,
                None => return,
            }
        }
        out.add(current);
    }

    /// One step of a single-result operator; `None` means no match.
    fn step_single(&self, expr: &PathExpr, node: NodeId) -> Option<NodeId> {
        match expr.kind() {
            ExprKind::Root => self.doc.root(),
            ExprKind::This => Some(node),
            ExprKind::Parent => self.doc.parent(node),
            ExprKind::Alias(name) => self.doc.anchor(name),
            ExprKind::SimpleMapKey(name) => self.doc.mapping_value_by_simple_key(node, name),
            ExprKind::MapKey(key) => self.doc.mapping_value_by_key(node, key),
            ExprKind::SeqIndex(index) => {
                // no wrap-around: negative indices never match
                if *index < 0 {
                    None
                } else {
                    self.doc.sequence_item(node, *index as usize)
                }
            }
            ExprKind::AssertScalar => (self.doc.kind(node) == NodeKind::Scalar).then_some(node),
            ExprKind::AssertCollection => (self.doc.kind(node) != NodeKind::Scalar).then_some(node),
            ExprKind::AssertSequence => (self.doc.kind(node) == NodeKind::Sequence).then_some(node),
            ExprKind::AssertMapping => (self.doc.kind(node) == NodeKind::Mapping).then_some(node),
            _ => None,
        }
    }

    /// Pre-order walk adding the node and its descendants; with `leaf_only`
    /// set, only scalars are added.
    fn add_recursive(&self, node: NodeId, leaf_only: bool, out: &mut Results) {
        match self.doc.value(node) {
            NodeValue::Scalar(_) => {
                out.add(node);
            }
            NodeValue::Sequence(items) => {
                if !leaf_only {
                    out.add(node);
                }
                for item in items {
                    self.add_recursive(*item, leaf_only, out);
                }
            }
            NodeValue::Mapping(entries) => {
                if !leaf_only {
                    out.add(node);
                }
                for entry in entries {
                    self.add_recursive(entry.value, leaf_only, out);
                }
            }
        }
    }

    /// Items of `[start, end)` clamped to the sequence length.
    fn add_slice(&self, node: NodeId, start: i32, end: Option<i32>, out: &mut Results) {
        let NodeValue::Sequence(items) = self.doc.value(node) else {
            return;
        };
        if start < 0 {
            return;
        }
        let start = start as usize;
        let len = items.len();
        let end = match end {
            Some(e) if e < 0 => return,
            Some(e) => (e as usize).min(len),
            None => len,
        };
        if start >= end || start >= len {
            return;
        }
        for item in &items[start..end] {
            out.add(*item);
        }
    }
}
