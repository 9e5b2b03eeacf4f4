//! Shunting-yard parser for path expressions.
//!
//! The parser drives two stacks: operator tokens and operand expressions.
//! Operand tokens become leaf expressions immediately; an incoming operator
//! first reduces every stacked operator of equal or higher precedence, then
//! pushes itself. Reduction builds `Chain` and `Multi` nodes, flattening
//! nested chains and multis as it goes, so a chain never directly contains a
//! chain and a multi never directly contains a multi.
//!
//! The slash operator is the odd one out: with no right operand it stands for
//! the root, and with no left operand its position decides between a leading
//! `/foo` (synthesize a root on the left) and a trailing `foo/` (synthesize a
//! collection assertion on the right).

use crate::diag::Diagnostics;

use super::error::PathError;
use super::expr::{ExprKind, PathExpr};
use super::scanner::Scanner;
use super::token::{Token, TokenKind};

/// Parser for path-expression strings.
pub struct Parser {
    scanner: Scanner,
    operators: Vec<Token>,
    operands: Vec<PathExpr>,
    diag: Diagnostics,
}

impl Parser {
    /// Creates a parser over the given expression. Leading and trailing
    /// whitespace is not part of the expression and is trimmed; spans refer
    /// to the trimmed text.
    pub fn new(path: &str) -> Self {
        Self {
            scanner: Scanner::new(path.trim()),
            operators: Vec::new(),
            operands: Vec::new(),
            diag: Diagnostics::new(),
        }
    }

    /// Compiles a path expression in one call.
    pub fn parse(path: &str) -> Result<PathExpr, PathError> {
        Parser::new(path).parse_expression()
    }

    /// Diagnostics reported so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diag
    }

    /// Runs the driver loop to completion and returns the expression tree.
    pub fn parse_expression(&mut self) -> Result<PathExpr, PathError> {
        let first = self.next_token()?;
        if first.kind != TokenKind::StreamStart {
            return Err(self.fail(PathError::internal("stream did not begin at the start")));
        }

        loop {
            let token = self.next_token()?;
            if token.kind == TokenKind::StreamEnd {
                break;
            }

            if token.kind.is_operand() {
                let expr = operand_expr(token);
                self.operands.push(expr);
                continue;
            }

            if token.kind.is_operator() {
                // reduce every stacked operator that binds at least as
                // tightly, then push this one
                loop {
                    let push = match self.operators.last() {
                        None => true,
                        Some(top) => token.kind.precedence() > top.kind.precedence(),
                    };
                    if push {
                        self.operators.push(token);
                        break;
                    }
                    self.reduce()?;
                }
                continue;
            }

            return Err(self.fail(PathError::syntax(
                format!("unexpected {} token", token.kind.describe()),
                token.span,
            )));
        }

        while !self.operators.is_empty() {
            self.reduce()?;
        }

        if self.operands.len() != 1 {
            let span = self
                .operands
                .last()
                .map(|expr| expr.span())
                .unwrap_or_else(|| super::token::Span::new(0, 0));
            return Err(self.fail(PathError::syntax("invalid operand stack at end", span)));
        }
        self.operands
            .pop()
            .ok_or_else(|| PathError::internal("operand stack emptied unexpectedly"))
    }

    fn next_token(&mut self) -> Result<Token, PathError> {
        match self.scanner.next_token() {
            Ok(token) => Ok(token),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Reports the error through diagnostics and hands it back.
    fn fail(&mut self, err: PathError) -> PathError {
        self.diag.error(err.to_string(), err.span());
        err
    }

    /// Pops the top operator and applies it to the operand stack.
    fn reduce(&mut self) -> Result<(), PathError> {
        let op = self
            .operators
            .pop()
            .ok_or_else(|| PathError::internal("no operator to reduce"))?;

        match op.kind {
            TokenKind::Slash => self.reduce_slash(op),
            TokenKind::Comma => self.reduce_comma(op),
            TokenKind::Sibling => self.reduce_sibling(op),
            TokenKind::ScalarFilter => self.reduce_filter(op, ExprKind::AssertScalar),
            TokenKind::CollectionFilter => self.reduce_filter(op, ExprKind::AssertCollection),
            TokenKind::SeqFilter => self.reduce_filter(op, ExprKind::AssertSequence),
            TokenKind::MapFilter => self.reduce_filter(op, ExprKind::AssertMapping),
            _ => Err(self.fail(PathError::internal("non-operator on the operator stack"))),
        }
    }

    fn reduce_slash(&mut self, op: Token) -> Result<(), PathError> {
        let Some(right) = self.operands.pop() else {
            // a slash with nothing around it is the root
            self.operands.push(PathExpr::leaf(ExprKind::Root, op.span));
            return Ok(());
        };

        let (left, right) = match self.operands.pop() {
            Some(left) => (left, Some(right)),
            None => {
                if op.span.start < right.span().start {
                    // the slash precedes the operand: /foo starts at the root
                    (PathExpr::leaf(ExprKind::Root, op.span), Some(right))
                } else {
                    // trailing slash: the operand must end at a collection
                    (right, None)
                }
            }
        };

        let mut chain = into_chain(left);
        let right =
            right.unwrap_or_else(|| PathExpr::leaf(ExprKind::AssertCollection, op.span));
        append_flattened(&mut chain, right, &ExprKind::Chain);
        self.operands.push(chain);
        Ok(())
    }

    fn reduce_comma(&mut self, op: Token) -> Result<(), PathError> {
        let right = match self.operands.pop() {
            Some(expr) => expr,
            None => {
                return Err(self.fail(PathError::unsupported(
                    "comma without operands (rhs)",
                    op.span,
                )))
            }
        };
        let left = match self.operands.pop() {
            Some(expr) => expr,
            None => {
                return Err(self.fail(PathError::unsupported(
                    "comma without operands (lhs)",
                    op.span,
                )))
            }
        };

        let mut multi = if matches!(left.kind(), ExprKind::Multi) {
            left
        } else {
            PathExpr::with_children(ExprKind::Multi, vec![left])
        };
        append_flattened(&mut multi, right, &ExprKind::Multi);
        self.operands.push(multi);
        Ok(())
    }

    fn reduce_sibling(&mut self, op: Token) -> Result<(), PathError> {
        let operand = match self.operands.pop() {
            Some(expr) => expr,
            None => {
                return Err(self.fail(PathError::unsupported(
                    "sibling operator without argument",
                    op.span,
                )))
            }
        };
        if !operand.kind().is_map_key() {
            return Err(self.fail(PathError::unsupported(
                "sibling operator on non-map key",
                op.span,
            )));
        }

        let parent = PathExpr::leaf(ExprKind::Parent, op.span);
        let chain = PathExpr::with_children(ExprKind::Chain, vec![parent, operand]);
        self.operands.push(chain);
        Ok(())
    }

    fn reduce_filter(&mut self, op: Token, assert: ExprKind) -> Result<(), PathError> {
        let operand = match self.operands.pop() {
            Some(expr) => expr,
            None => {
                return Err(self.fail(PathError::unsupported(
                    "filter operator without argument",
                    op.span,
                )))
            }
        };

        let mut chain = into_chain(operand);
        chain.push_child(PathExpr::leaf(assert, op.span));
        self.operands.push(chain);
        Ok(())
    }
}

/// Wraps an expression into a chain, or reuses it if it already is one.
fn into_chain(expr: PathExpr) -> PathExpr {
    if matches!(expr.kind(), ExprKind::Chain) {
        expr
    } else {
        PathExpr::with_children(ExprKind::Chain, vec![expr])
    }
}

/// Appends `child` to `parent`, splicing its children instead when it has the
/// same composite kind. This keeps chains and multis flat.
fn append_flattened(parent: &mut PathExpr, child: PathExpr, kind: &ExprKind) {
    if child.kind() == kind {
        for grandchild in child.into_children() {
            parent.push_child(grandchild);
        }
    } else {
        parent.push_child(child);
    }
}

/// Turns an operand token into its leaf expression.
fn operand_expr(token: Token) -> PathExpr {
    let kind = match token.kind {
        TokenKind::Root => ExprKind::Root,
        TokenKind::This => ExprKind::This,
        TokenKind::Parent => ExprKind::Parent,
        TokenKind::EveryChild => ExprKind::EveryChild,
        TokenKind::EveryChildRecursive => ExprKind::EveryChildRecursive,
        TokenKind::Alias(name) => ExprKind::Alias(name),
        TokenKind::SimpleKey(name) => ExprKind::SimpleMapKey(name),
        TokenKind::FlowKey(fragment) => ExprKind::MapKey(fragment),
        TokenKind::SeqIndex(index) => ExprKind::SeqIndex(index),
        TokenKind::SeqSlice { start, end } => ExprKind::SeqSlice { start, end },
        // `is_operand` gated the call
        _ => ExprKind::This,
    };
    PathExpr::leaf(kind, token.span)
}
