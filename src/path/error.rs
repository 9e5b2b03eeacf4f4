//! Error types for path-expression compilation.

use thiserror::Error;

use super::token::Span;

/// Errors produced while compiling a path expression.
///
/// Evaluation does not produce errors: a missing key, an out-of-range index
/// or a node of the wrong kind simply contributes no match.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PathError {
    /// The tokenizer or parser rejected the input.
    #[error("invalid path expression at {span}: {message}")]
    Syntax { message: String, span: Span },

    /// Lexically valid but semantically disallowed combination, such as a
    /// sibling mark on a non-key operand or a filter without an operand.
    #[error("unsupported path construct at {span}: {message}")]
    Unsupported { message: String, span: Span },

    /// A numeric literal does not fit a 32-bit signed integer.
    #[error("sequence index overflows at {span}")]
    Overflow { span: Span },

    /// End of input inside a quoted or flow construct.
    #[error("unterminated {construct} at {span}")]
    Truncated { construct: &'static str, span: Span },

    /// Unreachable state or resource exhaustion; always fatal.
    #[error("internal path engine error: {message}")]
    Internal { message: String },
}

impl PathError {
    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        PathError::Syntax {
            message: message.into(),
            span,
        }
    }

    pub fn unsupported(message: impl Into<String>, span: Span) -> Self {
        PathError::Unsupported {
            message: message.into(),
            span,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PathError::Internal {
            message: message.into(),
        }
    }

    /// The source span the error points at, when it has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            PathError::Syntax { span, .. }
            | PathError::Unsupported { span, .. }
            | PathError::Overflow { span }
            | PathError::Truncated { span, .. } => Some(*span),
            PathError::Internal { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_span() {
        let err = PathError::syntax("bad path expression starts here", Span::new(4, 5));
        assert_eq!(
            err.to_string(),
            "invalid path expression at 4..5: bad path expression starts here"
        );
    }

    #[test]
    fn test_span_accessor() {
        assert_eq!(
            PathError::Overflow {
                span: Span::new(0, 11)
            }
            .span(),
            Some(Span::new(0, 11))
        );
        assert_eq!(PathError::internal("boom").span(), None);
    }
}
