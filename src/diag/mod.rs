//! Diagnostic reporting for the path engine.
//!
//! Compile-time problems are reported here before the typed error is returned,
//! so that callers following a logger see what went wrong even when they
//! discard the error value. Diagnostics are write-only and never influence
//! parsing or evaluation results.

use crate::path::token::Span;

/// Severity of a reported diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Notice,
    Warning,
    Error,
}

/// A single reported message with an optional source span into the
/// path-expression text.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Option<Span>,
}

/// Collects diagnostics and forwards them to the `log` crate.
///
/// Notices go to `debug`, warnings to `warn`, errors to `error`. The collected
/// entries remain available for inspection after a parse.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notice(&mut self, message: impl Into<String>, span: Option<Span>) {
        self.report(Diagnostic {
            severity: Severity::Notice,
            message: message.into(),
            span,
        });
    }

    pub fn warning(&mut self, message: impl Into<String>, span: Option<Span>) {
        self.report(Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
            span,
        });
    }

    pub fn error(&mut self, message: impl Into<String>, span: Option<Span>) {
        self.report(Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            span,
        });
    }

    /// Records a diagnostic and forwards it to the attached logger.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        match (&diagnostic.severity, &diagnostic.span) {
            (Severity::Notice, Some(span)) => log::debug!("{} at {}", diagnostic.message, span),
            (Severity::Notice, None) => log::debug!("{}", diagnostic.message),
            (Severity::Warning, Some(span)) => log::warn!("{} at {}", diagnostic.message, span),
            (Severity::Warning, None) => log::warn!("{}", diagnostic.message),
            (Severity::Error, Some(span)) => log::error!("{} at {}", diagnostic.message, span),
            (Severity::Error, None) => log::error!("{}", diagnostic.message),
        }
        self.entries.push(diagnostic);
    }

    /// Returns all diagnostics reported so far, in order.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Removes and returns the collected diagnostics.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.entries)
    }
}
