//! Diagnostics collected while analyzing a source file.
//!
//! The analyzer is best-effort: malformed or unsupported constructs do not
//! abort the walk, they produce a `Diagnostic` and the walk continues.

use crate::span::Span;
use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    Warning,
    Error,
}

/// A single diagnostic pointing at a span of one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub file: String,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn error(file: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            file: file.into(),
            span,
            message: message.into(),
        }
    }

    pub fn warning(file: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            file: file.into(),
            span,
            message: message.into(),
        }
    }
}
