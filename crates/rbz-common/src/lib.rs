//! Common types and utilities for the rbz analyzer.
//!
//! This crate provides foundational types used across all rbz crates:
//! - Source spans (`Span`, `Spanned`)
//! - Diagnostics collected during analysis (`Diagnostic`, `Severity`)

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::{Span, Spanned};

// Diagnostics emitted while walking a source file
pub mod diagnostics;
pub use diagnostics::{Diagnostic, Severity};
