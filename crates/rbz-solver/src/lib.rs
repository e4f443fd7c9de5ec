//! Type algebra for the rbz analyzer.
//!
//! This crate provides:
//! - `Type` - The closed algebra of inferred types
//! - `HashKey` - Hash-shape keys (symbol or quoted string)
//! - Canonical textual rendering (`Type::to_ts`)
//! - The union and widening laws shared by the graph layer
//!
//! The full constraint solver operating on the type-vertex graph lives
//! outside this workspace; this crate covers the node-local algebra only.

pub mod types;
pub use types::{HashKey, Type};
