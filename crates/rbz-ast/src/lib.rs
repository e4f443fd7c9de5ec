//! AST node model for the rbz analyzer.
//!
//! This crate provides:
//! - `NodeArena` - Flat arena storage for AST nodes with `NodeId` handles
//! - `NodeKind` - One variant per syntactic form the analyzer understands
//! - `ParamKind` - Method parameter kinds
//!
//! The analyzer consumes a populated arena; producing one is a parser's job.
//! Tests (and embedding hosts without a parser) build arenas directly through
//! `NodeArena::alloc`.

pub mod node;
pub use node::{Node, NodeArena, NodeId, NodeKind, ParamKind};
