//! Type-vertex graph construction for the rbz analyzer.
//!
//! This crate provides:
//! - `BinderState` - The AST-walking visitor and its traversal state
//! - `TypeVertexRegistry` - Insertion-ordered arena of type vertices
//! - `ConstRegistry` / `MethodRegistry` / `NodeRegistry` - The lookup tables
//!   populated while walking one source file
//! - `HookSet` - Macro-like call interception (`attr_*`, visibility directives)
//! - `InferenceEngine` - The trivial, node-local type inference layer
//!
//! The walk is single-threaded and non-suspending; the registries are plain
//! owned state, cleared in bulk between walks.

pub mod hooks;
pub mod infer;
pub mod registry;
pub mod state;
mod state_binding;
mod state_node_binding;
pub mod vertex;

pub use hooks::{CallContext, CallHook, HookSet};
pub use infer::InferenceEngine;
pub use registry::{
    ConstId, ConstKind, ConstRegistry, Constant, Method, MethodId, MethodOrigin, MethodRegistry,
    NodeRegistry, Visibility,
};
pub use state::{BinderOptions, BinderState};
pub use vertex::{TypeVertex, TypeVertexRegistry, VertexId, VertexKind};
