//! Type vertices and the insertion-ordered vertex registry.
//!
//! A `TypeVertex` represents one expression or binding of the walked file.
//! Vertices form a directed dependency graph: `dependencies` point at the
//! value producers whose types determine this vertex's type, `dependents`
//! are the reverse edges. Both sides are maintained together, so the graph
//! is cyclic by construction and lives in an arena of `VertexId` handles
//! that is cleared as a unit.

use crate::registry::MethodId;
use rbz_ast::ParamKind;
use rbz_solver::HashKey;
use serde::Serialize;

/// Handle of a vertex within its `TypeVertexRegistry`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct VertexId(pub u32);

impl VertexId {
    pub const NONE: VertexId = VertexId(u32::MAX);

    #[inline]
    #[must_use]
    pub const fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// The closed enumeration of vertex kinds.
///
/// Kind-specific payload is folded into the variant; together with the
/// inferred types of the immediate dependencies it is all the downstream
/// solver needs to compute a type.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum VertexKind {
    IntegerLit(i64),
    StringLit(String),
    SymbolLit(String),
    True,
    False,
    Nil,
    /// A local-variable write. Re-assignment allocates a new vertex; prior
    /// reads stay bound to the prior write.
    Lvar { name: String },
    LvarRead { name: String },
    /// An instance-variable write, accumulated per enclosing constant.
    Ivar { name: String },
    /// Depends on every write to the same ivar name seen so far in the
    /// enclosing constant; re-resolved as their union at inference time.
    IvarRead { name: String },
    Call { name: String, has_receiver: bool },
    If,
    Array,
    Hash { keys: Vec<HashKey> },
    ConstRead { path: String, resolved: bool },
    StringInterp,
    Return,
    Arg {
        name: String,
        index: u32,
        kind: ParamKind,
    },
}

/// One node of the type dependency graph.
#[derive(Clone, Debug, Serialize)]
pub struct TypeVertex {
    pub id: VertexId,
    /// Human label: variable name, literal lexeme, method name, or the
    /// AST-kind tag for synthetic nodes.
    pub name: String,
    pub kind: VertexKind,
    /// Qualified name of the enclosing self-type; `"Object"` at top level.
    /// Fixed at creation.
    pub scope: String,
    pub dependencies: Vec<VertexId>,
    pub dependents: Vec<VertexId>,
    /// Methods for which this vertex is an argument vertex.
    pub method_objs: Vec<MethodId>,
}

/// Insertion-ordered arena of all vertices produced while walking one file.
///
/// Insertion order is the visitor's creation order and is a public
/// observable.
#[derive(Debug, Default)]
pub struct TypeVertexRegistry {
    vertices: Vec<TypeVertex>,
}

impl TypeVertexRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
        }
    }

    /// Allocate a fresh vertex with empty edge sets.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        kind: VertexKind,
        scope: impl Into<String>,
    ) -> VertexId {
        let id = VertexId(u32::try_from(self.vertices.len()).expect("vertex arena overflow"));
        self.vertices.push(TypeVertex {
            id,
            name: name.into(),
            kind,
            scope: scope.into(),
            dependencies: Vec::new(),
            dependents: Vec::new(),
            method_objs: Vec::new(),
        });
        id
    }

    /// Record that `parent`'s type depends on `child`'s type.
    ///
    /// Updates both edge lists; idempotent per identical `(parent, child)`
    /// pair, so re-evaluating the same subtree never produces parallel
    /// edges.
    pub fn add_dependency(&mut self, parent: VertexId, child: VertexId) {
        debug_assert!((parent.0 as usize) < self.vertices.len());
        debug_assert!((child.0 as usize) < self.vertices.len());
        if self.vertices[parent.0 as usize]
            .dependencies
            .contains(&child)
        {
            return;
        }
        self.vertices[parent.0 as usize].dependencies.push(child);
        self.vertices[child.0 as usize].dependents.push(parent);
    }

    #[must_use]
    pub fn get(&self, id: VertexId) -> Option<&TypeVertex> {
        if id.is_none() {
            return None;
        }
        self.vertices.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: VertexId) -> Option<&mut TypeVertex> {
        if id.is_none() {
            return None;
        }
        self.vertices.get_mut(id.0 as usize)
    }

    /// All vertices in creation order.
    #[must_use]
    pub fn all(&self) -> &[TypeVertex] {
        &self.vertices
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }
}

#[cfg(test)]
#[path = "tests/vertex_tests.rs"]
mod tests;
