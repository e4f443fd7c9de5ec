//! Constant, method, and node registries populated during a walk.

use crate::vertex::VertexId;
use indexmap::IndexMap;
use rbz_ast::NodeId;
use rbz_solver::Type;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Handle of a constant within its `ConstRegistry`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ConstId(pub u32);

/// Handle of a method within its `MethodRegistry`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct MethodId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ConstKind {
    Module,
    Class,
}

/// Method visibility. Ordered from most to least accessible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    /// Whether a caller with this access level can see a method declared
    /// with `target` visibility. `Private` access sees everything; `Public`
    /// access sees only public methods.
    #[must_use]
    pub const fn can_see(self, target: Visibility) -> bool {
        match self {
            Visibility::Private => true,
            Visibility::Protected => !matches!(target, Visibility::Private),
            Visibility::Public => matches!(target, Visibility::Public),
        }
    }
}

/// How a method entered the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MethodOrigin {
    /// An ordinary `def`.
    Def,
    /// Synthesized by an `attr_reader` / `attr_accessor` hook.
    AttrReader,
    /// Synthesized by an `attr_writer` / `attr_accessor` hook.
    AttrWriter,
}

/// A module or class encountered during the walk.
#[derive(Clone, Debug, Serialize)]
pub struct Constant {
    /// Fully qualified name (`"C::D"`).
    pub name: String,
    pub kind: ConstKind,
    pub parent: Option<ConstId>,
    /// Qualified name of the superclass expression, when one was resolvable.
    pub superclass: Option<String>,
    /// Files this constant was declared in.
    pub paths: Vec<String>,
}

/// Mapping from fully qualified constant names to constant descriptors.
#[derive(Debug, Default)]
pub struct ConstRegistry {
    consts: Vec<Constant>,
    by_name: IndexMap<String, ConstId>,
}

impl ConstRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `name`, creating the descriptor on first sight. Idempotent:
    /// repeated registration augments `paths` and returns the same id.
    pub fn find_or_add(
        &mut self,
        name: impl Into<String>,
        kind: ConstKind,
        parent: Option<ConstId>,
        path: &str,
    ) -> ConstId {
        let name = name.into();
        if let Some(&id) = self.by_name.get(&name) {
            let constant = &mut self.consts[id.0 as usize];
            if !constant.paths.iter().any(|p| p == path) {
                constant.paths.push(path.to_string());
            }
            return id;
        }
        let id = ConstId(u32::try_from(self.consts.len()).expect("const registry overflow"));
        self.consts.push(Constant {
            name: name.clone(),
            kind,
            parent,
            superclass: None,
            paths: vec![path.to_string()],
        });
        self.by_name.insert(name, id);
        id
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Constant> {
        self.by_name.get(name).map(|&id| &self.consts[id.0 as usize])
    }

    #[must_use]
    pub fn get(&self, id: ConstId) -> Option<&Constant> {
        self.consts.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: ConstId) -> Option<&mut Constant> {
        self.consts.get_mut(id.0 as usize)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.consts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.consts.is_empty()
    }

    pub fn clear(&mut self) {
        self.consts.clear();
        self.by_name.clear();
    }
}

/// A method (or attribute accessor) registered during the walk.
#[derive(Clone, Debug, Serialize)]
pub struct Method {
    /// Qualified name of the receiver constant; `""` for top-level methods.
    pub receiver: String,
    pub name: String,
    pub singleton: bool,
    pub visibility: Visibility,
    pub origin: MethodOrigin,
    /// The defining AST node, when the method came from a `def`.
    pub node: Option<NodeId>,
    /// Files this method was declared in. A method with no paths left is
    /// *dangling* and awaits deletion by the host.
    pub paths: Vec<String>,
    /// Argument vertices in declaration order, keyed by parameter name.
    pub arg_tvs: IndexMap<String, VertexId>,
    /// One vertex per explicit `return` and one for the trailing expression.
    pub return_tvs: Vec<VertexId>,
    /// Explicit declared types, written by the host's signature layer.
    pub declared_arg_types: FxHashMap<String, Type>,
    pub declared_return_type: Option<Type>,
}

impl Method {
    /// Drop one declaring path; used by incremental hosts when a file goes
    /// away.
    pub fn remove_path(&mut self, path: &str) {
        self.paths.retain(|p| p != path);
    }

    /// A method with no declaration paths awaits deletion.
    #[must_use]
    pub fn is_dangling(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn set_declared_arg_type(&mut self, name: impl Into<String>, ty: Type) {
        self.declared_arg_types.insert(name.into(), ty);
    }

    pub fn set_declared_return_type(&mut self, ty: Type) {
        self.declared_return_type = Some(ty);
    }
}

/// Mapping from `(receiver, name, singleton?)` to method descriptors.
#[derive(Debug, Default)]
pub struct MethodRegistry {
    methods: Vec<Method>,
    by_key: IndexMap<(String, String, bool), MethodId>,
}

impl MethodRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method. If the `(receiver, name, singleton)` key already
    /// exists, the existing descriptor is returned with `path` added to its
    /// declaration paths.
    pub fn add(
        &mut self,
        receiver: impl Into<String>,
        name: impl Into<String>,
        node: Option<NodeId>,
        path: &str,
        singleton: bool,
        visibility: Visibility,
        origin: MethodOrigin,
    ) -> MethodId {
        let receiver = receiver.into();
        let name = name.into();
        let key = (receiver.clone(), name.clone(), singleton);
        if let Some(&id) = self.by_key.get(&key) {
            let method = &mut self.methods[id.0 as usize];
            if !method.paths.iter().any(|p| p == path) {
                method.paths.push(path.to_string());
            }
            return id;
        }
        let id = MethodId(u32::try_from(self.methods.len()).expect("method registry overflow"));
        self.methods.push(Method {
            receiver,
            name,
            singleton,
            visibility,
            origin,
            node,
            paths: vec![path.to_string()],
            arg_tvs: IndexMap::new(),
            return_tvs: Vec::new(),
            declared_arg_types: FxHashMap::default(),
            declared_return_type: None,
        });
        self.by_key.insert(key, id);
        id
    }

    /// Find a method visible to a caller with `access` level.
    #[must_use]
    pub fn find(
        &self,
        receiver: &str,
        name: &str,
        access: Visibility,
        singleton: bool,
    ) -> Option<&Method> {
        let id = self.find_id(receiver, name, singleton)?;
        let method = &self.methods[id.0 as usize];
        access.can_see(method.visibility).then_some(method)
    }

    /// Find a method id regardless of visibility.
    #[must_use]
    pub fn find_id(&self, receiver: &str, name: &str, singleton: bool) -> Option<MethodId> {
        self.by_key
            .get(&(receiver.to_string(), name.to_string(), singleton))
            .copied()
    }

    #[must_use]
    pub fn get(&self, id: MethodId) -> Option<&Method> {
        self.methods.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: MethodId) -> Option<&mut Method> {
        self.methods.get_mut(id.0 as usize)
    }

    /// All methods in registration order.
    #[must_use]
    pub fn all(&self) -> &[Method] {
        &self.methods
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn clear(&mut self) {
        self.methods.clear();
        self.by_key.clear();
    }
}

/// Mapping from AST node identity to the primary vertex it produced.
///
/// Used for identity-stable references when the same node is looked at more
/// than once; local-variable reads resolve through the scope stack's
/// last-write record instead.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    map: FxHashMap<NodeId, VertexId>,
}

impl NodeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: NodeId, vertex: VertexId) {
        self.map.insert(node, vertex);
    }

    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<VertexId> {
        self.map.get(&node).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
