//! Definition binding: modules, classes, singleton-class bodies, and
//! method definitions with their parameters and return vertices.

use crate::registry::{ConstKind, MethodId, MethodOrigin};
use crate::vertex::{VertexId, VertexKind};
use rbz_ast::{NodeArena, NodeId, NodeKind, ParamKind};
use tracing::debug;

use super::state::BinderState;

impl BinderState {
    /// Bind a statement sequence, returning the vertex of the last
    /// value-producing statement (the sequence's value).
    pub(crate) fn bind_statements(
        &mut self,
        arena: &NodeArena,
        statements: &[NodeId],
    ) -> Option<VertexId> {
        let mut last = None;
        for &stmt in statements {
            last = self.bind_node(arena, stmt);
        }
        last
    }

    pub(crate) fn bind_module(&mut self, arena: &NodeArena, name: &str, body: &[NodeId]) {
        self.push_constant(name, ConstKind::Module);
        self.bind_statements(arena, body);
        self.pop_constant();
    }

    pub(crate) fn bind_class(
        &mut self,
        arena: &NodeArena,
        name: &str,
        superclass: Option<NodeId>,
        body: &[NodeId],
    ) {
        // The superclass expression is evaluated in the enclosing scope.
        let super_name = superclass.and_then(|sup| {
            let vertex = self.bind_node(arena, sup)?;
            match &self.type_vertices.get(vertex)?.kind {
                VertexKind::ConstRead { path, .. } => Some(path.clone()),
                _ => None,
            }
        });

        let id = self.push_constant(name, ConstKind::Class);
        if super_name.is_some()
            && let Some(constant) = self.consts.get_mut(id)
        {
            constant.superclass = super_name;
        }
        self.bind_statements(arena, body);
        self.pop_constant();
    }

    pub(crate) fn bind_singleton_class(&mut self, arena: &NodeArena, body: &[NodeId]) {
        let saved = self.in_singleton;
        self.in_singleton = true;
        self.bind_statements(arena, body);
        self.in_singleton = saved;
    }

    pub(crate) fn bind_method_def(
        &mut self,
        arena: &NodeArena,
        idx: NodeId,
        name: &str,
        on_self: bool,
        params: &[NodeId],
        body: &[NodeId],
    ) {
        let singleton = on_self || self.in_singleton;
        let receiver = self.current_receiver_name();
        let visibility = self.current_visibility();
        let path = self.file.clone();
        let method = self.methods.add(
            receiver,
            name,
            Some(idx),
            &path,
            singleton,
            visibility,
            MethodOrigin::Def,
        );
        debug!(method = %name, singleton, "binding method definition");

        self.push_locals();
        let enclosing = self.current_method.replace(method);

        for (index, &param) in params.iter().enumerate() {
            self.bind_parameter(arena, param, index as u32, method);
        }

        let tail = self.bind_statements(arena, body);
        if let Some(tail) = tail {
            self.push_return_tail(method, tail);
        }

        self.current_method = enclosing;
        self.pop_locals();
    }

    pub(crate) fn bind_parameter(
        &mut self,
        arena: &NodeArena,
        idx: NodeId,
        index: u32,
        method: MethodId,
    ) {
        let Some(node) = arena.get(idx) else {
            tracing::warn!(node = idx.0, "missing parameter node");
            return;
        };
        let NodeKind::ParameterNode {
            name,
            kind,
            default,
        } = &node.kind
        else {
            tracing::warn!(kind = node.kind.tag(), "unexpected node in parameter list");
            return;
        };
        let name = name.clone();
        let kind = *kind;
        let default = *default;
        debug!(param = %name, kind = Self::param_kind_label(kind), "binding parameter");

        let scope = self.current_scope_name();
        let vertex = self.type_vertices.add(
            name.clone(),
            VertexKind::Arg {
                name: name.clone(),
                index,
                kind,
            },
            scope,
        );
        if let Some(v) = self.type_vertices.get_mut(vertex) {
            v.method_objs.push(method);
        }
        if let Some(m) = self.methods.get_mut(method) {
            m.arg_tvs.insert(name.clone(), vertex);
        }
        self.nodes.insert(idx, vertex);

        // Optional parameters acquire their default's type through this edge.
        if kind.has_default()
            && let Some(default) = default
            && let Some(default_vertex) = self.bind_node(arena, default)
        {
            self.type_vertices.add_dependency(vertex, default_vertex);
        }

        self.bind_local(&name, vertex);
    }

    /// Push a method body's trailing value onto `return_tvs`.
    ///
    /// A trailing `If` contributes its branch tail vertices individually; a
    /// trailing explicit `return` already recorded its expression when it
    /// was bound.
    pub(crate) fn push_return_tail(&mut self, method: MethodId, vertex: VertexId) {
        let kind_tails: Option<Vec<VertexId>> = self.type_vertices.get(vertex).and_then(|v| {
            match v.kind {
                VertexKind::If => Some(v.dependencies.clone()),
                VertexKind::Return => Some(Vec::new()),
                _ => None,
            }
        });
        match kind_tails {
            Some(tails) => {
                for tail in tails {
                    self.push_return_tail(method, tail);
                }
            }
            None => {
                if let Some(m) = self.methods.get_mut(method) {
                    m.return_tvs.push(vertex);
                }
            }
        }
    }

    /// Record an explicit `return`'s expression vertex.
    pub(crate) fn push_explicit_return(&mut self, vertex: VertexId) {
        if let Some(method) = self.current_method
            && let Some(m) = self.methods.get_mut(method)
        {
            m.return_tvs.push(vertex);
        }
    }

    pub(crate) fn param_kind_label(kind: ParamKind) -> &'static str {
        match kind {
            ParamKind::Required => "required",
            ParamKind::Optional => "optional",
            ParamKind::KeywordRequired => "keyword",
            ParamKind::KeywordOptional => "keyword optional",
            ParamKind::Rest => "rest",
            ParamKind::Block => "block",
        }
    }
}
