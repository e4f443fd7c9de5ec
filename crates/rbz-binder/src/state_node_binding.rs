//! Expression binding: the per-node-kind dispatch that lowers syntactic
//! forms into type vertices and dependency edges.
//!
//! Composite expressions that *wrap* their operands (writes, calls, `if`,
//! string interpolation, the synthetic multiple-assignment array) allocate
//! their vertex before walking the operand subtrees; literal containers
//! (arrays, hashes) emit their children first. Both orders are observable
//! through `TypeVertexRegistry::all()` and locked in by tests.

use crate::hooks::CallContext;
use crate::vertex::{VertexId, VertexKind};
use rbz_ast::{NodeArena, NodeId, NodeKind};
use rbz_solver::HashKey;

use super::state::BinderState;

impl BinderState {
    /// Bind one AST node, returning its value vertex. Definitions and
    /// claimed hook calls produce no vertex.
    pub(crate) fn bind_node(&mut self, arena: &NodeArena, idx: NodeId) -> Option<VertexId> {
        let Some(node) = arena.get(idx) else {
            tracing::warn!(node = idx.0, "missing AST node");
            return None;
        };
        let result = match &node.kind {
            NodeKind::ProgramNode { body } => {
                let body = body.clone();
                self.bind_statements(arena, &body)
            }
            NodeKind::ModuleNode { name, body } => {
                let (name, body) = (name.clone(), body.clone());
                self.bind_module(arena, &name, &body);
                None
            }
            NodeKind::ClassNode {
                name,
                superclass,
                body,
            } => {
                let (name, superclass, body) = (name.clone(), *superclass, body.clone());
                self.bind_class(arena, &name, superclass, &body);
                None
            }
            NodeKind::SingletonClassNode { body } => {
                let body = body.clone();
                self.bind_singleton_class(arena, &body);
                None
            }
            NodeKind::DefNode {
                name,
                on_self,
                params,
                body,
            } => {
                let (name, on_self) = (name.clone(), *on_self);
                let (params, body) = (params.clone(), body.clone());
                self.bind_method_def(arena, idx, &name, on_self, &params, &body);
                None
            }
            NodeKind::ParameterNode { .. } => {
                // Parameters are bound by their enclosing method definition.
                tracing::warn!(node = idx.0, "parameter node outside a definition");
                None
            }
            NodeKind::LocalVariableWriteNode { name, value } => {
                let (name, value) = (name.clone(), *value);
                Some(self.bind_local_write(arena, &name, value))
            }
            NodeKind::LocalVariableReadNode { name } => {
                let name = name.clone();
                Some(self.bind_local_read(&name))
            }
            NodeKind::LocalVariableTargetNode { .. } => {
                // Targets are bound by their enclosing multiple assignment.
                tracing::warn!(node = idx.0, "assignment target outside a multiple assignment");
                None
            }
            NodeKind::InstanceVariableWriteNode { name, value } => {
                let (name, value) = (name.clone(), *value);
                Some(self.bind_ivar_write(arena, &name, value))
            }
            NodeKind::InstanceVariableReadNode { name } => {
                let name = name.clone();
                Some(self.bind_ivar_read(&name))
            }
            NodeKind::ConstantReadNode { path, absolute } => {
                let (path, absolute) = (path.clone(), *absolute);
                Some(self.bind_const_read(&path, absolute))
            }
            NodeKind::CallNode {
                receiver,
                name,
                args,
            } => {
                let (receiver, name, args) = (*receiver, name.clone(), args.clone());
                self.bind_call(arena, idx, receiver, &name, &args)
            }
            NodeKind::IfNode {
                condition,
                then_body,
                else_body,
            } => {
                let condition = *condition;
                let (then_body, else_body) = (then_body.clone(), else_body.clone());
                Some(self.bind_if(arena, node.kind.tag(), condition, &then_body, &else_body))
            }
            NodeKind::ReturnNode { value } => {
                let value = *value;
                Some(self.bind_return(arena, node.kind.tag(), value))
            }
            NodeKind::MultiWriteNode { targets, value } => {
                let (targets, value) = (targets.clone(), *value);
                self.bind_multi_write(arena, &targets, value)
            }
            NodeKind::IntegerNode { value } => {
                let value = *value;
                Some(self.add_vertex(value.to_string(), VertexKind::IntegerLit(value)))
            }
            NodeKind::StringNode { value } => {
                let value = value.clone();
                Some(self.add_vertex(format!("\"{value}\""), VertexKind::StringLit(value)))
            }
            NodeKind::SymbolNode { name } => {
                let name = name.clone();
                Some(self.add_vertex(format!(":{name}"), VertexKind::SymbolLit(name)))
            }
            NodeKind::InterpolatedStringNode { parts } => {
                let parts = parts.clone();
                Some(self.bind_string_interp(arena, node.kind.tag(), &parts))
            }
            NodeKind::ArrayNode { elements } => {
                let elements = elements.clone();
                Some(self.bind_array(arena, node.kind.tag(), &elements))
            }
            NodeKind::HashNode { entries } => {
                let entries = entries.clone();
                Some(self.bind_hash(arena, node.span, node.kind.tag(), &entries))
            }
            NodeKind::TrueNode => Some(self.add_vertex("true", VertexKind::True)),
            NodeKind::FalseNode => Some(self.add_vertex("false", VertexKind::False)),
            NodeKind::NilNode => Some(self.add_vertex("nil", VertexKind::Nil)),
        };
        if let Some(vertex) = result {
            self.nodes.insert(idx, vertex);
        }
        result
    }

    /// Allocate a vertex in the current self-type scope.
    pub(crate) fn add_vertex(&mut self, name: impl Into<String>, kind: VertexKind) -> VertexId {
        let scope = self.current_scope_name();
        self.type_vertices.add(name, kind, scope)
    }

    fn bind_local_write(&mut self, arena: &NodeArena, name: &str, value: NodeId) -> VertexId {
        let vertex = self.add_vertex(
            name,
            VertexKind::Lvar {
                name: name.to_string(),
            },
        );
        if let Some(rhs) = self.bind_node(arena, value) {
            self.type_vertices.add_dependency(vertex, rhs);
        }
        // Rebind only after the RHS was walked: reads inside the RHS still
        // see the previous write.
        self.bind_local(name, vertex);
        vertex
    }

    fn bind_local_read(&mut self, name: &str) -> VertexId {
        let vertex = self.add_vertex(
            name,
            VertexKind::LvarRead {
                name: name.to_string(),
            },
        );
        if let Some(write) = self.lookup_local(name) {
            self.type_vertices.add_dependency(vertex, write);
        }
        vertex
    }

    fn bind_ivar_write(&mut self, arena: &NodeArena, name: &str, value: NodeId) -> VertexId {
        let vertex = self.add_vertex(
            name,
            VertexKind::Ivar {
                name: name.to_string(),
            },
        );
        if let Some(rhs) = self.bind_node(arena, value) {
            self.type_vertices.add_dependency(vertex, rhs);
        }
        self.record_ivar_write(name, vertex);
        vertex
    }

    fn bind_ivar_read(&mut self, name: &str) -> VertexId {
        let writes = self.ivar_writes_for(name);
        let vertex = self.add_vertex(
            name,
            VertexKind::IvarRead {
                name: name.to_string(),
            },
        );
        for write in writes {
            self.type_vertices.add_dependency(vertex, write);
        }
        vertex
    }

    fn bind_const_read(&mut self, path: &[String], absolute: bool) -> VertexId {
        let (resolved_name, resolved) = self.resolve_const_path(path, absolute);
        self.add_vertex(
            resolved_name.clone(),
            VertexKind::ConstRead {
                path: resolved_name,
                resolved,
            },
        )
    }

    /// Resolve a constant path against the current scope path, innermost
    /// enclosing constant first; anchored paths resolve absolutely.
    fn resolve_const_path(&self, path: &[String], absolute: bool) -> (String, bool) {
        let written = path.join("::");
        if absolute {
            return (written.clone(), self.consts.find(&written).is_some());
        }
        for depth in (0..=self.const_path.len()).rev() {
            let mut candidate = self.const_path[..depth].join("::");
            if !candidate.is_empty() {
                candidate.push_str("::");
            }
            candidate.push_str(&written);
            if self.consts.find(&candidate).is_some() {
                return (candidate, true);
            }
        }
        (written, false)
    }

    fn bind_call(
        &mut self,
        arena: &NodeArena,
        idx: NodeId,
        receiver: Option<NodeId>,
        name: &str,
        args: &[NodeId],
    ) -> Option<VertexId> {
        // Macro-like calls are claimed by hooks; they fire only for
        // receiver-less calls outside method bodies.
        if receiver.is_none() && self.current_method.is_none() {
            let span = arena.get(idx).map_or(rbz_common::Span::dummy(), |n| n.span);
            let call = CallContext {
                node: idx,
                name,
                args,
                span,
            };
            let hooks = std::mem::take(&mut self.hooks);
            let claimed = hooks.dispatch(self, arena, &call);
            self.hooks = hooks;
            if claimed {
                return None;
            }
        }

        let vertex = self.add_vertex(
            name,
            VertexKind::Call {
                name: name.to_string(),
                has_receiver: receiver.is_some(),
            },
        );
        if let Some(receiver) = receiver
            && let Some(receiver_vertex) = self.bind_node(arena, receiver)
        {
            self.type_vertices.add_dependency(vertex, receiver_vertex);
        }
        for &arg in args {
            if let Some(arg_vertex) = self.bind_node(arena, arg) {
                self.type_vertices.add_dependency(vertex, arg_vertex);
            }
        }
        Some(vertex)
    }

    fn bind_if(
        &mut self,
        arena: &NodeArena,
        tag: &str,
        condition: NodeId,
        then_body: &[NodeId],
        else_body: &[NodeId],
    ) -> VertexId {
        let vertex = self.add_vertex(tag, VertexKind::If);

        // The condition participates in the graph but is not a dependency
        // of the `If` vertex; only the branch values are.
        self.bind_node(arena, condition);

        let then_tail = self
            .bind_statements(arena, then_body)
            .unwrap_or_else(|| self.add_vertex("nil", VertexKind::Nil));
        let else_tail = self
            .bind_statements(arena, else_body)
            .unwrap_or_else(|| self.add_vertex("nil", VertexKind::Nil));
        self.type_vertices.add_dependency(vertex, then_tail);
        self.type_vertices.add_dependency(vertex, else_tail);
        vertex
    }

    fn bind_return(&mut self, arena: &NodeArena, tag: &str, value: Option<NodeId>) -> VertexId {
        let expr = value
            .and_then(|value| self.bind_node(arena, value))
            .unwrap_or_else(|| self.add_vertex("nil", VertexKind::Nil));
        let vertex = self.add_vertex(tag, VertexKind::Return);
        self.type_vertices.add_dependency(vertex, expr);
        // The method's return set records the returned expression itself.
        self.push_explicit_return(expr);
        vertex
    }

    fn bind_array(&mut self, arena: &NodeArena, tag: &str, elements: &[NodeId]) -> VertexId {
        let element_vertices: Vec<VertexId> = elements
            .iter()
            .filter_map(|&element| self.bind_node(arena, element))
            .collect();
        let vertex = self.add_vertex(tag, VertexKind::Array);
        for element in element_vertices {
            self.type_vertices.add_dependency(vertex, element);
        }
        vertex
    }

    fn bind_hash(
        &mut self,
        arena: &NodeArena,
        span: rbz_common::Span,
        tag: &str,
        entries: &[(NodeId, NodeId)],
    ) -> VertexId {
        let mut keys = Vec::new();
        let mut pairs = Vec::new();
        for &(key, value) in entries {
            let key_kind = match arena.get(key).map(|n| &n.kind) {
                Some(NodeKind::SymbolNode { name }) => HashKey::Symbol(name.clone()),
                Some(NodeKind::StringNode { value }) => HashKey::String(value.clone()),
                other => {
                    let tag = other.map_or("missing node", |kind| kind.tag());
                    self.warn(span, format!("unsupported hash key: {tag}"));
                    continue;
                }
            };
            let Some(key_vertex) = self.bind_node(arena, key) else {
                continue;
            };
            let Some(value_vertex) = self.bind_node(arena, value) else {
                continue;
            };
            keys.push(key_kind);
            pairs.push((key_vertex, value_vertex));
        }
        let vertex = self.add_vertex(tag, VertexKind::Hash { keys });
        for (key_vertex, value_vertex) in pairs {
            self.type_vertices.add_dependency(vertex, key_vertex);
            self.type_vertices.add_dependency(vertex, value_vertex);
        }
        vertex
    }

    fn bind_string_interp(&mut self, arena: &NodeArena, tag: &str, parts: &[NodeId]) -> VertexId {
        let vertex = self.add_vertex(tag, VertexKind::StringInterp);
        for &part in parts {
            if let Some(part_vertex) = self.bind_node(arena, part) {
                self.type_vertices.add_dependency(vertex, part_vertex);
            }
        }
        vertex
    }

    fn bind_multi_write(
        &mut self,
        arena: &NodeArena,
        targets: &[NodeId],
        value: NodeId,
    ) -> Option<VertexId> {
        // Target vertices come first.
        let mut target_bindings: Vec<(String, VertexId)> = Vec::new();
        for &target in targets {
            let Some(node) = arena.get(target) else {
                continue;
            };
            let NodeKind::LocalVariableTargetNode { name } = &node.kind else {
                tracing::warn!(kind = node.kind.tag(), "unsupported assignment target");
                continue;
            };
            let name = name.clone();
            let vertex = self.add_vertex(name.clone(), VertexKind::Lvar { name: name.clone() });
            self.nodes.insert(target, vertex);
            target_bindings.push((name, vertex));
        }

        let result = match arena.get(value).map(|n| (&n.kind, n.span)) {
            Some((NodeKind::ArrayNode { elements }, _)) => {
                // The grouping array vertex precedes its elements here,
                // unlike a standalone array literal.
                let elements = elements.clone();
                let array = self.add_vertex("ArrayNode", VertexKind::Array);
                let element_vertices: Vec<Option<VertexId>> = elements
                    .iter()
                    .map(|&element| self.bind_node(arena, element))
                    .collect();
                for element in element_vertices.iter().flatten() {
                    self.type_vertices.add_dependency(array, *element);
                }
                // Positional wiring; leftover targets stay dependency-free.
                for ((_, target), element) in target_bindings.iter().zip(element_vertices.iter()) {
                    if let Some(element) = element {
                        self.type_vertices.add_dependency(*target, *element);
                    }
                }
                Some(array)
            }
            Some((_, span)) => {
                // Destructuring a single expression needs a sized-array
                // type, which this layer does not model.
                self.bind_node(arena, value);
                self.warn(span, "cannot destructure a non-array value");
                None
            }
            None => None,
        };

        for (name, vertex) in target_bindings {
            self.bind_local(&name, vertex);
        }
        result
    }
}
