//! Shared AST-building helpers for the binder integration tests.
//!
//! Tests build arenas directly, standing in for the external parser.

#![allow(dead_code)]

use rbz_ast::{NodeArena, NodeId, NodeKind, ParamKind};
use rbz_binder::{BinderOptions, BinderState};
use rbz_common::Span;

pub struct AstBuilder {
    pub arena: NodeArena,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self {
            arena: NodeArena::new(),
        }
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.arena.alloc(kind, Span::dummy())
    }

    pub fn int(&mut self, value: i64) -> NodeId {
        self.push(NodeKind::IntegerNode { value })
    }

    pub fn string(&mut self, value: &str) -> NodeId {
        self.push(NodeKind::StringNode {
            value: value.to_string(),
        })
    }

    pub fn symbol(&mut self, name: &str) -> NodeId {
        self.push(NodeKind::SymbolNode {
            name: name.to_string(),
        })
    }

    pub fn true_(&mut self) -> NodeId {
        self.push(NodeKind::TrueNode)
    }

    pub fn false_(&mut self) -> NodeId {
        self.push(NodeKind::FalseNode)
    }

    pub fn nil(&mut self) -> NodeId {
        self.push(NodeKind::NilNode)
    }

    pub fn lvar_write(&mut self, name: &str, value: NodeId) -> NodeId {
        self.push(NodeKind::LocalVariableWriteNode {
            name: name.to_string(),
            value,
        })
    }

    pub fn lvar_read(&mut self, name: &str) -> NodeId {
        self.push(NodeKind::LocalVariableReadNode {
            name: name.to_string(),
        })
    }

    pub fn lvar_target(&mut self, name: &str) -> NodeId {
        self.push(NodeKind::LocalVariableTargetNode {
            name: name.to_string(),
        })
    }

    pub fn ivar_write(&mut self, name: &str, value: NodeId) -> NodeId {
        self.push(NodeKind::InstanceVariableWriteNode {
            name: name.to_string(),
            value,
        })
    }

    pub fn ivar_read(&mut self, name: &str) -> NodeId {
        self.push(NodeKind::InstanceVariableReadNode {
            name: name.to_string(),
        })
    }

    pub fn const_read(&mut self, path: &[&str]) -> NodeId {
        self.push(NodeKind::ConstantReadNode {
            path: path.iter().map(|s| s.to_string()).collect(),
            absolute: false,
        })
    }

    pub fn call(&mut self, receiver: Option<NodeId>, name: &str, args: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::CallNode {
            receiver,
            name: name.to_string(),
            args,
        })
    }

    pub fn if_(&mut self, condition: NodeId, then_body: Vec<NodeId>, else_body: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::IfNode {
            condition,
            then_body,
            else_body,
        })
    }

    pub fn ret(&mut self, value: Option<NodeId>) -> NodeId {
        self.push(NodeKind::ReturnNode { value })
    }

    pub fn multi_write(&mut self, targets: Vec<NodeId>, value: NodeId) -> NodeId {
        self.push(NodeKind::MultiWriteNode { targets, value })
    }

    pub fn array(&mut self, elements: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::ArrayNode { elements })
    }

    pub fn hash(&mut self, entries: Vec<(NodeId, NodeId)>) -> NodeId {
        self.push(NodeKind::HashNode { entries })
    }

    pub fn interp(&mut self, parts: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::InterpolatedStringNode { parts })
    }

    pub fn param(&mut self, name: &str, kind: ParamKind, default: Option<NodeId>) -> NodeId {
        self.push(NodeKind::ParameterNode {
            name: name.to_string(),
            kind,
            default,
        })
    }

    pub fn def(&mut self, name: &str, params: Vec<NodeId>, body: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::DefNode {
            name: name.to_string(),
            on_self: false,
            params,
            body,
        })
    }

    pub fn def_self(&mut self, name: &str, params: Vec<NodeId>, body: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::DefNode {
            name: name.to_string(),
            on_self: true,
            params,
            body,
        })
    }

    pub fn module_(&mut self, name: &str, body: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::ModuleNode {
            name: name.to_string(),
            body,
        })
    }

    pub fn class_(&mut self, name: &str, body: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::ClassNode {
            name: name.to_string(),
            superclass: None,
            body,
        })
    }

    pub fn class_with_superclass(
        &mut self,
        name: &str,
        superclass: NodeId,
        body: Vec<NodeId>,
    ) -> NodeId {
        self.push(NodeKind::ClassNode {
            name: name.to_string(),
            superclass: Some(superclass),
            body,
        })
    }

    pub fn singleton_class(&mut self, body: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::SingletonClassNode { body })
    }

    pub fn program(&mut self, body: Vec<NodeId>) -> NodeId {
        self.push(NodeKind::ProgramNode { body })
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn bind(builder: &AstBuilder, root: NodeId) -> BinderState {
    bind_with(builder, root, BinderOptions::default())
}

pub fn bind_with(builder: &AstBuilder, root: NodeId, options: BinderOptions) -> BinderState {
    init_tracing();
    let mut state = BinderState::with_options(options);
    state.bind_program(&builder.arena, root, "test.rb");
    state
}

/// Vertex names in creation order.
pub fn vertex_names(state: &BinderState) -> Vec<String> {
    state
        .type_vertices
        .all()
        .iter()
        .map(|v| v.name.clone())
        .collect()
}

/// The names of a vertex's dependencies, in edge order.
pub fn dependency_names(state: &BinderState, index: usize) -> Vec<String> {
    let vertex = &state.type_vertices.all()[index];
    vertex
        .dependencies
        .iter()
        .map(|&d| state.type_vertices.get(d).unwrap().name.clone())
        .collect()
}

/// Check the graph-wide edge symmetry invariant.
pub fn assert_edge_symmetry(state: &BinderState) {
    for vertex in state.type_vertices.all() {
        for &dep in &vertex.dependencies {
            let child = state.type_vertices.get(dep).expect("dependency exists");
            assert!(
                child.dependents.contains(&vertex.id),
                "{} -> {} has no reverse edge",
                vertex.name,
                child.name
            );
        }
        for &dependent in &vertex.dependents {
            let parent = state.type_vertices.get(dependent).expect("dependent exists");
            assert!(
                parent.dependencies.contains(&vertex.id),
                "{} <- {} has no forward edge",
                vertex.name,
                parent.name
            );
        }
    }
}
