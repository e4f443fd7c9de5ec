//! AST nodes stored in a flat arena.
//!
//! Nodes are allocated once by the parser and never mutated afterwards; the
//! analyzer refers to them through `NodeId` handles. A `NodeId` is only
//! meaningful together with the arena that allocated it.

use rbz_common::{Span, Spanned};
use serde::Serialize;

/// Index of a node within its `NodeArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[inline]
    #[must_use]
    pub const fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }
}

/// Method parameter kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ParamKind {
    Required,
    Optional,
    KeywordRequired,
    KeywordOptional,
    Rest,
    Block,
}

impl ParamKind {
    /// Whether a parameter of this kind carries a default-value expression.
    #[must_use]
    pub const fn has_default(self) -> bool {
        matches!(self, ParamKind::Optional | ParamKind::KeywordOptional)
    }
}

/// One variant per syntactic form the analyzer understands.
///
/// Child nodes are referenced by `NodeId`; name-like fields carry the source
/// lexeme (instance variable names include the leading `@`).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum NodeKind {
    /// Top-level statement sequence of one source file.
    ProgramNode { body: Vec<NodeId> },
    /// `module M ... end`
    ModuleNode { name: String, body: Vec<NodeId> },
    /// `class C < Super ... end`
    ClassNode {
        name: String,
        superclass: Option<NodeId>,
        body: Vec<NodeId>,
    },
    /// `class << self ... end`
    SingletonClassNode { body: Vec<NodeId> },
    /// `def name(params) ... end` / `def self.name ... end`
    DefNode {
        name: String,
        on_self: bool,
        params: Vec<NodeId>,
        body: Vec<NodeId>,
    },
    /// A single formal parameter of a `DefNode`.
    ParameterNode {
        name: String,
        kind: ParamKind,
        default: Option<NodeId>,
    },
    /// `a = expr`
    LocalVariableWriteNode { name: String, value: NodeId },
    /// `a`
    LocalVariableReadNode { name: String },
    /// A write target inside a multiple assignment (`a, b = ...`).
    LocalVariableTargetNode { name: String },
    /// `@a = expr`
    InstanceVariableWriteNode { name: String, value: NodeId },
    /// `@a`
    InstanceVariableReadNode { name: String },
    /// `X`, `::X`, `X::Y` — path segments in source order.
    ConstantReadNode { path: Vec<String>, absolute: bool },
    /// A method call, including operator sends (`a + 1`).
    CallNode {
        receiver: Option<NodeId>,
        name: String,
        args: Vec<NodeId>,
    },
    /// `if cond ... else ... end`; `elsif` chains nest in `else_body`.
    IfNode {
        condition: NodeId,
        then_body: Vec<NodeId>,
        else_body: Vec<NodeId>,
    },
    /// `return` / `return expr`
    ReturnNode { value: Option<NodeId> },
    /// `a, b = expr` — `value` is usually an `ArrayNode`.
    MultiWriteNode { targets: Vec<NodeId>, value: NodeId },
    IntegerNode { value: i64 },
    StringNode { value: String },
    SymbolNode { name: String },
    /// `"a#{expr}b"` — parts are `StringNode` fragments and embedded expressions.
    InterpolatedStringNode { parts: Vec<NodeId> },
    ArrayNode { elements: Vec<NodeId> },
    /// `{ foo: 1, "bar" => 2 }` — entries are (key, value) pairs; keys are
    /// `SymbolNode` or `StringNode` at this layer.
    HashNode { entries: Vec<(NodeId, NodeId)> },
    TrueNode,
    FalseNode,
    NilNode,
}

impl NodeKind {
    /// The AST-kind tag, used as the human label for synthetic graph nodes.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            NodeKind::ProgramNode { .. } => "ProgramNode",
            NodeKind::ModuleNode { .. } => "ModuleNode",
            NodeKind::ClassNode { .. } => "ClassNode",
            NodeKind::SingletonClassNode { .. } => "SingletonClassNode",
            NodeKind::DefNode { .. } => "DefNode",
            NodeKind::ParameterNode { .. } => "ParameterNode",
            NodeKind::LocalVariableWriteNode { .. } => "LocalVariableWriteNode",
            NodeKind::LocalVariableReadNode { .. } => "LocalVariableReadNode",
            NodeKind::LocalVariableTargetNode { .. } => "LocalVariableTargetNode",
            NodeKind::InstanceVariableWriteNode { .. } => "InstanceVariableWriteNode",
            NodeKind::InstanceVariableReadNode { .. } => "InstanceVariableReadNode",
            NodeKind::ConstantReadNode { .. } => "ConstantReadNode",
            NodeKind::CallNode { .. } => "CallNode",
            NodeKind::IfNode { .. } => "IfNode",
            NodeKind::ReturnNode { .. } => "ReturnNode",
            NodeKind::MultiWriteNode { .. } => "MultiWriteNode",
            NodeKind::IntegerNode { .. } => "IntegerNode",
            NodeKind::StringNode { .. } => "StringNode",
            NodeKind::SymbolNode { .. } => "SymbolNode",
            NodeKind::InterpolatedStringNode { .. } => "InterpolatedStringNode",
            NodeKind::ArrayNode { .. } => "ArrayNode",
            NodeKind::HashNode { .. } => "HashNode",
            NodeKind::TrueNode => "TrueNode",
            NodeKind::FalseNode => "FalseNode",
            NodeKind::NilNode => "NilNode",
        }
    }
}

/// An AST node: kind plus source span.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Node {
    pub span: Span,
    pub kind: NodeKind,
}

impl Spanned for Node {
    fn span(&self) -> Span {
        self.span
    }
}

/// Flat arena storage for AST nodes.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Allocate a node, returning its handle.
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).expect("arena overflow"));
        self.nodes.push(Node { span, kind });
        id
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/node_tests.rs"]
mod tests;
