//! Node-local type inference over the vertex graph.
//!
//! Each vertex's type is computed from its kind and the inferred types of
//! its immediate dependencies. This is deliberately shallow: operator
//! arithmetic, block yields, and cross-file flow belong to the downstream
//! solver, and everything unresolved is `any` rather than an error.

use crate::registry::{ConstRegistry, Method, MethodRegistry, Visibility};
use crate::vertex::{TypeVertexRegistry, VertexId, VertexKind};
use rbz_solver::Type;
use rustc_hash::FxHashSet;

/// Method calls whose result the downstream solver computes from operand
/// types and built-in signatures; this layer leaves them at `any`.
const SOLVER_DEFERRED: &[&str] = &[
    "+", "-", "*", "/", "%", "**", "<", ">", "<=", ">=", "==", "!=", "<=>", "<<", "[]", "loop",
];

/// Computes vertex types against one walk's registries.
///
/// Holds an in-flight set so that dependency cycles (recursive methods,
/// mutually dependent writes) resolve to `any` instead of diverging.
pub struct InferenceEngine<'a> {
    vertices: &'a TypeVertexRegistry,
    consts: &'a ConstRegistry,
    methods: &'a MethodRegistry,
    in_flight: FxHashSet<VertexId>,
}

impl<'a> InferenceEngine<'a> {
    #[must_use]
    pub fn new(
        vertices: &'a TypeVertexRegistry,
        consts: &'a ConstRegistry,
        methods: &'a MethodRegistry,
    ) -> Self {
        Self {
            vertices,
            consts,
            methods,
            in_flight: FxHashSet::default(),
        }
    }

    /// Infer the type of one vertex.
    pub fn infer(&mut self, id: VertexId) -> Type {
        if !self.in_flight.insert(id) {
            return Type::Any;
        }
        let ty = self.infer_uncycled(id);
        self.in_flight.remove(&id);
        ty
    }

    fn infer_uncycled(&mut self, id: VertexId) -> Type {
        let Some(vertex) = self.vertices.get(id) else {
            return Type::Any;
        };
        match &vertex.kind {
            VertexKind::IntegerLit(n) => Type::IntegerLiteral(*n),
            VertexKind::StringLit(s) => Type::StringLiteral(s.clone()),
            VertexKind::SymbolLit(s) => Type::SymbolLiteral(s.clone()),
            VertexKind::True => Type::Bool(true),
            VertexKind::False => Type::Bool(false),
            VertexKind::Nil => Type::Nil,
            // Writes widen; a sole non-integer literal keeps its form.
            VertexKind::Lvar { .. } | VertexKind::Ivar { .. } | VertexKind::Arg { .. } => {
                if vertex.dependencies.is_empty() {
                    Type::Any
                } else {
                    self.union_of(&vertex.dependencies).widen()
                }
            }
            VertexKind::LvarRead { .. } => match vertex.dependencies.first() {
                Some(&write) => self.infer(write),
                None => Type::Any,
            },
            VertexKind::IvarRead { .. } => {
                if vertex.dependencies.is_empty() {
                    Type::Any
                } else {
                    self.union_of(&vertex.dependencies)
                }
            }
            VertexKind::Call { name, has_receiver } => {
                self.infer_call(&vertex.dependencies, name, *has_receiver)
            }
            // Branch values union without widening: `1 | 2 | nil` stays literal.
            VertexKind::If => self.union_of(&vertex.dependencies),
            VertexKind::Array => {
                let element = self.union_of(&vertex.dependencies).widen();
                Type::ArrayOf(Box::new(element))
            }
            VertexKind::Hash { keys } => {
                let values = vertex.dependencies.iter().skip(1).step_by(2);
                let entries = keys
                    .iter()
                    .cloned()
                    .zip(values.map(|&value| self.infer(value).widen()))
                    .collect();
                Type::HashShape(entries)
            }
            VertexKind::ConstRead { path, resolved } => {
                if *resolved || self.consts.find(path).is_some() {
                    Type::Singleton(path.clone())
                } else {
                    Type::Instance(path.clone())
                }
            }
            VertexKind::StringInterp => Type::String,
            VertexKind::Return => match vertex.dependencies.first() {
                Some(&expr) => self.infer(expr),
                None => Type::Nil,
            },
        }
    }

    fn infer_call(&mut self, dependencies: &[VertexId], name: &str, has_receiver: bool) -> Type {
        if SOLVER_DEFERRED.contains(&name) || !has_receiver {
            return Type::Any;
        }
        let Some(&receiver) = dependencies.first() else {
            return Type::Any;
        };
        let (const_name, singleton) = match self.infer(receiver) {
            Type::Singleton(name) => (name, true),
            Type::Instance(name) => (name, false),
            _ => return Type::Any,
        };
        match self
            .methods
            .find(&const_name, name, Visibility::Public, singleton)
        {
            Some(method) => self.method_return_type(method),
            None => Type::Any,
        }
    }

    /// A method's return type: the declared type when present, else the
    /// widened union of its return vertices, else `nil` (a body that never
    /// produces a value returns nil).
    pub fn method_return_type(&mut self, method: &Method) -> Type {
        if let Some(declared) = &method.declared_return_type {
            return declared.clone();
        }
        if method.return_tvs.is_empty() {
            return Type::Nil;
        }
        self.union_of(&method.return_tvs).widen()
    }

    /// An argument's type: the declared type when present, else the widened
    /// union of the argument vertex's dependencies (an optional parameter's
    /// default), else `any`.
    pub fn method_arg_type(&mut self, method: &Method, name: &str) -> Type {
        if let Some(declared) = method.declared_arg_types.get(name) {
            return declared.clone();
        }
        let Some(&arg) = method.arg_tvs.get(name) else {
            return Type::Any;
        };
        let dependencies = match self.vertices.get(arg) {
            Some(vertex) if !vertex.dependencies.is_empty() => vertex.dependencies.clone(),
            _ => return Type::Any,
        };
        self.union_of(&dependencies).widen()
    }

    fn union_of(&mut self, dependencies: &[VertexId]) -> Type {
        Type::union(
            dependencies
                .iter()
                .map(|&dependency| self.infer(dependency))
                .collect(),
        )
    }
}

impl Method {
    /// See [`InferenceEngine::method_return_type`].
    #[must_use]
    pub fn infer_return_type(&self, engine: &mut InferenceEngine<'_>) -> Type {
        engine.method_return_type(self)
    }

    /// See [`InferenceEngine::method_arg_type`].
    #[must_use]
    pub fn infer_arg_type(&self, name: &str, engine: &mut InferenceEngine<'_>) -> Type {
        engine.method_arg_type(self, name)
    }
}
