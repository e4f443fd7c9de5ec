//! Binder state: registries, scope stack, and the walk entry point.

use crate::hooks::HookSet;
use crate::infer::InferenceEngine;
use crate::registry::{
    ConstId, ConstKind, ConstRegistry, MethodId, MethodRegistry, NodeRegistry, Visibility,
};
use crate::vertex::{TypeVertexRegistry, VertexId};
use rbz_ast::{NodeArena, NodeId};
use rbz_common::Diagnostic;
use rbz_solver::Type;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Configuration options for the binder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BinderOptions {
    /// When false, macro-like calls (`attr_reader` and friends) are lowered
    /// as ordinary call vertices instead of synthesizing methods.
    /// Visibility directives keep working either way.
    pub enable_call_hooks: bool,
}

impl Default for BinderOptions {
    fn default() -> Self {
        Self {
            enable_call_hooks: true,
        }
    }
}

/// The AST-walking visitor and everything it populates.
///
/// One `BinderState` owns the registries for one walk. The host clears them
/// (`clear`) before re-analyzing; no two walks may interleave on the same
/// state.
pub struct BinderState {
    pub options: BinderOptions,
    /// All type vertices, in creation order.
    pub type_vertices: TypeVertexRegistry,
    pub consts: ConstRegistry,
    pub methods: MethodRegistry,
    /// AST node identity -> primary vertex.
    pub nodes: NodeRegistry,
    /// Best-effort problems encountered during the walk.
    pub diagnostics: Vec<Diagnostic>,
    pub(crate) hooks: HookSet,

    // ===== Traversal state =====
    pub(crate) file: String,
    /// Constant path segments of the current lexical scope.
    pub(crate) const_path: Vec<String>,
    /// Ids parallel to `const_path`, for parent linking.
    pub(crate) const_ids: Vec<ConstId>,
    pub(crate) current_method: Option<MethodId>,
    /// One entry per open constant body; the top is the current visibility.
    pub(crate) visibility: Vec<Visibility>,
    pub(crate) in_singleton: bool,
    /// Stack of local environments: name -> most recent write vertex.
    /// Method bodies get a fresh frame, not a lexically nested one.
    pub(crate) locals: Vec<FxHashMap<String, VertexId>>,
    /// Instance-variable writes accumulated per (constant scope, name).
    pub(crate) ivar_writes: FxHashMap<(String, String), Vec<VertexId>>,
}

impl BinderState {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(BinderOptions::default())
    }

    #[must_use]
    pub fn with_options(options: BinderOptions) -> Self {
        Self {
            options,
            type_vertices: TypeVertexRegistry::new(),
            consts: ConstRegistry::new(),
            methods: MethodRegistry::new(),
            nodes: NodeRegistry::new(),
            diagnostics: Vec::new(),
            hooks: if options.enable_call_hooks {
                HookSet::standard()
            } else {
                HookSet::directives_only()
            },
            file: String::new(),
            const_path: Vec::new(),
            const_ids: Vec::new(),
            current_method: None,
            visibility: vec![Visibility::Public],
            in_singleton: false,
            locals: vec![FxHashMap::default()],
            ivar_writes: FxHashMap::default(),
        }
    }

    /// Walk one file's AST from its `ProgramNode` root.
    ///
    /// Traversal state is reset; registries accumulate. Call [`clear`] first
    /// when re-analyzing the same state.
    ///
    /// [`clear`]: BinderState::clear
    #[tracing::instrument(level = "debug", skip(self, arena))]
    pub fn bind_program(&mut self, arena: &NodeArena, root: NodeId, path: &str) {
        self.file = path.to_string();
        self.const_path.clear();
        self.const_ids.clear();
        self.current_method = None;
        self.visibility = vec![Visibility::Public];
        self.in_singleton = false;
        self.locals = vec![FxHashMap::default()];

        let Some(node) = arena.get(root) else {
            tracing::warn!(root = root.0, "missing program root node");
            return;
        };
        match &node.kind {
            rbz_ast::NodeKind::ProgramNode { body } => {
                let body = body.clone();
                self.bind_statements(arena, &body);
            }
            _ => {
                // Tolerate a bare expression as the root.
                self.bind_node(arena, root);
            }
        }
        debug!(
            vertices = self.type_vertices.len(),
            consts = self.consts.len(),
            methods = self.methods.len(),
            "walk finished"
        );
    }

    /// Empty every registry and all accumulated walk state.
    pub fn clear(&mut self) {
        self.type_vertices.clear();
        self.consts.clear();
        self.methods.clear();
        self.nodes.clear();
        self.diagnostics.clear();
        self.ivar_writes.clear();
        self.const_path.clear();
        self.const_ids.clear();
        self.current_method = None;
        self.visibility = vec![Visibility::Public];
        self.in_singleton = false;
        self.locals = vec![FxHashMap::default()];
    }

    /// Register an additional call hook at the end of the table.
    pub fn register_hook(&mut self, hook: Box<dyn crate::hooks::CallHook>) {
        self.hooks.register(hook);
    }

    /// An inference engine borrowing this state's registries.
    #[must_use]
    pub fn inference(&self) -> InferenceEngine<'_> {
        InferenceEngine::new(&self.type_vertices, &self.consts, &self.methods)
    }

    /// Infer one vertex's type. Convenience over [`InferenceEngine`].
    #[must_use]
    pub fn infer(&self, vertex: VertexId) -> Type {
        self.inference().infer(vertex)
    }

    // =========================================================================
    // Scope stack
    // =========================================================================

    /// Qualified name of the enclosing self-type; `"Object"` at top level.
    #[must_use]
    pub fn current_scope_name(&self) -> String {
        if self.const_path.is_empty() {
            "Object".to_string()
        } else {
            self.const_path.join("::")
        }
    }

    /// Receiver key for the method registry; `""` at top level.
    #[must_use]
    pub fn current_receiver_name(&self) -> String {
        self.const_path.join("::")
    }

    pub(crate) fn current_visibility(&self) -> Visibility {
        *self.visibility.last().unwrap_or(&Visibility::Public)
    }

    pub(crate) fn set_current_visibility(&mut self, visibility: Visibility) {
        if let Some(top) = self.visibility.last_mut() {
            *top = visibility;
        }
    }

    pub(crate) fn push_constant(&mut self, name: &str, kind: ConstKind) -> ConstId {
        let qualified = if self.const_path.is_empty() {
            name.to_string()
        } else {
            format!("{}::{name}", self.const_path.join("::"))
        };
        let parent = self.const_ids.last().copied();
        let path = self.file.clone();
        let id = self.consts.find_or_add(qualified.clone(), kind, parent, &path);
        debug!(constant = %qualified, ?kind, "entering constant");
        self.const_path.push(name.to_string());
        self.const_ids.push(id);
        self.visibility.push(Visibility::Public);
        id
    }

    pub(crate) fn pop_constant(&mut self) {
        self.const_path.pop();
        self.const_ids.pop();
        self.visibility.pop();
    }

    pub(crate) fn push_locals(&mut self) {
        self.locals.push(FxHashMap::default());
    }

    pub(crate) fn pop_locals(&mut self) {
        self.locals.pop();
    }

    /// Bind `name` to its most recent write vertex in the innermost frame.
    pub(crate) fn bind_local(&mut self, name: &str, vertex: VertexId) {
        if let Some(frame) = self.locals.last_mut() {
            frame.insert(name.to_string(), vertex);
        }
    }

    /// Look up the current binding for `name`. Only the innermost frame is
    /// consulted: method bodies do not see enclosing locals.
    pub(crate) fn lookup_local(&self, name: &str) -> Option<VertexId> {
        self.locals.last().and_then(|frame| frame.get(name)).copied()
    }

    pub(crate) fn record_ivar_write(&mut self, name: &str, vertex: VertexId) {
        let scope = self.current_scope_name();
        self.ivar_writes
            .entry((scope, name.to_string()))
            .or_default()
            .push(vertex);
    }

    pub(crate) fn ivar_writes_for(&self, name: &str) -> Vec<VertexId> {
        let scope = self.current_scope_name();
        self.ivar_writes
            .get(&(scope, name.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn warn(&mut self, span: rbz_common::Span, message: impl Into<String>) {
        let file = self.file.clone();
        self.diagnostics.push(Diagnostic::warning(file, span, message));
    }
}

impl Default for BinderState {
    fn default() -> Self {
        Self::new()
    }
}
