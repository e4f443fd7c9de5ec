//! Macro-like call interception.
//!
//! A `HookSet` is a table of matcher/handler pairs consulted when a
//! receiver-less call appears outside any method body. A claiming hook runs
//! instead of the default call lowering, so no `Call` vertex is emitted for
//! it. New hooks extend the table without touching the visitor.

use crate::registry::{MethodOrigin, Visibility};
use crate::state::BinderState;
use rbz_ast::{NodeArena, NodeId, NodeKind};
use rbz_common::Span;
use tracing::debug;

/// The call shape offered to hooks.
pub struct CallContext<'a> {
    pub node: NodeId,
    pub name: &'a str,
    pub args: &'a [NodeId],
    pub span: Span,
}

/// One matcher/handler pair.
pub trait CallHook {
    /// Whether this hook claims the call. `const_name` is the qualified
    /// name of the enclosing constant (`""` at top level).
    fn matches(&self, const_name: &str, method_name: &str) -> bool;

    /// Run in place of the default call lowering.
    fn run(&self, state: &mut BinderState, arena: &NodeArena, call: &CallContext<'_>);
}

/// The registered hooks, in consultation order.
#[derive(Default)]
pub struct HookSet {
    hooks: Vec<Box<dyn CallHook>>,
}

impl HookSet {
    /// The full standard table: attribute macros plus visibility directives.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            hooks: vec![
                Box::new(AttrHook {
                    reader: true,
                    writer: false,
                }),
                Box::new(AttrHook {
                    reader: false,
                    writer: true,
                }),
                Box::new(AttrHook {
                    reader: true,
                    writer: true,
                }),
                Box::new(VisibilityHook),
            ],
        }
    }

    /// Visibility directives only; used when attribute hooks are disabled.
    #[must_use]
    pub fn directives_only() -> Self {
        Self {
            hooks: vec![Box::new(VisibilityHook)],
        }
    }

    /// Register an additional hook at the end of the table.
    pub fn register(&mut self, hook: Box<dyn CallHook>) {
        self.hooks.push(hook);
    }

    /// Offer `call` to the table; returns whether some hook claimed it.
    pub fn dispatch(
        &self,
        state: &mut BinderState,
        arena: &NodeArena,
        call: &CallContext<'_>,
    ) -> bool {
        let const_name = state.current_receiver_name();
        for hook in &self.hooks {
            if hook.matches(&const_name, call.name) {
                debug!(call = %call.name, constant = %const_name, "call claimed by hook");
                hook.run(state, arena, call);
                return true;
            }
        }
        false
    }
}

/// `attr_reader` / `attr_writer` / `attr_accessor`.
///
/// Each symbol or string argument registers a public instance method on the
/// current constant (`name` for readers, `name=` for writers). The methods
/// carry no argument vertices; their return types are linked to the
/// matching `@name` writes by the downstream solver.
struct AttrHook {
    reader: bool,
    writer: bool,
}

impl AttrHook {
    fn macro_name(&self) -> &'static str {
        match (self.reader, self.writer) {
            (true, false) => "attr_reader",
            (false, true) => "attr_writer",
            _ => "attr_accessor",
        }
    }
}

impl CallHook for AttrHook {
    fn matches(&self, _const_name: &str, method_name: &str) -> bool {
        method_name == self.macro_name()
    }

    fn run(&self, state: &mut BinderState, arena: &NodeArena, call: &CallContext<'_>) {
        let receiver = state.current_receiver_name();
        if receiver.is_empty() {
            // No constant to attach accessors to.
            return;
        }
        let path = state.file.clone();
        for &arg in call.args {
            let attr = match arena.get(arg).map(|node| &node.kind) {
                Some(NodeKind::SymbolNode { name }) => name.clone(),
                Some(NodeKind::StringNode { value }) => value.clone(),
                _ => {
                    state.warn(call.span, format!("{} expects symbol or string arguments", self.macro_name()));
                    continue;
                }
            };
            if self.reader {
                state.methods.add(
                    receiver.clone(),
                    attr.clone(),
                    Some(call.node),
                    &path,
                    false,
                    Visibility::Public,
                    MethodOrigin::AttrReader,
                );
            }
            if self.writer {
                state.methods.add(
                    receiver.clone(),
                    format!("{attr}="),
                    Some(call.node),
                    &path,
                    false,
                    Visibility::Public,
                    MethodOrigin::AttrWriter,
                );
            }
        }
    }
}

/// Bare `public` / `protected` / `private` directives switch the visibility
/// of subsequent definitions in the current constant body; with symbol
/// arguments they re-mark already-registered instance methods.
struct VisibilityHook;

fn directive_visibility(name: &str) -> Option<Visibility> {
    match name {
        "public" => Some(Visibility::Public),
        "protected" => Some(Visibility::Protected),
        "private" => Some(Visibility::Private),
        _ => None,
    }
}

impl CallHook for VisibilityHook {
    fn matches(&self, _const_name: &str, method_name: &str) -> bool {
        directive_visibility(method_name).is_some()
    }

    fn run(&self, state: &mut BinderState, arena: &NodeArena, call: &CallContext<'_>) {
        let Some(visibility) = directive_visibility(call.name) else {
            return;
        };
        if call.args.is_empty() {
            state.set_current_visibility(visibility);
            return;
        }
        let receiver = state.current_receiver_name();
        for &arg in call.args {
            let method_name = match arena.get(arg).map(|node| &node.kind) {
                Some(NodeKind::SymbolNode { name }) => name.clone(),
                Some(NodeKind::StringNode { value }) => value.clone(),
                _ => {
                    state.warn(call.span, format!("{} expects symbol or string arguments", call.name));
                    continue;
                }
            };
            match state.methods.find_id(&receiver, &method_name, false) {
                Some(id) => {
                    if let Some(method) = state.methods.get_mut(id) {
                        method.visibility = visibility;
                    }
                }
                None => {
                    state.warn(
                        call.span,
                        format!("cannot change visibility of unknown method `{method_name}`"),
                    );
                }
            }
        }
    }
}
