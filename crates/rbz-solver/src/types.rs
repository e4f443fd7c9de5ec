//! The closed algebra of inferred types and its canonical rendering.
//!
//! Two laws live here besides the data model:
//!
//! - **Union**: order-preserving, deduplicating, flattening. An empty union
//!   is `any`, a one-element union is the element itself.
//! - **Widening**: the assignment-position promotion of literal types.
//!   Integer literals always widen to `Integer`; string literals keep their
//!   literal form while they are the sole string contributor and collapse to
//!   `String` when distinct string forms combine; symbol, boolean, and nil
//!   literals are preserved.

use serde::Serialize;

/// A hash-shape key: either a symbol name or a quoted string key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum HashKey {
    Symbol(String),
    String(String),
}

impl HashKey {
    /// Render the key the way it appears in a shape: `foo:` or `"foo" =>`.
    #[must_use]
    pub fn render(&self, value: &str) -> String {
        match self {
            HashKey::Symbol(name) => format!("{name}: {value}"),
            HashKey::String(name) => format!("\"{name}\" => {value}"),
        }
    }
}

/// An inferred type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Type {
    /// Unknown / unresolved. Never an error.
    Any,
    Nil,
    Bool(bool),
    IntegerLiteral(i64),
    Integer,
    StringLiteral(String),
    String,
    SymbolLiteral(String),
    /// Homogeneous array; the element type is the widened union of elements.
    ArrayOf(Box<Type>),
    /// Shape-typed hash literal, keys in source order.
    HashShape(Vec<(HashKey, Type)>),
    /// The class object itself (`A` read as an expression).
    Singleton(String),
    /// An instance of the named constant; also carries unresolved constant
    /// paths, which render as the path literal.
    Instance(String),
    Union(Vec<Type>),
}

impl Type {
    /// Canonical textual rendering. Pure: depends only on the type value.
    #[must_use]
    pub fn to_ts(&self) -> std::string::String {
        match self {
            Type::Any => "any".to_string(),
            Type::Nil => "nil".to_string(),
            Type::Bool(true) => "true".to_string(),
            Type::Bool(false) => "false".to_string(),
            Type::IntegerLiteral(n) => n.to_string(),
            Type::Integer => "Integer".to_string(),
            Type::StringLiteral(s) => format!("\"{s}\""),
            Type::String => "String".to_string(),
            Type::SymbolLiteral(s) => format!(":{s}"),
            Type::ArrayOf(elem) => format!("[{}]", elem.to_ts()),
            Type::HashShape(entries) => {
                if entries.is_empty() {
                    return "{}".to_string();
                }
                let body = entries
                    .iter()
                    .map(|(key, ty)| key.render(&ty.to_ts()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{{ {body} }}")
            }
            Type::Singleton(name) => format!("singleton({name})"),
            Type::Instance(name) => name.clone(),
            Type::Union(types) => types
                .iter()
                .map(Type::to_ts)
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }

    /// Build the union of `types`: flattens nested unions and deduplicates
    /// while preserving first-seen order.
    #[must_use]
    pub fn union(types: Vec<Type>) -> Type {
        fn push(acc: &mut Vec<Type>, ty: Type) {
            match ty {
                Type::Union(inner) => {
                    for ty in inner {
                        push(acc, ty);
                    }
                }
                ty => {
                    if !acc.contains(&ty) {
                        acc.push(ty);
                    }
                }
            }
        }

        let mut flat = Vec::new();
        for ty in types {
            push(&mut flat, ty);
        }
        match flat.len() {
            0 => Type::Any,
            1 => flat.remove(0),
            _ => Type::Union(flat),
        }
    }

    /// Assignment-position widening.
    ///
    /// `IntegerLiteral` always becomes `Integer`. Inside a union, members are
    /// widened individually and distinct string forms collapse to `String`;
    /// a lone string literal stays literal.
    #[must_use]
    pub fn widen(self) -> Type {
        match self {
            Type::IntegerLiteral(_) => Type::Integer,
            Type::Union(types) => {
                let widened: Vec<Type> = types.into_iter().map(Type::widen).collect();
                Type::union(collapse_string_forms(widened))
            }
            ty => ty,
        }
    }
}

/// When two or more distinct string forms appear together, every string
/// literal member is replaced by the `String` base.
fn collapse_string_forms(types: Vec<Type>) -> Vec<Type> {
    let mut literals: Vec<&str> = Vec::new();
    let mut has_base = false;
    for ty in &types {
        match ty {
            Type::StringLiteral(s) if !literals.contains(&s.as_str()) => literals.push(s.as_str()),
            Type::String => has_base = true,
            _ => {}
        }
    }
    if literals.len() + usize::from(has_base) < 2 {
        return types;
    }
    types
        .into_iter()
        .map(|ty| match ty {
            Type::StringLiteral(_) => Type::String,
            ty => ty,
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
