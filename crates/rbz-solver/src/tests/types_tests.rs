use super::{HashKey, Type};

#[test]
fn renders_primitive_forms() {
    assert_eq!(Type::Any.to_ts(), "any");
    assert_eq!(Type::Nil.to_ts(), "nil");
    assert_eq!(Type::Bool(true).to_ts(), "true");
    assert_eq!(Type::Bool(false).to_ts(), "false");
    assert_eq!(Type::Integer.to_ts(), "Integer");
    assert_eq!(Type::IntegerLiteral(42).to_ts(), "42");
    assert_eq!(Type::String.to_ts(), "String");
    assert_eq!(Type::StringLiteral("foo".into()).to_ts(), "\"foo\"");
    assert_eq!(Type::SymbolLiteral("hoge".into()).to_ts(), ":hoge");
}

#[test]
fn renders_composite_forms() {
    assert_eq!(Type::ArrayOf(Box::new(Type::Integer)).to_ts(), "[Integer]");
    assert_eq!(Type::Singleton("A".into()).to_ts(), "singleton(A)");
    assert_eq!(Type::Instance("C::D".into()).to_ts(), "C::D");

    let shape = Type::HashShape(vec![
        (HashKey::Symbol("foo".into()), Type::Integer),
        (HashKey::String("bar".into()), Type::Integer),
    ]);
    assert_eq!(shape.to_ts(), "{ foo: Integer, \"bar\" => Integer }");
    assert_eq!(Type::HashShape(vec![]).to_ts(), "{}");
}

#[test]
fn renders_unions_in_order() {
    let ty = Type::Union(vec![
        Type::IntegerLiteral(1),
        Type::IntegerLiteral(2),
        Type::Nil,
    ]);
    assert_eq!(ty.to_ts(), "1 | 2 | nil");
}

#[test]
fn rendering_is_pure() {
    let ty = Type::ArrayOf(Box::new(Type::Union(vec![Type::Integer, Type::Nil])));
    assert_eq!(ty.to_ts(), ty.to_ts());
}

#[test]
fn union_flattens_and_dedups() {
    let ty = Type::union(vec![
        Type::Integer,
        Type::Union(vec![Type::Integer, Type::Nil]),
        Type::Nil,
    ]);
    assert_eq!(ty, Type::Union(vec![Type::Integer, Type::Nil]));
}

#[test]
fn union_of_nothing_is_any() {
    assert_eq!(Type::union(vec![]), Type::Any);
}

#[test]
fn union_of_one_is_the_element() {
    assert_eq!(Type::union(vec![Type::Integer]), Type::Integer);
}

#[test]
fn widening_promotes_integer_literals() {
    assert_eq!(Type::IntegerLiteral(1).widen(), Type::Integer);
    assert_eq!(
        Type::Union(vec![Type::IntegerLiteral(1), Type::IntegerLiteral(2)]).widen(),
        Type::Integer
    );
}

#[test]
fn widening_keeps_sole_literals() {
    assert_eq!(
        Type::StringLiteral("foo".into()).widen(),
        Type::StringLiteral("foo".into())
    );
    assert_eq!(
        Type::SymbolLiteral("hoge".into()).widen(),
        Type::SymbolLiteral("hoge".into())
    );
    assert_eq!(Type::Bool(true).widen(), Type::Bool(true));
}

#[test]
fn widening_collapses_mixed_string_literals() {
    let ty = Type::Union(vec![
        Type::StringLiteral("foo".into()),
        Type::StringLiteral("bar".into()),
    ]);
    assert_eq!(ty.widen(), Type::String);

    let ty = Type::Union(vec![Type::StringLiteral("foo".into()), Type::String]);
    assert_eq!(ty.widen(), Type::String);
}

#[test]
fn widening_keeps_string_literal_next_to_non_strings() {
    let ty = Type::Union(vec![Type::StringLiteral("foo".into()), Type::Nil]);
    assert_eq!(
        ty.widen(),
        Type::Union(vec![Type::StringLiteral("foo".into()), Type::Nil])
    );
}

#[test]
fn widening_inside_unions_preserves_nil_members() {
    let ty = Type::Union(vec![
        Type::IntegerLiteral(1),
        Type::IntegerLiteral(2),
        Type::Nil,
    ]);
    assert_eq!(ty.widen(), Type::Union(vec![Type::Integer, Type::Nil]));
}
