//! Builtin primitives and special forms.
//!
//! Every name pre-bound in the global scope lives here, grouped by family.
//! The [`Primitive`] enum identifies each builtin; [`call`] dispatches an
//! invocation to its implementation, and [`install`] populates a fresh global
//! scope with the full name table plus the `#t`/`#f` boolean holders.

mod bools;
mod control;
mod lists;
mod numbers;
mod symbols;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{
    error::RunResult,
    eval::Args,
    heap::{Heap, HeapData, HeapId},
    scope,
    value::Value,
};

pub(crate) use bools::is_false;

/// Enumerates every builtin registered in the global scope.
///
/// Uses strum derives for automatic `Display`, `FromStr`, and
/// `Into<&'static str>` implementations; each variant renders as its
/// Scheme-facing name (e.g. `SetCar` -> "set-car!"), which is also what
/// [`install`] binds it under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Primitive {
    #[strum(serialize = "boolean?")]
    IsBoolean,
    Not,
    And,
    Or,

    #[strum(serialize = "number?")]
    IsNumber,
    #[strum(serialize = "=")]
    NumberEq,
    #[strum(serialize = "<")]
    Less,
    #[strum(serialize = ">")]
    Greater,
    #[strum(serialize = "<=")]
    LessEq,
    #[strum(serialize = ">=")]
    GreaterEq,
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    Max,
    Min,
    Abs,

    Quote,

    #[strum(serialize = "pair?")]
    IsPair,
    #[strum(serialize = "null?")]
    IsNull,
    #[strum(serialize = "list?")]
    IsList,
    Cons,
    Car,
    Cdr,
    List,
    #[strum(serialize = "list-ref")]
    ListRef,
    #[strum(serialize = "list-tail")]
    ListTail,

    #[strum(serialize = "symbol?")]
    IsSymbol,
    Define,
    #[strum(serialize = "set!")]
    Set,
    #[strum(serialize = "set-car!")]
    SetCar,
    #[strum(serialize = "set-cdr!")]
    SetCdr,

    If,
    Lambda,
}

/// Invokes a builtin with the raw argument vector and calling environment.
pub(crate) fn call(primitive: Primitive, heap: &mut Heap, args: &[Value], env: HeapId) -> RunResult<Option<HeapId>> {
    let args = Args::new(args);
    match primitive {
        Primitive::IsBoolean => bools::is_boolean(heap, args, env),
        Primitive::Not => bools::not(heap, args, env),
        Primitive::And => bools::and(heap, args, env),
        Primitive::Or => bools::or(heap, args, env),

        Primitive::IsNumber => numbers::is_number(heap, args, env),
        Primitive::NumberEq | Primitive::Less | Primitive::Greater | Primitive::LessEq | Primitive::GreaterEq => {
            numbers::compare(heap, args, env, primitive)
        }
        Primitive::Add => numbers::add(heap, args, env),
        Primitive::Sub => numbers::sub(heap, args, env),
        Primitive::Mul => numbers::mul(heap, args, env),
        Primitive::Div => numbers::div(heap, args, env),
        Primitive::Max => numbers::max(heap, args, env),
        Primitive::Min => numbers::min(heap, args, env),
        Primitive::Abs => numbers::abs(heap, args, env),

        Primitive::Quote => control::quote(heap, args, env),

        Primitive::IsPair => lists::is_pair(heap, args, env),
        Primitive::IsNull => lists::is_null(heap, args, env),
        Primitive::IsList => lists::is_list(heap, args, env),
        Primitive::Cons => lists::cons(heap, args, env),
        Primitive::Car => lists::car(heap, args, env),
        Primitive::Cdr => lists::cdr(heap, args, env),
        Primitive::List => lists::list(heap, args, env),
        Primitive::ListRef => lists::list_ref(heap, args, env),
        Primitive::ListTail => lists::list_tail(heap, args, env),

        Primitive::IsSymbol => symbols::is_symbol(heap, args, env),
        Primitive::Define => symbols::define(heap, args, env),
        Primitive::Set => symbols::set(heap, args, env),
        Primitive::SetCar => symbols::set_car(heap, args, env),
        Primitive::SetCdr => symbols::set_cdr(heap, args, env),

        Primitive::If => control::if_(heap, args, env),
        Primitive::Lambda => control::create_lambda(heap, args, env),
    }
}

/// Populates `global` with every builtin plus the boolean constants.
pub(crate) fn install(heap: &mut Heap, global: HeapId) {
    for primitive in Primitive::iter() {
        let id = heap.alloc(HeapData::Primitive(primitive));
        scope::put(heap, global, primitive.into(), id);
    }
    for name in ["#t", "#f"] {
        let symbol = heap.alloc(HeapData::Symbol(name.to_owned()));
        let holder = heap.alloc_holder(Value::Ref(symbol), None);
        scope::put(heap, global, name, holder);
    }
}

/// Looks up the shared `#t` or `#f` binding to report a predicate result.
pub(super) fn bool_value(heap: &Heap, env: HeapId, value: bool) -> RunResult<Option<HeapId>> {
    let name = if value { "#t" } else { "#f" };
    Ok(Some(scope::get(heap, env, name)?))
}
