//! Symbol predicate, binding forms, and pair mutation.

use super::{Primitive, bool_value};
use crate::{
    error::{Error, RunResult},
    eval::{Args, apply, expect_holder, resolve_callable},
    heap::{Heap, HeapData, HeapId},
    scope,
    value::{Lambda, Value, list_to_vec, vec_to_list},
};

/// `(symbol? x)`: true iff `x` evaluates to a symbol.
pub(super) fn is_symbol(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    args.expect_exact(Primitive::IsSymbol, 1)?;
    args.eval_all(heap, env)?;

    let result = heap.symbol_name(args.get(0)).is_some();
    bool_value(heap, env, result)
}

/// `(define name expr)` or `(define (name p1 ... pk) body...)`.
///
/// The value shape binds the resolved callable of `expr` without reducing it
/// to data, so `(define f (lambda ...))` binds the closure itself. The sugar
/// shape builds a closure from the signature's parameters and the remaining
/// body forms. Either way the binding lands in the current scope and the form
/// produces nothing.
pub(super) fn define(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    if args.is_empty() {
        return Err(Error::syntax("define: expected 2 arguments"));
    }

    if heap.is_cell(args.get(0)) {
        if args.len() < 2 {
            return Err(Error::syntax("define: expected a body"));
        }
        let signature = list_to_vec(heap, args.get(0));
        let name = heap
            .symbol_name(signature[0])
            .ok_or_else(|| Error::syntax("define: expected a name"))?
            .to_owned();
        let lambda = Lambda {
            params: signature[1..signature.len() - 1].to_vec(),
            body: args.as_slice()[1..].to_vec(),
            scope: env,
        };
        let lambda = heap.alloc(HeapData::Lambda(lambda));
        scope::put(heap, env, &name, lambda);
    } else {
        if args.len() != 2 {
            return Err(Error::syntax("define: expected 2 arguments"));
        }
        let name = heap
            .symbol_name(args.get(0))
            .ok_or_else(|| Error::syntax("define: expected a name"))?
            .to_owned();
        let binding = resolve_callable(heap, args.get(1), env)?
            .ok_or_else(|| Error::runtime("define: expression produced no value"))?;
        scope::put(heap, env, &name, binding);
    }
    Ok(None)
}

/// `(set! name expr)`: evaluates `expr` and rebinds `name` in the nearest
/// enclosing scope that binds it.
pub(super) fn set(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    if args.len() != 2 {
        return Err(Error::syntax("set!: expected 2 arguments"));
    }
    let name = heap
        .symbol_name(args.get(0))
        .ok_or_else(|| Error::runtime("set!: expected a name and an expression"))?
        .to_owned();

    let binding = apply(heap, args.get(1), env)?
        .ok_or_else(|| Error::runtime("set!: expression produced no value"))?;
    scope::set(heap, env, &name, binding)?;
    Ok(None)
}

/// `(set-car! pair expr)`.
pub(super) fn set_car(heap: &mut Heap, args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    set_pair_field(heap, args, env, Primitive::SetCar, 0)
}

/// `(set-cdr! pair expr)`.
pub(super) fn set_cdr(heap: &mut Heap, args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    set_pair_field(heap, args, env, Primitive::SetCdr, 1)
}

/// Shared implementation of `set-car!` and `set-cdr!`.
///
/// Both arguments are evaluated; the first must be a holder around a dotted
/// pair. Number results are installed as the same node, while anything else
/// is copied into a fresh symbol named after the source holder's display
/// name. The rebuilt pair replaces the holder's object, so every reference
/// through that binding observes the mutation.
fn set_pair_field(
    heap: &mut Heap,
    mut args: Args,
    env: HeapId,
    primitive: Primitive,
    field: usize,
) -> RunResult<Option<HeapId>> {
    args.skip_last();
    if args.len() != 2 {
        return Err(Error::syntax(format!("{primitive}: expected 2 arguments")));
    }

    let applied_target = apply(heap, args.get(0), env)?;
    let target = expect_holder(heap, applied_target, primitive)?;
    let pair = heap.holder(target).expect("holder checked above").object;
    let mut parts = list_to_vec(heap, pair);
    if parts.len() != 2 {
        return Err(Error::runtime(format!("{primitive}: expected a pair")));
    }

    let applied_source = apply(heap, args.get(1), env)?;
    let source = expect_holder(heap, applied_source, primitive)?;
    let source_holder = heap.holder(source).expect("holder checked above");
    let (source_object, source_name) = (source_holder.object, source_holder.name.clone());
    let replacement = if heap.is_number(source_object) {
        source_object
    } else {
        Value::Ref(heap.alloc(HeapData::Symbol(source_name)))
    };

    parts[field] = replacement;
    let rebuilt = vec_to_list(heap, &parts);
    heap.holder_mut(target)
        .expect("holder checked above")
        .set_object(rebuilt);
    Ok(None)
}
