//! Pair and list predicates, constructors, and accessors.

use super::{Primitive, bool_value};
use crate::{
    error::{Error, RunResult},
    eval::{Args, apply, expect_holder, resolve_callable},
    heap::{Heap, HeapData, HeapId},
    value::{Cell, Value, ValueVec, list_to_vec, vec_to_list},
};

/// `(pair? x)`: true iff `x` evaluates to a cell.
pub(super) fn is_pair(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    args.expect_exact(Primitive::IsPair, 1)?;
    args.eval_all(heap, env)?;

    let result = heap.is_cell(args.get(0));
    bool_value(heap, env, result)
}

/// `(null? x)`: true iff `x` evaluates to the empty list.
pub(super) fn is_null(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    args.expect_exact(Primitive::IsNull, 1)?;
    args.eval_all(heap, env)?;

    bool_value(heap, env, args.get(0) == Value::Nil)
}

/// `(list? x)`: true iff `x` evaluates to the empty list or a proper list.
pub(super) fn is_list(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    args.expect_exact(Primitive::IsList, 1)?;
    args.eval_all(heap, env)?;

    let parts = list_to_vec(heap, args.get(0));
    let result = *parts.last().expect("flattened form is never empty") == Value::Nil;
    bool_value(heap, env, result)
}

/// `(cons a b)`: builds a fresh pair from the unevaluated arguments.
pub(super) fn cons(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    args.expect_exact(Primitive::Cons, 2)?;

    let cell = heap.alloc(HeapData::Cell(Cell::new(args.get(0), args.get(1))));
    Ok(Some(heap.alloc_holder(Value::Ref(cell), Some(env))))
}

/// `(car x)`: the head of a pair, resolved through the environment the pair
/// was produced in.
pub(super) fn car(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    args.expect_exact(Primitive::Car, 1)?;

    let applied = apply(heap, args.get(0), env)?;
    let target = expect_holder(heap, applied, Primitive::Car)?;
    let holder = heap.holder(target).expect("holder checked above");
    let (object, holder_scope) = (holder.object, holder.scope);

    let parts = list_to_vec(heap, object);
    if parts.len() < 2 {
        return Err(Error::runtime("car: expected a pair"));
    }
    resolve_callable(heap, parts[0], holder_scope.unwrap_or(env))
}

/// `(cdr x)`: the tail of a pair.
///
/// When the remaining head is a number, or the tail is empty, the result is
/// returned as plain data; otherwise it is resolved through the pair's
/// environment like `car` does.
pub(super) fn cdr(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    args.expect_exact(Primitive::Cdr, 1)?;

    let applied = apply(heap, args.get(0), env)?;
    let target = expect_holder(heap, applied, Primitive::Cdr)?;
    let holder = heap.holder(target).expect("holder checked above");
    let (object, holder_scope) = (holder.object, holder.scope);

    let mut parts = list_to_vec(heap, object);
    if parts.len() < 2 {
        return Err(Error::runtime("cdr: expected a pair"));
    }
    parts.remove(0);

    let scope = holder_scope.unwrap_or(env);
    let rest = vec_to_list(heap, &parts);
    if parts[0] == Value::Nil || heap.is_number(parts[0]) {
        Ok(Some(heap.alloc_holder(rest, Some(scope))))
    } else {
        resolve_callable(heap, rest, scope)
    }
}

/// `(list e1 ... en)`: a proper list of the unevaluated arguments.
pub(super) fn list(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();

    let mut parts = ValueVec::from_slice(args.as_slice());
    parts.push(Value::Nil);
    let built = vec_to_list(heap, &parts);
    Ok(Some(heap.alloc_holder(built, Some(env))))
}

/// `(list-ref L k)`: element at index `k`.
pub(super) fn list_ref(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    args.expect_exact(Primitive::ListRef, 2)?;
    args.eval_all(heap, env)?;

    let (parts, index) = indexed_list(heap, &args, Primitive::ListRef)?;
    if index >= parts.len() - 1 {
        return Err(Error::runtime("list-ref: index out of range"));
    }
    Ok(Some(heap.alloc_holder(parts[index], Some(env))))
}

/// `(list-tail L k)`: the suffix starting at index `k`.
pub(super) fn list_tail(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    args.expect_exact(Primitive::ListTail, 2)?;
    args.eval_all(heap, env)?;

    let (parts, index) = indexed_list(heap, &args, Primitive::ListTail)?;
    if index > parts.len() - 1 {
        return Err(Error::runtime("list-tail: index out of range"));
    }
    let suffix = vec_to_list(heap, &parts[index..]);
    Ok(Some(heap.alloc_holder(suffix, Some(env))))
}

/// Flattens the list argument and decodes the index argument, rejecting
/// non-number and negative indices.
fn indexed_list(heap: &Heap, args: &Args, primitive: Primitive) -> RunResult<(ValueVec, usize)> {
    let index = heap
        .number(args.get(1))
        .ok_or_else(|| Error::runtime(format!("{primitive}: expected a list and an index")))?;
    let index =
        usize::try_from(index).map_err(|_| Error::runtime(format!("{primitive}: index out of range")))?;
    Ok((list_to_vec(heap, args.get(0)), index))
}
