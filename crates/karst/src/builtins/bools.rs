//! Boolean constants, predicates, and short-circuit combinators.

use super::{Primitive, bool_value};
use crate::{
    error::RunResult,
    eval::{Args, evaluate},
    heap::{Heap, HeapId},
    value::Value,
};

/// Falsity test: exactly the symbol named `#f` is false. Every other value,
/// including `0`, `()`, and `#t`, is true.
pub(crate) fn is_false(heap: &Heap, value: Value) -> bool {
    heap.symbol_name(value) == Some("#f")
}

/// `(boolean? x)`: true iff `x` evaluates to the symbol `#t` or `#f`.
pub(super) fn is_boolean(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    args.expect_exact(Primitive::IsBoolean, 1)?;
    args.eval_all(heap, env)?;

    let result = matches!(heap.symbol_name(args.get(0)), Some("#t" | "#f"));
    bool_value(heap, env, result)
}

/// `(not x)`: true iff `x` evaluates to `#f`.
pub(super) fn not(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    args.expect_exact(Primitive::Not, 1)?;
    args.eval_all(heap, env)?;

    bool_value(heap, env, is_false(heap, args.get(0)))
}

/// `(and e1 ... en)`: left-to-right evaluation stopping at the first `#f`.
///
/// Empty is `#t`; otherwise the last evaluated value is returned wrapped.
/// Arguments past the determining one are never evaluated.
pub(super) fn and(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    if args.is_empty() {
        return bool_value(heap, env, true);
    }

    let mut last = Value::Nil;
    for index in 0..args.len() {
        last = evaluate(heap, args.get(index), env)?.unwrap_or(Value::Nil);
        if is_false(heap, last) {
            return bool_value(heap, env, false);
        }
    }
    Ok(Some(heap.alloc_holder(last, Some(env))))
}

/// `(or e1 ... en)`: left-to-right evaluation stopping at the first value
/// that is not `#f`, which is returned wrapped. Empty or all-false is `#f`.
pub(super) fn or(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();

    for index in 0..args.len() {
        let value = evaluate(heap, args.get(index), env)?.unwrap_or(Value::Nil);
        if !is_false(heap, value) {
            return Ok(Some(heap.alloc_holder(value, Some(env))));
        }
    }

    bool_value(heap, env, false)
}
