//! Quote, conditional, and closure construction forms.

use super::{Primitive, is_false};
use crate::{
    error::{Error, RunResult},
    eval::{Args, apply, evaluate},
    heap::{Heap, HeapData, HeapId},
    value::{Lambda, Value, list_to_vec},
};

/// `(quote x)`: returns `x` unevaluated, wrapped with the current
/// environment.
pub(super) fn quote(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    args.expect_exact(Primitive::Quote, 1)?;

    Ok(Some(heap.alloc_holder(args.get(0), Some(env))))
}

/// `(if cond then [else])`: evaluates the condition and then exactly one
/// branch. With no else branch a false condition produces nothing.
pub(super) fn if_(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    if args.len() != 2 && args.len() != 3 {
        return Err(Error::syntax("if: expected <cond> <then> [<else>]"));
    }

    let condition = evaluate(heap, args.get(0), env)?.unwrap_or(Value::Nil);
    if !is_false(heap, condition) {
        return apply(heap, args.get(1), env);
    }
    if args.len() == 3 {
        return apply(heap, args.get(2), env);
    }
    Ok(None)
}

/// `(lambda (p1 ... pk) body...)`: builds a closure over the current
/// environment from the unevaluated parameter list and body sequence.
pub(super) fn create_lambda(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    if args.len() < 2 {
        return Err(Error::syntax("invalid lambda syntax"));
    }

    let mut params = list_to_vec(heap, args.get(0));
    params.pop();
    let lambda = Lambda {
        params: params.into_vec(),
        body: args.as_slice()[1..].to_vec(),
        scope: env,
    };
    Ok(Some(heap.alloc(HeapData::Lambda(lambda))))
}
