use crate::{
    builtins::{self, Primitive},
    error::{Error, RunResult},
    heap::{Heap, HeapData, HeapId},
    scope::{self, Scope},
    value::{Value, ValueVec, list_to_vec},
};

/// Argument vector handed to a callable.
///
/// Invocations receive the flattened tail of the combination, which still
/// carries the list terminator as its final entry; dropping it with
/// [`Args::skip_last`] is the first thing every callable does. Arguments
/// arrive unevaluated, and most primitives then evaluate them in place with
/// [`Args::eval_all`] before use.
pub(crate) struct Args {
    items: ValueVec,
}

impl Args {
    pub fn new(values: &[Value]) -> Self {
        Self {
            items: ValueVec::from_slice(values),
        }
    }

    /// Drops the trailing list terminator.
    pub fn skip_last(&mut self) {
        self.items.pop();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Value {
        self.items[index]
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    /// Checks the exact argument count expected by a primitive.
    pub fn expect_exact(&self, primitive: Primitive, expected: usize) -> RunResult<()> {
        if self.len() == expected {
            Ok(())
        } else {
            let plural = if expected == 1 { "" } else { "s" };
            Err(Error::runtime(format!("{primitive}: expected {expected} argument{plural}")))
        }
    }

    /// Checks the minimum argument count expected by a primitive.
    pub fn expect_at_least(&self, primitive: Primitive, minimum: usize) -> RunResult<()> {
        if self.len() >= minimum {
            Ok(())
        } else {
            let plural = if minimum == 1 { "" } else { "s" };
            Err(Error::runtime(format!(
                "{primitive}: expected at least {minimum} argument{plural}"
            )))
        }
    }

    /// Evaluates every argument in place.
    ///
    /// An argument that produces no value (a nested `define`, for instance)
    /// becomes the empty list, which downstream type checks reject where it
    /// matters.
    pub fn eval_all(&mut self, heap: &mut Heap, env: HeapId) -> RunResult<()> {
        for index in 0..self.items.len() {
            let value = evaluate(heap, self.items[index], env)?.unwrap_or(Value::Nil);
            self.items[index] = value;
        }
        Ok(())
    }

    /// Extracts every argument as a number, after evaluation.
    pub fn numbers(&self, heap: &Heap, primitive: Primitive) -> RunResult<NumberVec> {
        self.items
            .iter()
            .map(|&value| {
                heap.number(value)
                    .ok_or_else(|| Error::runtime(format!("{primitive}: expected numeric arguments")))
            })
            .collect()
    }
}

/// Numeric counterpart of [`ValueVec`] for primitive arithmetic.
pub(crate) type NumberVec = smallvec::SmallVec<[i32; 8]>;

/// Resolves an expression to a callable without invoking a final
/// data-producing step.
///
/// Numbers wrap themselves in a fresh holder, symbols resolve through the
/// scope chain, and combinations are applied; the result is `None` only when
/// a combination bottomed out in a special form that produces nothing.
pub(crate) fn resolve_callable(heap: &mut Heap, value: Value, env: HeapId) -> RunResult<Option<HeapId>> {
    match value {
        Value::Nil => Err(Error::runtime("unexpected function")),
        Value::Ref(id) => match heap.get(id) {
            HeapData::Number(_) => Ok(Some(heap.alloc_holder(value, Some(env)))),
            HeapData::Cell(_) => apply(heap, value, env),
            HeapData::Symbol(name) => {
                let name = name.clone();
                Ok(Some(scope::get(heap, env, &name)?))
            }
            _ => Err(Error::runtime("unexpected function")),
        },
    }
}

/// Treats `value` as a combination and invokes its operator.
///
/// The expression is flattened, the head resolved to a callable, and the
/// remaining entries passed through unevaluated together with the calling
/// environment. Atoms flatten to just their head, so applying an atom invokes
/// the resolved callable with no arguments; holders answer a zero-argument
/// invocation with themselves.
pub(crate) fn apply(heap: &mut Heap, value: Value, env: HeapId) -> RunResult<Option<HeapId>> {
    let parts = list_to_vec(heap, value);
    let Some(func) = resolve_callable(heap, parts[0], env)? else {
        return Err(Error::runtime("unexpected function"));
    };
    invoke(heap, func, &parts[1..], env)
}

/// Reduces an expression all the way to a data value.
///
/// Returns `None` when the expression was a binding or mutation form with no
/// result; any callable other than a holder surviving to this point is a
/// protocol violation.
pub(crate) fn evaluate(heap: &mut Heap, value: Value, env: HeapId) -> RunResult<Option<Value>> {
    match apply(heap, value, env)? {
        None => Ok(None),
        Some(func) => match heap.get(func) {
            HeapData::Holder(holder) => Ok(Some(holder.object)),
            _ => Err(Error::runtime("unexpected result")),
        },
    }
}

/// Invokes a callable with an argument vector and the calling environment.
pub(crate) fn invoke(heap: &mut Heap, func: HeapId, args: &[Value], env: HeapId) -> RunResult<Option<HeapId>> {
    match heap.get(func) {
        HeapData::Holder(_) => {
            if args.is_empty() {
                Ok(Some(func))
            } else {
                Err(Error::runtime("value is not callable"))
            }
        }
        HeapData::Primitive(primitive) => {
            let primitive = *primitive;
            builtins::call(primitive, heap, args, env)
        }
        HeapData::Lambda(_) => invoke_lambda(heap, func, args, env),
        _ => Err(Error::runtime("unexpected function")),
    }
}

/// Ensures an applied expression produced a holder, for callables that
/// consume data results.
pub(crate) fn expect_holder(heap: &Heap, func: Option<HeapId>, primitive: Primitive) -> RunResult<HeapId> {
    match func {
        Some(id) if heap.holder(id).is_some() => Ok(id),
        _ => Err(Error::runtime(format!("{primitive}: expected a value"))),
    }
}

/// Calls a user closure.
///
/// Arity must match exactly. A child scope is created under the captured
/// definition-time environment, each argument is applied in the caller's
/// environment and bound to its parameter name, and the body expressions are
/// resolved in order. The call's result is the last body form's callable,
/// which need not be fully reduced to data.
fn invoke_lambda(heap: &mut Heap, lambda_id: HeapId, args: &[Value], caller_env: HeapId) -> RunResult<Option<HeapId>> {
    let (params, body, captured) = match heap.get(lambda_id) {
        HeapData::Lambda(lambda) => (lambda.params.clone(), lambda.body.clone(), lambda.scope),
        _ => panic!("invoke_lambda on a non-lambda"),
    };

    let mut args = Args::new(args);
    args.skip_last();
    if args.len() != params.len() {
        return Err(Error::runtime("lambda: invalid number of arguments"));
    }

    let child = heap.alloc(HeapData::Scope(Scope::new(Some(captured))));
    for (index, &param) in params.iter().enumerate() {
        let name = heap
            .symbol_name(param)
            .ok_or_else(|| Error::runtime("lambda: expected a parameter name"))?
            .to_owned();
        let bound = apply(heap, args.get(index), caller_env)?
            .ok_or_else(|| Error::runtime("lambda: argument produced no value"))?;
        scope::put(heap, child, &name, bound);
    }

    let mut result = None;
    for &expr in &body {
        result = resolve_callable(heap, expr, child)?;
    }
    Ok(result)
}
