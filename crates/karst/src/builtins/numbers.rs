//! Numeric predicates, chained comparisons, and integer arithmetic.
//!
//! All numbers are 32-bit signed integers. Arithmetic wraps on overflow;
//! division truncates toward zero and rejects a zero divisor.

use super::{Primitive, bool_value};
use crate::{
    error::{Error, RunResult},
    eval::Args,
    heap::{Heap, HeapData, HeapId},
    value::Value,
};

/// Allocates a number wrapped in a result holder.
fn number_value(heap: &mut Heap, value: i32) -> RunResult<Option<HeapId>> {
    let number = heap.alloc(HeapData::Number(value));
    Ok(Some(heap.alloc_holder(Value::Ref(number), None)))
}

/// `(number? x)`: true iff `x` evaluates to a number.
pub(super) fn is_number(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    args.expect_exact(Primitive::IsNumber, 1)?;
    args.eval_all(heap, env)?;

    let result = heap.is_number(args.get(0));
    bool_value(heap, env, result)
}

/// Variadic chained comparison: true iff every adjacent pair satisfies the
/// operator. Zero or one argument is vacuously true.
pub(super) fn compare(heap: &mut Heap, mut args: Args, env: HeapId, primitive: Primitive) -> RunResult<Option<HeapId>> {
    args.skip_last();
    args.eval_all(heap, env)?;
    let numbers = args.numbers(heap, primitive)?;

    let holds = numbers.windows(2).all(|pair| match primitive {
        Primitive::NumberEq => pair[0] == pair[1],
        Primitive::Less => pair[0] < pair[1],
        Primitive::Greater => pair[0] > pair[1],
        Primitive::LessEq => pair[0] <= pair[1],
        Primitive::GreaterEq => pair[0] >= pair[1],
        _ => unreachable!("compare dispatched with a non-comparison primitive"),
    });
    bool_value(heap, env, holds)
}

/// `(+ e1 ... en)`: sum with identity 0.
pub(super) fn add(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    args.eval_all(heap, env)?;
    let numbers = args.numbers(heap, Primitive::Add)?;

    let sum = numbers.iter().fold(0i32, |acc, &n| acc.wrapping_add(n));
    number_value(heap, sum)
}

/// `(- e1 ... en)`: left fold of subtraction seeded with the first argument,
/// so a single argument comes back unchanged. Requires at least one argument.
pub(super) fn sub(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    args.expect_at_least(Primitive::Sub, 1)?;
    args.eval_all(heap, env)?;
    let numbers = args.numbers(heap, Primitive::Sub)?;

    let result = numbers[1..].iter().fold(numbers[0], |acc, &n| acc.wrapping_sub(n));
    number_value(heap, result)
}

/// `(* e1 ... en)`: product with identity 1.
pub(super) fn mul(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    args.eval_all(heap, env)?;
    let numbers = args.numbers(heap, Primitive::Mul)?;

    let product = numbers.iter().fold(1i32, |acc, &n| acc.wrapping_mul(n));
    number_value(heap, product)
}

/// `(/ e1 ... en)`: left fold of truncating division seeded with the first
/// argument, so a single argument comes back unchanged. Requires at least one
/// argument; a zero divisor is a runtime error.
pub(super) fn div(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    args.expect_at_least(Primitive::Div, 1)?;
    args.eval_all(heap, env)?;
    let numbers = args.numbers(heap, Primitive::Div)?;

    let mut result = numbers[0];
    for &divisor in &numbers[1..] {
        if divisor == 0 {
            return Err(Error::runtime("/: division by zero"));
        }
        result = result.wrapping_div(divisor);
    }
    number_value(heap, result)
}

/// `(max e1 ... en)`: largest of at least one number.
pub(super) fn max(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    args.expect_at_least(Primitive::Max, 1)?;
    args.eval_all(heap, env)?;
    let numbers = args.numbers(heap, Primitive::Max)?;

    let best = numbers.iter().copied().max().expect("at least one argument");
    number_value(heap, best)
}

/// `(min e1 ... en)`: smallest of at least one number.
pub(super) fn min(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    args.expect_at_least(Primitive::Min, 1)?;
    args.eval_all(heap, env)?;
    let numbers = args.numbers(heap, Primitive::Min)?;

    let best = numbers.iter().copied().min().expect("at least one argument");
    number_value(heap, best)
}

/// `(abs x)`: absolute value of one number, wrapping on `i32::MIN`.
pub(super) fn abs(heap: &mut Heap, mut args: Args, env: HeapId) -> RunResult<Option<HeapId>> {
    args.skip_last();
    args.expect_exact(Primitive::Abs, 1)?;
    args.eval_all(heap, env)?;
    let numbers = args.numbers(heap, Primitive::Abs)?;

    number_value(heap, numbers[0].wrapping_abs())
}
