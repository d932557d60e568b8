use smallvec::SmallVec;

use crate::{
    error::{Error, RunResult},
    heap::{Heap, HeapData, HeapId},
};

/// What a cell field, binding target, or evaluation result refers to.
///
/// `Nil` is the distinguished empty-list sentinel: it terminates proper lists
/// and is what `()` parses to. Everything else is a reference into the heap
/// arena. The type is deliberately small and copyable; cloning a `Value`
/// never clones heap data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Value {
    /// The empty list.
    Nil,
    /// A heap value.
    Ref(HeapId),
}

/// An ordered pair of values.
#[derive(Debug)]
pub(crate) struct Cell {
    pub first: Value,
    pub second: Value,
}

impl Cell {
    pub fn new(first: Value, second: Value) -> Self {
        Self { first, second }
    }
}

/// A user closure: parameter symbols, a body sequence, and the captured
/// definition-time scope.
///
/// Parameters and body expressions are kept as parsed values; binding and
/// evaluation happen at call time against a child of the captured scope.
#[derive(Debug)]
pub(crate) struct Lambda {
    pub params: Vec<Value>,
    pub body: Vec<Value>,
    pub scope: HeapId,
}

/// A callable box around a data value.
///
/// Holders are how plain data travels through the callable protocol: invoking
/// one with no arguments yields itself, and the evaluator unwraps the held
/// object at the end of a query. A holder bound in a scope also remembers the
/// binding name, which `set-car!`/`set-cdr!` use when they copy a non-number
/// into a pair.
#[derive(Debug)]
pub(crate) struct Holder {
    pub object: Value,
    pub scope: Option<HeapId>,
    pub name: String,
}

impl Holder {
    pub fn new(object: Value, scope: Option<HeapId>) -> Self {
        Self {
            object,
            scope,
            name: String::new(),
        }
    }

    pub fn set_object(&mut self, object: Value) {
        self.object = object;
    }
}

/// Flattened form of a (possibly improper) list.
///
/// Each cell head is pushed in order, followed by the final tail, so a proper
/// list of n elements yields n + 1 entries ending in [`Value::Nil`] and an
/// atom yields a single entry. This is the argument-vector shape the
/// evaluator hands to every callable.
pub(crate) type ValueVec = SmallVec<[Value; 8]>;

/// Flattens `value` into cell heads plus the terminating tail.
pub(crate) fn list_to_vec(heap: &Heap, value: Value) -> ValueVec {
    let mut parts = ValueVec::new();
    let mut current = value;
    while let Value::Ref(id) = current {
        match heap.get(id) {
            HeapData::Cell(cell) => {
                parts.push(cell.first);
                current = cell.second;
            }
            _ => break,
        }
    }
    parts.push(current);
    parts
}

/// Rebuilds a value from its flattened form, the inverse of [`list_to_vec`].
///
/// An empty slice is the empty list, a single entry is returned as is, and
/// anything longer is folded right-to-left into fresh cells whose final cell
/// holds the last two entries.
pub(crate) fn vec_to_list(heap: &mut Heap, parts: &[Value]) -> Value {
    match parts {
        [] => Value::Nil,
        [single] => *single,
        _ => {
            let last_pair = Cell::new(parts[parts.len() - 2], parts[parts.len() - 1]);
            let mut tail = Value::Ref(heap.alloc(HeapData::Cell(last_pair)));
            for &part in parts[..parts.len() - 2].iter().rev() {
                tail = Value::Ref(heap.alloc(HeapData::Cell(Cell::new(part, tail))));
            }
            tail
        }
    }
}

/// Produces the printed representation of a value.
///
/// Numbers render in decimal, symbols verbatim, the empty list as `()`.
/// Proper list tails are spliced into the enclosing parentheses; improper
/// tails render with dot notation. Callables never reach the serializer in
/// well-formed programs, so hitting one is reported as a runtime error.
pub(crate) fn serialize(heap: &Heap, value: Value) -> RunResult<String> {
    match value {
        Value::Nil => Ok("()".to_owned()),
        Value::Ref(id) => match heap.get(id) {
            HeapData::Number(n) => Ok(n.to_string()),
            HeapData::Symbol(name) => Ok(name.clone()),
            HeapData::Cell(cell) => {
                let first = serialize(heap, cell.first)?;
                match cell.second {
                    Value::Nil => Ok(format!("({first})")),
                    Value::Ref(second_id) => {
                        let second = serialize(heap, cell.second)?;
                        if matches!(heap.get(second_id), HeapData::Cell(_)) {
                            // Splice the tail into our parentheses by
                            // stripping the outer pair of the recursive form.
                            Ok(format!("({first} {})", &second[1..second.len() - 1]))
                        } else {
                            Ok(format!("({first} . {second})"))
                        }
                    }
                }
            }
            _ => Err(Error::runtime("unexpected object in output")),
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn number(heap: &mut Heap, n: i32) -> Value {
        Value::Ref(heap.alloc(HeapData::Number(n)))
    }

    fn symbol(heap: &mut Heap, name: &str) -> Value {
        Value::Ref(heap.alloc(HeapData::Symbol(name.to_owned())))
    }

    #[test]
    fn serialize_atoms() {
        let mut heap = Heap::new();
        let n = number(&mut heap, -3);
        let s = symbol(&mut heap, "foo?");
        assert_eq!(serialize(&heap, Value::Nil).unwrap(), "()");
        assert_eq!(serialize(&heap, n).unwrap(), "-3");
        assert_eq!(serialize(&heap, s).unwrap(), "foo?");
    }

    #[test]
    fn serialize_proper_and_improper_lists() {
        let mut heap = Heap::new();
        let one = number(&mut heap, 1);
        let two = number(&mut heap, 2);
        let three = number(&mut heap, 3);

        let proper = vec_to_list(&mut heap, &[one, two, three, Value::Nil]);
        assert_eq!(serialize(&heap, proper).unwrap(), "(1 2 3)");

        let dotted = vec_to_list(&mut heap, &[one, two]);
        assert_eq!(serialize(&heap, dotted).unwrap(), "(1 . 2)");

        let improper = vec_to_list(&mut heap, &[one, two, three]);
        assert_eq!(serialize(&heap, improper).unwrap(), "(1 2 . 3)");
    }

    #[test]
    fn flatten_round_trips() {
        let mut heap = Heap::new();
        let one = number(&mut heap, 1);
        let two = number(&mut heap, 2);

        let list = vec_to_list(&mut heap, &[one, two, Value::Nil]);
        let parts = list_to_vec(&heap, list);
        assert_eq!(parts.as_slice(), &[one, two, Value::Nil]);

        let atom_parts = list_to_vec(&heap, one);
        assert_eq!(atom_parts.as_slice(), &[one]);

        assert_eq!(vec_to_list(&mut heap, &[]), Value::Nil);
        assert_eq!(vec_to_list(&mut heap, &[one]), one);
    }
}
