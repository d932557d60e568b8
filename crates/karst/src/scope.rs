use ahash::RandomState;
use indexmap::IndexMap;

use crate::{
    error::{Error, RunResult},
    heap::{Heap, HeapData, HeapId},
};

/// A lexical environment: a name-to-callable map with an optional parent.
///
/// Scopes are heap values, so a closure keeps its defining environment alive
/// simply by referencing it and the collector traces bindings like any other
/// edge. The binding map preserves insertion order, which keeps root walks
/// and name listings deterministic.
#[derive(Debug)]
pub(crate) struct Scope {
    pub parent: Option<HeapId>,
    pub bindings: IndexMap<String, HeapId, RandomState>,
}

impl Scope {
    pub fn new(parent: Option<HeapId>) -> Self {
        Self {
            parent,
            bindings: IndexMap::default(),
        }
    }
}

/// Binds `name` in `scope_id` itself, replacing any prior binding there.
///
/// When the binding is a holder its display name is stamped with `name`, so
/// later pair mutation can recover what the value was called.
///
/// # Panics
/// Panics when `scope_id` does not refer to a scope.
pub(crate) fn put(heap: &mut Heap, scope_id: HeapId, name: &str, binding: HeapId) {
    if let HeapData::Holder(holder) = heap.get_mut(binding) {
        holder.name = name.to_owned();
    }
    let HeapData::Scope(scope) = heap.get_mut(scope_id) else {
        panic!("put target is not a scope");
    };
    scope.bindings.insert(name.to_owned(), binding);
}

/// Rebinds `name` in the nearest enclosing scope that already binds it.
pub(crate) fn set(heap: &mut Heap, scope_id: HeapId, name: &str, binding: HeapId) -> RunResult<()> {
    let mut current = scope_id;
    loop {
        let HeapData::Scope(scope) = heap.get(current) else {
            panic!("set target is not a scope");
        };
        if scope.bindings.contains_key(name) {
            let HeapData::Scope(scope) = heap.get_mut(current) else {
                unreachable!("scope variant checked above");
            };
            scope.bindings.insert(name.to_owned(), binding);
            return Ok(());
        }
        match scope.parent {
            Some(parent) => current = parent,
            None => return Err(Error::name(format!("invalid name: {name}"))),
        }
    }
}

/// Looks `name` up through the scope chain.
pub(crate) fn get(heap: &Heap, scope_id: HeapId, name: &str) -> RunResult<HeapId> {
    let mut current = scope_id;
    loop {
        let HeapData::Scope(scope) = heap.get(current) else {
            panic!("get target is not a scope");
        };
        if let Some(&binding) = scope.bindings.get(name) {
            return Ok(binding);
        }
        match scope.parent {
            Some(parent) => current = parent,
            None => return Err(Error::name(format!("invalid name: {name}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, value::Value};

    fn holder(heap: &mut Heap, n: i32) -> HeapId {
        let number = heap.alloc(HeapData::Number(n));
        heap.alloc_holder(Value::Ref(number), None)
    }

    #[test]
    fn put_shadows_and_get_walks_the_chain() {
        let mut heap = Heap::new();
        let outer = heap.alloc(HeapData::Scope(Scope::new(None)));
        let inner = heap.alloc(HeapData::Scope(Scope::new(Some(outer))));

        let a = holder(&mut heap, 1);
        let b = holder(&mut heap, 2);
        put(&mut heap, outer, "x", a);
        assert_eq!(get(&heap, inner, "x").unwrap(), a);

        put(&mut heap, inner, "x", b);
        assert_eq!(get(&heap, inner, "x").unwrap(), b);
        assert_eq!(get(&heap, outer, "x").unwrap(), a);
    }

    #[test]
    fn set_rebinds_in_the_owning_scope() {
        let mut heap = Heap::new();
        let outer = heap.alloc(HeapData::Scope(Scope::new(None)));
        let inner = heap.alloc(HeapData::Scope(Scope::new(Some(outer))));

        let a = holder(&mut heap, 1);
        let b = holder(&mut heap, 2);
        put(&mut heap, outer, "x", a);
        set(&mut heap, inner, "x", b).unwrap();
        assert_eq!(get(&heap, outer, "x").unwrap(), b);
    }

    #[test]
    fn missing_names_are_name_errors() {
        let mut heap = Heap::new();
        let scope = heap.alloc(HeapData::Scope(Scope::new(None)));
        let value = holder(&mut heap, 1);

        assert_eq!(get(&heap, scope, "nope").unwrap_err().kind(), ErrorKind::NameError);
        assert_eq!(
            set(&mut heap, scope, "nope", value).unwrap_err().kind(),
            ErrorKind::NameError
        );
    }

    #[test]
    fn put_stamps_holder_display_names() {
        let mut heap = Heap::new();
        let scope = heap.alloc(HeapData::Scope(Scope::new(None)));
        let boxed = holder(&mut heap, 5);
        put(&mut heap, scope, "five", boxed);
        assert_eq!(heap.holder(boxed).unwrap().name, "five");
    }
}
