use std::collections::BTreeMap;

use crate::{
    builtins::Primitive,
    scope::Scope,
    value::{Cell, Holder, Lambda, Value},
};

/// Unique identifier for values stored inside the heap arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct HeapId(usize);

impl HeapId {
    /// Returns the raw slot index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// HeapData captures every runtime value that must live in the arena.
///
/// The interpreter allocates all of these through [`Heap::alloc`] and never
/// frees them directly; [`Heap::mark_and_sweep`] reclaims whatever is no
/// longer reachable from the global scope. The references a variant holds are
/// derived from its shape, so the collector's edge set cannot drift out of
/// sync with the data.
#[derive(Debug)]
pub(crate) enum HeapData {
    /// A 32-bit signed integer.
    Number(i32),
    /// A textual name. Equality on symbols is name equality; nodes are not
    /// shared between occurrences.
    Symbol(String),
    /// An ordered pair. Proper lists are right-nested cells ending in
    /// [`Value::Nil`].
    Cell(Cell),
    /// A lexical environment. Scopes live on the heap so closures can retain
    /// them and the collector can trace them.
    Scope(Scope),
    /// A builtin function or special form.
    Primitive(Primitive),
    /// A user closure capturing a parameter list, a body sequence, and the
    /// environment it was defined in.
    Lambda(Lambda),
    /// A holder wrapping a data value together with the environment it was
    /// produced in. Every evaluation result is a callable; holders are how
    /// plain data flows through the callable protocol.
    Holder(Holder),
}

impl HeapData {
    /// Returns the variant name as a static string slice, used by
    /// [`HeapStats`] for per-type object breakdowns.
    fn variant_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "Number",
            Self::Symbol(_) => "Symbol",
            Self::Cell(_) => "Cell",
            Self::Scope(_) => "Scope",
            Self::Primitive(_) => "Primitive",
            Self::Lambda(_) => "Lambda",
            Self::Holder(_) => "Holder",
        }
    }
}

/// Snapshot of heap state at a point in time.
///
/// Captures live object counts and a per-type breakdown. The
/// `objects_by_type` map uses `BTreeMap` for deterministic iteration order,
/// making snapshots suitable for display and comparison without sort
/// overhead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapStats {
    /// Total number of live objects on the heap.
    pub live_objects: usize,
    /// Number of free (recycled) slots available for reuse.
    pub free_slots: usize,
    /// Total heap capacity (live + free).
    pub total_slots: usize,
    /// Breakdown of live objects by variant name (e.g. "Cell", "Holder").
    pub objects_by_type: BTreeMap<&'static str, usize>,
}

#[derive(Debug)]
struct Slot {
    data: Option<HeapData>,
    marked: bool,
}

/// The arena owning every runtime value of one interpreter session.
///
/// Allocation hands out a [`HeapId`]; released slots are recycled through a
/// free list. Collection is a stop-the-world mark-and-sweep keyed on a root
/// scope: marking follows the edges derived from each variant's shape, the
/// sweep releases every unmarked slot, and a final pass clears the mark bits
/// on the survivors so the bits are always false between collections.
#[derive(Debug, Default)]
pub(crate) struct Heap {
    slots: Vec<Slot>,
    free: Vec<usize>,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new value, reusing a released slot when one is available.
    pub fn alloc(&mut self, data: HeapData) -> HeapId {
        let slot = Slot {
            data: Some(data),
            marked: false,
        };
        if let Some(index) = self.free.pop() {
            self.slots[index] = slot;
            HeapId(index)
        } else {
            self.slots.push(slot);
            HeapId(self.slots.len() - 1)
        }
    }

    /// Allocates a holder wrapping `object`, optionally capturing a scope.
    pub fn alloc_holder(&mut self, object: Value, scope: Option<HeapId>) -> HeapId {
        self.alloc(HeapData::Holder(Holder::new(object, scope)))
    }

    /// # Panics
    /// Panics when `id` refers to a released slot, which means a reference
    /// escaped the collector's edge set.
    pub fn get(&self, id: HeapId) -> &HeapData {
        self.slots[id.index()].data.as_ref().expect("read of a released heap slot")
    }

    /// # Panics
    /// Panics when `id` refers to a released slot.
    pub fn get_mut(&mut self, id: HeapId) -> &mut HeapData {
        self.slots[id.index()]
            .data
            .as_mut()
            .expect("write to a released heap slot")
    }

    /// Returns the integer behind `value`, if it is a number node.
    pub fn number(&self, value: Value) -> Option<i32> {
        match value {
            Value::Ref(id) => match self.get(id) {
                HeapData::Number(n) => Some(*n),
                _ => None,
            },
            Value::Nil => None,
        }
    }

    pub fn is_number(&self, value: Value) -> bool {
        self.number(value).is_some()
    }

    /// Returns the name behind `value`, if it is a symbol node.
    pub fn symbol_name(&self, value: Value) -> Option<&str> {
        match value {
            Value::Ref(id) => match self.get(id) {
                HeapData::Symbol(name) => Some(name),
                _ => None,
            },
            Value::Nil => None,
        }
    }

    pub fn is_cell(&self, value: Value) -> bool {
        matches!(value, Value::Ref(id) if matches!(self.get(id), HeapData::Cell(_)))
    }

    pub fn holder(&self, id: HeapId) -> Option<&Holder> {
        match self.get(id) {
            HeapData::Holder(holder) => Some(holder),
            _ => None,
        }
    }

    pub fn holder_mut(&mut self, id: HeapId) -> Option<&mut Holder> {
        match self.get_mut(id) {
            HeapData::Holder(holder) => Some(holder),
            _ => None,
        }
    }

    /// Runs a stop-the-world collection.
    ///
    /// With a root scope, everything reachable from it survives and keeps a
    /// clear mark bit afterwards. With no root, the entire heap is released;
    /// this is the session-teardown path.
    pub fn mark_and_sweep(&mut self, root: Option<HeapId>) {
        if let Some(root) = root {
            self.mark(root);
        }
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.data.is_some() && !slot.marked {
                slot.data = None;
                self.free.push(index);
            }
        }
        if let Some(root) = root {
            self.unmark(root);
        }
    }

    /// Sets the mark bit on everything reachable from `root`.
    ///
    /// Uses an explicit worklist rather than recursion so deeply nested
    /// structures cannot overflow the stack. Revisiting a marked slot
    /// short-circuits, which is what makes cyclic structures terminate.
    fn mark(&mut self, root: HeapId) {
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            let slot = &mut self.slots[id.index()];
            if slot.marked {
                continue;
            }
            slot.marked = true;
            let data = slot.data.as_ref().expect("marking a released heap slot");
            push_edges(data, &mut pending);
        }
    }

    /// Clears the mark bit on everything reachable from `root`, symmetric to
    /// [`Heap::mark`] including the short-circuit on already-cleared slots.
    fn unmark(&mut self, root: HeapId) {
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            let slot = &mut self.slots[id.index()];
            if !slot.marked {
                continue;
            }
            slot.marked = false;
            let data = slot.data.as_ref().expect("unmarking a released heap slot");
            push_edges(data, &mut pending);
        }
    }

    /// Takes a snapshot of live/free slot counts and the per-type breakdown.
    pub fn stats(&self) -> HeapStats {
        let mut objects_by_type: BTreeMap<&'static str, usize> = BTreeMap::new();
        let mut live_objects = 0;
        for slot in &self.slots {
            if let Some(data) = &slot.data {
                live_objects += 1;
                *objects_by_type.entry(data.variant_name()).or_insert(0) += 1;
            }
        }
        HeapStats {
            live_objects,
            free_slots: self.free.len(),
            total_slots: self.slots.len(),
            objects_by_type,
        }
    }
}

/// Pushes every heap reference held by `data` onto the traversal worklist.
///
/// This is the collector's entire edge relation, derived from the variant
/// shapes: cells reference both fields, scopes reference their parent and
/// every binding, holders reference their object and captured scope, and
/// lambdas reference their parameters, body, and captured scope. Numbers,
/// symbols, and primitives are leaves.
fn push_edges(data: &HeapData, pending: &mut Vec<HeapId>) {
    match data {
        HeapData::Number(_) | HeapData::Symbol(_) | HeapData::Primitive(_) => {}
        HeapData::Cell(cell) => {
            push_value_edge(cell.first, pending);
            push_value_edge(cell.second, pending);
        }
        HeapData::Scope(scope) => {
            if let Some(parent) = scope.parent {
                pending.push(parent);
            }
            for &binding in scope.bindings.values() {
                pending.push(binding);
            }
        }
        HeapData::Holder(holder) => {
            push_value_edge(holder.object, pending);
            if let Some(scope) = holder.scope {
                pending.push(scope);
            }
        }
        HeapData::Lambda(lambda) => {
            for &param in &lambda.params {
                push_value_edge(param, pending);
            }
            for &expr in &lambda.body {
                push_value_edge(expr, pending);
            }
            pending.push(lambda.scope);
        }
    }
}

fn push_value_edge(value: Value, pending: &mut Vec<HeapId>) {
    if let Value::Ref(id) = value {
        pending.push(id);
    }
}
