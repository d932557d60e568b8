use crate::{
    builtins,
    error::{Error, RunResult},
    eval,
    heap::{Heap, HeapData, HeapId, HeapStats},
    parse,
    scope::Scope,
    tokenize::Tokenizer,
    value,
};

/// A persistent interpreter session.
///
/// The session owns the value heap and a global scope pre-bound with every
/// builtin. Definitions made by one [`Interpreter::run`] call are visible to
/// the next, and a garbage collection keyed on the global scope runs after
/// each query so only values reachable from the global bindings survive
/// between queries.
#[derive(Debug)]
pub struct Interpreter {
    heap: Heap,
    global: HeapId,
}

impl Interpreter {
    /// Creates a session with a freshly populated global scope.
    #[must_use]
    pub fn new() -> Self {
        let mut heap = Heap::new();
        let global = heap.alloc(HeapData::Scope(Scope::new(None)));
        builtins::install(&mut heap, global);
        Self { heap, global }
    }

    /// Evaluates one expression and returns its printed result.
    ///
    /// The query is tokenized and parsed as exactly one expression (trailing
    /// tokens are malformed input), evaluated against the global scope, and
    /// serialized. Binding forms such as `define` produce an empty string.
    /// After serialization the heap is collected with the global scope as the
    /// root.
    ///
    /// On error the query's completed side effects remain in place; nothing
    /// is rolled back.
    pub fn run(&mut self, query: &str) -> RunResult<String> {
        let mut tokenizer = Tokenizer::new(query)?;
        let expr = parse::read(&mut self.heap, &mut tokenizer)?;
        if !tokenizer.is_end() {
            return Err(Error::syntax("trailing tokens after expression"));
        }

        let result = eval::evaluate(&mut self.heap, expr, self.global)?;
        let output = match result {
            None => String::new(),
            Some(value) => value::serialize(&self.heap, value)?,
        };

        self.heap.mark_and_sweep(Some(self.global));
        Ok(output)
    }

    /// Takes a snapshot of heap occupancy, for tests and introspection.
    #[must_use]
    pub fn heap_stats(&self) -> HeapStats {
        self.heap.stats()
    }

    /// Lists the names currently bound in the global scope, in binding order.
    ///
    /// # Panics
    /// Panics when the global slot no longer holds a scope, which would mean
    /// the collector released the root.
    #[must_use]
    pub fn global_names(&self) -> Vec<String> {
        match self.heap.get(self.global) {
            HeapData::Scope(scope) => scope.bindings.keys().cloned().collect(),
            _ => panic!("global slot is not a scope"),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Interpreter {
    /// Releases the entire heap by collecting with no root.
    fn drop(&mut self) {
        self.heap.mark_and_sweep(None);
    }
}
