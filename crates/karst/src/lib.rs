#![doc = include_str!("../../../README.md")]

// first so the heap types are available to everything else
mod heap;

mod builtins;
mod error;
mod eval;
mod interp;
mod parse;
mod scope;
mod tokenize;
mod value;

pub use crate::{
    error::{Error, ErrorKind, RunResult},
    heap::HeapStats,
    interp::Interpreter,
};
