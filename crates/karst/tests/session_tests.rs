//! Tests for session behavior: the persistent global scope, the name
//! listing, and error propagation policy across `run()` calls.

use karst::{ErrorKind, Interpreter};
use pretty_assertions::assert_eq;

// =============================================================================
// 1. Cross-query persistence
// =============================================================================

#[test]
fn definitions_are_visible_to_later_queries() {
    let mut interpreter = Interpreter::new();
    assert_eq!(interpreter.run("(define x 10)").unwrap(), "");
    assert_eq!(interpreter.run("(+ x 5)").unwrap(), "15");
    assert_eq!(interpreter.run("(define y (+ x 1))").unwrap(), "");
    assert_eq!(interpreter.run("(* x y)").unwrap(), "110");
}

#[test]
fn sessions_are_independent() {
    let mut first = Interpreter::new();
    let mut second = Interpreter::new();
    first.run("(define x 1)").unwrap();

    let err = second.run("x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NameError);
}

#[test]
fn default_constructs_a_working_session() {
    let mut interpreter = Interpreter::default();
    assert_eq!(interpreter.run("(+ 1 2)").unwrap(), "3");
}

// =============================================================================
// 2. Global name listing
// =============================================================================

#[test]
fn global_names_start_with_the_builtin_table() {
    let interpreter = Interpreter::new();
    let names = interpreter.global_names();
    assert_eq!(names.len(), 36);
    for expected in ["#t", "#f", "define", "lambda", "set-car!", "<=", "car"] {
        assert!(names.iter().any(|n| n == expected), "missing builtin {expected:?}");
    }
}

#[test]
fn global_names_grow_with_definitions() {
    let mut interpreter = Interpreter::new();
    interpreter.run("(define first-one 1)").unwrap();
    interpreter.run("(define second-one 2)").unwrap();

    let names = interpreter.global_names();
    assert_eq!(names.len(), 38);
    // Insertion order is preserved, so user bindings come after builtins.
    assert_eq!(&names[36..], ["first-one", "second-one"]);
}

// =============================================================================
// 3. Error propagation and partial side effects
// =============================================================================

/// A failed query leaves earlier definitions untouched and the session
/// usable.
#[test]
fn errors_do_not_corrupt_the_session() {
    let mut interpreter = Interpreter::new();
    interpreter.run("(define x 1)").unwrap();

    let err = interpreter.run("(+ x missing)").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NameError);

    assert_eq!(interpreter.run("x").unwrap(), "1");
    assert_eq!(interpreter.run("(+ x 1)").unwrap(), "2");
}

/// Side effects that completed before the failure are not rolled back.
#[test]
fn partial_side_effects_persist_after_an_error() {
    let mut interpreter = Interpreter::new();

    // The inner define runs while evaluating the arguments, then the
    // addition rejects its empty result.
    let err = interpreter.run("(+ (define x 9) 1)").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RuntimeError);

    assert_eq!(interpreter.run("x").unwrap(), "9");
}

#[test]
fn error_messages_name_their_kind() {
    let mut interpreter = Interpreter::new();

    let err = interpreter.run("missing").unwrap_err();
    assert!(err.to_string().starts_with("NameError"), "got: {err}");

    let err = interpreter.run("(car 1)").unwrap_err();
    assert!(err.to_string().starts_with("RuntimeError"), "got: {err}");

    let err = interpreter.run("(1 2").unwrap_err();
    assert!(err.to_string().starts_with("SyntaxError"), "got: {err}");
}
