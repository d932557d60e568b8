//! Tests for malformed input surfacing as syntax errors from `run()`.
//!
//! Lexing failures, unbalanced structure, misplaced dots, and trailing
//! tokens must all be rejected before evaluation touches the query.

use karst::{ErrorKind, Interpreter};
use pretty_assertions::assert_eq;

fn expect_syntax_error(query: &str) {
    let mut interpreter = Interpreter::new();
    let err = interpreter
        .run(query)
        .expect_err(&format!("query {query:?} should not parse"));
    assert_eq!(err.kind(), ErrorKind::SyntaxError, "query: {query:?}");
}

// =============================================================================
// 1. Lexing failures
// =============================================================================

#[test]
fn unexpected_characters_are_rejected() {
    for query in ["@", "[1]", "(+ 1 ~2)", "{}"] {
        expect_syntax_error(query);
    }
}

// =============================================================================
// 2. Structural failures
// =============================================================================

#[test]
fn unterminated_lists_are_rejected() {
    for query in ["(", "(1 2", "((1 2)", "(1 (2 3)"] {
        expect_syntax_error(query);
    }
}

#[test]
fn stray_closers_and_dots_are_rejected() {
    for query in [")", ".", "(.)", "(1 . 2 3)", "(1 . )", "(1 ."] {
        expect_syntax_error(query);
    }
}

#[test]
fn empty_queries_are_rejected() {
    for query in ["", "   ", "\t"] {
        expect_syntax_error(query);
    }
}

#[test]
fn quote_requires_a_following_expression() {
    expect_syntax_error("'");
}

// =============================================================================
// 3. Trailing tokens
// =============================================================================

/// Exactly one expression per query; anything after it is malformed.
#[test]
fn trailing_tokens_are_rejected() {
    for query in ["1 2", "(+ 1 2) 3", "(+ 1 2) (+ 3 4)", "'a 'b"] {
        expect_syntax_error(query);
    }
}
