use crate::{
    error::{Error, RunResult},
    heap::{Heap, HeapData},
    tokenize::{Token, Tokenizer},
    value::{Cell, Value},
};

/// Reads one expression, allocating its tree on the heap.
///
/// Atoms become fresh number or symbol nodes, `(` opens a list, and `'x`
/// desugars to `(quote x)`. A closing parenthesis or dot in expression
/// position is malformed input, as is running out of tokens.
pub(crate) fn read(heap: &mut Heap, tokenizer: &mut Tokenizer) -> RunResult<Value> {
    let Some(token) = tokenizer.current().cloned() else {
        return Err(Error::syntax("unexpected end of input"));
    };
    tokenizer.advance()?;
    match token {
        Token::Constant(value) => Ok(Value::Ref(heap.alloc(HeapData::Number(value)))),
        Token::Symbol(name) => Ok(Value::Ref(heap.alloc(HeapData::Symbol(name)))),
        Token::OpenParen => read_list(heap, tokenizer),
        Token::Quote => {
            let quote = Value::Ref(heap.alloc(HeapData::Symbol("quote".to_owned())));
            let inner = read(heap, tokenizer)?;
            let tail = Value::Ref(heap.alloc(HeapData::Cell(Cell::new(inner, Value::Nil))));
            Ok(Value::Ref(heap.alloc(HeapData::Cell(Cell::new(quote, tail)))))
        }
        Token::CloseParen | Token::Dot => Err(Error::syntax("unexpected token")),
    }
}

/// Reads list elements up to the closing parenthesis.
///
/// A dot after at least one element switches to dotted-tail mode: exactly one
/// more expression must follow, then the closing parenthesis.
fn read_list(heap: &mut Heap, tokenizer: &mut Tokenizer) -> RunResult<Value> {
    if tokenizer.is_end() {
        return Err(Error::syntax("unexpected end of input"));
    }
    if tokenizer.current() == Some(&Token::CloseParen) {
        tokenizer.advance()?;
        return Ok(Value::Nil);
    }

    let first = read(heap, tokenizer)?;
    let second = if tokenizer.current() == Some(&Token::Dot) {
        tokenizer.advance()?;
        let second = read(heap, tokenizer)?;
        if tokenizer.current() != Some(&Token::CloseParen) {
            return Err(Error::syntax("expected ')'"));
        }
        tokenizer.advance()?;
        second
    } else {
        read_list(heap, tokenizer)?
    };
    Ok(Value::Ref(heap.alloc(HeapData::Cell(Cell::new(first, second)))))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{error::ErrorKind, value::serialize};

    /// Parses one expression and renders it back to text.
    fn round_trip(source: &str) -> String {
        let mut heap = Heap::new();
        let mut tokenizer = Tokenizer::new(source).unwrap();
        let value = read(&mut heap, &mut tokenizer).unwrap();
        assert!(tokenizer.is_end(), "expression should consume all tokens");
        serialize(&heap, value).unwrap()
    }

    fn parse_err(source: &str) -> Error {
        let mut heap = Heap::new();
        let mut tokenizer = Tokenizer::new(source).unwrap();
        read(&mut heap, &mut tokenizer).unwrap_err()
    }

    #[test]
    fn atoms_and_lists() {
        assert_eq!(round_trip("42"), "42");
        assert_eq!(round_trip("foo"), "foo");
        assert_eq!(round_trip("()"), "()");
        assert_eq!(round_trip("(1 2 3)"), "(1 2 3)");
        assert_eq!(round_trip("(1 (2 3) 4)"), "(1 (2 3) 4)");
    }

    #[test]
    fn dotted_pairs() {
        assert_eq!(round_trip("(1 . 2)"), "(1 . 2)");
        assert_eq!(round_trip("(1 2 . 3)"), "(1 2 . 3)");
    }

    #[test]
    fn quote_desugars() {
        assert_eq!(round_trip("'x"), "(quote x)");
        assert_eq!(round_trip("'(1 2)"), "(quote (1 2))");
        assert_eq!(round_trip("''x"), "(quote (quote x))");
    }

    #[test]
    fn parse_is_stable_after_one_round() {
        for source in ["(1 (2 . 3) () abc)", "'(a . (b . ()))"] {
            let once = round_trip(source);
            assert_eq!(round_trip(&once), once);
        }
    }

    #[test]
    fn malformed_input_is_a_syntax_error() {
        for source in ["", "(", "(1 2", ")", ".", "(1 . 2 3)", "(1 . )", "(1 ."] {
            let err = parse_err(source);
            assert_eq!(err.kind(), ErrorKind::SyntaxError, "source: {source:?}");
        }
    }
}
