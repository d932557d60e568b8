use std::{iter::Peekable, str::Chars};

use crate::error::{Error, RunResult};

/// Lexical tokens fed to the parser.
///
/// Tokens are transient parser input, not heap values. End of input is a
/// tokenizer state rather than a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// A signed decimal integer constant.
    Constant(i32),
    OpenParen,
    CloseParen,
    /// An identifier, comparison operator, or boolean literal, kept verbatim.
    Symbol(String),
    /// The `'` quote shorthand.
    Quote,
    /// The `.` of dotted-pair notation.
    Dot,
}

/// A streaming tokenizer with one token of lookahead.
///
/// Construction eagerly lexes the first token, so a lexing failure at the
/// very start of the input surfaces from [`Tokenizer::new`]. `current`
/// returns the lookahead and [`Tokenizer::advance`] consumes it and lexes the
/// next one; once the stream is exhausted [`Tokenizer::is_end`] turns true.
#[derive(Debug)]
pub(crate) struct Tokenizer<'a> {
    chars: Peekable<Chars<'a>>,
    current: Option<Token>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> RunResult<Self> {
        let mut tokenizer = Self {
            chars: source.chars().peekable(),
            current: None,
        };
        tokenizer.advance()?;
        Ok(tokenizer)
    }

    pub fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Lexes the next token into the lookahead slot.
    ///
    /// Rules, applied after skipping ASCII whitespace: the four punctuation
    /// characters map to their tokens; a sign is the start of a constant only
    /// when a digit follows, otherwise it is the one-character `+`/`-`
    /// symbol; digits start a constant; a letter or one of `< = > * / #`
    /// starts a symbol; anything else is a syntax error.
    pub fn advance(&mut self) -> RunResult<()> {
        while self.chars.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.chars.next();
        }
        let Some(&next) = self.chars.peek() else {
            self.current = None;
            return Ok(());
        };
        self.current = Some(match next {
            '(' => {
                self.chars.next();
                Token::OpenParen
            }
            ')' => {
                self.chars.next();
                Token::CloseParen
            }
            '\'' => {
                self.chars.next();
                Token::Quote
            }
            '.' => {
                self.chars.next();
                Token::Dot
            }
            '+' | '-' => {
                self.chars.next();
                if self.chars.peek().is_some_and(|c| c.is_ascii_digit()) {
                    Token::Constant(self.read_constant(next == '-'))
                } else {
                    Token::Symbol(next.to_string())
                }
            }
            c if c.is_ascii_digit() => Token::Constant(self.read_constant(false)),
            c if c.is_ascii_alphabetic() || matches!(c, '<' | '=' | '>' | '*' | '/' | '#') => {
                Token::Symbol(self.read_symbol())
            }
            _ => return Err(Error::syntax("unexpected character in input")),
        });
        Ok(())
    }

    /// Decodes a run of digits as a 32-bit integer.
    ///
    /// Accumulation wraps on overflow; out-of-range literals produce an
    /// implementation-defined value rather than a lexing failure.
    fn read_constant(&mut self, negative: bool) -> i32 {
        let mut value: i32 = 0;
        while let Some(digit) = self.chars.peek().and_then(|c| c.to_digit(10)) {
            self.chars.next();
            #[expect(clippy::cast_possible_wrap, reason = "decimal digits fit in i32")]
            let digit = digit as i32;
            value = if negative {
                value.wrapping_mul(10).wrapping_sub(digit)
            } else {
                value.wrapping_mul(10).wrapping_add(digit)
            };
        }
        value
    }

    /// Reads a symbol, extending until end of input, `)`, or whitespace.
    fn read_symbol(&mut self) -> String {
        let mut name = String::new();
        name.push(self.chars.next().expect("symbol start was peeked"));
        while let Some(&c) = self.chars.peek() {
            if c == ')' || c.is_ascii_whitespace() {
                break;
            }
            name.push(c);
            self.chars.next();
        }
        name
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::ErrorKind;

    /// Drains every token from `source`, panicking on lexing failures.
    fn lex(source: &str) -> Vec<Token> {
        let mut tokenizer = Tokenizer::new(source).unwrap();
        let mut tokens = Vec::new();
        while let Some(token) = tokenizer.current() {
            tokens.push(token.clone());
            tokenizer.advance().unwrap();
        }
        tokens
    }

    #[test]
    fn punctuation_and_atoms() {
        assert_eq!(
            lex("(+ 1 -2)"),
            vec![
                Token::OpenParen,
                Token::Symbol("+".to_owned()),
                Token::Constant(1),
                Token::Constant(-2),
                Token::CloseParen,
            ]
        );
    }

    #[test]
    fn signs_without_digits_are_symbols() {
        assert_eq!(lex("+ -"), vec![Token::Symbol("+".to_owned()), Token::Symbol("-".to_owned())]);
        assert_eq!(lex("+5"), vec![Token::Constant(5)]);
        assert_eq!(lex("-13"), vec![Token::Constant(-13)]);
    }

    #[test]
    fn symbols_keep_trailing_punctuation() {
        assert_eq!(
            lex("set-car! eq? <= #t"),
            vec![
                Token::Symbol("set-car!".to_owned()),
                Token::Symbol("eq?".to_owned()),
                Token::Symbol("<=".to_owned()),
                Token::Symbol("#t".to_owned()),
            ]
        );
    }

    #[test]
    fn symbols_stop_at_close_paren_and_whitespace() {
        assert_eq!(
            lex("(abc)"),
            vec![Token::OpenParen, Token::Symbol("abc".to_owned()), Token::CloseParen]
        );
    }

    #[test]
    fn quote_and_dot() {
        assert_eq!(
            lex("'(1 . 2)"),
            vec![
                Token::Quote,
                Token::OpenParen,
                Token::Constant(1),
                Token::Dot,
                Token::Constant(2),
                Token::CloseParen,
            ]
        );
    }

    #[test]
    fn constants_wrap_on_overflow() {
        assert_eq!(lex("2147483648"), vec![Token::Constant(i32::MIN)]);
        assert_eq!(lex("-2147483648"), vec![Token::Constant(i32::MIN)]);
    }

    #[test]
    fn empty_input_is_end_immediately() {
        let tokenizer = Tokenizer::new("   ").unwrap();
        assert!(tokenizer.is_end());
    }

    #[test]
    fn unexpected_characters_fail() {
        let err = Tokenizer::new("@").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SyntaxError);
    }
}
