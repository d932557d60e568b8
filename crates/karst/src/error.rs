use std::fmt;

use strum::{Display, EnumString, IntoStaticStr};

/// Result type alias for operations that can fail during a query.
pub type RunResult<T> = Result<T, Error>;

/// The three error classes an evaluation can surface.
///
/// Uses strum derives for automatic `Display`, `FromStr`, and `Into<&'static str>`
/// implementations. The string representation matches the variant name exactly
/// (e.g. `SyntaxError` -> "SyntaxError").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
pub enum ErrorKind {
    /// Malformed input: lexing failures, unbalanced parentheses, bad dotted
    /// tails, malformed special forms, or trailing tokens after a query.
    SyntaxError,
    /// Type or arity failure during evaluation, such as arithmetic on a
    /// non-number or `car` of a non-pair.
    RuntimeError,
    /// Reference to a name with no binding anywhere in the scope chain.
    NameError,
}

/// An error raised while running a query.
///
/// Errors are never recovered inside the evaluator; they unwind to the caller
/// of [`Interpreter::run`](crate::Interpreter::run). Side effects that
/// completed before the failure stay in the global scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::SyntaxError,
            message: message.into(),
        }
    }

    pub(crate) fn runtime(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::RuntimeError,
            message: message.into(),
        }
    }

    pub(crate) fn name(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::NameError,
            message: message.into(),
        }
    }

    /// Returns which of the three error classes this is.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable detail message (may be empty).
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let err = Error::runtime("car: expected a pair");
        assert_eq!(err.to_string(), "RuntimeError: car: expected a pair");
        assert_eq!(err.kind(), ErrorKind::RuntimeError);
    }

    #[test]
    fn display_without_message_is_just_the_kind() {
        let err = Error::syntax("");
        assert_eq!(err.to_string(), "SyntaxError");
    }

    #[test]
    fn kind_round_trips_through_strings() {
        assert_eq!(ErrorKind::from_str("NameError").unwrap(), ErrorKind::NameError);
        let name: &'static str = ErrorKind::SyntaxError.into();
        assert_eq!(name, "SyntaxError");
    }
}
