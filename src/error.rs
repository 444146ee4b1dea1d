//! Error types for expression manipulation

use std::fmt;
use std::sync::Arc;

/// Errors raised by operations on expressions
///
/// These signal a violated contract on the caller's side and are never retried internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// [`inverse`](crate::expr::Expr::inverse) was called on a node that cannot be inverted
    NotInvertible {
        /// The offending expression, rendered
        expr: Arc<str>,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotInvertible { expr } => {
                write!(f, "Unsupported operation: {} cannot be inverted", expr)
            }
        }
    }
}

impl std::error::Error for Error {}
