use thiserror::Error;

use crate::operation::Arity;

pub use anyhow::Error as OperationError;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Task '{0}' has not been evaluated yet")]
    NotEvaluated(String),

    #[error("Operation '{operation}' expects {expected} operands, got {found}")]
    ArityMismatch {
        operation: String,
        expected: Arity,
        found: usize,
    },

    #[error("Task '{0}':\n{1}")]
    Operation(String, OperationError),

    #[error("Couldn't write the graph description.\n{0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed style configuration.\n{0}")]
    Config(#[from] serde_json::Error),
}
