//! Error types for sqlcraft

use thiserror::Error;

/// Result type alias for sqlcraft operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Error types for statement compilation and execution.
///
/// All compilation errors are raised synchronously while a statement is being
/// built; nothing is silently coerced and nothing is retried internally.
#[derive(Debug, Error)]
pub enum SqlError {
    /// An operator or function received the wrong number of operands
    #[error("Operator {op}: expected {expected} operand(s), got {actual}")]
    Arity {
        op: String,
        expected: String,
        actual: usize,
    },

    /// Structurally invalid expression input
    #[error("Malformed expression: {0}")]
    Malformed(String),

    /// A literal value with no defined SQL encoding
    #[error("Unsupported value: {0}")]
    Unsupported(String),

    /// A named conflict strategy outside the closed set
    #[error("Unknown conflict resolution rule: {0}")]
    UnknownConflictRule(String),

    /// Invalid builder configuration (e.g. conflict without unique)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Opaque error surfaced unchanged from the execution collaborator
    #[error("Execution error: {0}")]
    Execution(String),
}

impl SqlError {
    /// Create an arity error for a fixed operand count.
    pub fn arity(op: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::Arity {
            op: op.into(),
            expected: expected.to_string(),
            actual,
        }
    }

    /// Create an arity error with a free-form expectation ("at least 1", "2 or 3").
    pub fn arity_msg(op: impl Into<String>, expected: impl Into<String>, actual: usize) -> Self {
        Self::Arity {
            op: op.into(),
            expected: expected.into(),
            actual,
        }
    }

    /// Create a malformed-input error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Create an unsupported-value error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an execution error from a collaborator failure
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Check if this is a compile-time (non-execution) error
    pub fn is_compile_error(&self) -> bool {
        !matches!(self, Self::Execution(_))
    }
}
