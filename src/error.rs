use std::fmt;

/// Result type for agent operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or running an agent
///
/// None of these are recoverable inside the training loop; they abort the current run.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A hyperparameter is outside its valid range
    InvalidConfig { name: &'static str, reason: String },

    /// A state, prediction or target vector does not have the agreed length
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// An action index outside `[0, num_actions)`
    InvalidAction { action: usize, num_actions: usize },

    /// Failure reported by a function approximator
    Approximator(String),

    /// Failure while saving or loading parameters
    Record(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig { name, reason } => {
                write!(f, "Invalid value for `{}`: {}", name, reason)
            }
            Error::DimensionMismatch {
                what,
                expected,
                actual,
            } => write!(
                f,
                "Dimension mismatch in {}: expected {}, got {}",
                what, expected, actual
            ),
            Error::InvalidAction {
                action,
                num_actions,
            } => write!(
                f,
                "Invalid action {}: must be less than {}",
                action, num_actions
            ),
            Error::Approximator(msg) => write!(f, "Approximator error: {}", msg),
            Error::Record(msg) => write!(f, "Record error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
