//! Error type shared by the symbolic layer and the calculus utilities.
use std::fmt;

/// Stage of a symbolic computation in which a failure was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Differentiation,
    Substitution,
    Solve,
    Evaluation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Stage::Differentiation => write!(f, "differentiation"),
            Stage::Substitution => write!(f, "substitution"),
            Stage::Solve => write!(f, "solve"),
            Stage::Evaluation => write!(f, "evaluation"),
        }
    }
}

/// Error types for chain rule evaluation and the companion utilities
#[derive(Debug, Clone, PartialEq)]
pub enum CalculusError {
    /// index into an ordered sequence is out of range
    IndexOutOfRange { index: usize, len: usize },
    /// the list of independent variables is empty
    EmptyIndependentVariables,
    /// linear system has no unique solution for the requested unknowns
    UnsolvableSystem { unknowns: Vec<String>, reason: String },
    /// failure reported by the symbolic layer
    Collaborator { stage: Stage, message: String },
    /// expression string could not be parsed
    Parse(String),
    /// operands of incompatible shape (vector length, reference frame)
    DimensionMismatch(String),
    /// invalid configuration or log settings
    Config(String),
}

impl CalculusError {
    pub fn collaborator(stage: Stage, message: impl Into<String>) -> Self {
        CalculusError::Collaborator {
            stage,
            message: message.into(),
        }
    }
}

impl fmt::Display for CalculusError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CalculusError::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range for sequence of length {}", index, len)
            }
            CalculusError::EmptyIndependentVariables => {
                write!(f, "at least one independent variable is required")
            }
            CalculusError::UnsolvableSystem { unknowns, reason } => write!(
                f,
                "unable to solve for [{}]: {}",
                unknowns.join(", "),
                reason
            ),
            CalculusError::Collaborator { stage, message } => {
                write!(f, "{} failed: {}", stage, message)
            }
            CalculusError::Parse(msg) => write!(f, "parse error: {}", msg),
            CalculusError::DimensionMismatch(msg) => write!(f, "dimension mismatch: {}", msg),
            CalculusError::Config(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl std::error::Error for CalculusError {}
