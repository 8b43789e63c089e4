use strum::{EnumIs, EnumTryAs};
use thiserror::Error;

/// Errors reported by the OpenMath engine.
///
/// Failures are values: the first violation found is propagated unchanged to
/// the caller, and the tree a failed operation was applied to is left exactly
/// as it was.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs, Error)]
pub enum OmError {
    /// The external representation is not well-formed (bad JSON, compact text
    /// that cannot be tokenized or parsed, malformed address tag).
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// The input is well-formed but violates an invariant of the data model.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A mutation whose preconditions are not met. No mutation was performed.
    #[error("Operation refused: {0}")]
    OperationRefused(String),
}

impl OmError {
    /// The human-readable reason, without the category prefix.
    pub fn reason(&self) -> &str {
        match self {
            OmError::Syntax(reason)
            | OmError::Validation(reason)
            | OmError::OperationRefused(reason) => reason,
        }
    }
}

impl From<serde_json::Error> for OmError {
    fn from(err: serde_json::Error) -> Self {
        OmError::Syntax(err.to_string())
    }
}

pub type OmResult<T> = Result<T, OmError>;
