//! Error types for the nonhomogeneous wind analysis

use thiserror::Error;

/// Main error type for nonhomogeneous wind operations
#[derive(Error, Debug)]
pub enum NwError {
    #[error("Node sets do not share the same arc: {0}")]
    GeometryMismatch(String),

    #[error("Shape mismatch in {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    #[error("Configuration mismatch: {0}")]
    ConfigurationMismatch(String),

    #[error("Singular stiffness matrix - structural model is not invertible")]
    SingularSystem,

    #[error("Runtime invariant violated: {0}")]
    InvariantViolated(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl NwError {
    /// Shorthand for a [`NwError::ShapeMismatch`]
    pub fn shape(what: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::ShapeMismatch {
            what: what.into(),
            expected,
            found,
        }
    }
}

/// Result type for nonhomogeneous wind operations
pub type NwResult<T> = Result<T, NwError>;

/// Fail with a [`NwError::ShapeMismatch`] unless `found == expected`
pub(crate) fn ensure_len(what: &str, expected: usize, found: usize) -> NwResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(NwError::shape(what, expected, found))
    }
}
