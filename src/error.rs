use std::fmt;

/// Result type for lander operations
pub type Result<T> = std::result::Result<T, LanderError>;

/// Main error type for the lander crate
#[derive(Debug, Clone, PartialEq)]
pub enum LanderError {
    /// Sampling asked for more transitions than the memory holds
    InsufficientData {
        requested: usize,
        available: usize,
    },

    /// Invalid dimensions for operations
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Invalid parameter value
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Invalid action
    InvalidAction {
        action: usize,
        max_actions: usize,
    },

    /// Failure reported by an environment
    Environment(String),

    /// Numerical computation errors
    NumericalError(String),

    /// IO errors (file operations)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),
}

impl fmt::Display for LanderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanderError::InsufficientData { requested, available } => {
                write!(f, "Insufficient data: requested {} transitions, only {} stored", requested, available)
            }
            LanderError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, actual)
            }
            LanderError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            LanderError::InvalidAction { action, max_actions } => {
                write!(f, "Invalid action {}: must be less than {}", action, max_actions)
            }
            LanderError::Environment(msg) => write!(f, "Environment error: {}", msg),
            LanderError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            LanderError::IoError(msg) => write!(f, "IO error: {}", msg),
            LanderError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for LanderError {}

impl From<std::io::Error> for LanderError {
    fn from(err: std::io::Error) -> Self {
        LanderError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for LanderError {
    fn from(err: serde_json::Error) -> Self {
        LanderError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for LanderError {
    fn from(err: ndarray::ShapeError) -> Self {
        LanderError::DimensionMismatch {
            expected: "compatible shape".to_string(),
            actual: err.to_string(),
        }
    }
}

// Helper functions for common error patterns
impl LanderError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        LanderError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        LanderError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
