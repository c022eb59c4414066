use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrowliError {
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Tier sequence error: expected an outcome from {expected}, found {found}")]
    TierSequence { expected: String, found: String },

    #[error("Indicator '{0}' was already recorded by an earlier tier")]
    IndicatorOverwrite(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for GrowliError {
    fn from(e: serde_json::Error) -> Self {
        GrowliError::SerializationError(e.to_string())
    }
}
