use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanSimError {
    #[error("Invalid parameter: {field} — {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Missing product: {0}")]
    MissingProduct(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LoanSimError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        LoanSimError::InvalidParameter {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for LoanSimError {
    fn from(e: serde_json::Error) -> Self {
        LoanSimError::SerializationError(e.to_string())
    }
}
