//! Error types for the yield engine.

use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised by the projection, allocation and catalog layers.
///
/// Degenerate ratios (zero contributions, zero portfolio value) are not errors;
/// they surface as `None` on the affected fields.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A plan or protocol field failed validation.
    #[error("Invalid input for {field}: {message}")]
    InvalidInput { field: &'static str, message: String },

    /// Risk or liquidity tier label not recognised.
    #[error("Unknown tier: {0}")]
    UnknownTier(String),

    /// Risk profile label not recognised.
    #[error("Unknown risk profile: {0}")]
    UnknownRiskProfile(String),

    /// Two catalog entries share a name.
    #[error("Duplicate protocol in catalog: {0}")]
    DuplicateProtocol(String),

    /// A selected protocol is missing from the catalog.
    #[error("Unknown protocol: {0}")]
    UnknownProtocol(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Create an invalid input error.
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }
}

/// Reject negative, NaN and infinite amounts.
pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(EngineError::invalid_input(field, format!("must be finite, got {}", value)));
    }
    if value < 0.0 {
        return Err(EngineError::invalid_input(field, format!("must be >= 0, got {}", value)));
    }
    Ok(())
}
