use thiserror::Error;

/// Main error type for the itinerary pipeline and its collaborators
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Repair failed: {0}")]
    Repair(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Coordinate lookup missed: {0}")]
    Enrichment(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    /// Whether the pipeline recovers from this error by falling through to the next stage.
    ///
    /// Transport failures are not recoverable inside the core; the caller
    /// switches to the mock generator instead.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PlannerError::Serialization(_)
                | PlannerError::Extraction(_)
                | PlannerError::Repair(_)
                | PlannerError::Validation(_)
                | PlannerError::Enrichment(_)
        )
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            PlannerError::Config(_) => "CONFIG_ERROR",
            PlannerError::Serialization(_) => "SERIALIZATION_ERROR",
            PlannerError::Extraction(_) => "EXTRACTION_FAILURE",
            PlannerError::Repair(_) => "REPAIR_FAILURE",
            PlannerError::Validation(_) => "VALIDATION_FAILURE",
            PlannerError::Enrichment(_) => "ENRICHMENT_MISS",
            PlannerError::Transport(_) => "TRANSPORT_ERROR",
            PlannerError::InvalidRequest(_) => "INVALID_REQUEST",
            PlannerError::Unknown(_) => "UNKNOWN_ERROR",
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "recoverable": self.is_recoverable()
            }
        })
    }
}
