use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Validation failed: {}", .0.join(". "))]
    ValidationFailed(Vec<String>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Aggregate recompute failed: {0}")]
    AggregateRecomputeFailed(String),

    #[error("Collection not found: {0}")]
    NoSuchCollection(String),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status a transport layer should answer with. Client-caused
    /// taxonomy members map to 4xx; anything unclassified is a 500.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidQuery(_) | Self::ValidationFailed(_) => 400,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::AggregateRecomputeFailed(_) | Self::NoSuchCollection(_) | Self::Json(_) => 500,
        }
    }

    /// Whether the error is safe to describe to the client verbatim.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
