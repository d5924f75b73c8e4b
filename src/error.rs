use thiserror::Error;

/// Request-path failures, each carrying the numeric status class the
/// service reports to clients.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("400: {0}")]
    InvalidParameter(String),

    #[error("400: Both reaches and nodes are false.  At least one must be set to true.")]
    InvalidCombination,

    #[error("404: Results with the specified {parameter} {value} were not found.")]
    NotFound { parameter: &'static str, value: String },

    #[error("422: {0}")]
    MalformedGeometry(String),

    #[error("503: {0}")]
    StoreUnavailable(String),

    #[error("500: {0}")]
    StoreQueryFailure(String),
}

impl ServiceError {
    pub fn status(&self) -> u16 {
        match self {
            ServiceError::InvalidParameter(_) => 400,
            ServiceError::InvalidCombination => 400,
            ServiceError::NotFound { .. } => 404,
            ServiceError::MalformedGeometry(_) => 422,
            ServiceError::StoreUnavailable(_) => 503,
            ServiceError::StoreQueryFailure(_) => 500,
        }
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(err: rusqlite::Error) -> Self {
        ServiceError::StoreQueryFailure(err.to_string())
    }
}
