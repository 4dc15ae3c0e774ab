use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Error taxonomy shared by the table loader, the sizing core and the API.
///
/// None of these are retried: every variant is a deterministic function of
/// the input and is resolved by fixing that input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SizerError {
    /// Reference table missing, unreadable or malformed. Fatal at startup.
    #[error("Failed to load reference data: {0}")]
    DataLoad(String),

    /// Lookup key absent from the reference table.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-positive area, irradiance or demand, or unusable tile values.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SizerError {
    pub fn data_load(msg: impl Into<String>) -> Self {
        Self::DataLoad(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            SizerError::DataLoad(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SizerError::NotFound(_) => StatusCode::NOT_FOUND,
            SizerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            SizerError::DataLoad(_) => "DataLoadError",
            SizerError::NotFound(_) => "NotFoundError",
            SizerError::InvalidInput(_) => "InvalidInputError",
        }
    }
}

/// Malformed or incomplete request bodies are the caller's input error.
impl From<JsonRejection> for SizerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for SizerError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            SizerError::DataLoad(_) => {
                tracing::error!(error = %self, "reference data error while serving request");
                "An internal error occurred".to_string()
            }
            _ => {
                tracing::debug!(error = %self, "client error");
                self.to_string()
            }
        };

        let body = ErrorResponse {
            error: self.error_type().to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, SizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(SizerError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(SizerError::invalid("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            SizerError::data_load("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_display() {
        let err = SizerError::not_found("subregion 'Nowhere'");
        assert_eq!(err.to_string(), "Not found: subregion 'Nowhere'");
        assert_eq!(err.error_type(), "NotFoundError");
    }
}
