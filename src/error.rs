use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::models::quiz_question::QuestionShapeError;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by a question generation provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("Rate limit exceeded. Please try again in a few moments.")]
    RateLimited,

    #[error("Invalid provider API key. Please check your configuration.")]
    AuthInvalid,

    #[error("Question generation service error: {0}")]
    Service(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {message}")]
    BadRequest { code: &'static str, message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { code: &'static str, message: String },

    #[error("Not found: {message}")]
    NotFound { code: &'static str, message: String },

    #[error("Conflict: {message}")]
    Conflict { code: &'static str, message: String },

    #[error("Too many requests: {0}")]
    RateLimited(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Error::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Error::Unauthorized {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Error::NotFound {
            code,
            message: message.into(),
        }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Error::Conflict {
            code,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. } | Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Conflict { .. } => StatusCode::CONFLICT,
            Error::RateLimited(_) | Error::Generation(GenerationError::RateLimited) => {
                StatusCode::TOO_MANY_REQUESTS
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Error::BadRequest { code, .. }
            | Error::Unauthorized { code, .. }
            | Error::NotFound { code, .. }
            | Error::Conflict { code, .. } => *code,
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::RateLimited(_) | Error::Generation(GenerationError::RateLimited) => {
                "RATE_LIMITED"
            }
            Error::Generation(GenerationError::AuthInvalid) => "PROVIDER_CONFIG_ERROR",
            Error::Generation(GenerationError::Service(_)) => "GENERATION_FAILED",
            Error::Config(_) => "CONFIG_ERROR",
            _ => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let code = self.code();
        let error_message = match &self {
            Error::BadRequest { message, .. }
            | Error::Unauthorized { message, .. }
            | Error::NotFound { message, .. }
            | Error::Conflict { message, .. } => message.clone(),
            Error::Validation(err) => err.to_string(),
            Error::RateLimited(msg) => msg.clone(),
            Error::Generation(GenerationError::RateLimited) => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            Error::Generation(GenerationError::AuthInvalid) => {
                tracing::error!(error = %self, "Question provider rejected credentials");
                "API configuration error. Please contact support.".to_string()
            }
            Error::Generation(GenerationError::Service(_)) => {
                tracing::error!(error = %self, "Question generation failed");
                "Failed to generate quiz questions. Please try again.".to_string()
            }
            _ => {
                tracing::error!(error = %self, "Internal server error");
                "An unexpected error occurred".to_string()
            }
        };

        let body = Json(json!({ "error": error_message, "code": code }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::not_found("NOT_FOUND", "Resource not found"),
            other => Error::Database(other),
        }
    }
}

impl From<QuestionShapeError> for Error {
    fn from(err: QuestionShapeError) -> Self {
        Error::Internal(format!("Stored quiz question is malformed: {}", err))
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::bad_request("INVALID_JSON", rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::bad_request("INVALID_ID", rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::bad_request("INVALID_QUERY", rejection.body_text())
    }
}
