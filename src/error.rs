//! Error types for the translation core and HTTP-facing error mapping.

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::Serialize;

/// Failures surfaced by the translation resolver.
///
/// Every variant is recoverable at the call site: callers show the message
/// and keep their prior state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    #[error("Please enter some text")]
    EmptyInput,
    #[error("unsupported target language {code:?}")]
    UnsupportedLanguage { code: String },
    #[error("No offline translation available for this text")]
    NoOfflineTranslation,
    #[error("{message}")]
    ProviderError { message: String },
}

/// Error reported by a remote translation provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProviderFailure {
    pub message: String,
}

impl ProviderFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<ProviderFailure> for TranslateError {
    fn from(failure: ProviderFailure) -> Self {
        Self::ProviderError {
            message: failure.message,
        }
    }
}

/// Error model used by configuration loading and the HTTP proxy.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    InvalidRequest { message: String, status: StatusCode },
    #[error("{0}")]
    RateLimited(String),
    #[error("translation failed: {0}")]
    Provider(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Creates a client error with status `400`.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
            status: StatusCode::BAD_REQUEST,
        }
    }

    /// Creates a `429 Too Many Requests` error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited(message.into())
    }

    /// Creates an upstream translation failure.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    /// Creates a generic internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

#[derive(Debug, Serialize)]
struct ErrorPayload {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, payload) = match self {
            AppError::InvalidRequest { message, status } => (
                status,
                ErrorPayload {
                    error: message,
                    message: None,
                },
            ),
            AppError::RateLimited(message) => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorPayload {
                    error: message,
                    message: None,
                },
            ),
            AppError::Provider(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorPayload {
                    error: "Translation failed".to_string(),
                    message: Some(message),
                },
            ),
            AppError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorPayload {
                    error: message,
                    message: None,
                },
            ),
        };

        (status, Json(payload)).into_response()
    }
}
