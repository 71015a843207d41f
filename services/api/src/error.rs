//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and how each
//! variant is rendered as an HTTP response.

use crate::config::ConfigError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use portfolio_core::ports::PortError;
use serde::Serialize;
use std::sync::OnceLock;
use tracing::error;
use utoipa::ToSchema;

static EXPOSE_INTERNAL_DETAILS: OnceLock<bool> = OnceLock::new();

/// Opts in to sending internal error details to clients. Set once at startup,
/// only for development deployments.
pub fn expose_internal_details(expose: bool) {
    let _ = EXPOSE_INTERNAL_DETAILS.set(expose);
}

fn internal_details_exposed() -> bool {
    EXPOSE_INTERNAL_DETAILS.get().copied().unwrap_or(false)
}

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from the profile store.
    #[error(transparent)]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A request field failed its validation rule.
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    /// The request body could not be understood.
    #[error("{0}")]
    BadRequest(String),

    #[error("Route not found")]
    RouteNotFound,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// The JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human readable description.
    pub error: String,
    /// Machine readable error kind, e.g. `ValidationError`.
    pub kind: String,
    /// The offending field for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Port(PortError::NotFound(_)) | ApiError::RouteNotFound => {
                (StatusCode::NOT_FOUND, "NotFound")
            }
            ApiError::Port(PortError::InvalidIndex(_)) => (StatusCode::BAD_REQUEST, "InvalidIndex"),
            ApiError::Port(PortError::DuplicateSkill(_)) => {
                (StatusCode::BAD_REQUEST, "DuplicateSkill")
            }
            ApiError::Port(PortError::Validation { .. }) | ApiError::Validation { .. } => {
                (StatusCode::BAD_REQUEST, "ValidationError")
            }
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
            ApiError::Port(PortError::Conflict(_)) => (StatusCode::CONFLICT, "Conflict"),
            ApiError::Port(PortError::Unexpected(_))
            | ApiError::Database(_)
            | ApiError::Migration(_) => (StatusCode::INTERNAL_SERVER_ERROR, "StoreError"),
            ApiError::Config(_) | ApiError::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal")
            }
        }
    }

    fn field(&self) -> Option<&'static str> {
        match self {
            ApiError::Validation { field, .. } | ApiError::Port(PortError::Validation { field, .. }) => {
                Some(*field)
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();

        let body = if status.is_server_error() {
            error!(error = %self, kind, "request failed");
            let message = if internal_details_exposed() {
                self.to_string()
            } else {
                "Something went wrong".to_string()
            };
            ErrorBody {
                error: "Internal server error".to_string(),
                kind: kind.to_string(),
                field: None,
                message: Some(message),
            }
        } else {
            ErrorBody {
                error: self.to_string(),
                kind: kind.to_string(),
                field: self.field().map(str::to_string),
                message: None,
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfolio_core::domain::ListKind;

    #[test]
    fn port_errors_map_to_their_status() {
        let cases = [
            (ApiError::from(PortError::NotFound("No profile found".into())), StatusCode::NOT_FOUND),
            (ApiError::from(PortError::InvalidIndex(ListKind::Work)), StatusCode::BAD_REQUEST),
            (ApiError::from(PortError::DuplicateSkill("go".into())), StatusCode::BAD_REQUEST),
            (ApiError::from(PortError::Conflict("race".into())), StatusCode::CONFLICT),
            (ApiError::from(PortError::Unexpected("disk".into())), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::RouteNotFound, StatusCode::NOT_FOUND),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn invalid_index_message_names_the_list() {
        let error = ApiError::from(PortError::InvalidIndex(ListKind::Work));
        assert_eq!(error.to_string(), "Invalid work experience index");
        assert_eq!(error.status_and_kind().1, "InvalidIndex");
    }

    #[test]
    fn startup_failures_are_internal() {
        let io = ApiError::from(std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken"));
        assert_eq!(
            io.status_and_kind(),
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal")
        );
        let config = ApiError::from(ConfigError::MissingVar("DATABASE_URL".into()));
        assert_eq!(config.status_and_kind().1, "Internal");
    }

    #[test]
    fn validation_errors_carry_the_field() {
        let error = ApiError::Validation {
            field: "email",
            message: "Valid email is required".into(),
        };
        assert_eq!(error.field(), Some("email"));
        assert_eq!(error.status_and_kind(), (StatusCode::BAD_REQUEST, "ValidationError"));
    }
}
