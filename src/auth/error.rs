use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

/// Error kinds surfaced by the credential service. The boundary maps the
/// kind to a status and message; nothing downstream inspects message text.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("username already taken")]
    DuplicateUsername,
    #[error("email already registered")]
    DuplicateEmail,
    #[error("username or email already taken")]
    DuplicateKey,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    InvalidInput(String),
    #[error("invalid or expired token")]
    Unauthorized,
    #[error("storage failure")]
    Storage(#[from] sqlx::Error),
    #[error("internal error")]
    Internal(String),
}

/// Wire shape for error responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error kind.
    pub error: &'static str,
    pub message: String,
}

impl AuthError {
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "validation_error",
            AuthError::DuplicateUsername => "duplicate_username",
            AuthError::DuplicateEmail => "duplicate_email",
            AuthError::DuplicateKey => "duplicate_key",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InvalidInput(_) => "invalid_input",
            AuthError::Unauthorized => "unauthorized",
            AuthError::Storage(_) => "storage_error",
            AuthError::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) | AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AuthError::DuplicateUsername | AuthError::DuplicateEmail | AuthError::DuplicateKey => {
                StatusCode::CONFLICT
            }
            AuthError::InvalidCredentials | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::Storage(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps a failed insert to the duplicate kind named by the violated
    /// constraint. The database, not the caller's pre-check, is the final
    /// arbiter of uniqueness.
    pub fn from_create_error(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return match db_err.constraint() {
                    Some("users_username_key") => AuthError::DuplicateUsername,
                    Some("users_email_key") => AuthError::DuplicateEmail,
                    _ => AuthError::DuplicateKey,
                };
            }
        }
        AuthError::Storage(e)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = ?self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (
            status,
            Json(ErrorBody {
                error: self.kind(),
                message,
            }),
        )
            .into_response()
    }
}
