use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Invalid request parameter or payload value
    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    /// Creating a resource that already carries an identifier
    #[error("Cannot create existing resource: {0}")]
    ResourceExists(String),

    /// Identifier does not resolve to a stored resource
    #[error("Invalid resource ID: {0}")]
    InvalidId(String),

    /// Deletion attempted without force on a resource with no trash state
    #[error("Trashing not supported: {0}")]
    TrashNotSupported(String),

    /// Delete executed but affected no storage rows
    #[error("The resource cannot be deleted: {0}")]
    CannotDelete(String),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Machine-readable code surfaced in the error envelope
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidParam(_) => "invalid_param",
            AppError::ResourceExists(_) => "resource_exists",
            AppError::InvalidId(_) => "invalid_id",
            AppError::TrashNotSupported(_) => "trash_not_supported",
            AppError::CannotDelete(_) => "cannot_delete",
            AppError::Database(_) => "database_error",
            AppError::Configuration(_) => "configuration_error",
            AppError::Json(_) => "json_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidParam(_) => StatusCode::BAD_REQUEST,
            AppError::ResourceExists(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidId(_) => StatusCode::NOT_FOUND,
            AppError::TrashNotSupported(_) => StatusCode::NOT_IMPLEMENTED,
            AppError::CannotDelete(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn invalid_param(msg: impl Into<String>) -> Self {
        AppError::InvalidParam(msg.into())
    }

    pub fn invalid_id(resource: impl Into<String>) -> Self {
        AppError::InvalidId(resource.into())
    }

    pub fn resource_exists(msg: impl Into<String>) -> Self {
        AppError::ResourceExists(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
