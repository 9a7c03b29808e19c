/// Error types for blog-service
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Referenced entity does not exist; the boundary renders this as 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Write attempted without a signed-in user. `next` is the destination
    /// the caller was heading for, so the boundary can redirect to
    /// login?next={next}.
    #[error("Authentication required (next: {next})")]
    Unauthenticated { next: String },

    /// Field-level rejection; no record is created.
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Users cannot follow themselves")]
    SelfFollow,

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl AppError {
    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_carries_destination() {
        let err = AppError::Unauthenticated {
            next: "/alice/follow/".into(),
        };
        assert!(err.to_string().contains("/alice/follow/"));
    }

    #[test]
    fn validation_names_the_field() {
        let err = AppError::validation("text", "must not be empty");
        assert!(err.to_string().contains("'text'"));
    }
}
