use thiserror::Error;
use validator::ValidationErrors;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid user ID")]
    InvalidId,

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Query parameter is required")]
    MissingQuery,

    #[error("User not found: {id}")]
    UserNotFound { id: i32 },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn user_not_found(id: i32) -> Self {
        Self::UserNotFound { id }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Keep the innermost cause: context layers added by the repository
    /// describe the call site, the root cause describes the failure.
    pub fn from_repo(err: anyhow::Error) -> Self {
        Self::database(err.root_cause().to_string())
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}
