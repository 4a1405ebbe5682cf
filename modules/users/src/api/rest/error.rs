use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::rest::dto::{ErrorBody, FieldErrorsBody};
use crate::domain::error::DomainError;
use crate::domain::validation::format_errors;

pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";
pub const USER_NOT_FOUND: &str = "User not found";
pub const INVALID_BODY: &str = "Invalid request body";
pub const INVALID_QUERY: &str = "Invalid query string";

/// Transport-level error rendered as the JSON bodies clients expect.
#[derive(Debug)]
pub enum ApiError {
    /// 400 `{"errors": {...}}`
    Fields(BTreeMap<String, String>),
    /// 400 `{"error": "..."}`
    BadRequest(String),
    /// 404 `{"error": "..."}`
    NotFound(String),
    /// 500 `{"error": "..."}`
    Internal(String),
}

impl ApiError {
    pub fn invalid_body() -> Self {
        Self::BadRequest(INVALID_BODY.to_string())
    }

    pub fn invalid_query() -> Self {
        Self::BadRequest(INVALID_QUERY.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Fields(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(errors) => Self::Fields(format_errors(&errors)),
            DomainError::InvalidId | DomainError::MissingQuery => Self::BadRequest(e.to_string()),
            DomainError::UserNotFound { .. } => Self::NotFound(USER_NOT_FOUND.to_string()),
            DomainError::Database { message } if !message.trim().is_empty() => {
                Self::Internal(message)
            }
            DomainError::Database { .. } => Self::Internal(INTERNAL_SERVER_ERROR.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Fields(errors) => (status, Json(FieldErrorsBody { errors })).into_response(),
            Self::BadRequest(error) | Self::NotFound(error) | Self::Internal(error) => {
                (status, Json(ErrorBody { error })).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    #[test]
    fn maps_domain_errors_to_status() {
        let mut v = ValidationErrors::new();
        v.add("name", ValidationError::new("required"));

        let cases = [
            (DomainError::Validation(v), StatusCode::BAD_REQUEST),
            (DomainError::InvalidId, StatusCode::BAD_REQUEST),
            (DomainError::MissingQuery, StatusCode::BAD_REQUEST),
            (DomainError::user_not_found(1), StatusCode::NOT_FOUND),
            (
                DomainError::database("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (domain, status) in cases {
            assert_eq!(ApiError::from(domain).into_response().status(), status);
        }
    }

    #[test]
    fn database_message_falls_back_to_generic() {
        match ApiError::from(DomainError::database("  ")) {
            ApiError::Internal(msg) => assert_eq!(msg, INTERNAL_SERVER_ERROR),
            other => panic!("unexpected: {other:?}"),
        }
        match ApiError::from(DomainError::database("connection refused")) {
            ApiError::Internal(msg) => assert_eq!(msg, "connection refused"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn not_found_uses_fixed_message() {
        match ApiError::from(DomainError::user_not_found(99)) {
            ApiError::NotFound(msg) => assert_eq!(msg, USER_NOT_FOUND),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
