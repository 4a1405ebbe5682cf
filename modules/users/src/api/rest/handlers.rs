use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    response::Json,
    Extension,
};
use tracing::{error, info, warn};

use crate::api::rest::dto::UserDto;
use crate::api::rest::error::ApiError;
use crate::api::rest::payload::{SearchParams, UserPayload};
use crate::domain::error::DomainError;
use crate::domain::id::parse_user_id;
use crate::domain::service::Service;
use crate::domain::validation::validate_user;

/// List every user
pub async fn list_users(
    Extension(svc): Extension<Arc<Service>>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    info!("Listing users");

    match svc.list_users().await {
        Ok(users) => Ok(Json(users.into_iter().map(UserDto::from).collect())),
        Err(e) => {
            error!("Failed to list users: {}", e);
            Err(e.into())
        }
    }
}

/// Case-insensitive substring search over name and email
pub async fn search_users(
    Extension(svc): Extension<Arc<Service>>,
    SearchParams(params): SearchParams,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let query = params.query.unwrap_or_default();
    info!("Searching users with query: {:?}", query);

    match svc.search_users(&query).await {
        Ok(users) => Ok(Json(users.into_iter().map(UserDto::from).collect())),
        Err(e @ DomainError::MissingQuery) => Err(e.into()),
        Err(e) => {
            error!("Failed to search users: {}", e);
            Err(e.into())
        }
    }
}

/// Get a specific user by ID
pub async fn get_user(
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
) -> Result<Json<UserDto>, ApiError> {
    let id = parse_user_id(&raw_id)?;
    info!("Getting user with id: {}", id);

    match svc.get_user(id).await {
        Ok(user) => Ok(Json(UserDto::from(user))),
        Err(e @ DomainError::UserNotFound { .. }) => Err(e.into()),
        Err(e) => {
            error!("Failed to get user {}: {}", id, e);
            Err(e.into())
        }
    }
}

/// Create a new user
pub async fn create_user(
    Extension(svc): Extension<Arc<Service>>,
    UserPayload(body): UserPayload,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let new_user = validate_user(&body).map_err(|errors| {
        warn!("Rejected user creation: {}", errors);
        DomainError::from(errors)
    })?;
    info!("Creating user: {:?}", new_user);

    match svc.create_user(new_user).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(UserDto::from(user)))),
        Err(e) => {
            error!("Failed to create user: {}", e);
            Err(e.into())
        }
    }
}

/// Replace name and email of an existing user
pub async fn update_user(
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
    UserPayload(body): UserPayload,
) -> Result<Json<UserDto>, ApiError> {
    let id = parse_user_id(&raw_id)?;
    let data = validate_user(&body).map_err(|errors| {
        warn!("Rejected update of user {}: {}", id, errors);
        DomainError::from(errors)
    })?;
    info!("Updating user {} with: {:?}", id, data);

    match svc.update_user(id, data).await {
        Ok(user) => Ok(Json(UserDto::from(user))),
        Err(e @ DomainError::UserNotFound { .. }) => Err(e.into()),
        Err(e) => {
            error!("Failed to update user {}: {}", id, e);
            Err(e.into())
        }
    }
}

/// Delete a user by ID
pub async fn delete_user(
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_user_id(&raw_id)?;
    info!("Deleting user: {}", id);

    match svc.delete_user(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e @ DomainError::UserNotFound { .. }) => Err(e.into()),
        Err(e) => {
            error!("Failed to delete user {}: {}", id, e);
            Err(e.into())
        }
    }
}
