use std::sync::Arc;

use crate::contract::model::{NewUser, User};
use crate::domain::error::DomainError;
use crate::domain::repo::UsersRepository;
use tracing::{debug, info, instrument};

/// Domain service for user management.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
}

impl Service {
    pub fn new(repo: Arc<dyn UsersRepository>) -> Self {
        Self { repo }
    }

    #[instrument(
        name = "users.service.create_user",
        skip(self, new_user),
        fields(email = %new_user.email)
    )]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");

        let user = self
            .repo
            .insert(new_user)
            .await
            .map_err(DomainError::from_repo)?;

        info!("Successfully created user with id={}", user.id);
        Ok(user)
    }

    #[instrument(name = "users.service.get_user", skip(self), fields(user_id = id))]
    pub async fn get_user(&self, id: i32) -> Result<User, DomainError> {
        debug!("Getting user by id");

        self.repo
            .find_by_id(id)
            .await
            .map_err(DomainError::from_repo)?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    #[instrument(name = "users.service.update_user", skip(self, data), fields(user_id = id))]
    pub async fn update_user(&self, id: i32, data: NewUser) -> Result<User, DomainError> {
        info!("Updating user");

        let user = self
            .repo
            .update(id, data)
            .await
            .map_err(DomainError::from_repo)?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        info!("Successfully updated user");
        Ok(user)
    }

    #[instrument(name = "users.service.delete_user", skip(self), fields(user_id = id))]
    pub async fn delete_user(&self, id: i32) -> Result<(), DomainError> {
        info!("Deleting user");

        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(DomainError::from_repo)?;
        if !deleted {
            return Err(DomainError::user_not_found(id));
        }

        info!("Successfully deleted user");
        Ok(())
    }

    /// All users; the result set is unbounded.
    #[instrument(name = "users.service.list_users", skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let users = self.repo.list_all().await.map_err(DomainError::from_repo)?;
        debug!("Listed {} users", users.len());
        Ok(users)
    }

    #[instrument(name = "users.service.search_users", skip(self))]
    pub async fn search_users(&self, query: &str) -> Result<Vec<User>, DomainError> {
        if query.trim().is_empty() {
            return Err(DomainError::MissingQuery);
        }

        let users = self
            .repo
            .search(query)
            .await
            .map_err(DomainError::from_repo)?;
        debug!("Search matched {} users", users.len());
        Ok(users)
    }
}
