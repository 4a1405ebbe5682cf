use crate::contract::model::{NewUser, User};
use async_trait::async_trait;

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Persist a new user; the store assigns the id.
    async fn insert(&self, new_user: NewUser) -> anyhow::Result<User>;
    /// Load a user by id.
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>>;
    /// Replace name and email of an existing user. `None` if no row has that id.
    async fn update(&self, id: i32, data: NewUser) -> anyhow::Result<Option<User>>;
    /// Delete by id. Returns true if a row was deleted.
    async fn delete(&self, id: i32) -> anyhow::Result<bool>;
    /// Every user, ordered by id.
    async fn list_all(&self) -> anyhow::Result<Vec<User>>;
    /// Users whose name or email contains `needle`, ignoring case.
    async fn search(&self, needle: &str) -> anyhow::Result<Vec<User>>;
}
