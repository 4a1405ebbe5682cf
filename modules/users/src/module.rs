use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::api::rest::routes;
use crate::domain::service::Service;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_repo::SeaOrmUsersRepository;

/// Wiring for the users resource: owns the connection handle and the domain
/// service built on top of it.
#[derive(Clone)]
pub struct UsersModule {
    db: DatabaseConnection,
    service: Arc<Service>,
}

impl UsersModule {
    pub fn new(db: DatabaseConnection) -> Self {
        info!("Initializing users module");

        // Wire repository (infra) to domain service (port)
        let repo = SeaOrmUsersRepository::new(db.clone());
        let service = Arc::new(Service::new(Arc::new(repo)));
        Self { db, service }
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// Bring the `users` table up to date.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        info!("Running users database migrations");
        Migrator::up(&self.db, None).await?;
        info!("Users database migrations completed successfully");
        Ok(())
    }

    pub fn register_rest(&self, router: Router) -> Router {
        info!("Registering users REST routes");
        routes::register_routes(router, self.service())
    }
}
