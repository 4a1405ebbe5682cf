use sea_orm_migration::{MigrationTrait, MigratorTrait};

mod initial_001;

/// Schema history of the users store, applied in order.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(initial_001::Migration)]
    }
}
