pub use sea_orm_migration::prelude::*;

mod m20250123_000001_create_tables;
mod m20250201_000001_create_gamification;
mod m20250215_000001_create_integrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250123_000001_create_tables::Migration),
            Box::new(m20250201_000001_create_gamification::Migration),
            Box::new(m20250215_000001_create_integrations::Migration),
        ]
    }
}
