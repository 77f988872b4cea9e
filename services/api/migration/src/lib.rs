pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users;
mod m20250101_000002_create_rides;
mod m20250101_000003_create_admin_actions;
mod m20250101_000004_add_ride_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users::Migration),
            Box::new(m20250101_000002_create_rides::Migration),
            Box::new(m20250101_000003_create_admin_actions::Migration),
            Box::new(m20250101_000004_add_ride_indexes::Migration),
        ]
    }
}
