use sea_orm_migration::prelude::*;

mod m20250701_000001_create_users_and_doctors;
mod m20250701_000002_create_notifications_and_appointments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250701_000001_create_users_and_doctors::Migration),
            Box::new(m20250701_000002_create_notifications_and_appointments::Migration),
        ]
    }
}
