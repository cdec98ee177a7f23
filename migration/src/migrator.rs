use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202510150001_create_users::Migration),
            Box::new(migrations::m202510150002_create_events::Migration),
            Box::new(migrations::m202510150003_create_sessional_marks::Migration),
            Box::new(migrations::m202510150004_create_notifications::Migration),
        ]
    }
}
