pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_transactions;
mod m20250601_000002_create_scenarios;
mod m20250601_000003_create_budgets_and_goals;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_transactions::Migration),
            Box::new(m20250601_000002_create_scenarios::Migration),
            Box::new(m20250601_000003_create_budgets_and_goals::Migration),
        ]
    }
}
