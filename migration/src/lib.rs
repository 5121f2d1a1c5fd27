pub use sea_orm_migration::prelude::*;

mod m20250115_000001_create_profiles_and_wallets;
mod m20250116_000001_create_portfolio_positions;
mod m20250117_000001_create_bank_accounts;
mod m20250118_000001_create_fund_requests;
mod m20250119_000001_create_transactions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250115_000001_create_profiles_and_wallets::Migration),
            Box::new(m20250116_000001_create_portfolio_positions::Migration),
            Box::new(m20250117_000001_create_bank_accounts::Migration),
            Box::new(m20250118_000001_create_fund_requests::Migration),
            Box::new(m20250119_000001_create_transactions::Migration),
        ]
    }
}
