pub mod profiles;
pub mod wallets;
pub mod portfolio_positions;
pub mod deposit_requests;
pub mod withdrawal_requests;
pub mod transactions;
pub mod bank_accounts;
pub mod payment_settings;
pub mod role_assignments;
