pub mod admin_service;
pub mod fund_service;
pub mod portfolio_service;
pub mod position_service;
pub mod profile_service;
