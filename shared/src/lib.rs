pub mod database;
pub mod redis;
pub mod config;
pub mod error;
pub mod market;
pub mod entity;

pub use database::{get_pool, get_db_connection, DbPool};
pub use redis::{get_redis_client, Redis};
pub use config::Config;
pub use error::ServiceError;
pub use market::{MarketDataClient, MarketQuote};
