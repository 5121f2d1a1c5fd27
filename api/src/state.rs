use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use shared::{get_db_connection, get_pool, get_redis_client, Config, DbPool, MarketDataClient};
use std::sync::Arc;

use crate::services::profile_service::ProfileService;

#[derive(Clone)]
pub struct AppState {
    pub bind_addr: String,
    pub pool: DbPool,
    pub db: Arc<DatabaseConnection>,
    pub market: MarketDataClient,
    pub profile_service: Arc<ProfileService>,
    pub starting_balance: Decimal,
    pub short_pnl_inverted: bool,
}

impl AppState {
    pub async fn new() -> Result<Self, anyhow::Error> {
        let config = Config::from_env()?;
        let pool = get_pool(&config.database_url).await?;
        let db = Arc::new(get_db_connection(&config.database_url).await?);
        tracing::info!("Connected to database successfully");

        let redis = match get_redis_client(&config.redis_url) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!("Redis unavailable, market quotes will not be cached: {}", e);
                None
            }
        };
        let market = MarketDataClient::new(
            config.market_data_url.clone(),
            redis,
            config.market_cache_ttl_secs,
        );

        let profile_service = Arc::new(ProfileService::new(
            db.clone(),
            config.starting_balance,
            config.wallet_currency.clone(),
        ));

        Ok(AppState {
            bind_addr: config.bind_addr.clone(),
            pool,
            db,
            market,
            profile_service,
            starting_balance: config.starting_balance,
            short_pnl_inverted: config.short_pnl_inverted,
        })
    }
}
