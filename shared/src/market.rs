use anyhow::Result;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::redis::Redis;

const QUOTES_CACHE_KEY: &str = "market:quotes";

/// Flattened listing row from the CoinMarketCap proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketQuote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub percent_change_24h: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
}

#[derive(Debug, Deserialize)]
struct CmcListing {
    name: String,
    symbol: String,
    quote: HashMap<String, CmcQuote>,
}

#[derive(Debug, Deserialize)]
struct CmcQuote {
    price: f64,
    #[serde(default)]
    percent_change_24h: f64,
    #[serde(default)]
    market_cap: f64,
    #[serde(default)]
    volume_24h: f64,
}

#[derive(Debug, Deserialize)]
struct CmcResponse {
    data: Vec<CmcListing>,
}

/// Client for the CoinMarketCap-style proxy, with a short-TTL redis
/// cache in front. Cache failures degrade to a direct fetch.
#[derive(Clone)]
pub struct MarketDataClient {
    pub base_url: String,
    pub convert: String,
    redis: Option<Redis>,
    cache_ttl_secs: u64,
}

impl MarketDataClient {
    pub fn new(base_url: String, redis: Option<Redis>, cache_ttl_secs: u64) -> Self {
        Self {
            base_url,
            convert: "USD".to_string(),
            redis,
            cache_ttl_secs,
        }
    }

    pub async fn quotes(&self) -> Result<Vec<MarketQuote>> {
        if let Some(cached) = self.read_cache().await {
            return Ok(cached);
        }

        let quotes = self.fetch().await?;
        self.write_cache(&quotes).await;
        Ok(quotes)
    }

    async fn fetch(&self) -> Result<Vec<MarketQuote>> {
        let client = reqwest::Client::new();
        let response = client
            .get(&self.base_url)
            .query(&[("limit", "20"), ("convert", self.convert.as_str())])
            .send()
            .await?;

        let body: CmcResponse = response.json().await?;
        let quotes = body
            .data
            .into_iter()
            .filter_map(|listing| {
                let quote = listing.quote.get(&self.convert)?;
                Some(MarketQuote {
                    symbol: listing.symbol.clone(),
                    name: listing.name.clone(),
                    price: quote.price,
                    percent_change_24h: quote.percent_change_24h,
                    market_cap: quote.market_cap,
                    volume_24h: quote.volume_24h,
                })
            })
            .collect();
        Ok(quotes)
    }

    async fn read_cache(&self) -> Option<Vec<MarketQuote>> {
        let client = self.redis.as_ref()?;
        let mut conn = match client.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Redis unavailable, fetching quotes directly: {}", e);
                return None;
            }
        };
        let raw: Option<String> = conn.get(QUOTES_CACHE_KEY).await.ok()?;
        serde_json::from_str(&raw?).ok()
    }

    async fn write_cache(&self, quotes: &[MarketQuote]) {
        let Some(client) = self.redis.as_ref() else {
            return;
        };
        let Ok(json) = serde_json::to_string(quotes) else {
            return;
        };
        match client.get_multiplexed_async_connection().await {
            Ok(mut conn) => {
                let result: Result<(), redis::RedisError> =
                    conn.set_ex(QUOTES_CACHE_KEY, json, self.cache_ttl_secs).await;
                if let Err(e) = result {
                    warn!("Failed to cache market quotes: {}", e);
                }
            }
            Err(e) => warn!("Redis unavailable, skipping quote cache: {}", e),
        }
    }
}
