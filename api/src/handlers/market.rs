use axum::extract::State;
use axum::Json;
use shared::MarketQuote;
use tracing::warn;

use crate::state::AppState;

/// Live listings from the market-data proxy. The ticker is purely
/// informational, so provider outages degrade to an empty set.
pub async fn quotes(State(state): State<AppState>) -> Json<Vec<MarketQuote>> {
    match state.market.quotes().await {
        Ok(quotes) => Json(quotes),
        Err(e) => {
            warn!("Failed to fetch market quotes: {}", e);
            Json(Vec::new())
        }
    }
}
