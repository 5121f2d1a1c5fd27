//! Read-side portfolio aggregation. Nothing here is persisted; the
//! summary is recomputed from open positions and live quotes on every
//! read.

use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use shared::entity::portfolio_positions;
use shared::{MarketDataClient, MarketQuote, ServiceError};
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

use crate::services::position_service;

#[derive(Debug, Clone, Serialize)]
pub struct PositionValuation {
    pub id: Uuid,
    pub symbol: String,
    pub coin_name: String,
    pub position_type: String,
    pub amount: Decimal,
    pub buy_price: Decimal,
    pub current_price: Decimal,
    pub value: Decimal,
    pub pnl: Decimal,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct PortfolioSummary {
    pub open_positions: usize,
    pub total_value: Decimal,
    pub total_pnl: Decimal,
    pub pnl_percent: Decimal,
    pub positions: Vec<PositionValuation>,
}

/// Value a single position. Effective price is the live quote when the
/// symbol has one, else the stored current price, else the buy price
/// (which makes P&L exactly zero).
pub fn value_position(
    position: &portfolio_positions::Model,
    live_price: Option<Decimal>,
    short_pnl_inverted: bool,
) -> PositionValuation {
    let effective = live_price
        .or(position.current_price)
        .unwrap_or(position.buy_price);

    let gross = (effective - position.buy_price) * position.amount;
    let pnl = if short_pnl_inverted && position.position_type == "short" {
        -gross
    } else {
        gross
    };

    PositionValuation {
        id: position.id,
        symbol: position.symbol.clone(),
        coin_name: position.coin_name.clone(),
        position_type: position.position_type.clone(),
        amount: position.amount,
        buy_price: position.buy_price,
        current_price: effective,
        value: effective * position.amount,
        pnl,
    }
}

/// Aggregate open positions against a quote set.
pub fn summarize(
    positions: &[portfolio_positions::Model],
    quotes: &[MarketQuote],
    short_pnl_inverted: bool,
) -> PortfolioSummary {
    let prices: HashMap<&str, Decimal> = quotes
        .iter()
        .filter_map(|q| Decimal::from_f64_retain(q.price).map(|p| (q.symbol.as_str(), p)))
        .collect();

    let mut summary = PortfolioSummary::default();
    for position in positions {
        if position.status != "open" {
            continue;
        }
        let valuation = value_position(
            position,
            prices.get(position.symbol.as_str()).copied(),
            short_pnl_inverted,
        );
        summary.total_value += valuation.value;
        summary.total_pnl += valuation.pnl;
        summary.positions.push(valuation);
    }
    summary.open_positions = summary.positions.len();

    // Percentage against the cost basis; guarded so a portfolio that is
    // all profit (or empty) reports 0 instead of dividing by zero.
    if summary.total_value > summary.total_pnl {
        let basis = summary.total_value - summary.total_pnl;
        summary.pnl_percent = summary.total_pnl / basis * Decimal::new(100, 0);
    }

    summary
}

/// Full summary for the caller: open positions joined with live quotes.
/// Market-data failures degrade to stored prices rather than erroring.
pub async fn portfolio_summary(
    db: &DatabaseConnection,
    user_id: Uuid,
    market: &MarketDataClient,
    short_pnl_inverted: bool,
) -> Result<PortfolioSummary, ServiceError> {
    let positions = position_service::list_open_positions(db, user_id).await?;
    let quotes = match market.quotes().await {
        Ok(quotes) => quotes,
        Err(e) => {
            warn!("Market data unavailable, valuing from stored prices: {}", e);
            Vec::new()
        }
    };
    Ok(summarize(&positions, &quotes, short_pnl_inverted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn position(
        symbol: &str,
        amount: &str,
        buy_price: &str,
        current_price: Option<&str>,
        position_type: &str,
        status: &str,
    ) -> portfolio_positions::Model {
        portfolio_positions::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            symbol: symbol.to_string(),
            coin_name: symbol.to_string(),
            amount: Decimal::from_str(amount).unwrap(),
            buy_price: Decimal::from_str(buy_price).unwrap(),
            current_price: current_price.map(|p| Decimal::from_str(p).unwrap()),
            position_type: position_type.to_string(),
            status: status.to_string(),
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    fn quote(symbol: &str, price: f64) -> MarketQuote {
        MarketQuote {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            price,
            percent_change_24h: 0.0,
            market_cap: 0.0,
            volume_24h: 0.0,
        }
    }

    #[test]
    fn fresh_position_has_zero_pnl() {
        // BTC amount=0.01 at 5,000,000 with no external price update.
        let p = position("BTC", "0.01", "5000000", Some("5000000"), "long", "open");
        let summary = summarize(&[p], &[], false);

        assert_eq!(summary.total_pnl, Decimal::ZERO);
        assert_eq!(summary.total_value, Decimal::from_str("50000").unwrap());
        assert_eq!(summary.pnl_percent, Decimal::ZERO);
    }

    #[test]
    fn missing_current_price_falls_back_to_buy_price() {
        let p = position("ETH", "2", "1800", None, "long", "open");
        let v = value_position(&p, None, false);

        assert_eq!(v.current_price, Decimal::from_str("1800").unwrap());
        assert_eq!(v.pnl, Decimal::ZERO);
    }

    #[test]
    fn live_quote_overrides_stored_price() {
        let p = position("BTC", "2", "100", Some("110"), "long", "open");
        let v = value_position(&p, Some(Decimal::from_str("120").unwrap()), false);

        assert_eq!(v.pnl, Decimal::from_str("40").unwrap());
        assert_eq!(v.value, Decimal::from_str("240").unwrap());
    }

    #[test]
    fn short_position_uses_long_formula_by_default() {
        // Default config: shorts use the same subtraction as longs.
        let p = position("BTC", "1", "100", Some("90"), "short", "open");
        let v = value_position(&p, None, false);

        assert_eq!(v.pnl, Decimal::from_str("-10").unwrap());
    }

    #[test]
    fn short_position_inverts_when_configured() {
        let p = position("BTC", "1", "100", Some("90"), "short", "open");
        let v = value_position(&p, None, true);

        assert_eq!(v.pnl, Decimal::from_str("10").unwrap());
    }

    #[test]
    fn closed_positions_are_excluded_from_the_summary() {
        let open = position("BTC", "1", "100", Some("110"), "long", "open");
        let closed = position("ETH", "5", "200", Some("300"), "long", "closed");
        let summary = summarize(&[open, closed], &[], false);

        assert_eq!(summary.open_positions, 1);
        assert_eq!(summary.total_pnl, Decimal::from_str("10").unwrap());
    }

    #[test]
    fn aggregate_uses_quotes_per_symbol() {
        let btc = position("BTC", "1", "100", Some("100"), "long", "open");
        let eth = position("ETH", "10", "20", Some("20"), "long", "open");
        let summary = summarize(&[btc, eth], &[quote("BTC", 150.0), quote("ETH", 25.0)], false);

        // BTC: (150-100)*1 = 50, ETH: (25-20)*10 = 50
        assert_eq!(summary.total_pnl, Decimal::from_str("100").unwrap());
        assert_eq!(summary.total_value, Decimal::from_str("400").unwrap());
        // 100 / (400 - 100) * 100
        let expected = Decimal::from_str("100").unwrap()
            / Decimal::from_str("300").unwrap()
            * Decimal::new(100, 0);
        assert_eq!(summary.pnl_percent, expected);
    }

    #[test]
    fn pnl_percent_is_zero_when_value_does_not_exceed_pnl() {
        let summary = summarize(&[], &[], false);
        assert_eq!(summary.pnl_percent, Decimal::ZERO);
    }
}
