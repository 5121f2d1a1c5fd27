use anyhow::Result;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use api::handlers;
use api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    info!("Starting Coinfolio API server...");

    let state = AppState::new().await?;
    let bind_addr = state.bind_addr.clone();

    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/api/market/quotes", get(handlers::market::quotes))
        .route(
            "/api/profile",
            get(handlers::account::get_profile).put(handlers::account::update_profile),
        )
        .route("/api/wallet", get(handlers::wallet::get_wallet))
        .route("/api/wallet/transactions", get(handlers::wallet::list_transactions))
        .route(
            "/api/wallet/deposits",
            get(handlers::wallet::list_deposits).post(handlers::wallet::submit_deposit),
        )
        .route(
            "/api/wallet/withdrawals",
            get(handlers::wallet::list_withdrawals).post(handlers::wallet::submit_withdrawal),
        )
        .route("/api/payment-settings", get(handlers::wallet::get_payment_settings))
        .route(
            "/api/positions",
            get(handlers::positions::list).post(handlers::positions::open),
        )
        .route("/api/positions/:id/close", post(handlers::positions::close))
        .route("/api/positions/:id/price", post(handlers::positions::update_price))
        .route("/api/portfolio", get(handlers::portfolio::summary))
        .route(
            "/api/bank-accounts",
            get(handlers::account::list_bank_accounts).post(handlers::account::add_bank_account),
        )
        .route(
            "/api/bank-accounts/:id",
            delete(handlers::account::delete_bank_account),
        )
        .route("/api/admin/status", get(handlers::admin::status))
        .route("/api/admin/users", get(handlers::admin::list_users))
        .route("/api/admin/positions", get(handlers::admin::list_positions))
        .route("/api/admin/transactions", get(handlers::admin::list_transactions))
        .route("/api/admin/deposits", get(handlers::admin::list_deposits))
        .route("/api/admin/withdrawals", get(handlers::admin::list_withdrawals))
        .route(
            "/api/admin/deposits/:id/approve",
            post(handlers::admin::approve_deposit),
        )
        .route(
            "/api/admin/withdrawals/:id/approve",
            post(handlers::admin::approve_withdrawal),
        )
        .route(
            "/api/admin/requests/:id/reject",
            post(handlers::admin::reject_request),
        )
        .route("/api/admin/funds", post(handlers::admin::add_funds))
        .route(
            "/api/admin/payment-settings",
            put(handlers::admin::update_payment_settings),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
