use axum::extract::State;
use axum::Json;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::portfolio_service::{self, PortfolioSummary};
use crate::state::AppState;

pub async fn summary(State(state): State<AppState>, user: AuthUser) -> ApiResult<PortfolioSummary> {
    let summary = portfolio_service::portfolio_summary(
        &state.db,
        user.id,
        &state.market,
        state.short_pnl_inverted,
    )
    .await?;
    Ok(Json(summary))
}
