use axum::extract::{Path, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::entity::portfolio_positions;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::position_service::{self, OpenPositionInput};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Vec<portfolio_positions::Model>> {
    let positions = position_service::list_positions(&state.db, user.id).await?;
    Ok(Json(positions))
}

#[derive(Debug, Deserialize)]
pub struct OpenPositionRequest {
    pub symbol: String,
    pub coin_name: String,
    pub amount: Decimal,
    pub buy_price: Decimal,
    pub position_type: Option<String>,
}

pub async fn open(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<OpenPositionRequest>,
) -> ApiResult<portfolio_positions::Model> {
    let created = position_service::open_position(
        &state.db,
        user.id,
        OpenPositionInput {
            symbol: payload.symbol,
            coin_name: payload.coin_name,
            amount: payload.amount,
            buy_price: payload.buy_price,
            position_type: payload.position_type,
        },
    )
    .await?;
    Ok(Json(created))
}

#[derive(Debug, Default, Deserialize)]
pub struct ClosePositionRequest {
    pub current_price: Option<Decimal>,
}

pub async fn close(
    State(state): State<AppState>,
    user: AuthUser,
    Path(position_id): Path<Uuid>,
    payload: Option<Json<ClosePositionRequest>>,
) -> ApiResult<portfolio_positions::Model> {
    let close_price = payload.and_then(|Json(p)| p.current_price);
    let closed =
        position_service::close_position(&state.db, user.id, position_id, close_price).await?;
    Ok(Json(closed))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePriceRequest {
    pub current_price: Decimal,
}

pub async fn update_price(
    State(state): State<AppState>,
    user: AuthUser,
    Path(position_id): Path<Uuid>,
    Json(payload): Json<UpdatePriceRequest>,
) -> ApiResult<portfolio_positions::Model> {
    let updated = position_service::update_position_price(
        &state.db,
        user.id,
        position_id,
        payload.current_price,
    )
    .await?;
    Ok(Json(updated))
}
