use axum::extract::State;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::entity::{deposit_requests, payment_settings, transactions, wallets, withdrawal_requests};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::fund_service;
use crate::state::AppState;

pub async fn get_wallet(State(state): State<AppState>, user: AuthUser) -> ApiResult<wallets::Model> {
    let wallet = state.profile_service.get_wallet(user.id).await?;
    Ok(Json(wallet))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Vec<transactions::Model>> {
    let rows = state.profile_service.list_transactions(user.id).await?;
    Ok(Json(rows))
}

/// Deposit instructions (UPI id, bank details, QR code) for users.
pub async fn get_payment_settings(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<payment_settings::Model> {
    let settings = state.profile_service.payment_settings().await?;
    Ok(Json(settings))
}

#[derive(Debug, Deserialize)]
pub struct DepositRequestPayload {
    pub amount: Decimal,
    pub payment_method: String,
    pub transaction_reference: Option<String>,
}

pub async fn submit_deposit(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<DepositRequestPayload>,
) -> ApiResult<deposit_requests::Model> {
    let request = fund_service::submit_deposit_request(
        &state.db,
        user.id,
        payload.amount,
        payload.payment_method,
        payload.transaction_reference,
    )
    .await?;
    Ok(Json(request))
}

pub async fn list_deposits(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Vec<deposit_requests::Model>> {
    let rows = fund_service::list_deposit_requests_for_user(&state.db, user.id).await?;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct WithdrawalRequestPayload {
    pub amount: Decimal,
    pub bank_account_id: Option<Uuid>,
}

pub async fn submit_withdrawal(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<WithdrawalRequestPayload>,
) -> ApiResult<withdrawal_requests::Model> {
    let request = fund_service::submit_withdrawal_request(
        &state.db,
        user.id,
        payload.amount,
        payload.bank_account_id,
    )
    .await?;
    Ok(Json(request))
}

pub async fn list_withdrawals(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Vec<withdrawal_requests::Model>> {
    let rows = fund_service::list_withdrawal_requests_for_user(&state.db, user.id).await?;
    Ok(Json(rows))
}
