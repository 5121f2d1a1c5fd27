use axum::extract::{Path, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::entity::{
    deposit_requests, payment_settings, portfolio_positions, transactions, withdrawal_requests,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::admin_service::{self, PaymentSettingsInput, UserWithBalance};
use crate::services::fund_service::{self, RequestKind};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AdminStatus {
    pub is_admin: bool,
}

/// Lets the client decide whether to show the admin surface. Every
/// admin mutation re-checks authorization server-side regardless.
pub async fn status(State(state): State<AppState>, user: AuthUser) -> ApiResult<AdminStatus> {
    let is_admin = admin_service::is_admin(&state.db, user.id).await?;
    Ok(Json(AdminStatus { is_admin }))
}

pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Vec<UserWithBalance>> {
    let users = admin_service::list_users(&state.db, user.id).await?;
    Ok(Json(users))
}

pub async fn list_positions(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Vec<portfolio_positions::Model>> {
    let positions = admin_service::list_positions(&state.db, user.id).await?;
    Ok(Json(positions))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Vec<transactions::Model>> {
    let rows = admin_service::list_transactions(&state.db, user.id).await?;
    Ok(Json(rows))
}

pub async fn list_deposits(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Vec<deposit_requests::Model>> {
    let rows = admin_service::list_deposit_requests(&state.db, user.id).await?;
    Ok(Json(rows))
}

pub async fn list_withdrawals(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Vec<withdrawal_requests::Model>> {
    let rows = admin_service::list_withdrawal_requests(&state.db, user.id).await?;
    Ok(Json(rows))
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewPayload {
    pub notes: Option<String>,
}

pub async fn approve_deposit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(request_id): Path<Uuid>,
    payload: Option<Json<ReviewPayload>>,
) -> ApiResult<deposit_requests::Model> {
    let notes = payload.and_then(|Json(p)| p.notes);
    let approved =
        fund_service::approve_deposit_request(&state.db, request_id, user.id, notes).await?;
    Ok(Json(approved))
}

pub async fn approve_withdrawal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(request_id): Path<Uuid>,
    payload: Option<Json<ReviewPayload>>,
) -> ApiResult<withdrawal_requests::Model> {
    let notes = payload.and_then(|Json(p)| p.notes);
    let approved =
        fund_service::approve_withdrawal_request(&state.db, request_id, user.id, notes).await?;
    Ok(Json(approved))
}

#[derive(Debug, Deserialize)]
pub struct RejectPayload {
    pub request_type: RequestKind,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RejectResponse {
    pub rejected: Uuid,
}

pub async fn reject_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<RejectPayload>,
) -> ApiResult<RejectResponse> {
    fund_service::reject_request(
        &state.db,
        request_id,
        payload.request_type,
        user.id,
        payload.notes,
    )
    .await?;
    Ok(Json(RejectResponse { rejected: request_id }))
}

#[derive(Debug, Deserialize)]
pub struct AddFundsPayload {
    pub user_id: Uuid,
    pub amount: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddFundsResponse {
    pub user_id: Uuid,
    pub balance: Decimal,
}

pub async fn add_funds(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddFundsPayload>,
) -> ApiResult<AddFundsResponse> {
    let balance = fund_service::admin_add_funds(
        &state.db,
        user.id,
        payload.user_id,
        payload.amount,
        payload.notes,
    )
    .await?;
    Ok(Json(AddFundsResponse {
        user_id: payload.user_id,
        balance,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PaymentSettingsPayload {
    pub upi_id: Option<String>,
    pub qr_code_url: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub account_holder: Option<String>,
}

pub async fn update_payment_settings(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<PaymentSettingsPayload>,
) -> ApiResult<payment_settings::Model> {
    let settings = admin_service::update_payment_settings(
        &state.db,
        user.id,
        PaymentSettingsInput {
            upi_id: payload.upi_id,
            qr_code_url: payload.qr_code_url,
            bank_name: payload.bank_name,
            account_number: payload.account_number,
            ifsc_code: payload.ifsc_code,
            account_holder: payload.account_holder,
        },
    )
    .await?;
    Ok(Json(settings))
}
