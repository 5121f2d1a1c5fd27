use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use shared::entity::{bank_accounts, profiles};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::profile_service::BankAccountInput;
use crate::state::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<profiles::Model> {
    let profile = state.profile_service.ensure_profile(&user.identity()).await?;
    Ok(Json(profile))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: String,
}

pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<profiles::Model> {
    let profile = state
        .profile_service
        .update_display_name(user.id, payload.display_name)
        .await?;
    Ok(Json(profile))
}

pub async fn list_bank_accounts(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Vec<bank_accounts::Model>> {
    let accounts = state.profile_service.list_bank_accounts(user.id).await?;
    Ok(Json(accounts))
}

#[derive(Debug, Deserialize)]
pub struct AddBankAccountRequest {
    pub account_holder_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub bank_name: String,
    pub account_type: Option<String>,
}

pub async fn add_bank_account(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddBankAccountRequest>,
) -> ApiResult<bank_accounts::Model> {
    let account = state
        .profile_service
        .add_bank_account(
            user.id,
            BankAccountInput {
                account_holder_name: payload.account_holder_name,
                account_number: payload.account_number,
                ifsc_code: payload.ifsc_code,
                bank_name: payload.bank_name,
                account_type: payload.account_type,
            },
        )
        .await?;
    Ok(Json(account))
}

pub async fn delete_bank_account(
    State(state): State<AppState>,
    user: AuthUser,
    Path(account_id): Path<Uuid>,
) -> ApiResult<Value> {
    state
        .profile_service
        .delete_bank_account(user.id, account_id)
        .await?;
    Ok(Json(json!({ "deleted": account_id })))
}
