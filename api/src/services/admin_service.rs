//! Admin authorization and read-side admin listings.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, DatabaseConnection, EntityTrait, Order,
    QueryOrder,
};
use serde::Serialize;
use shared::entity::{
    deposit_requests, payment_settings, portfolio_positions, profiles, transactions, wallets,
    withdrawal_requests,
};
use shared::ServiceError;
use uuid::Uuid;

pub async fn is_admin(db: &DatabaseConnection, user_id: Uuid) -> Result<bool, ServiceError> {
    let profile = profiles::Entity::find_by_id(user_id).one(db).await?;
    Ok(matches!(profile, Some(p) if p.role == "admin"))
}

/// Capability check preceding every admin effect. Runs against the same
/// connection (or transaction) as the effect itself, so a stale client
/// cannot sneak past it.
pub async fn ensure_admin<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> Result<(), ServiceError> {
    let profile = profiles::Entity::find_by_id(user_id).one(conn).await?;
    match profile {
        Some(p) if p.role == "admin" => Ok(()),
        _ => Err(ServiceError::Forbidden),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserWithBalance {
    pub id: Uuid,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: String,
    pub balance: Decimal,
    pub currency: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// All profiles joined with their wallet balances, newest first.
pub async fn list_users(
    db: &DatabaseConnection,
    admin_id: Uuid,
) -> Result<Vec<UserWithBalance>, ServiceError> {
    ensure_admin(db, admin_id).await?;

    let rows = profiles::Entity::find()
        .find_also_related(wallets::Entity)
        .order_by(profiles::Column::CreatedAt, Order::Desc)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(profile, wallet)| UserWithBalance {
            id: profile.id,
            email: profile.email,
            display_name: profile.display_name,
            role: profile.role,
            balance: wallet.as_ref().map(|w| w.balance).unwrap_or(Decimal::ZERO),
            currency: wallet.map(|w| w.currency),
            created_at: profile.created_at,
        })
        .collect())
}

pub async fn list_positions(
    db: &DatabaseConnection,
    admin_id: Uuid,
) -> Result<Vec<portfolio_positions::Model>, ServiceError> {
    ensure_admin(db, admin_id).await?;
    let positions = portfolio_positions::Entity::find()
        .order_by(portfolio_positions::Column::CreatedAt, Order::Desc)
        .all(db)
        .await?;
    Ok(positions)
}

pub async fn list_transactions(
    db: &DatabaseConnection,
    admin_id: Uuid,
) -> Result<Vec<transactions::Model>, ServiceError> {
    ensure_admin(db, admin_id).await?;
    let rows = transactions::Entity::find()
        .order_by(transactions::Column::CreatedAt, Order::Desc)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn list_deposit_requests(
    db: &DatabaseConnection,
    admin_id: Uuid,
) -> Result<Vec<deposit_requests::Model>, ServiceError> {
    ensure_admin(db, admin_id).await?;
    let rows = deposit_requests::Entity::find()
        .order_by(deposit_requests::Column::CreatedAt, Order::Desc)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn list_withdrawal_requests(
    db: &DatabaseConnection,
    admin_id: Uuid,
) -> Result<Vec<withdrawal_requests::Model>, ServiceError> {
    ensure_admin(db, admin_id).await?;
    let rows = withdrawal_requests::Entity::find()
        .order_by(withdrawal_requests::Column::CreatedAt, Order::Desc)
        .all(db)
        .await?;
    Ok(rows)
}

pub struct PaymentSettingsInput {
    pub upi_id: Option<String>,
    pub qr_code_url: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub account_holder: Option<String>,
}

/// Update the single global payment-settings row.
pub async fn update_payment_settings(
    db: &DatabaseConnection,
    admin_id: Uuid,
    input: PaymentSettingsInput,
) -> Result<payment_settings::Model, ServiceError> {
    ensure_admin(db, admin_id).await?;

    let settings = payment_settings::Entity::find()
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("payment settings"))?;

    let mut update: payment_settings::ActiveModel = settings.into();
    update.upi_id = ActiveValue::Set(input.upi_id);
    update.qr_code_url = ActiveValue::Set(input.qr_code_url);
    update.bank_name = ActiveValue::Set(input.bank_name);
    update.account_number = ActiveValue::Set(input.account_number);
    update.ifsc_code = ActiveValue::Set(input.ifsc_code);
    update.account_holder = ActiveValue::Set(input.account_holder);
    update.updated_at = ActiveValue::Set(Some(Utc::now()));

    let saved = update.update(db).await?;
    Ok(saved)
}
