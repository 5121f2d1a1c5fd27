//! Fund request workflow: user-submitted deposit/withdrawal requests,
//! admin approval/rejection, and direct admin credits.
//!
//! Every balance-affecting operation runs in one database transaction
//! with the wallet row locked `FOR UPDATE`, so concurrent approvals on
//! the same wallet serialize and a request leaves `pending` exactly
//! once.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    Order, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use serde::Deserialize;
use shared::entity::{bank_accounts, deposit_requests, transactions, wallets, withdrawal_requests};
use shared::ServiceError;
use uuid::Uuid;

use crate::services::admin_service::ensure_admin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Deposit,
    Withdrawal,
}

/// Create a pending deposit request. The wallet is untouched until an
/// admin approves.
pub async fn submit_deposit_request(
    db: &DatabaseConnection,
    user_id: Uuid,
    amount: Decimal,
    payment_method: String,
    transaction_reference: Option<String>,
) -> Result<deposit_requests::Model, ServiceError> {
    if amount <= Decimal::ZERO {
        return Err(ServiceError::validation("amount must be greater than zero"));
    }
    if payment_method.trim().is_empty() {
        return Err(ServiceError::validation("payment_method is required"));
    }

    let request = deposit_requests::ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4()),
        user_id: ActiveValue::Set(user_id),
        amount: ActiveValue::Set(amount),
        payment_method: ActiveValue::Set(payment_method),
        transaction_reference: ActiveValue::Set(transaction_reference),
        status: ActiveValue::Set("pending".to_string()),
        admin_notes: ActiveValue::Set(None),
        approved_by: ActiveValue::Set(None),
        created_at: ActiveValue::Set(Some(Utc::now())),
        updated_at: ActiveValue::Set(Some(Utc::now())),
    };

    let created = request.insert(db).await?;
    Ok(created)
}

/// Create a pending withdrawal request. Balance is checked at approval
/// time, not here: it may change before an admin gets to the request.
pub async fn submit_withdrawal_request(
    db: &DatabaseConnection,
    user_id: Uuid,
    amount: Decimal,
    bank_account_id: Option<Uuid>,
) -> Result<withdrawal_requests::Model, ServiceError> {
    if amount <= Decimal::ZERO {
        return Err(ServiceError::validation("amount must be greater than zero"));
    }

    if let Some(account_id) = bank_account_id {
        bank_accounts::Entity::find_by_id(account_id)
            .filter(bank_accounts::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("bank account"))?;
    }

    let request = withdrawal_requests::ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4()),
        user_id: ActiveValue::Set(user_id),
        amount: ActiveValue::Set(amount),
        bank_account_id: ActiveValue::Set(bank_account_id),
        status: ActiveValue::Set("pending".to_string()),
        admin_notes: ActiveValue::Set(None),
        approved_by: ActiveValue::Set(None),
        created_at: ActiveValue::Set(Some(Utc::now())),
        updated_at: ActiveValue::Set(Some(Utc::now())),
    };

    let created = request.insert(db).await?;
    Ok(created)
}

/// Approve a pending deposit: flip the request, credit the wallet,
/// append the audit row. One transaction; an early return rolls back
/// everything and leaves the request pending for retry.
pub async fn approve_deposit_request(
    db: &DatabaseConnection,
    request_id: Uuid,
    admin_id: Uuid,
    notes: Option<String>,
) -> Result<deposit_requests::Model, ServiceError> {
    let txn = db.begin().await?;

    ensure_admin(&txn, admin_id).await?;

    let request = deposit_requests::Entity::find_by_id(request_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or(ServiceError::NotFound("deposit request"))?;
    if request.status != "pending" {
        return Err(ServiceError::conflict(format!(
            "deposit request is already {}",
            request.status
        )));
    }

    let wallet = wallet_for_update(&txn, request.user_id).await?;
    let user_id = request.user_id;
    let amount = request.amount;
    let new_balance = wallet.balance + amount;

    let mut request_update: deposit_requests::ActiveModel = request.into();
    request_update.status = ActiveValue::Set("approved".to_string());
    request_update.approved_by = ActiveValue::Set(Some(admin_id));
    request_update.admin_notes = ActiveValue::Set(notes.clone());
    request_update.updated_at = ActiveValue::Set(Some(Utc::now()));
    let approved = request_update.update(&txn).await?;

    set_balance(&txn, wallet, new_balance).await?;
    append_audit(&txn, user_id, "deposit", amount, admin_id, notes).await?;

    txn.commit().await?;
    Ok(approved)
}

/// Approve a pending withdrawal. The overdraw check runs against the
/// locked balance at approval time; on failure nothing is applied and
/// the request stays pending.
pub async fn approve_withdrawal_request(
    db: &DatabaseConnection,
    request_id: Uuid,
    admin_id: Uuid,
    notes: Option<String>,
) -> Result<withdrawal_requests::Model, ServiceError> {
    let txn = db.begin().await?;

    ensure_admin(&txn, admin_id).await?;

    let request = withdrawal_requests::Entity::find_by_id(request_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or(ServiceError::NotFound("withdrawal request"))?;
    if request.status != "pending" {
        return Err(ServiceError::conflict(format!(
            "withdrawal request is already {}",
            request.status
        )));
    }

    let wallet = wallet_for_update(&txn, request.user_id).await?;
    let user_id = request.user_id;
    let amount = request.amount;
    let new_balance = debit(wallet.balance, amount)?;

    let mut request_update: withdrawal_requests::ActiveModel = request.into();
    request_update.status = ActiveValue::Set("approved".to_string());
    request_update.approved_by = ActiveValue::Set(Some(admin_id));
    request_update.admin_notes = ActiveValue::Set(notes.clone());
    request_update.updated_at = ActiveValue::Set(Some(Utc::now()));
    let approved = request_update.update(&txn).await?;

    set_balance(&txn, wallet, new_balance).await?;
    append_audit(&txn, user_id, "withdrawal", amount, admin_id, notes).await?;

    txn.commit().await?;
    Ok(approved)
}

/// Reject a pending request of either kind. No balance effect.
pub async fn reject_request(
    db: &DatabaseConnection,
    request_id: Uuid,
    kind: RequestKind,
    admin_id: Uuid,
    notes: Option<String>,
) -> Result<(), ServiceError> {
    let txn = db.begin().await?;

    ensure_admin(&txn, admin_id).await?;

    match kind {
        RequestKind::Deposit => {
            let request = deposit_requests::Entity::find_by_id(request_id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or(ServiceError::NotFound("deposit request"))?;
            if request.status != "pending" {
                return Err(ServiceError::conflict(format!(
                    "deposit request is already {}",
                    request.status
                )));
            }
            let mut update: deposit_requests::ActiveModel = request.into();
            update.status = ActiveValue::Set("rejected".to_string());
            update.approved_by = ActiveValue::Set(Some(admin_id));
            update.admin_notes = ActiveValue::Set(notes);
            update.updated_at = ActiveValue::Set(Some(Utc::now()));
            update.update(&txn).await?;
        }
        RequestKind::Withdrawal => {
            let request = withdrawal_requests::Entity::find_by_id(request_id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or(ServiceError::NotFound("withdrawal request"))?;
            if request.status != "pending" {
                return Err(ServiceError::conflict(format!(
                    "withdrawal request is already {}",
                    request.status
                )));
            }
            let mut update: withdrawal_requests::ActiveModel = request.into();
            update.status = ActiveValue::Set("rejected".to_string());
            update.approved_by = ActiveValue::Set(Some(admin_id));
            update.admin_notes = ActiveValue::Set(notes);
            update.updated_at = ActiveValue::Set(Some(Utc::now()));
            update.update(&txn).await?;
        }
    }

    txn.commit().await?;
    Ok(())
}

/// Direct administrative credit, bypassing the request workflow.
/// Returns the new balance.
pub async fn admin_add_funds(
    db: &DatabaseConnection,
    admin_id: Uuid,
    target_user_id: Uuid,
    amount: Decimal,
    notes: Option<String>,
) -> Result<Decimal, ServiceError> {
    if amount <= Decimal::ZERO {
        return Err(ServiceError::validation("amount must be greater than zero"));
    }

    let txn = db.begin().await?;

    ensure_admin(&txn, admin_id).await?;

    let wallet = wallet_for_update(&txn, target_user_id).await?;
    let new_balance = wallet.balance + amount;

    set_balance(&txn, wallet, new_balance).await?;
    append_audit(&txn, target_user_id, "admin_credit", amount, admin_id, notes).await?;

    txn.commit().await?;
    Ok(new_balance)
}

pub async fn list_deposit_requests_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<deposit_requests::Model>, ServiceError> {
    let rows = deposit_requests::Entity::find()
        .filter(deposit_requests::Column::UserId.eq(user_id))
        .order_by(deposit_requests::Column::CreatedAt, Order::Desc)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn list_withdrawal_requests_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<withdrawal_requests::Model>, ServiceError> {
    let rows = withdrawal_requests::Entity::find()
        .filter(withdrawal_requests::Column::UserId.eq(user_id))
        .order_by(withdrawal_requests::Column::CreatedAt, Order::Desc)
        .all(db)
        .await?;
    Ok(rows)
}

/// The overdraw guard, evaluated against the locked balance at
/// approval time.
fn debit(balance: Decimal, amount: Decimal) -> Result<Decimal, ServiceError> {
    if balance < amount {
        return Err(ServiceError::conflict("insufficient balance for withdrawal"));
    }
    Ok(balance - amount)
}

async fn wallet_for_update<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
) -> Result<wallets::Model, ServiceError> {
    wallets::Entity::find()
        .filter(wallets::Column::UserId.eq(user_id))
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or(ServiceError::NotFound("wallet"))
}

async fn set_balance<C: ConnectionTrait>(
    conn: &C,
    wallet: wallets::Model,
    new_balance: Decimal,
) -> Result<(), ServiceError> {
    let mut update: wallets::ActiveModel = wallet.into();
    update.balance = ActiveValue::Set(new_balance);
    update.updated_at = ActiveValue::Set(Some(Utc::now()));
    update.update(conn).await?;
    Ok(())
}

async fn append_audit<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    transaction_type: &str,
    total_value: Decimal,
    performed_by: Uuid,
    notes: Option<String>,
) -> Result<(), ServiceError> {
    let row = transactions::ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4()),
        user_id: ActiveValue::Set(Some(user_id)),
        transaction_type: ActiveValue::Set(transaction_type.to_string()),
        symbol: ActiveValue::Set(None),
        amount: ActiveValue::Set(None),
        price: ActiveValue::Set(None),
        total_value: ActiveValue::Set(total_value),
        status: ActiveValue::Set(Some("completed".to_string())),
        performed_by: ActiveValue::Set(Some(performed_by)),
        notes: ActiveValue::Set(notes),
        created_at: ActiveValue::Set(Some(Utc::now())),
    };
    transactions::Entity::insert(row)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn debit_applies_within_balance() {
        let balance = Decimal::from_str("1000").unwrap();
        let amount = Decimal::from_str("400").unwrap();
        assert_eq!(debit(balance, amount).unwrap(), Decimal::from_str("600").unwrap());
    }

    #[test]
    fn debit_rejects_overdraw() {
        let balance = Decimal::from_str("600").unwrap();
        let amount = Decimal::from_str("700").unwrap();
        let err = debit(balance, amount).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[test]
    fn debit_allows_exact_balance() {
        let balance = Decimal::from_str("500").unwrap();
        assert_eq!(debit(balance, balance).unwrap(), Decimal::ZERO);
    }
}
