//! Profiles, wallets, bank accounts, and the user-visible side of
//! payment settings.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use shared::entity::{
    bank_accounts, payment_settings, profiles, role_assignments, transactions, wallets,
};
use shared::ServiceError;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::repositories::profile_repository::ProfileRepository;

/// Identity claims forwarded by the auth gateway.
#[derive(Debug, Clone)]
pub struct AuthIdentity {
    pub id: Uuid,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

pub struct BankAccountInput {
    pub account_holder_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub bank_name: String,
    pub account_type: Option<String>,
}

pub struct ProfileService {
    db: Arc<DatabaseConnection>,
    repo: ProfileRepository,
    starting_balance: Decimal,
    wallet_currency: String,
}

impl ProfileService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        starting_balance: Decimal,
        wallet_currency: String,
    ) -> Self {
        let repo = ProfileRepository::new(db.clone());
        Self {
            db,
            repo,
            starting_balance,
            wallet_currency,
        }
    }

    /// Fetch the caller's profile, creating it (and the starting
    /// wallet) on first login. Role comes from the seeded
    /// role_assignments table; an existing profile is promoted when a
    /// grant appears after the fact.
    pub async fn ensure_profile(
        &self,
        identity: &AuthIdentity,
    ) -> Result<profiles::Model, ServiceError> {
        if let Some(profile) = self.repo.find_by_id(identity.id).await? {
            return self.maybe_promote(profile).await;
        }

        let role = match identity.email.as_deref() {
            Some(email) => self
                .assigned_role(email)
                .await?
                .unwrap_or_else(|| "user".to_string()),
            None => "user".to_string(),
        };

        info!("Creating profile for {} with role {}", identity.id, role);
        let profile = self
            .repo
            .create(profiles::ActiveModel {
                id: ActiveValue::Set(identity.id),
                email: ActiveValue::Set(identity.email.clone()),
                display_name: ActiveValue::Set(
                    identity.display_name.clone().or_else(|| identity.email.clone()),
                ),
                role: ActiveValue::Set(role),
                created_at: ActiveValue::Set(Some(Utc::now())),
                updated_at: ActiveValue::Set(Some(Utc::now())),
            })
            .await?;

        // One wallet per user; the lookup keeps a replayed first login
        // from minting a second one.
        let existing_wallet = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(identity.id))
            .one(self.db.as_ref())
            .await?;
        if existing_wallet.is_none() {
            wallets::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                user_id: ActiveValue::Set(identity.id),
                balance: ActiveValue::Set(self.starting_balance),
                currency: ActiveValue::Set(self.wallet_currency.clone()),
                created_at: ActiveValue::Set(Some(Utc::now())),
                updated_at: ActiveValue::Set(Some(Utc::now())),
            }
            .insert(self.db.as_ref())
            .await?;
        }

        Ok(profile)
    }

    pub async fn update_display_name(
        &self,
        user_id: Uuid,
        display_name: String,
    ) -> Result<profiles::Model, ServiceError> {
        if display_name.trim().is_empty() {
            return Err(ServiceError::validation("display_name is required"));
        }
        let profile = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::NotFound("profile"))?;

        let mut update: profiles::ActiveModel = profile.into();
        update.display_name = ActiveValue::Set(Some(display_name.trim().to_string()));
        update.updated_at = ActiveValue::Set(Some(Utc::now()));
        self.repo.update(update).await
    }

    pub async fn get_wallet(&self, user_id: Uuid) -> Result<wallets::Model, ServiceError> {
        wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(ServiceError::NotFound("wallet"))
    }

    pub async fn list_transactions(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<transactions::Model>, ServiceError> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by(transactions::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await?;
        Ok(rows)
    }

    pub async fn list_bank_accounts(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<bank_accounts::Model>, ServiceError> {
        let rows = bank_accounts::Entity::find()
            .filter(bank_accounts::Column::UserId.eq(user_id))
            .order_by(bank_accounts::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await?;
        Ok(rows)
    }

    /// Add a bank account; the user's first account becomes primary.
    pub async fn add_bank_account(
        &self,
        user_id: Uuid,
        input: BankAccountInput,
    ) -> Result<bank_accounts::Model, ServiceError> {
        if input.account_holder_name.trim().is_empty()
            || input.account_number.trim().is_empty()
            || input.ifsc_code.trim().is_empty()
            || input.bank_name.trim().is_empty()
        {
            return Err(ServiceError::validation("all bank account fields are required"));
        }

        let existing = bank_accounts::Entity::find()
            .filter(bank_accounts::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await?;

        let account = bank_accounts::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            user_id: ActiveValue::Set(user_id),
            account_holder_name: ActiveValue::Set(input.account_holder_name.trim().to_string()),
            account_number: ActiveValue::Set(input.account_number.trim().to_string()),
            ifsc_code: ActiveValue::Set(input.ifsc_code.trim().to_uppercase()),
            bank_name: ActiveValue::Set(input.bank_name.trim().to_string()),
            account_type: ActiveValue::Set(
                input.account_type.unwrap_or_else(|| "savings".to_string()),
            ),
            is_primary: ActiveValue::Set(existing == 0),
            created_at: ActiveValue::Set(Some(Utc::now())),
        };

        let created = account.insert(self.db.as_ref()).await?;
        Ok(created)
    }

    pub async fn delete_bank_account(
        &self,
        user_id: Uuid,
        account_id: Uuid,
    ) -> Result<(), ServiceError> {
        let result = bank_accounts::Entity::delete_many()
            .filter(bank_accounts::Column::Id.eq(account_id))
            .filter(bank_accounts::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("bank account"));
        }
        Ok(())
    }

    pub async fn payment_settings(&self) -> Result<payment_settings::Model, ServiceError> {
        payment_settings::Entity::find()
            .one(self.db.as_ref())
            .await?
            .ok_or(ServiceError::NotFound("payment settings"))
    }

    async fn maybe_promote(
        &self,
        profile: profiles::Model,
    ) -> Result<profiles::Model, ServiceError> {
        if profile.role == "admin" {
            return Ok(profile);
        }
        let Some(email) = profile.email.clone() else {
            return Ok(profile);
        };
        match self.assigned_role(&email).await? {
            Some(role) if role == "admin" => {
                info!("Promoting {} to admin via role assignment", email);
                let mut update: profiles::ActiveModel = profile.into();
                update.role = ActiveValue::Set("admin".to_string());
                update.updated_at = ActiveValue::Set(Some(Utc::now()));
                self.repo.update(update).await
            }
            _ => Ok(profile),
        }
    }

    async fn assigned_role(&self, email: &str) -> Result<Option<String>, ServiceError> {
        let grant = role_assignments::Entity::find_by_id(email.to_string())
            .one(self.db.as_ref())
            .await?;
        Ok(grant.map(|g| g.role))
    }
}
