//! Fund request approval state machine against a mock store.

#[cfg(test)]
mod tests {
    use api::services::fund_service::{
        admin_add_funds, approve_deposit_request, approve_withdrawal_request, reject_request,
        RequestKind,
    };
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use shared::entity::{deposit_requests, profiles, wallets, withdrawal_requests};
    use shared::ServiceError;
    use std::str::FromStr;
    use uuid::Uuid;

    fn profile(id: Uuid, role: &str) -> profiles::Model {
        profiles::Model {
            id,
            email: Some("someone@example.com".to_string()),
            display_name: None,
            role: role.to_string(),
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    fn wallet(user_id: Uuid, balance: &str) -> wallets::Model {
        wallets::Model {
            id: Uuid::new_v4(),
            user_id,
            balance: Decimal::from_str(balance).unwrap(),
            currency: "INR".to_string(),
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    fn deposit(user_id: Uuid, amount: &str, status: &str) -> deposit_requests::Model {
        deposit_requests::Model {
            id: Uuid::new_v4(),
            user_id,
            amount: Decimal::from_str(amount).unwrap(),
            payment_method: "upi".to_string(),
            transaction_reference: None,
            status: status.to_string(),
            admin_notes: None,
            approved_by: None,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    fn withdrawal(user_id: Uuid, amount: &str, status: &str) -> withdrawal_requests::Model {
        withdrawal_requests::Model {
            id: Uuid::new_v4(),
            user_id,
            amount: Decimal::from_str(amount).unwrap(),
            bank_account_id: None,
            status: status.to_string(),
            admin_notes: None,
            approved_by: None,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    #[tokio::test]
    async fn approving_deposit_credits_wallet_and_flips_request() {
        let admin_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let request = deposit(user_id, "500", "pending");

        let mut approved = request.clone();
        approved.status = "approved".to_string();
        approved.approved_by = Some(admin_id);

        let mut credited = wallet(user_id, "1000");
        let wallet_before = credited.clone();
        credited.balance = Decimal::from_str("1500").unwrap();

        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![profile(admin_id, "admin")]])
            .append_query_results([vec![request.clone()]])
            .append_query_results([vec![wallet_before]])
            .append_query_results([vec![approved.clone()]])
            .append_query_results([vec![credited]])
            .append_exec_results([exec_ok(), exec_ok(), exec_ok()])
            .into_connection();

        let result = approve_deposit_request(&db, request.id, admin_id, None)
            .await
            .unwrap();
        assert_eq!(result.status, "approved");
        assert_eq!(result.approved_by, Some(admin_id));

        // The wallet update inside the transaction carries the credited
        // balance.
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("1500"));
    }

    #[tokio::test]
    async fn approving_withdrawal_debits_wallet() {
        let admin_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let request = withdrawal(user_id, "400", "pending");

        let mut approved = request.clone();
        approved.status = "approved".to_string();
        approved.approved_by = Some(admin_id);

        let mut debited = wallet(user_id, "1000");
        let wallet_before = debited.clone();
        debited.balance = Decimal::from_str("600").unwrap();

        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![profile(admin_id, "admin")]])
            .append_query_results([vec![request.clone()]])
            .append_query_results([vec![wallet_before]])
            .append_query_results([vec![approved.clone()]])
            .append_query_results([vec![debited]])
            .append_exec_results([exec_ok(), exec_ok(), exec_ok()])
            .into_connection();

        let result = approve_withdrawal_request(&db, request.id, admin_id, None)
            .await
            .unwrap();
        assert_eq!(result.status, "approved");

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("600"));
    }

    #[tokio::test]
    async fn withdrawal_approval_rejects_overdraw_without_effects() {
        let admin_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let request = withdrawal(user_id, "700", "pending");

        // No exec results queued: any attempted write would fail the
        // test rather than slip through.
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![profile(admin_id, "admin")]])
            .append_query_results([vec![request.clone()]])
            .append_query_results([vec![wallet(user_id, "600")]])
            .into_connection();

        let err = approve_withdrawal_request(&db, request.id, admin_id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn non_admin_cannot_approve() {
        let caller = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![profile(caller, "user")]])
            .into_connection();

        let err = approve_deposit_request(&db, Uuid::new_v4(), caller, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden));
    }

    #[tokio::test]
    async fn terminal_request_cannot_be_approved_again() {
        let admin_id = Uuid::new_v4();
        let request = deposit(Uuid::new_v4(), "500", "approved");

        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![profile(admin_id, "admin")]])
            .append_query_results([vec![request.clone()]])
            .into_connection();

        let err = approve_deposit_request(&db, request.id, admin_id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn terminal_request_cannot_be_rejected_again() {
        let admin_id = Uuid::new_v4();
        let request = withdrawal(Uuid::new_v4(), "300", "rejected");

        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![profile(admin_id, "admin")]])
            .append_query_results([vec![request.clone()]])
            .into_connection();

        let err = reject_request(&db, request.id, RequestKind::Withdrawal, admin_id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn missing_request_reports_not_found() {
        let admin_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![profile(admin_id, "admin")]])
            .append_query_results([Vec::<deposit_requests::Model>::new()])
            .into_connection();

        let err = approve_deposit_request(&db, Uuid::new_v4(), admin_id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn add_funds_requires_positive_amount() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let err = admin_add_funds(
            &db,
            Uuid::new_v4(),
            Uuid::new_v4(),
            Decimal::ZERO,
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn add_funds_credits_target_wallet() {
        let admin_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let mut credited = wallet(user_id, "100");
        let wallet_before = credited.clone();
        credited.balance = Decimal::from_str("350").unwrap();

        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![profile(admin_id, "admin")]])
            .append_query_results([vec![wallet_before]])
            .append_query_results([vec![credited]])
            .append_exec_results([exec_ok(), exec_ok()])
            .into_connection();

        let balance = admin_add_funds(
            &db,
            admin_id,
            user_id,
            Decimal::from_str("250").unwrap(),
            Some("manual adjustment".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(balance, Decimal::from_str("350").unwrap());
    }
}
