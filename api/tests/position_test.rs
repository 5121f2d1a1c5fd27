//! Position lifecycle against a mock store.

#[cfg(test)]
mod tests {
    use api::services::position_service::{close_position, open_position, OpenPositionInput};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use shared::entity::portfolio_positions;
    use shared::ServiceError;
    use std::str::FromStr;
    use uuid::Uuid;

    fn stored_position(
        user_id: Uuid,
        buy_price: &str,
        current_price: &str,
        status: &str,
    ) -> portfolio_positions::Model {
        portfolio_positions::Model {
            id: Uuid::new_v4(),
            user_id,
            symbol: "BTC".to_string(),
            coin_name: "Bitcoin".to_string(),
            amount: Decimal::from_str("0.01").unwrap(),
            buy_price: Decimal::from_str(buy_price).unwrap(),
            current_price: Some(Decimal::from_str(current_price).unwrap()),
            position_type: "long".to_string(),
            status: status.to_string(),
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    #[tokio::test]
    async fn opened_position_starts_open_at_buy_price() {
        let user_id = Uuid::new_v4();
        let created = stored_position(user_id, "5000000", "5000000", "open");

        // Insert of the position, then the trade audit row.
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .append_query_results([vec![created.clone()]])
            .into_connection();

        let position = open_position(
            &db,
            user_id,
            OpenPositionInput {
                symbol: "BTC".to_string(),
                coin_name: "Bitcoin".to_string(),
                amount: Decimal::from_str("0.01").unwrap(),
                buy_price: Decimal::from_str("5000000").unwrap(),
                position_type: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(position.status, "open");
        assert_eq!(position.current_price, Some(position.buy_price));
    }

    #[tokio::test]
    async fn closing_twice_reports_no_op() {
        let user_id = Uuid::new_v4();
        let closed = stored_position(user_id, "100", "110", "closed");
        let position_id = closed.id;

        // First close: the conditional update, then the audit insert.
        // Second close matches nothing.
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .append_query_results([vec![closed.clone()]])
            .into_connection();

        let first = close_position(&db, user_id, position_id, None).await.unwrap();
        assert_eq!(first.status, "closed");

        let second = close_position(&db, user_id, position_id, None)
            .await
            .unwrap_err();
        assert!(matches!(second, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn close_of_unknown_position_reports_not_found() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let err = close_position(&db, Uuid::new_v4(), Uuid::new_v4(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
