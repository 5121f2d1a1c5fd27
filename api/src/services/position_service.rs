//! Position lifecycle: open, close, list, price refresh.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, Order,
    QueryFilter, QueryOrder,
};
use shared::entity::{portfolio_positions, transactions};
use shared::ServiceError;
use uuid::Uuid;

pub struct OpenPositionInput {
    pub symbol: String,
    pub coin_name: String,
    pub amount: Decimal,
    pub buy_price: Decimal,
    pub position_type: Option<String>,
}

/// Open a simulated position for the caller. The stored current price
/// starts at the buy price, so a fresh position carries zero P&L.
pub async fn open_position(
    db: &DatabaseConnection,
    user_id: Uuid,
    input: OpenPositionInput,
) -> Result<portfolio_positions::Model, ServiceError> {
    if input.symbol.trim().is_empty() {
        return Err(ServiceError::validation("symbol is required"));
    }
    if input.amount <= Decimal::ZERO {
        return Err(ServiceError::validation("amount must be greater than zero"));
    }
    if input.buy_price <= Decimal::ZERO {
        return Err(ServiceError::validation("buy_price must be greater than zero"));
    }
    let position_type = input.position_type.unwrap_or_else(|| "long".to_string());
    if position_type != "long" && position_type != "short" {
        return Err(ServiceError::validation("position_type must be \"long\" or \"short\""));
    }

    let position = portfolio_positions::ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4()),
        user_id: ActiveValue::Set(user_id),
        symbol: ActiveValue::Set(input.symbol.trim().to_uppercase()),
        coin_name: ActiveValue::Set(input.coin_name),
        amount: ActiveValue::Set(input.amount),
        buy_price: ActiveValue::Set(input.buy_price),
        current_price: ActiveValue::Set(Some(input.buy_price)),
        position_type: ActiveValue::Set(position_type),
        status: ActiveValue::Set("open".to_string()),
        created_at: ActiveValue::Set(Some(Utc::now())),
        updated_at: ActiveValue::Set(Some(Utc::now())),
    };

    let created = position.insert(db).await?;
    append_trade_audit(db, &created, "buy", created.buy_price).await?;
    Ok(created)
}

/// Close a position owned by the caller. Ownership and openness are
/// part of the update filter itself: zero rows affected covers a
/// missing id, someone else's position, and a repeat close, and the
/// caller must treat all three as failure. Under two racing closes the
/// store lets exactly one through.
pub async fn close_position(
    db: &DatabaseConnection,
    user_id: Uuid,
    position_id: Uuid,
    close_price: Option<Decimal>,
) -> Result<portfolio_positions::Model, ServiceError> {
    if let Some(price) = close_price {
        if price <= Decimal::ZERO {
            return Err(ServiceError::validation("current_price must be greater than zero"));
        }
    }

    let mut update = portfolio_positions::Entity::update_many()
        .col_expr(portfolio_positions::Column::Status, Expr::value("closed"))
        .col_expr(portfolio_positions::Column::UpdatedAt, Expr::value(Utc::now()));
    if let Some(price) = close_price {
        update = update.col_expr(portfolio_positions::Column::CurrentPrice, Expr::value(price));
    }

    let result = update
        .filter(portfolio_positions::Column::Id.eq(position_id))
        .filter(portfolio_positions::Column::UserId.eq(user_id))
        .filter(portfolio_positions::Column::Status.eq("open"))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(ServiceError::NotFound("open position"));
    }

    let closed = portfolio_positions::Entity::find_by_id(position_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("position"))?;
    let exit_price = closed.current_price.unwrap_or(closed.buy_price);
    append_trade_audit(db, &closed, "sell", exit_price).await?;
    Ok(closed)
}

/// Refresh the stored current price of an open position. Closed
/// positions keep their closing price.
pub async fn update_position_price(
    db: &DatabaseConnection,
    user_id: Uuid,
    position_id: Uuid,
    current_price: Decimal,
) -> Result<portfolio_positions::Model, ServiceError> {
    if current_price <= Decimal::ZERO {
        return Err(ServiceError::validation("current_price must be greater than zero"));
    }

    let result = portfolio_positions::Entity::update_many()
        .col_expr(portfolio_positions::Column::CurrentPrice, Expr::value(current_price))
        .col_expr(portfolio_positions::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(portfolio_positions::Column::Id.eq(position_id))
        .filter(portfolio_positions::Column::UserId.eq(user_id))
        .filter(portfolio_positions::Column::Status.eq("open"))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(ServiceError::NotFound("open position"));
    }

    let updated = portfolio_positions::Entity::find_by_id(position_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("position"))?;
    Ok(updated)
}

/// All of the caller's positions across every status, newest first.
pub async fn list_positions(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<portfolio_positions::Model>, ServiceError> {
    let positions = portfolio_positions::Entity::find()
        .filter(portfolio_positions::Column::UserId.eq(user_id))
        .order_by(portfolio_positions::Column::CreatedAt, Order::Desc)
        .all(db)
        .await?;
    Ok(positions)
}

/// Open positions only, for the aggregator.
pub async fn list_open_positions(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<portfolio_positions::Model>, ServiceError> {
    let positions = portfolio_positions::Entity::find()
        .filter(portfolio_positions::Column::UserId.eq(user_id))
        .filter(portfolio_positions::Column::Status.eq("open"))
        .order_by(portfolio_positions::Column::CreatedAt, Order::Desc)
        .all(db)
        .await?;
    Ok(positions)
}

/// Trade leg audit row: "buy" on open, "sell" on close.
async fn append_trade_audit(
    db: &DatabaseConnection,
    position: &portfolio_positions::Model,
    transaction_type: &str,
    price: Decimal,
) -> Result<(), ServiceError> {
    let row = transactions::ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4()),
        user_id: ActiveValue::Set(Some(position.user_id)),
        transaction_type: ActiveValue::Set(transaction_type.to_string()),
        symbol: ActiveValue::Set(Some(position.symbol.clone())),
        amount: ActiveValue::Set(Some(position.amount)),
        price: ActiveValue::Set(Some(price)),
        total_value: ActiveValue::Set(price * position.amount),
        status: ActiveValue::Set(Some("completed".to_string())),
        performed_by: ActiveValue::Set(None),
        notes: ActiveValue::Set(None),
        created_at: ActiveValue::Set(Some(Utc::now())),
    };
    transactions::Entity::insert(row)
        .exec_without_returning(db)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::str::FromStr;

    fn input(amount: &str, buy_price: &str, position_type: Option<&str>) -> OpenPositionInput {
        OpenPositionInput {
            symbol: "BTC".to_string(),
            coin_name: "Bitcoin".to_string(),
            amount: Decimal::from_str(amount).unwrap(),
            buy_price: Decimal::from_str(buy_price).unwrap(),
            position_type: position_type.map(|t| t.to_string()),
        }
    }

    #[tokio::test]
    async fn open_rejects_non_positive_amount() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let err = open_position(&db, Uuid::new_v4(), input("0", "100", None))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn open_rejects_non_positive_buy_price() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let err = open_position(&db, Uuid::new_v4(), input("1", "-5", None))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn open_rejects_unknown_position_type() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let err = open_position(&db, Uuid::new_v4(), input("1", "100", Some("hedge")))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn close_rejects_non_positive_price() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();
        let err = close_position(
            &db,
            Uuid::new_v4(),
            Uuid::new_v4(),
            Some(Decimal::ZERO),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
