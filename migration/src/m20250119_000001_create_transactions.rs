use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Audit rows outlive their user, so no FK here.
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Transactions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Transactions::UserId).uuid().null())
                    .col(ColumnDef::new(Transactions::TransactionType).string().not_null())
                    .col(ColumnDef::new(Transactions::Symbol).text().null())
                    .col(ColumnDef::new(Transactions::Amount).decimal_len(20, 8).null())
                    .col(ColumnDef::new(Transactions::Price).decimal_len(20, 8).null())
                    .col(ColumnDef::new(Transactions::TotalValue).decimal_len(20, 2).not_null())
                    .col(ColumnDef::new(Transactions::Status).text().null())
                    .col(ColumnDef::new(Transactions::PerformedBy).uuid().null())
                    .col(ColumnDef::new(Transactions::Notes).text().null())
                    .col(ColumnDef::new(Transactions::CreatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .index(
                        Index::create()
                            .name("idx_transactions_user")
                            .table(Transactions::Table)
                            .col(Transactions::UserId)
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    UserId,
    TransactionType,
    Symbol,
    Amount,
    Price,
    TotalValue,
    Status,
    PerformedBy,
    Notes,
    CreatedAt,
}
