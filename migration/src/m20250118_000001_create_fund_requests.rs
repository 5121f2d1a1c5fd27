use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DepositRequests::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DepositRequests::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(DepositRequests::UserId).uuid().not_null())
                    .col(ColumnDef::new(DepositRequests::Amount).decimal_len(20, 2).not_null())
                    .col(ColumnDef::new(DepositRequests::PaymentMethod).string().not_null())
                    .col(ColumnDef::new(DepositRequests::TransactionReference).text().null())
                    .col(ColumnDef::new(DepositRequests::Status).string().not_null().default("pending")) // "pending", "approved", "rejected"
                    .col(ColumnDef::new(DepositRequests::AdminNotes).text().null())
                    .col(ColumnDef::new(DepositRequests::ApprovedBy).uuid().null())
                    .col(ColumnDef::new(DepositRequests::CreatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(DepositRequests::UpdatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP")))
                    .index(
                        Index::create()
                            .name("idx_deposit_requests_user_status")
                            .table(DepositRequests::Table)
                            .col(DepositRequests::UserId)
                            .col(DepositRequests::Status)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deposit_requests_profile")
                            .from(DepositRequests::Table, DepositRequests::UserId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WithdrawalRequests::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WithdrawalRequests::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(WithdrawalRequests::UserId).uuid().not_null())
                    .col(ColumnDef::new(WithdrawalRequests::Amount).decimal_len(20, 2).not_null())
                    .col(ColumnDef::new(WithdrawalRequests::BankAccountId).uuid().null())
                    .col(ColumnDef::new(WithdrawalRequests::Status).string().not_null().default("pending"))
                    .col(ColumnDef::new(WithdrawalRequests::AdminNotes).text().null())
                    .col(ColumnDef::new(WithdrawalRequests::ApprovedBy).uuid().null())
                    .col(ColumnDef::new(WithdrawalRequests::CreatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(WithdrawalRequests::UpdatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP")))
                    .index(
                        Index::create()
                            .name("idx_withdrawal_requests_user_status")
                            .table(WithdrawalRequests::Table)
                            .col(WithdrawalRequests::UserId)
                            .col(WithdrawalRequests::Status)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_withdrawal_requests_profile")
                            .from(WithdrawalRequests::Table, WithdrawalRequests::UserId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_withdrawal_requests_bank_account")
                            .from(WithdrawalRequests::Table, WithdrawalRequests::BankAccountId)
                            .to(BankAccounts::Table, BankAccounts::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WithdrawalRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DepositRequests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DepositRequests {
    Table,
    Id,
    UserId,
    Amount,
    PaymentMethod,
    TransactionReference,
    Status,
    AdminNotes,
    ApprovedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum WithdrawalRequests {
    Table,
    Id,
    UserId,
    Amount,
    BankAccountId,
    Status,
    AdminNotes,
    ApprovedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum BankAccounts {
    Table,
    Id,
}
