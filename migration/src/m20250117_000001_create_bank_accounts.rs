use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BankAccounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BankAccounts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(BankAccounts::UserId).uuid().not_null())
                    .col(ColumnDef::new(BankAccounts::AccountHolderName).string().not_null())
                    .col(ColumnDef::new(BankAccounts::AccountNumber).string().not_null())
                    .col(ColumnDef::new(BankAccounts::IfscCode).string().not_null())
                    .col(ColumnDef::new(BankAccounts::BankName).string().not_null())
                    .col(ColumnDef::new(BankAccounts::AccountType).string().not_null().default("savings"))
                    .col(ColumnDef::new(BankAccounts::IsPrimary).boolean().not_null().default(false))
                    .col(ColumnDef::new(BankAccounts::CreatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .index(
                        Index::create()
                            .name("idx_bank_accounts_user")
                            .table(BankAccounts::Table)
                            .col(BankAccounts::UserId)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bank_accounts_profile")
                            .from(BankAccounts::Table, BankAccounts::UserId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        // Global payment settings, one row managed by admins.
        manager
            .create_table(
                Table::create()
                    .table(PaymentSettings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PaymentSettings::Id).integer().not_null().primary_key())
                    .col(ColumnDef::new(PaymentSettings::UpiId).text().null())
                    .col(ColumnDef::new(PaymentSettings::QrCodeUrl).text().null())
                    .col(ColumnDef::new(PaymentSettings::BankName).text().null())
                    .col(ColumnDef::new(PaymentSettings::AccountNumber).text().null())
                    .col(ColumnDef::new(PaymentSettings::IfscCode).text().null())
                    .col(ColumnDef::new(PaymentSettings::AccountHolder).text().null())
                    .col(ColumnDef::new(PaymentSettings::UpdatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP")))
                    .to_owned(),
            )
            .await?;

        let seed = Query::insert()
            .into_table(PaymentSettings::Table)
            .columns([PaymentSettings::Id])
            .values_panic([1.into()])
            .to_owned();
        manager.exec_stmt(seed).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PaymentSettings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BankAccounts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BankAccounts {
    Table,
    Id,
    UserId,
    AccountHolderName,
    AccountNumber,
    IfscCode,
    BankName,
    AccountType,
    IsPrimary,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PaymentSettings {
    Table,
    Id,
    UpiId,
    QrCodeUrl,
    BankName,
    AccountNumber,
    IfscCode,
    AccountHolder,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
}
