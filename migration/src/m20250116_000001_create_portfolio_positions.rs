use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PortfolioPositions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PortfolioPositions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(PortfolioPositions::UserId).uuid().not_null())
                    .col(ColumnDef::new(PortfolioPositions::Symbol).string().not_null())
                    .col(ColumnDef::new(PortfolioPositions::CoinName).string().not_null())
                    .col(ColumnDef::new(PortfolioPositions::Amount).decimal_len(20, 8).not_null())
                    .col(ColumnDef::new(PortfolioPositions::BuyPrice).decimal_len(20, 8).not_null())
                    .col(ColumnDef::new(PortfolioPositions::CurrentPrice).decimal_len(20, 8).null())
                    .col(ColumnDef::new(PortfolioPositions::PositionType).string().not_null().default("long")) // "long", "short"
                    .col(ColumnDef::new(PortfolioPositions::Status).string().not_null().default("open")) // "open", "closed"
                    .col(ColumnDef::new(PortfolioPositions::CreatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(PortfolioPositions::UpdatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP")))
                    .index(
                        Index::create()
                            .name("idx_positions_user_status")
                            .table(PortfolioPositions::Table)
                            .col(PortfolioPositions::UserId)
                            .col(PortfolioPositions::Status)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_positions_profile")
                            .from(PortfolioPositions::Table, PortfolioPositions::UserId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PortfolioPositions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PortfolioPositions {
    Table,
    Id,
    UserId,
    Symbol,
    CoinName,
    Amount,
    BuyPrice,
    CurrentPrice,
    PositionType,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
}
