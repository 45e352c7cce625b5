use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Ledger of booked transactions, read by the planning calculators
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(pk_auto(Transactions::Id))
                    .col(integer(Transactions::OrganizationId))
                    .col(date(Transactions::Date))
                    .col(decimal(Transactions::Amount).decimal_len(19, 4))
                    .col(string(Transactions::Category))
                    .col(decimal(Transactions::Balance).decimal_len(19, 4))
                    .col(string_null(Transactions::Description))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_org_date")
                    .table(Transactions::Table)
                    .col(Transactions::OrganizationId)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    OrganizationId,
    Date,
    Amount,
    Category,
    Balance,
    Description,
}
