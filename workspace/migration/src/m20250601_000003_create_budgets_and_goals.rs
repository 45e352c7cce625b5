use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create budgets table
        manager
            .create_table(
                Table::create()
                    .table(Budgets::Table)
                    .if_not_exists()
                    .col(pk_auto(Budgets::Id))
                    .col(integer(Budgets::OrganizationId))
                    .col(string(Budgets::Name))
                    .col(string_null(Budgets::Description))
                    .col(string_len(Budgets::BudgetType, 20))
                    .col(string_len(Budgets::PeriodType, 20))
                    .col(date(Budgets::StartDate))
                    .col(date(Budgets::EndDate))
                    .col(decimal(Budgets::TotalAmount).decimal_len(19, 4))
                    .col(boolean(Budgets::IsActive).default(true))
                    .col(boolean(Budgets::IsApproved).default(false))
                    .col(date_time_null(Budgets::ApprovedAt))
                    .col(boolean(Budgets::AlertAt50Percent).default(true))
                    .col(boolean(Budgets::AlertAt75Percent).default(true))
                    .col(boolean(Budgets::AlertAt90Percent).default(true))
                    .col(boolean(Budgets::AlertAt100Percent).default(true))
                    .col(date_time(Budgets::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // Create budget_line_items table
        manager
            .create_table(
                Table::create()
                    .table(BudgetLineItems::Table)
                    .if_not_exists()
                    .col(pk_auto(BudgetLineItems::Id))
                    .col(integer(BudgetLineItems::BudgetId))
                    .col(string(BudgetLineItems::CategoryName))
                    .col(string_null(BudgetLineItems::Department))
                    .col(decimal(BudgetLineItems::BudgetedAmount).decimal_len(19, 4))
                    .col(decimal(BudgetLineItems::ActualAmount).decimal_len(19, 4).default(0))
                    .col(decimal(BudgetLineItems::VarianceAmount).decimal_len(19, 4).default(0))
                    .col(decimal(BudgetLineItems::VariancePercent).decimal_len(9, 2).default(0))
                    .col(boolean(BudgetLineItems::AlertSent50).default(false))
                    .col(boolean(BudgetLineItems::AlertSent75).default(false))
                    .col(boolean(BudgetLineItems::AlertSent90).default(false))
                    .col(boolean(BudgetLineItems::AlertSent100).default(false))
                    .col(string_null(BudgetLineItems::Notes))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_budget_line_items_budget")
                            .from(BudgetLineItems::Table, BudgetLineItems::BudgetId)
                            .to(Budgets::Table, Budgets::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create goals table
        manager
            .create_table(
                Table::create()
                    .table(Goals::Table)
                    .if_not_exists()
                    .col(pk_auto(Goals::Id))
                    .col(integer(Goals::OrganizationId))
                    .col(string(Goals::Name))
                    .col(string_null(Goals::Description))
                    .col(string_len(Goals::GoalType, 20))
                    .col(decimal(Goals::TargetValue).decimal_len(19, 4))
                    .col(decimal(Goals::CurrentValue).decimal_len(19, 4).default(0))
                    .col(date(Goals::StartDate))
                    .col(date(Goals::TargetDate))
                    .col(decimal(Goals::ProgressPercent).decimal_len(5, 2).default(0))
                    .col(string_len(Goals::Status, 20).default("on_track"))
                    .col(boolean(Goals::IsActive).default(true))
                    .col(date_time_null(Goals::LastUpdatedAt))
                    .col(date_time(Goals::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Goals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BudgetLineItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Budgets::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Budgets {
    Table,
    Id,
    OrganizationId,
    Name,
    Description,
    BudgetType,
    PeriodType,
    StartDate,
    EndDate,
    TotalAmount,
    IsActive,
    IsApproved,
    ApprovedAt,
    #[sea_orm(iden = "alert_at_50_percent")]
    AlertAt50Percent,
    #[sea_orm(iden = "alert_at_75_percent")]
    AlertAt75Percent,
    #[sea_orm(iden = "alert_at_90_percent")]
    AlertAt90Percent,
    #[sea_orm(iden = "alert_at_100_percent")]
    AlertAt100Percent,
    CreatedAt,
}

#[derive(DeriveIden)]
enum BudgetLineItems {
    Table,
    Id,
    BudgetId,
    CategoryName,
    Department,
    BudgetedAmount,
    ActualAmount,
    VarianceAmount,
    VariancePercent,
    #[sea_orm(iden = "alert_sent_50")]
    AlertSent50,
    #[sea_orm(iden = "alert_sent_75")]
    AlertSent75,
    #[sea_orm(iden = "alert_sent_90")]
    AlertSent90,
    #[sea_orm(iden = "alert_sent_100")]
    AlertSent100,
    Notes,
}

#[derive(DeriveIden)]
enum Goals {
    Table,
    Id,
    OrganizationId,
    Name,
    Description,
    GoalType,
    TargetValue,
    CurrentValue,
    StartDate,
    TargetDate,
    ProgressPercent,
    Status,
    IsActive,
    LastUpdatedAt,
    CreatedAt,
}
