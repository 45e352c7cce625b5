use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create scenarios table
        manager
            .create_table(
                Table::create()
                    .table(Scenarios::Table)
                    .if_not_exists()
                    .col(pk_auto(Scenarios::Id))
                    .col(integer(Scenarios::OrganizationId))
                    .col(string(Scenarios::Name))
                    .col(string_null(Scenarios::Description))
                    .col(string_len(Scenarios::ScenarioType, 20))
                    .col(integer(Scenarios::BaseYear))
                    .col(integer(Scenarios::BaseMonth))
                    .col(integer(Scenarios::ForecastMonths).default(12))
                    .col(boolean(Scenarios::IsActive).default(true))
                    .col(date_time_null(Scenarios::LastSimulatedAt))
                    .col(integer(Scenarios::Version).default(1))
                    .col(date_time(Scenarios::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // Create scenario_adjustments table
        manager
            .create_table(
                Table::create()
                    .table(ScenarioAdjustments::Table)
                    .if_not_exists()
                    .col(pk_auto(ScenarioAdjustments::Id))
                    .col(integer(ScenarioAdjustments::ScenarioId))
                    .col(string(ScenarioAdjustments::Name))
                    .col(string_len(ScenarioAdjustments::AdjustmentType, 20))
                    .col(string_len(ScenarioAdjustments::ChangeType, 20))
                    .col(decimal(ScenarioAdjustments::Value).decimal_len(15, 2))
                    .col(string_null(ScenarioAdjustments::Category))
                    .col(integer(ScenarioAdjustments::StartMonth))
                    .col(integer_null(ScenarioAdjustments::EndMonth))
                    .col(string_null(ScenarioAdjustments::Description))
                    .col(string_null(ScenarioAdjustments::Assumptions))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scenario_adjustments_scenario")
                            .from(ScenarioAdjustments::Table, ScenarioAdjustments::ScenarioId)
                            .to(Scenarios::Table, Scenarios::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create scenario_results table, series are stored as JSON arrays
        manager
            .create_table(
                Table::create()
                    .table(ScenarioResults::Table)
                    .if_not_exists()
                    .col(pk_auto(ScenarioResults::Id))
                    .col(integer(ScenarioResults::ScenarioId))
                    .col(json(ScenarioResults::MonthLabels))
                    .col(json(ScenarioResults::MonthlyRevenue))
                    .col(json(ScenarioResults::MonthlyExpenses))
                    .col(json(ScenarioResults::MonthlyProfit))
                    .col(json(ScenarioResults::MonthlyCashBalance))
                    .col(decimal(ScenarioResults::TotalRevenue).decimal_len(19, 4))
                    .col(decimal(ScenarioResults::TotalExpenses).decimal_len(19, 4))
                    .col(decimal(ScenarioResults::TotalProfit).decimal_len(19, 4))
                    .col(decimal(ScenarioResults::ProfitMargin).decimal_len(7, 2))
                    .col(decimal(ScenarioResults::EndingCash).decimal_len(19, 4))
                    .col(decimal(ScenarioResults::LowestCash).decimal_len(19, 4))
                    .col(big_integer_null(ScenarioResults::RunwayDays))
                    .col(integer_null(ScenarioResults::BreakEvenMonth))
                    .col(decimal_null(ScenarioResults::BreakEvenRevenue).decimal_len(19, 4))
                    .col(decimal(ScenarioResults::ConfidenceLevel).decimal_len(5, 2))
                    .col(date_time(ScenarioResults::SimulatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scenario_results_scenario")
                            .from(ScenarioResults::Table, ScenarioResults::ScenarioId)
                            .to(Scenarios::Table, Scenarios::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScenarioResults::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ScenarioAdjustments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Scenarios::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Scenarios {
    Table,
    Id,
    OrganizationId,
    Name,
    Description,
    ScenarioType,
    BaseYear,
    BaseMonth,
    ForecastMonths,
    IsActive,
    LastSimulatedAt,
    Version,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ScenarioAdjustments {
    Table,
    Id,
    ScenarioId,
    Name,
    AdjustmentType,
    ChangeType,
    Value,
    Category,
    StartMonth,
    EndMonth,
    Description,
    Assumptions,
}

#[derive(DeriveIden)]
enum ScenarioResults {
    Table,
    Id,
    ScenarioId,
    MonthLabels,
    MonthlyRevenue,
    MonthlyExpenses,
    MonthlyProfit,
    MonthlyCashBalance,
    TotalRevenue,
    TotalExpenses,
    TotalProfit,
    ProfitMargin,
    EndingCash,
    LowestCash,
    RunwayDays,
    BreakEvenMonth,
    BreakEvenRevenue,
    ConfidenceLevel,
    SimulatedAt,
}
