use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

use super::scenario;

/// Month-indexed amounts stored as a JSON array.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize, FromJsonQueryResult)]
pub struct AmountSeries(pub Vec<Decimal>);

/// Month labels ("Jan 2025", ...) stored as a JSON array.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize, FromJsonQueryResult)]
pub struct LabelSeries(pub Vec<String>);

/// Immutable snapshot of one simulation run.
/// A new run always inserts a new row; the latest `simulated_at` wins.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scenario_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub scenario_id: i32,
    #[sea_orm(column_type = "Json")]
    pub month_labels: LabelSeries,
    #[sea_orm(column_type = "Json")]
    pub monthly_revenue: AmountSeries,
    #[sea_orm(column_type = "Json")]
    pub monthly_expenses: AmountSeries,
    #[sea_orm(column_type = "Json")]
    pub monthly_profit: AmountSeries,
    #[sea_orm(column_type = "Json")]
    pub monthly_cash_balance: AmountSeries,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_revenue: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_expenses: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_profit: Decimal,
    #[sea_orm(column_type = "Decimal(Some((7, 2)))")]
    pub profit_margin: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub ending_cash: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub lowest_cash: Decimal,
    pub runway_days: Option<i64>,
    pub break_even_month: Option<i32>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub break_even_revenue: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub confidence_level: Decimal,
    pub simulated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "scenario::Entity",
        from = "Column::ScenarioId",
        to = "scenario::Column::Id",
        on_delete = "Cascade"
    )]
    Scenario,
}

impl Related<scenario::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scenario.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
