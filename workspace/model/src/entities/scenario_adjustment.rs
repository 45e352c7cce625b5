use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::scenario;

/// What an adjustment perturbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentType {
    #[sea_orm(string_value = "revenue")]
    Revenue,
    #[sea_orm(string_value = "expense")]
    Expense,
    /// Added straight to the cash balance in `start_month`.
    #[sea_orm(string_value = "one_time")]
    OneTime,
}

/// How the adjustment value is applied to the affected amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    #[sea_orm(string_value = "percentage")]
    Percentage,
    #[sea_orm(string_value = "absolute")]
    Absolute,
    /// Monthly compounding from the adjustment's own start month.
    #[sea_orm(string_value = "growth_rate")]
    GrowthRate,
}

/// A revenue, expense or one-time rule attached to a scenario.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scenario_adjustments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub scenario_id: i32,
    pub name: String,
    pub adjustment_type: AdjustmentType,
    pub change_type: ChangeType,
    /// Amount or percentage, depending on `change_type`.
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub value: Decimal,
    pub category: Option<String>,
    /// Month 1 is the first forecast month.
    pub start_month: i32,
    /// Last month the adjustment applies to. `None` means open ended.
    pub end_month: Option<i32>,
    pub description: Option<String>,
    pub assumptions: Option<String>,
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
