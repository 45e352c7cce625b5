use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum BudgetType {
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
    #[sea_orm(string_value = "annual")]
    Annual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    /// Fixed for the whole period.
    #[sea_orm(string_value = "static")]
    Static,
    /// Re-planned every month.
    #[sea_orm(string_value = "rolling")]
    Rolling,
}

/// A spending plan for one organization over `start_date..=end_date`.
///
/// The `alert_at_*` toggles decide which utilization thresholds may raise
/// alerts for the budget's line items.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub organization_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub budget_type: BudgetType,
    pub period_type: PeriodType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_amount: Decimal,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    #[sea_orm(default_value = "false")]
    pub is_approved: bool,
    pub approved_at: Option<NaiveDateTime>,
    #[sea_orm(default_value = "true")]
    pub alert_at_50_percent: bool,
    #[sea_orm(default_value = "true")]
    pub alert_at_75_percent: bool,
    #[sea_orm(default_value = "true")]
    pub alert_at_90_percent: bool,
    #[sea_orm(default_value = "true")]
    pub alert_at_100_percent: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::budget_line_item::Entity")]
    BudgetLineItem,
}

impl Related<super::budget_line_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetLineItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
