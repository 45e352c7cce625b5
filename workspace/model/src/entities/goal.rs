use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    #[sea_orm(string_value = "revenue")]
    Revenue,
    #[sea_orm(string_value = "profit")]
    Profit,
    #[sea_orm(string_value = "margin")]
    Margin,
    #[sea_orm(string_value = "runway")]
    Runway,
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "growth")]
    Growth,
    #[sea_orm(string_value = "custom")]
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[sea_orm(string_value = "on_track")]
    OnTrack,
    #[sea_orm(string_value = "at_risk")]
    AtRisk,
    #[sea_orm(string_value = "off_track")]
    OffTrack,
    #[sea_orm(string_value = "achieved")]
    Achieved,
}

/// A financial target tracked between `start_date` and `target_date`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "goals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub organization_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub goal_type: GoalType,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub target_value: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub current_value: Decimal,
    pub start_date: NaiveDate,
    pub target_date: NaiveDate,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub progress_percent: Decimal,
    pub status: GoalStatus,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    pub last_updated_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
