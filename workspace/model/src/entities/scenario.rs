use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The flavour of a what-if scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ScenarioType {
    #[sea_orm(string_value = "best")]
    Best,
    #[sea_orm(string_value = "expected")]
    Expected,
    #[sea_orm(string_value = "worst")]
    Worst,
    #[sea_orm(string_value = "custom")]
    Custom,
}

/// A what-if financial projection for one organization.
///
/// The projection starts at `base_year`/`base_month` and runs for
/// `forecast_months` months (1 to 36).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scenarios")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub organization_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub scenario_type: ScenarioType,
    pub base_year: i32,
    pub base_month: i32,
    #[sea_orm(default_value = "12")]
    pub forecast_months: i32,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    pub last_simulated_at: Option<NaiveDateTime>,
    #[sea_orm(default_value = "1")]
    pub version: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::scenario_adjustment::Entity")]
    ScenarioAdjustment,
    #[sea_orm(has_many = "super::scenario_result::Entity")]
    ScenarioResult,
}

impl Related<super::scenario_adjustment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScenarioAdjustment.def()
    }
}

impl Related<super::scenario_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScenarioResult.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
