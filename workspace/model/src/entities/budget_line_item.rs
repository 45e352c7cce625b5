use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::budget;

/// Category level allocation inside a budget.
///
/// `actual_amount`, `variance_amount` and `variance_percent` are derived from
/// transactions and overwritten on every actuals update. Each `alert_sent_*`
/// flag is set once and never cleared.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budget_line_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub budget_id: i32,
    pub category_name: String,
    pub department: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub budgeted_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub actual_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub variance_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((9, 2)))")]
    pub variance_percent: Decimal,
    #[sea_orm(default_value = "false")]
    pub alert_sent_50: bool,
    #[sea_orm(default_value = "false")]
    pub alert_sent_75: bool,
    #[sea_orm(default_value = "false")]
    pub alert_sent_90: bool,
    #[sea_orm(default_value = "false")]
    pub alert_sent_100: bool,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "budget::Entity",
        from = "Column::BudgetId",
        to = "budget::Column::Id",
        on_delete = "Cascade"
    )]
    Budget,
}

impl Related<budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budget.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
