//! Database fixtures shared by the compute tests.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, DbErr, Set,
};
use tracing::subscriber::DefaultGuard;

use model::entities::{
    budget, budget_line_item, goal, scenario, scenario_adjustment, transaction,
};
use model::transaction::Transaction;

use crate::error::{ComputeError, Result as ComputeResult};
use crate::source::TransactionSource;

pub type Result<T> = std::result::Result<T, DbErr>;

pub async fn setup_db() -> Result<DatabaseConnection> {
    // Connect to the SQLite database
    let db = Database::connect("sqlite::memory:").await?;

    // Enable foreign keys
    db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

    Migrator::up(&db, None).await.expect("Migrations failed.");
    Ok(db)
}

/// Routes log output of the current test to the test writer.
pub fn init_test_tracing() -> DefaultGuard {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .finish();
    tracing::subscriber::set_default(subscriber)
}

pub fn created_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub async fn new_transaction(
    db: &DatabaseConnection,
    organization_id: i32,
    date: NaiveDate,
    amount: i64,
    category: &str,
    balance: i64,
) -> Result<transaction::Model> {
    transaction::ActiveModel {
        organization_id: Set(organization_id),
        date: Set(date),
        amount: Set(Decimal::new(amount, 0)),
        category: Set(category.to_string()),
        balance: Set(Decimal::new(balance, 0)),
        description: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn new_scenario(
    db: &DatabaseConnection,
    organization_id: i32,
    forecast_months: i32,
) -> Result<scenario::Model> {
    static SCENARIO_ID: AtomicU64 = AtomicU64::new(0);
    let current_id = SCENARIO_ID.fetch_add(1, Ordering::SeqCst);

    scenario::ActiveModel {
        organization_id: Set(organization_id),
        name: Set(format!("Scenario {}", current_id)),
        description: Set(Some("Scenario for testing".to_string())),
        scenario_type: Set(scenario::ScenarioType::Custom),
        base_year: Set(2025),
        base_month: Set(1),
        forecast_months: Set(forecast_months),
        is_active: Set(true),
        last_simulated_at: Set(None),
        version: Set(1),
        created_at: Set(created_at()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn new_adjustment(
    db: &DatabaseConnection,
    scenario: &scenario::Model,
    adjustment_type: scenario_adjustment::AdjustmentType,
    change_type: scenario_adjustment::ChangeType,
    value: Decimal,
    start_month: i32,
    end_month: Option<i32>,
) -> Result<scenario_adjustment::Model> {
    scenario_adjustment::ActiveModel {
        scenario_id: Set(scenario.id),
        name: Set(format!("{:?} {:?} from {}", adjustment_type, change_type, start_month)),
        adjustment_type: Set(adjustment_type),
        change_type: Set(change_type),
        value: Set(value),
        category: Set(None),
        start_month: Set(start_month),
        end_month: Set(end_month),
        description: Set(None),
        assumptions: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn new_budget(
    db: &DatabaseConnection,
    organization_id: i32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    total_amount: i64,
) -> Result<budget::Model> {
    budget::ActiveModel {
        organization_id: Set(organization_id),
        name: Set("Operating budget".to_string()),
        description: Set(None),
        budget_type: Set(budget::BudgetType::Quarterly),
        period_type: Set(budget::PeriodType::Static),
        start_date: Set(start_date),
        end_date: Set(end_date),
        total_amount: Set(Decimal::new(total_amount, 0)),
        is_active: Set(true),
        is_approved: Set(true),
        approved_at: Set(Some(created_at())),
        alert_at_50_percent: Set(true),
        alert_at_75_percent: Set(true),
        alert_at_90_percent: Set(true),
        alert_at_100_percent: Set(true),
        created_at: Set(created_at()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn new_line_item(
    db: &DatabaseConnection,
    budget: &budget::Model,
    category_name: &str,
    budgeted_amount: i64,
) -> Result<budget_line_item::Model> {
    budget_line_item::ActiveModel {
        budget_id: Set(budget.id),
        category_name: Set(category_name.to_string()),
        department: Set(None),
        budgeted_amount: Set(Decimal::new(budgeted_amount, 0)),
        actual_amount: Set(Decimal::ZERO),
        variance_amount: Set(Decimal::ZERO),
        variance_percent: Set(Decimal::ZERO),
        alert_sent_50: Set(false),
        alert_sent_75: Set(false),
        alert_sent_90: Set(false),
        alert_sent_100: Set(false),
        notes: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn new_goal(
    db: &DatabaseConnection,
    organization_id: i32,
    goal_type: goal::GoalType,
    target_value: i64,
    start_date: NaiveDate,
    target_date: NaiveDate,
) -> Result<goal::Model> {
    goal::ActiveModel {
        organization_id: Set(organization_id),
        name: Set(format!("{:?} target", goal_type)),
        description: Set(None),
        goal_type: Set(goal_type),
        target_value: Set(Decimal::new(target_value, 0)),
        current_value: Set(Decimal::ZERO),
        start_date: Set(start_date),
        target_date: Set(target_date),
        progress_percent: Set(Decimal::ZERO),
        status: Set(goal::GoalStatus::OffTrack),
        is_active: Set(true),
        last_updated_at: Set(None),
        created_at: Set(created_at()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// A source that is always down.
pub struct FailingSource;

#[async_trait]
impl TransactionSource for FailingSource {
    async fn transactions_between(
        &self,
        _organization_id: i32,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> ComputeResult<Vec<Transaction>> {
        Err(ComputeError::Source("ledger service unavailable".to_string()))
    }

    async fn latest_transaction(&self, _organization_id: i32, _on: NaiveDate) -> ComputeResult<Option<Transaction>> {
        Err(ComputeError::Source("ledger service unavailable".to_string()))
    }
}

/// Unsaved line item with no spend and no alerts sent.
pub fn line_item_model(category: &str, budgeted: i64) -> budget_line_item::Model {
    budget_line_item::Model {
        id: 1,
        budget_id: 1,
        category_name: category.to_string(),
        department: None,
        budgeted_amount: Decimal::new(budgeted, 0),
        actual_amount: Decimal::ZERO,
        variance_amount: Decimal::ZERO,
        variance_percent: Decimal::ZERO,
        alert_sent_50: false,
        alert_sent_75: false,
        alert_sent_90: false,
        alert_sent_100: false,
        notes: None,
    }
}

/// Unsaved budget for January to March 2025 with every alert toggle on.
pub fn budget_model(total_amount: i64) -> budget::Model {
    budget::Model {
        id: 1,
        organization_id: 1,
        name: "Q1".to_string(),
        description: None,
        budget_type: budget::BudgetType::Quarterly,
        period_type: budget::PeriodType::Static,
        start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        total_amount: Decimal::new(total_amount, 0),
        is_active: true,
        is_approved: false,
        approved_at: None,
        alert_at_50_percent: true,
        alert_at_75_percent: true,
        alert_at_90_percent: true,
        alert_at_100_percent: true,
        created_at: created_at(),
    }
}
