//! Batch jobs run by the scheduler or the `run-jobs` command.
//!
//! Every job walks its items one by one. A failing item is logged and
//! counted, the rest of the batch still runs. Nothing is retried.

use chrono::{Duration, NaiveDateTime};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{error, info, instrument};

use common::BatchReport;
use model::entities::{budget, goal, scenario};

use crate::budget::{BudgetCalculator, raise_budget_alerts, refresh_budget_actuals};
use crate::error::Result;
use crate::goal::refresh_goal;
use crate::scenario::{Simulator, simulate_scenario};
use crate::source::TransactionSource;

/// Simulates active scenarios that were never simulated or whose last run
/// is older than `stale_after_hours`.
#[instrument(skip(db, source, simulator))]
pub async fn run_scheduled_scenarios(
    db: &DatabaseConnection,
    source: &dyn TransactionSource,
    simulator: &Simulator,
    now: NaiveDateTime,
) -> Result<BatchReport> {
    let stale_before = now - Duration::hours(simulator.settings().stale_after_hours);
    let due = scenario::Entity::find()
        .filter(scenario::Column::IsActive.eq(true))
        .filter(
            Condition::any()
                .add(scenario::Column::LastSimulatedAt.is_null())
                .add(scenario::Column::LastSimulatedAt.lt(stale_before)),
        )
        .order_by_asc(scenario::Column::Id)
        .all(db)
        .await?;

    let mut report = BatchReport::default();
    for scenario in due {
        match simulate_scenario(db, source, simulator, scenario.id, now.date()).await {
            Ok(_) => report.record_success(),
            Err(e) => {
                error!(scenario_id = scenario.id, "Scheduled simulation failed: {}", e);
                report.record_failure();
            }
        }
    }

    info!(processed = report.processed, failed = report.failed, "Scheduled simulations finished");
    Ok(report)
}

async fn active_budget_ids(db: &DatabaseConnection) -> Result<Vec<i32>> {
    Ok(budget::Entity::find()
        .filter(budget::Column::IsActive.eq(true))
        .order_by_asc(budget::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(|b| b.id)
        .collect())
}

#[instrument(skip(db, source, calculator))]
pub async fn update_all_budget_actuals(
    db: &DatabaseConnection,
    source: &dyn TransactionSource,
    calculator: &BudgetCalculator,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();
    for budget_id in active_budget_ids(db).await? {
        match refresh_budget_actuals(db, source, calculator, budget_id).await {
            Ok(_) => report.record_success(),
            Err(e) => {
                error!(budget_id, "Updating budget actuals failed: {}", e);
                report.record_failure();
            }
        }
    }

    info!(processed = report.processed, failed = report.failed, "Budget actuals job finished");
    Ok(report)
}

#[instrument(skip(db, calculator))]
pub async fn check_all_budget_alerts(
    db: &DatabaseConnection,
    calculator: &BudgetCalculator,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();
    for budget_id in active_budget_ids(db).await? {
        match raise_budget_alerts(db, calculator, budget_id).await {
            Ok(alerts) => {
                for alert in &alerts {
                    info!(budget_id, level = %alert.level, "{}", alert.message);
                }
                report.record_success();
            }
            Err(e) => {
                error!(budget_id, "Checking budget alerts failed: {}", e);
                report.record_failure();
            }
        }
    }

    info!(processed = report.processed, failed = report.failed, "Budget alerts job finished");
    Ok(report)
}

/// Refreshes active goals whose target date has not passed.
///
/// Goals that cannot be measured from transactions are counted as skipped.
#[instrument(skip(db, source))]
pub async fn update_all_goals(
    db: &DatabaseConnection,
    source: &dyn TransactionSource,
    now: NaiveDateTime,
) -> Result<BatchReport> {
    let goals = goal::Entity::find()
        .filter(goal::Column::IsActive.eq(true))
        .filter(goal::Column::TargetDate.gte(now.date()))
        .order_by_asc(goal::Column::Id)
        .all(db)
        .await?;

    let mut report = BatchReport::default();
    for goal in &goals {
        match refresh_goal(db, source, goal, now).await {
            Ok(Some(_)) => report.record_success(),
            Ok(None) => report.record_skip(),
            Err(e) => {
                error!(goal_id = goal.id, "Updating goal failed: {}", e);
                report.record_failure();
            }
        }
    }

    info!(
        processed = report.processed,
        skipped = report.skipped,
        failed = report.failed,
        "Goals job finished"
    );
    Ok(report)
}
