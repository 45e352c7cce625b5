//! Goal tracking: progress, status and the automatic measurement of
//! revenue, profit and cash goals from transactions.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::{debug, info, instrument};

use common::{GoalDashboard, GoalProgress};
use model::entities::goal::{self, GoalStatus, GoalType};
use model::transaction::Transaction;

use crate::error::{ComputeError, Result};
use crate::source::TransactionSource;

/// Status for a progress percentage: 100 achieved, 80 on track, 50 at risk.
pub fn status_for(progress_percent: Decimal) -> GoalStatus {
    if progress_percent >= Decimal::ONE_HUNDRED {
        GoalStatus::Achieved
    } else if progress_percent >= Decimal::new(80, 0) {
        GoalStatus::OnTrack
    } else if progress_percent >= Decimal::new(50, 0) {
        GoalStatus::AtRisk
    } else {
        GoalStatus::OffTrack
    }
}

/// Sets the current value and recomputes progress and status.
///
/// Progress is capped at 100 and left untouched for non-positive targets.
pub fn update_progress(goal: &mut goal::Model, current_value: Decimal, now: NaiveDateTime) {
    goal.current_value = current_value;
    if goal.target_value > Decimal::ZERO {
        let progress = current_value / goal.target_value * Decimal::ONE_HUNDRED;
        goal.progress_percent = progress.min(Decimal::ONE_HUNDRED).round_dp(2);
    }
    goal.status = status_for(goal.progress_percent);
    goal.last_updated_at = Some(now);
}

/// Current value of a goal measured from `transactions`.
///
/// Only revenue, profit and cash goals are measured; other types return
/// `None` and keep their manually set value. Revenue and profit count the
/// transactions since the goal started. Cash is the balance after the latest
/// transaction up to `today`, however old it is.
pub fn measure_goal(goal: &goal::Model, transactions: &[Transaction], today: NaiveDate) -> Option<Decimal> {
    let in_period = || {
        transactions
            .iter()
            .filter(move |t| t.date() >= goal.start_date && t.date() <= today)
    };

    match goal.goal_type {
        GoalType::Revenue => Some(in_period().filter(|t| t.is_inflow()).map(|t| t.amount()).sum()),
        GoalType::Profit => Some(in_period().map(|t| t.amount()).sum()),
        GoalType::Cash => transactions
            .iter()
            .filter(|t| t.date() <= today)
            .max_by_key(|t| t.date())
            .map(|t| t.balance()),
        GoalType::Margin | GoalType::Runway | GoalType::Growth | GoalType::Custom => None,
    }
}

pub fn days_remaining(goal: &goal::Model, today: NaiveDate) -> i64 {
    (goal.target_date - today).num_days().max(0)
}

/// Amount needed per 30 days to close the gap by the target date.
pub fn required_monthly_progress(goal: &goal::Model, today: NaiveDate) -> Decimal {
    let days = days_remaining(goal, today);
    if days == 0 {
        return Decimal::ZERO;
    }
    let months_left = Decimal::from(days) / Decimal::from(30);
    ((goal.target_value - goal.current_value) / months_left).round_dp(2)
}

pub fn goal_progress(goal: &goal::Model, today: NaiveDate) -> GoalProgress {
    GoalProgress {
        goal_id: goal.id,
        name: goal.name.clone(),
        goal_type: goal.goal_type.to_value(),
        status: goal.status.to_value(),
        current_value: goal.current_value,
        target_value: goal.target_value,
        progress_percent: goal.progress_percent,
        days_remaining: days_remaining(goal, today),
        required_monthly_progress: required_monthly_progress(goal, today),
    }
}

/// Counts goals by status and type and lists their progress.
pub fn goal_dashboard(organization_id: i32, goals: &[goal::Model], today: NaiveDate) -> GoalDashboard {
    let mut by_status = BTreeMap::new();
    let mut by_type = BTreeMap::new();
    for goal in goals {
        *by_status.entry(goal.status.to_value()).or_insert(0) += 1;
        *by_type.entry(goal.goal_type.to_value()).or_insert(0) += 1;
    }

    GoalDashboard {
        organization_id,
        total: goals.len(),
        by_status,
        by_type,
        goals: goals.iter().map(|g| goal_progress(g, today)).collect(),
    }
}

async fn save_goal(db: &DatabaseConnection, goal: &goal::Model) -> Result<goal::Model> {
    Ok(goal::ActiveModel {
        id: ActiveValue::Unchanged(goal.id),
        current_value: Set(goal.current_value),
        progress_percent: Set(goal.progress_percent),
        status: Set(goal.status),
        last_updated_at: Set(goal.last_updated_at),
        ..Default::default()
    }
    .update(db)
    .await?)
}

pub async fn load_goal(db: &DatabaseConnection, goal_id: i32) -> Result<goal::Model> {
    goal::Entity::find_by_id(goal_id)
        .one(db)
        .await?
        .ok_or_else(|| ComputeError::NotFound(format!("goal {}", goal_id)))
}

/// Manually records the current value of a goal.
#[instrument(skip(db))]
pub async fn set_goal_value(
    db: &DatabaseConnection,
    goal_id: i32,
    value: Decimal,
    now: NaiveDateTime,
) -> Result<goal::Model> {
    let mut goal = load_goal(db, goal_id).await?;
    update_progress(&mut goal, value, now);
    let saved = save_goal(db, &goal).await?;
    info!(goal_id, status = ?saved.status, progress = %saved.progress_percent, "Goal updated");
    Ok(saved)
}

/// Measures a goal from the transaction source and stores the progress.
///
/// Returns `None` for goal types that are not measured automatically.
#[instrument(skip(db, source, goal), fields(goal_id = goal.id))]
pub async fn refresh_goal(
    db: &DatabaseConnection,
    source: &dyn TransactionSource,
    goal: &goal::Model,
    now: NaiveDateTime,
) -> Result<Option<goal::Model>> {
    let today = now.date();
    let transactions = match goal.goal_type {
        GoalType::Cash => source
            .latest_transaction(goal.organization_id, today)
            .await?
            .into_iter()
            .collect(),
        GoalType::Revenue | GoalType::Profit => {
            source
                .transactions_between(goal.organization_id, goal.start_date, today)
                .await?
        }
        GoalType::Margin | GoalType::Runway | GoalType::Growth | GoalType::Custom => Vec::new(),
    };

    let Some(value) = measure_goal(goal, &transactions, today) else {
        debug!(goal_type = ?goal.goal_type, "Goal type is not measured from transactions");
        return Ok(None);
    };

    let mut updated = goal.clone();
    update_progress(&mut updated, value, now);
    Ok(Some(save_goal(db, &updated).await?))
}

/// Dashboard over the active goals of an organization.
#[instrument(skip(db))]
pub async fn organization_dashboard(
    db: &DatabaseConnection,
    organization_id: i32,
    today: NaiveDate,
) -> Result<GoalDashboard> {
    let goals = goal::Entity::find()
        .filter(goal::Column::OrganizationId.eq(organization_id))
        .filter(goal::Column::IsActive.eq(true))
        .order_by_asc(goal::Column::TargetDate)
        .order_by_asc(goal::Column::Id)
        .all(db)
        .await?;
    Ok(goal_dashboard(organization_id, &goals, today))
}
