//! Loading and saving scenarios and their simulation results.

use std::collections::HashSet;

use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info, instrument};

use common::{ComparedScenario, ProjectionData};
use model::entities::{scenario, scenario_adjustment, scenario_result};

use super::adjustment::sort_adjustments;
use crate::error::{ComputeError, Result};

pub const MIN_COMPARED: usize = 2;
pub const MAX_COMPARED: usize = 5;

/// Loads a scenario and its adjustments in natural order.
#[instrument(skip(db))]
pub async fn load_scenario(
    db: &DatabaseConnection,
    scenario_id: i32,
) -> Result<(scenario::Model, Vec<scenario_adjustment::Model>)> {
    let scenario = scenario::Entity::find_by_id(scenario_id)
        .one(db)
        .await?
        .ok_or_else(|| ComputeError::NotFound(format!("scenario {}", scenario_id)))?;

    let mut adjustments = scenario_adjustment::Entity::find()
        .filter(scenario_adjustment::Column::ScenarioId.eq(scenario_id))
        .all(db)
        .await?;
    sort_adjustments(&mut adjustments);

    Ok((scenario, adjustments))
}

/// Appends a result row and stamps the scenario's `last_simulated_at`.
#[instrument(skip(db, scenario, projection), fields(scenario_id = scenario.id))]
pub async fn save_result(
    db: &DatabaseConnection,
    scenario: &scenario::Model,
    projection: &ProjectionData,
    simulated_at: NaiveDateTime,
) -> Result<scenario_result::Model> {
    let txn = db.begin().await?;

    let result = scenario_result::ActiveModel {
        scenario_id: Set(scenario.id),
        month_labels: Set(scenario_result::LabelSeries(projection.month_labels.clone())),
        monthly_revenue: Set(scenario_result::AmountSeries(projection.monthly_revenue.clone())),
        monthly_expenses: Set(scenario_result::AmountSeries(projection.monthly_expenses.clone())),
        monthly_profit: Set(scenario_result::AmountSeries(projection.monthly_profit.clone())),
        monthly_cash_balance: Set(scenario_result::AmountSeries(
            projection.monthly_cash_balance.clone(),
        )),
        total_revenue: Set(projection.total_revenue),
        total_expenses: Set(projection.total_expenses),
        total_profit: Set(projection.total_profit),
        profit_margin: Set(projection.profit_margin),
        ending_cash: Set(projection.ending_cash),
        lowest_cash: Set(projection.lowest_cash),
        runway_days: Set(projection.runway_days),
        break_even_month: Set(projection.break_even_month.map(|m| m as i32)),
        break_even_revenue: Set(projection.break_even_revenue),
        confidence_level: Set(projection.confidence_level),
        simulated_at: Set(simulated_at),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    scenario::ActiveModel {
        id: ActiveValue::Unchanged(scenario.id),
        last_simulated_at: Set(Some(simulated_at)),
        ..Default::default()
    }
    .update(&txn)
    .await?;

    txn.commit().await?;
    debug!(result_id = result.id, "Stored simulation result");
    Ok(result)
}

/// Most recent result of a scenario, if it was ever simulated.
pub async fn latest_result(
    db: &DatabaseConnection,
    scenario_id: i32,
) -> Result<Option<scenario_result::Model>> {
    Ok(scenario_result::Entity::find()
        .filter(scenario_result::Column::ScenarioId.eq(scenario_id))
        .order_by_desc(scenario_result::Column::SimulatedAt)
        .order_by_desc(scenario_result::Column::Id)
        .one(db)
        .await?)
}

/// Rebuilds the projection stored in a result row.
pub fn projection_from_result(result: scenario_result::Model) -> ProjectionData {
    ProjectionData {
        month_labels: result.month_labels.0,
        monthly_revenue: result.monthly_revenue.0,
        monthly_expenses: result.monthly_expenses.0,
        monthly_profit: result.monthly_profit.0,
        monthly_cash_balance: result.monthly_cash_balance.0,
        total_revenue: result.total_revenue,
        total_expenses: result.total_expenses,
        total_profit: result.total_profit,
        profit_margin: result.profit_margin,
        ending_cash: result.ending_cash,
        lowest_cash: result.lowest_cash,
        runway_days: result.runway_days,
        break_even_month: result.break_even_month.and_then(|m| u32::try_from(m).ok()),
        break_even_revenue: result.break_even_revenue,
        confidence_level: result.confidence_level,
    }
}

/// Side-by-side view of 2 to 5 scenarios of one organization, in request order.
#[instrument(skip(db))]
pub async fn compare_scenarios(
    db: &DatabaseConnection,
    organization_id: i32,
    scenario_ids: &[i32],
) -> Result<Vec<ComparedScenario>> {
    if !(MIN_COMPARED..=MAX_COMPARED).contains(&scenario_ids.len()) {
        return Err(ComputeError::InvalidRequest(format!(
            "between {} and {} scenarios can be compared, got {}",
            MIN_COMPARED,
            MAX_COMPARED,
            scenario_ids.len()
        )));
    }
    let unique: HashSet<i32> = scenario_ids.iter().copied().collect();
    if unique.len() != scenario_ids.len() {
        return Err(ComputeError::InvalidRequest(
            "scenario ids must not repeat".to_string(),
        ));
    }

    let scenarios = scenario::Entity::find()
        .filter(scenario::Column::OrganizationId.eq(organization_id))
        .filter(scenario::Column::Id.is_in(scenario_ids.iter().copied()))
        .all(db)
        .await?;
    if scenarios.len() != scenario_ids.len() {
        return Err(ComputeError::NotFound(
            "one or more scenarios not found".to_string(),
        ));
    }

    let mut compared = Vec::with_capacity(scenario_ids.len());
    for id in scenario_ids {
        let Some(scenario) = scenarios.iter().find(|s| s.id == *id) else {
            return Err(ComputeError::NotFound(format!("scenario {}", id)));
        };
        let latest = latest_result(db, scenario.id).await?;
        compared.push(ComparedScenario {
            scenario_id: scenario.id,
            name: scenario.name.clone(),
            scenario_type: scenario.scenario_type.to_value(),
            simulated_at: latest.as_ref().map(|r| r.simulated_at),
            result: latest.map(projection_from_result),
        });
    }

    Ok(compared)
}

/// Copies a scenario and all its adjustments as `"<name> (Copy)"`.
/// Results stay with the original.
#[instrument(skip(db))]
pub async fn duplicate_scenario(
    db: &DatabaseConnection,
    scenario_id: i32,
) -> Result<scenario::Model> {
    let (original, adjustments) = load_scenario(db, scenario_id).await?;
    let txn = db.begin().await?;

    let copy = scenario::ActiveModel {
        organization_id: Set(original.organization_id),
        name: Set(format!("{} (Copy)", original.name)),
        description: Set(original.description.clone()),
        scenario_type: Set(original.scenario_type),
        base_year: Set(original.base_year),
        base_month: Set(original.base_month),
        forecast_months: Set(original.forecast_months),
        is_active: Set(true),
        last_simulated_at: Set(None),
        version: Set(1),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for adjustment in &adjustments {
        scenario_adjustment::ActiveModel {
            scenario_id: Set(copy.id),
            name: Set(adjustment.name.clone()),
            adjustment_type: Set(adjustment.adjustment_type),
            change_type: Set(adjustment.change_type),
            value: Set(adjustment.value),
            category: Set(adjustment.category.clone()),
            start_month: Set(adjustment.start_month),
            end_month: Set(adjustment.end_month),
            description: Set(adjustment.description.clone()),
            assumptions: Set(adjustment.assumptions.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    info!(
        original_id = original.id,
        copy_id = copy.id,
        adjustments = adjustments.len(),
        "Scenario duplicated"
    );
    Ok(copy)
}
