use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tracing::{debug, info, trace};

use common::{ComparedScenario, SensitivityReport, SensitivityVariable};
use compute::Engine;
use compute::scenario::sensitivity::analyze_scenario;
use compute::scenario::simulator::SimulationRun;
use compute::scenario::{self as planning};
use model::entities::scenario;

pub async fn simulate(
    db: &DatabaseConnection,
    engine: &Engine,
    scenario_id: i32,
    today: NaiveDate,
) -> Result<SimulationRun> {
    trace!("Entering simulate function");
    info!("Simulating scenario {}", scenario_id);

    let run = planning::simulate_scenario(db, db, &engine.simulator, scenario_id, today)
        .await
        .with_context(|| format!("Failed to simulate scenario {}", scenario_id))?;

    debug!("Stored result {}", run.result_id);
    Ok(run)
}

/// Runs the sensitivity analysis. Empty `variables` or `variations` select
/// the defaults.
pub async fn run_sensitivity(
    db: &DatabaseConnection,
    engine: &Engine,
    scenario_id: i32,
    variables: &[SensitivityVariable],
    variations: &[Decimal],
    today: NaiveDate,
) -> Result<SensitivityReport> {
    trace!("Entering run_sensitivity function");
    let all = SensitivityVariable::ALL;
    let variables = if variables.is_empty() {
        &all[..]
    } else {
        variables
    };
    let variations = (!variations.is_empty()).then_some(variations);

    analyze_scenario(db, db, &engine.analyzer, scenario_id, variables, variations, today)
        .await
        .with_context(|| format!("Failed to analyze scenario {}", scenario_id))
}

pub async fn compare_scenarios(
    db: &DatabaseConnection,
    organization_id: i32,
    scenario_ids: &[i32],
) -> Result<Vec<ComparedScenario>> {
    trace!("Entering compare_scenarios function");
    debug!("Comparing scenarios {:?} of organization {}", scenario_ids, organization_id);

    planning::compare_scenarios(db, organization_id, scenario_ids)
        .await
        .context("Failed to compare scenarios")
}

pub async fn duplicate_scenario(db: &DatabaseConnection, scenario_id: i32) -> Result<scenario::Model> {
    trace!("Entering duplicate_scenario function");
    let copy = planning::duplicate_scenario(db, scenario_id)
        .await
        .with_context(|| format!("Failed to duplicate scenario {}", scenario_id))?;

    info!("Duplicated scenario {} as {}", scenario_id, copy.id);
    Ok(copy)
}
