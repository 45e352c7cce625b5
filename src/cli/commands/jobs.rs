use anyhow::Result;
use chrono::NaiveDateTime;
use sea_orm::DatabaseConnection;
use tracing::{info, trace};

use common::BatchReport;
use compute::Engine;
use compute::jobs::{
    check_all_budget_alerts, run_scheduled_scenarios, update_all_budget_actuals, update_all_goals,
};

use crate::cli::Job;

/// Runs the selected batch jobs once and sums their reports.
pub async fn run_jobs(
    db: &DatabaseConnection,
    engine: &Engine,
    job: Job,
    now: NaiveDateTime,
) -> Result<BatchReport> {
    trace!("Entering run_jobs function");
    let mut report = BatchReport::default();

    if matches!(job, Job::Scenarios | Job::All) {
        report.merge(run_scheduled_scenarios(db, db, &engine.simulator, now).await?);
    }
    if matches!(job, Job::Budgets | Job::All) {
        report.merge(update_all_budget_actuals(db, db, &engine.budgets).await?);
    }
    if matches!(job, Job::Alerts | Job::All) {
        report.merge(check_all_budget_alerts(db, &engine.budgets).await?);
    }
    if matches!(job, Job::Goals | Job::All) {
        report.merge(update_all_goals(db, db, now).await?);
    }

    info!(
        "Jobs finished: {} processed, {} skipped, {} failed",
        report.processed, report.skipped, report.failed
    );
    Ok(report)
}
