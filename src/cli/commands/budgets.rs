use anyhow::{Context, Result};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use tracing::{info, trace};

use common::BudgetRecommendation;
use compute::Engine;
use compute::budget::{budget_variance, raise_budget_alerts, recommend_for_organization, refresh_budget_actuals};

use crate::cli::BudgetAction;
use crate::output::{OutputFormat, render};

/// Runs one budget action and renders its result.
pub async fn budget(
    db: &DatabaseConnection,
    engine: &Engine,
    action: BudgetAction,
    budget_id: i32,
    format: OutputFormat,
    currency: &str,
) -> Result<String> {
    trace!("Entering budget function");
    info!("Running budget {:?} for budget {}", action, budget_id);

    match action {
        BudgetAction::Actuals => {
            refresh_budget_actuals(db, db, &engine.budgets, budget_id)
                .await
                .with_context(|| format!("Failed to update actuals of budget {}", budget_id))?;
            // Show the refreshed figures
            let report = budget_variance(db, budget_id).await?;
            render(&report, format, currency)
        }
        BudgetAction::Alerts => {
            let alerts = raise_budget_alerts(db, &engine.budgets, budget_id)
                .await
                .with_context(|| format!("Failed to check alerts of budget {}", budget_id))?;
            render(alerts.as_slice(), format, currency)
        }
        BudgetAction::Variance => {
            let report = budget_variance(db, budget_id)
                .await
                .with_context(|| format!("Failed to build variance report of budget {}", budget_id))?;
            render(&report, format, currency)
        }
    }
}

pub async fn recommend_budgets(
    db: &DatabaseConnection,
    organization_id: i32,
    today: NaiveDate,
) -> Result<Vec<BudgetRecommendation>> {
    trace!("Entering recommend_budgets function");
    recommend_for_organization(db, organization_id, today)
        .await
        .with_context(|| format!("Failed to recommend budgets for organization {}", organization_id))
}
