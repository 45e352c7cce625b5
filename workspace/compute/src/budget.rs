//! Budget tracking: actuals from transactions, threshold alerts,
//! variance reports and budget suggestions.

pub mod actuals;
pub mod alerts;
pub mod recommend;
pub mod report;

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info, instrument};

use common::{BudgetAlert, VarianceReport};
use model::entities::{budget, budget_line_item};
use model::transaction::Transaction;

use crate::error::{ComputeError, Result};
use crate::settings::BudgetPolicy;
use crate::source::TransactionSource;

pub use recommend::{recommend_budgets, recommend_for_organization};
pub use report::variance_report;

/// Pure budget calculations on loaded models.
#[derive(Debug, Clone, Default)]
pub struct BudgetCalculator {
    policy: BudgetPolicy,
}

impl BudgetCalculator {
    pub fn new(policy: BudgetPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &BudgetPolicy {
        &self.policy
    }

    /// Overwrites actual and variance figures of every line item with the
    /// spend found in `transactions` during the budget period.
    pub fn update_budget_actuals(
        &self,
        budget: &budget::Model,
        line_items: &mut [budget_line_item::Model],
        transactions: &[Transaction],
    ) {
        actuals::update_line_items(budget.start_date, budget.end_date, line_items, transactions);
    }

    /// Raises at most one alert per line item and marks the fired thresholds.
    pub fn check_budget_alerts(
        &self,
        budget: &budget::Model,
        line_items: &mut [budget_line_item::Model],
    ) -> Vec<BudgetAlert> {
        line_items
            .iter_mut()
            .filter_map(|item| alerts::evaluate(budget, item, &self.policy))
            .collect()
    }
}

/// Loads a budget with its line items ordered by category.
pub async fn load_budget(
    db: &DatabaseConnection,
    budget_id: i32,
) -> Result<(budget::Model, Vec<budget_line_item::Model>)> {
    let budget = budget::Entity::find_by_id(budget_id)
        .one(db)
        .await?
        .ok_or_else(|| ComputeError::NotFound(format!("budget {}", budget_id)))?;

    let line_items = budget_line_item::Entity::find()
        .filter(budget_line_item::Column::BudgetId.eq(budget_id))
        .order_by_asc(budget_line_item::Column::CategoryName)
        .order_by_asc(budget_line_item::Column::Id)
        .all(db)
        .await?;

    Ok((budget, line_items))
}

/// Writes back the computed fields of line items.
async fn save_line_items<C: sea_orm::ConnectionTrait>(
    db: &C,
    line_items: &[budget_line_item::Model],
) -> Result<()> {
    for item in line_items {
        budget_line_item::ActiveModel {
            id: ActiveValue::Unchanged(item.id),
            actual_amount: Set(item.actual_amount),
            variance_amount: Set(item.variance_amount),
            variance_percent: Set(item.variance_percent),
            alert_sent_50: Set(item.alert_sent_50),
            alert_sent_75: Set(item.alert_sent_75),
            alert_sent_90: Set(item.alert_sent_90),
            alert_sent_100: Set(item.alert_sent_100),
            ..Default::default()
        }
        .update(db)
        .await?;
    }
    Ok(())
}

/// Recomputes and stores the actuals of a budget's line items.
#[instrument(skip(db, source, calculator))]
pub async fn refresh_budget_actuals(
    db: &DatabaseConnection,
    source: &dyn TransactionSource,
    calculator: &BudgetCalculator,
    budget_id: i32,
) -> Result<Vec<budget_line_item::Model>> {
    let (budget, mut line_items) = load_budget(db, budget_id).await?;
    let transactions = source
        .transactions_between(budget.organization_id, budget.start_date, budget.end_date)
        .await?;
    debug!(
        "Matching {} transactions against {} line items",
        transactions.len(),
        line_items.len()
    );

    calculator.update_budget_actuals(&budget, &mut line_items, &transactions);

    let txn = db.begin().await?;
    save_line_items(&txn, &line_items).await?;
    txn.commit().await?;

    info!(budget_id, line_items = line_items.len(), "Budget actuals updated");
    Ok(line_items)
}

/// Evaluates alert thresholds of a stored budget and persists the sent flags.
#[instrument(skip(db, calculator))]
pub async fn raise_budget_alerts(
    db: &DatabaseConnection,
    calculator: &BudgetCalculator,
    budget_id: i32,
) -> Result<Vec<BudgetAlert>> {
    let (budget, mut line_items) = load_budget(db, budget_id).await?;
    let alerts = calculator.check_budget_alerts(&budget, &mut line_items);

    if !alerts.is_empty() {
        let fired: Vec<budget_line_item::Model> = line_items
            .into_iter()
            .filter(|item| alerts.iter().any(|a| a.line_item_id == item.id))
            .collect();
        let txn = db.begin().await?;
        save_line_items(&txn, &fired).await?;
        txn.commit().await?;
    }

    info!(budget_id, alerts = alerts.len(), "Budget alerts checked");
    Ok(alerts)
}

/// Variance report of a stored budget, using the actuals last stored.
#[instrument(skip(db))]
pub async fn budget_variance(db: &DatabaseConnection, budget_id: i32) -> Result<VarianceReport> {
    let (budget, line_items) = load_budget(db, budget_id).await?;
    Ok(variance_report(&budget, &line_items))
}
