use chrono::{NaiveDate, Utc};
use rust_decimal::{Decimal, MathematicalOps};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{debug, info, instrument, trace, warn};

use common::ProjectionData;
use model::entities::scenario;
use model::entities::scenario_adjustment::{self, AdjustmentType};

use super::adjustment::{self as rules, AdjustmentRule};
use super::baseline::{Baseline, load_baseline};
use super::labels::month_labels;
use super::metrics;
use super::store;
use crate::error::{ComputeError, Result};
use crate::settings::SimulationSettings;
use crate::source::TransactionSource;

pub const MAX_FORECAST_MONTHS: i32 = 36;

/// Month-by-month projection engine.
///
/// Stateless apart from its settings; the same inputs always produce the
/// same projection.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    settings: SimulationSettings,
}

/// Outcome of a persisted simulation.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationRun {
    pub result_id: i32,
    pub baseline: Baseline,
    pub projection: ProjectionData,
}

impl Simulator {
    pub fn new(settings: SimulationSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    /// Projects `scenario` from `baseline`, folding `adjustments` in list order.
    pub fn simulate(
        &self,
        scenario: &scenario::Model,
        adjustments: &[scenario_adjustment::Model],
        baseline: &Baseline,
    ) -> Result<ProjectionData> {
        let months = validate_horizon(scenario)?;
        for adjustment in adjustments {
            adjustment.validate()?;
        }

        let month_labels = month_labels(
            scenario.base_year,
            scenario.base_month,
            months,
            self.settings.label_step_days,
        )?;

        let revenue_factor = Decimal::ONE + self.settings.revenue_growth;
        let expense_factor = Decimal::ONE + self.settings.expense_growth;
        let base_revenue = baseline.monthly_revenue.value();
        let base_expenses = baseline.monthly_expenses.value();

        let capacity = months as usize;
        let mut monthly_revenue = Vec::with_capacity(capacity);
        let mut monthly_expenses = Vec::with_capacity(capacity);
        let mut monthly_profit = Vec::with_capacity(capacity);
        let mut monthly_cash_balance = Vec::with_capacity(capacity);
        let mut cash = baseline.starting_cash.value();

        for month in 1..=scenario.forecast_months {
            let elapsed = (month - 1) as u64;
            let revenue = compound(base_revenue, revenue_factor, elapsed)?;
            let expenses = compound(base_expenses, expense_factor, elapsed)?;

            let revenue = rules::apply_all(adjustments, AdjustmentType::Revenue, revenue, month)?;
            let expenses = rules::apply_all(adjustments, AdjustmentType::Expense, expenses, month)?;

            // One-time events move cash without touching revenue or expenses
            let one_time = rules::one_time_total(adjustments, month)?;
            let profit = revenue
                .checked_sub(expenses)
                .ok_or_else(|| cash_overflow(month))?;
            cash = cash
                .checked_add(one_time)
                .and_then(|c| c.checked_add(profit))
                .ok_or_else(|| cash_overflow(month))?;

            trace!(month, %revenue, %expenses, %profit, %cash, "Projected month");

            monthly_revenue.push(revenue);
            monthly_expenses.push(expenses);
            monthly_profit.push(profit);
            monthly_cash_balance.push(cash);
        }

        let total_revenue = metrics::checked_sum(&monthly_revenue, "revenue")?;
        let total_expenses = metrics::checked_sum(&monthly_expenses, "expenses")?;
        let total_profit = metrics::checked_sum(&monthly_profit, "profit")?;
        let ending_cash = cash;
        let lowest_cash = monthly_cash_balance
            .iter()
            .copied()
            .min()
            .unwrap_or(ending_cash);
        let runway_days = metrics::runway_days(ending_cash, &monthly_expenses)?;
        let break_even = metrics::break_even(&monthly_revenue, &monthly_expenses);

        Ok(ProjectionData {
            month_labels,
            profit_margin: metrics::profit_margin(total_profit, total_revenue),
            monthly_revenue,
            monthly_expenses,
            monthly_profit,
            monthly_cash_balance,
            total_revenue,
            total_expenses,
            total_profit,
            ending_cash,
            lowest_cash,
            runway_days,
            break_even_month: break_even.map(|(month, _)| month),
            break_even_revenue: break_even.map(|(_, revenue)| revenue),
            confidence_level: self.settings.confidence_level,
        })
    }
}

fn validate_horizon(scenario: &scenario::Model) -> Result<u32> {
    if !(1..=MAX_FORECAST_MONTHS).contains(&scenario.forecast_months) {
        return Err(ComputeError::InvalidScenario(format!(
            "forecast_months must be between 1 and {}, got {}",
            MAX_FORECAST_MONTHS, scenario.forecast_months
        )));
    }
    if !(1..=12).contains(&scenario.base_month) {
        return Err(ComputeError::InvalidScenario(format!(
            "base_month must be between 1 and 12, got {}",
            scenario.base_month
        )));
    }
    Ok(scenario.forecast_months as u32)
}

fn cash_overflow(month: i32) -> ComputeError {
    ComputeError::Decimal(format!("cash balance overflowed in month {}", month))
}

fn compound(base: Decimal, factor: Decimal, periods: u64) -> Result<Decimal> {
    factor
        .checked_powu(periods)
        .and_then(|growth| base.checked_mul(growth))
        .ok_or_else(|| ComputeError::Decimal(format!("overflow compounding {} over {} months", base, periods)))
}

/// Simulates a stored scenario and appends the outcome as a new result.
///
/// The baseline comes from `source`; when it is unavailable the default
/// baseline is used and the run still succeeds.
#[instrument(skip(db, source, simulator))]
pub async fn simulate_scenario(
    db: &DatabaseConnection,
    source: &dyn TransactionSource,
    simulator: &Simulator,
    scenario_id: i32,
    today: NaiveDate,
) -> Result<SimulationRun> {
    let (scenario, adjustments) = store::load_scenario(db, scenario_id).await?;
    debug!(
        "Loaded scenario '{}' with {} adjustments",
        scenario.name,
        adjustments.len()
    );

    let baseline = load_baseline(source, scenario.organization_id, today, simulator.settings()).await?;
    if baseline.uses_defaults() {
        warn!(scenario_id, "Simulating with default baseline figures");
    }

    let projection = simulator.simulate(&scenario, &adjustments, &baseline)?;
    let result = store::save_result(db, &scenario, &projection, Utc::now().naive_utc()).await?;

    info!(
        scenario_id,
        result_id = result.id,
        ending_cash = %projection.ending_cash,
        "Scenario simulated"
    );

    Ok(SimulationRun {
        result_id: result.id,
        baseline,
        projection,
    })
}
