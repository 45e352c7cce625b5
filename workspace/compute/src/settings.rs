//! Tunables of the calculators.
//!
//! Both structs deserialize with defaults for every missing field, so the
//! binary can embed them in its own configuration file.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Knobs of the scenario simulator and the scheduled simulation job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Organic monthly revenue growth as a fraction (0.02 = 2%).
    pub revenue_growth: Decimal,
    /// Organic monthly expense growth as a fraction.
    pub expense_growth: Decimal,
    /// Quarterly revenue assumed when the lookback window has no inflows.
    pub fallback_revenue: Decimal,
    /// Quarterly expenses assumed when the lookback window has no outflows.
    pub fallback_expenses: Decimal,
    pub fallback_cash: Decimal,
    pub lookback_days: i64,
    /// Number of months the lookback totals are averaged over.
    pub baseline_months: u32,
    /// Distance between consecutive month labels.
    pub label_step_days: i64,
    pub confidence_level: Decimal,
    pub stale_after_hours: i64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            revenue_growth: Decimal::new(2, 2),
            expense_growth: Decimal::new(1, 2),
            fallback_revenue: Decimal::new(10_000, 0),
            fallback_expenses: Decimal::new(8_000, 0),
            fallback_cash: Decimal::new(50_000, 0),
            lookback_days: 90,
            baseline_months: 3,
            label_step_days: 30,
            confidence_level: Decimal::new(75, 0),
            stale_after_hours: 24,
        }
    }
}

/// Budget alerting policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetPolicy {
    /// Also raise the 50% info alert. Off unless explicitly enabled.
    pub check_fifty_percent: bool,
}
