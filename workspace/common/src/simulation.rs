use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Month-by-month projection of one scenario plus its summary metrics.
///
/// The five monthly series are parallel and have one entry per forecast month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionData {
    pub month_labels: Vec<String>,
    pub monthly_revenue: Vec<Decimal>,
    pub monthly_expenses: Vec<Decimal>,
    pub monthly_profit: Vec<Decimal>,
    pub monthly_cash_balance: Vec<Decimal>,
    pub total_revenue: Decimal,
    pub total_expenses: Decimal,
    pub total_profit: Decimal,
    /// Percentage rounded to two decimal places.
    pub profit_margin: Decimal,
    pub ending_cash: Decimal,
    pub lowest_cash: Decimal,
    /// `None` when there is no burn to measure against.
    pub runway_days: Option<i64>,
    /// 1-based forecast month.
    pub break_even_month: Option<u32>,
    pub break_even_revenue: Option<Decimal>,
    pub confidence_level: Decimal,
}

impl ProjectionData {
    pub fn months(&self) -> usize {
        self.month_labels.len()
    }
}

/// Input variable a sensitivity analysis perturbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityVariable {
    Revenue,
    Expenses,
}

impl SensitivityVariable {
    pub const ALL: [SensitivityVariable; 2] =
        [SensitivityVariable::Revenue, SensitivityVariable::Expenses];

    pub fn as_str(&self) -> &'static str {
        match self {
            SensitivityVariable::Revenue => "revenue",
            SensitivityVariable::Expenses => "expenses",
        }
    }
}

impl fmt::Display for SensitivityVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensitivityVariable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "revenue" => Ok(SensitivityVariable::Revenue),
            "expenses" => Ok(SensitivityVariable::Expenses),
            other => Err(format!(
                "unknown sensitivity variable '{}', expected 'revenue' or 'expenses'",
                other
            )),
        }
    }
}

/// Outcome of one percentage variation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub variation: Decimal,
    pub ending_cash: Decimal,
    pub total_profit: Decimal,
    pub runway_days: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivitySeries {
    pub variable: SensitivityVariable,
    pub points: Vec<SensitivityPoint>,
}

/// Sensitivity results keyed by variable, in request order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SensitivityReport {
    pub scenario_id: i32,
    pub series: Vec<SensitivitySeries>,
}

impl SensitivityReport {
    pub fn get(&self, variable: SensitivityVariable) -> Option<&[SensitivityPoint]> {
        self.series
            .iter()
            .find(|s| s.variable == variable)
            .map(|s| s.points.as_slice())
    }
}

/// One column of a scenario comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparedScenario {
    pub scenario_id: i32,
    pub name: String,
    pub scenario_type: String,
    pub simulated_at: Option<NaiveDateTime>,
    /// Latest stored result, `None` if the scenario was never simulated.
    pub result: Option<ProjectionData>,
}
