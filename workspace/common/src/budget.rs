use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Severity of a budget threshold alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AlertLevel::Info => "info",
            AlertLevel::Warning => "warning",
            AlertLevel::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// Raised once per crossed threshold of a budget line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAlert {
    pub line_item_id: i32,
    pub level: AlertLevel,
    pub category: String,
    pub message: String,
    /// Percentage of the budgeted amount already spent.
    pub utilization: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    Over,
    Under,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarianceLine {
    pub line_item_id: i32,
    pub category: String,
    pub department: Option<String>,
    pub budgeted: Decimal,
    pub actual: Decimal,
    pub variance: Decimal,
    pub variance_percent: Decimal,
    pub utilization: Decimal,
    pub status: LineStatus,
}

/// Budget vs actual breakdown, lines sorted by variance (largest overspend first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarianceReport {
    pub budget_id: i32,
    pub budget_name: String,
    pub lines: Vec<VarianceLine>,
    pub total_budgeted: Decimal,
    pub total_actual: Decimal,
    pub total_variance: Decimal,
    pub utilization: Decimal,
}

/// Suggested monthly budget for a spending category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRecommendation {
    pub category: String,
    pub monthly_average: Decimal,
    pub suggested_budget: Decimal,
    pub transaction_count: usize,
}
