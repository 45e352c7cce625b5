use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal_id: i32,
    pub name: String,
    pub goal_type: String,
    pub status: String,
    pub current_value: Decimal,
    pub target_value: Decimal,
    pub progress_percent: Decimal,
    pub days_remaining: i64,
    /// Amount still needed per 30 days to reach the target in time.
    pub required_monthly_progress: Decimal,
}

/// Overview of all goals of one organization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GoalDashboard {
    pub organization_id: i32,
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
    pub goals: Vec<GoalProgress>,
}
