use rust_decimal::Decimal;
use tracing::{debug, info};

use common::{AlertLevel, BudgetAlert};
use model::entities::{budget, budget_line_item};

use crate::settings::BudgetPolicy;

/// Utilization thresholds, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    Hundred,
    Ninety,
    SeventyFive,
    Fifty,
}

impl Threshold {
    /// Thresholds in the order they are examined.
    pub const DESCENDING: [Threshold; 4] = [
        Threshold::Hundred,
        Threshold::Ninety,
        Threshold::SeventyFive,
        Threshold::Fifty,
    ];

    pub fn percent(&self) -> Decimal {
        match self {
            Threshold::Hundred => Decimal::ONE_HUNDRED,
            Threshold::Ninety => Decimal::new(90, 0),
            Threshold::SeventyFive => Decimal::new(75, 0),
            Threshold::Fifty => Decimal::new(50, 0),
        }
    }

    pub fn level(&self) -> AlertLevel {
        match self {
            Threshold::Hundred => AlertLevel::Critical,
            Threshold::Ninety => AlertLevel::Warning,
            Threshold::SeventyFive | Threshold::Fifty => AlertLevel::Info,
        }
    }

    /// Budget toggle, combined with the policy for the 50% check.
    fn enabled(&self, budget: &budget::Model, policy: &BudgetPolicy) -> bool {
        match self {
            Threshold::Hundred => budget.alert_at_100_percent,
            Threshold::Ninety => budget.alert_at_90_percent,
            Threshold::SeventyFive => budget.alert_at_75_percent,
            Threshold::Fifty => policy.check_fifty_percent && budget.alert_at_50_percent,
        }
    }

    fn already_sent(&self, line_item: &budget_line_item::Model) -> bool {
        match self {
            Threshold::Hundred => line_item.alert_sent_100,
            Threshold::Ninety => line_item.alert_sent_90,
            Threshold::SeventyFive => line_item.alert_sent_75,
            Threshold::Fifty => line_item.alert_sent_50,
        }
    }

    fn mark_sent(&self, line_item: &mut budget_line_item::Model) {
        match self {
            Threshold::Hundred => line_item.alert_sent_100 = true,
            Threshold::Ninety => line_item.alert_sent_90 = true,
            Threshold::SeventyFive => line_item.alert_sent_75 = true,
            Threshold::Fifty => line_item.alert_sent_50 = true,
        }
    }
}

/// Spent share of the budgeted amount in percent, 0 for non-positive budgets.
pub fn utilization(line_item: &budget_line_item::Model) -> Decimal {
    if line_item.budgeted_amount <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    line_item.actual_amount / line_item.budgeted_amount * Decimal::ONE_HUNDRED
}

pub fn alert_message(category: &str, level: AlertLevel, utilization: Decimal) -> String {
    let shown = utilization.round_dp(1);
    match level {
        AlertLevel::Critical => format!("{} budget exceeded: {:.1}% used", category, shown),
        AlertLevel::Warning | AlertLevel::Info => format!("{} budget at {:.1}%", category, shown),
    }
}

/// Decides the alert of one line item and marks its flag.
///
/// The highest crossed threshold that is enabled decides. An alert is only
/// raised if that threshold has not fired before; lower thresholds are never
/// examined once a higher one is crossed. A line item that jumps straight to
/// 120% gets a single critical alert, and later checks do not walk down to
/// the 90% and 75% alerts it skipped.
pub fn evaluate(
    budget: &budget::Model,
    line_item: &mut budget_line_item::Model,
    policy: &BudgetPolicy,
) -> Option<BudgetAlert> {
    let utilization = utilization(line_item);

    let threshold = Threshold::DESCENDING
        .into_iter()
        .find(|t| utilization >= t.percent() && t.enabled(budget, policy))?;

    if threshold.already_sent(line_item) {
        debug!(
            line_item_id = line_item.id,
            ?threshold,
            "Threshold alert already sent"
        );
        return None;
    }

    threshold.mark_sent(line_item);
    let level = threshold.level();
    info!(
        line_item_id = line_item.id,
        category = %line_item.category_name,
        %level,
        %utilization,
        "Budget threshold crossed"
    );

    Some(BudgetAlert {
        line_item_id: line_item.id,
        level,
        category: line_item.category_name.clone(),
        message: alert_message(&line_item.category_name, level, utilization),
        utilization: utilization.round_dp(2),
    })
}
