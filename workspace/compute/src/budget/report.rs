use rust_decimal::Decimal;

use common::{LineStatus, VarianceLine, VarianceReport};
use model::entities::{budget, budget_line_item};

use super::alerts::utilization;

/// Budget vs actual per line item, largest overspend first.
pub fn variance_report(
    budget: &budget::Model,
    line_items: &[budget_line_item::Model],
) -> VarianceReport {
    let mut lines: Vec<VarianceLine> = line_items
        .iter()
        .map(|item| VarianceLine {
            line_item_id: item.id,
            category: item.category_name.clone(),
            department: item.department.clone(),
            budgeted: item.budgeted_amount,
            actual: item.actual_amount,
            variance: item.variance_amount,
            variance_percent: item.variance_percent,
            utilization: utilization(item).round_dp(2),
            status: if item.variance_amount > Decimal::ZERO {
                LineStatus::Over
            } else {
                LineStatus::Under
            },
        })
        .collect();
    lines.sort_by(|a, b| b.variance.cmp(&a.variance));

    let total_actual: Decimal = lines.iter().map(|l| l.actual).sum();
    let total_variance: Decimal = lines.iter().map(|l| l.variance).sum();
    let utilization = if budget.total_amount.is_zero() {
        Decimal::ZERO
    } else {
        (total_actual / budget.total_amount * Decimal::ONE_HUNDRED).round_dp(2)
    };

    VarianceReport {
        budget_id: budget.id,
        budget_name: budget.name.clone(),
        lines,
        total_budgeted: budget.total_amount,
        total_actual,
        total_variance,
        utilization,
    }
}
