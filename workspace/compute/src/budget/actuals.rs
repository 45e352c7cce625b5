use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, trace};

use model::entities::budget_line_item;
use model::transaction::Transaction;

/// Spend booked against `category` between `start` and `end` (inclusive).
///
/// Only outflows count; categories match case-insensitively by substring.
pub fn actual_spend(
    transactions: &[Transaction],
    category: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Decimal {
    let total: Decimal = transactions
        .iter()
        .filter(|t| t.date() >= start && t.date() <= end)
        .filter(|t| t.is_outflow())
        .filter(|t| t.category_matches(category))
        .map(|t| t.amount())
        .sum();
    total.abs()
}

/// Overwrites the actual and variance fields of a line item.
pub fn apply_actuals(line_item: &mut budget_line_item::Model, actual: Decimal) {
    line_item.actual_amount = actual;
    line_item.variance_amount = actual - line_item.budgeted_amount;
    line_item.variance_percent = if line_item.budgeted_amount.is_zero() {
        Decimal::ZERO
    } else {
        (line_item.variance_amount / line_item.budgeted_amount * Decimal::ONE_HUNDRED).round_dp(2)
    };
    trace!(
        line_item_id = line_item.id,
        actual = %line_item.actual_amount,
        variance = %line_item.variance_amount,
        "Updated line item actuals"
    );
}

/// Recomputes actuals of every line item from `transactions`.
pub fn update_line_items(
    start: NaiveDate,
    end: NaiveDate,
    line_items: &mut [budget_line_item::Model],
    transactions: &[Transaction],
) {
    for line_item in line_items.iter_mut() {
        if let Some(department) = &line_item.department {
            // Transactions carry no department, so the filter cannot narrow anything
            debug!(
                line_item_id = line_item.id,
                department = %department,
                "Department filter ignored for actuals"
            );
        }
        let actual = actual_spend(transactions, &line_item.category_name, start, end);
        apply_actuals(line_item, actual);
    }
}
