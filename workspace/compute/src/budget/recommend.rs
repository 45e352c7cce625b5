use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use tracing::{info, instrument};

use common::BudgetRecommendation;
use model::transaction::Transaction;

use crate::error::Result;
use crate::source::TransactionSource;

pub const LOOKBACK_DAYS: i64 = 90;
const LOOKBACK_MONTHS: i64 = 3;

/// Headroom added on top of the historical monthly average (10%).
fn headroom() -> Decimal {
    Decimal::new(110, 2)
}

/// Suggests monthly budgets from the expense history of the last 90 days.
///
/// One entry per spending category, sorted by category name.
pub fn recommend_budgets(transactions: &[Transaction], today: NaiveDate) -> Vec<BudgetRecommendation> {
    let start = today - Duration::days(LOOKBACK_DAYS);
    let mut by_category: BTreeMap<&str, (Decimal, usize)> = BTreeMap::new();

    for transaction in transactions
        .iter()
        .filter(|t| t.is_outflow() && t.date() >= start && t.date() <= today)
    {
        let entry = by_category.entry(transaction.category()).or_default();
        entry.0 += transaction.amount().abs();
        entry.1 += 1;
    }

    by_category
        .into_iter()
        .map(|(category, (total, count))| {
            let monthly_average = total / Decimal::from(LOOKBACK_MONTHS);
            BudgetRecommendation {
                category: category.to_string(),
                monthly_average: monthly_average.round_dp(2),
                suggested_budget: (monthly_average * headroom()).round_dp(2),
                transaction_count: count,
            }
        })
        .collect()
}

#[instrument(skip(source))]
pub async fn recommend_for_organization(
    source: &dyn TransactionSource,
    organization_id: i32,
    today: NaiveDate,
) -> Result<Vec<BudgetRecommendation>> {
    let start = today - Duration::days(LOOKBACK_DAYS);
    let transactions = source.transactions_between(organization_id, start, today).await?;
    let recommendations = recommend_budgets(&transactions, today);
    info!(
        categories = recommendations.len(),
        "Budget recommendations computed"
    );
    Ok(recommendations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(m: u32, d: u32, amount: i64, category: &str) -> Transaction {
        Transaction::new(
            1,
            NaiveDate::from_ymd_opt(2025, m, d).unwrap(),
            Decimal::new(amount, 0),
            category,
            Decimal::ZERO,
        )
    }

    #[test]
    fn test_recommend_budgets() {
        let today = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let transactions = vec![
            tx(3, 1, -3000, "Software"),
            tx(2, 1, -300, "Rent"),
            tx(1, 1, -600, "Rent"),
            tx(3, 15, 9000, "Sales"),
            // 91 days back, outside the window
            Transaction::new(
                1,
                NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
                Decimal::new(-9999, 0),
                "Rent",
                Decimal::ZERO,
            ),
        ];

        let recommendations = recommend_budgets(&transactions, today);

        assert_eq!(recommendations.len(), 2);
        assert_eq!(recommendations[0].category, "Rent");
        assert_eq!(recommendations[0].monthly_average, Decimal::new(300, 0));
        assert_eq!(recommendations[0].suggested_budget, Decimal::new(330, 0));
        assert_eq!(recommendations[0].transaction_count, 2);
        assert_eq!(recommendations[1].category, "Software");
        assert_eq!(recommendations[1].suggested_budget, Decimal::new(1100, 0));
    }

    #[test]
    fn test_no_expenses_no_recommendations() {
        let today = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        assert!(recommend_budgets(&[tx(3, 1, 500, "Sales")], today).is_empty());
    }
}
