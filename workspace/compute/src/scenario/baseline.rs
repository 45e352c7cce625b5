use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use model::transaction::Transaction;

use crate::error::{ComputeError, Result};
use crate::settings::SimulationSettings;
use crate::source::TransactionSource;

/// A baseline figure together with where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "origin", content = "value", rename_all = "snake_case")]
pub enum Figure {
    /// Computed from historical transactions.
    Observed(Decimal),
    /// No usable history, the configured default was used.
    Default(Decimal),
}

impl Figure {
    pub fn value(&self) -> Decimal {
        match self {
            Figure::Observed(v) | Figure::Default(v) => *v,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Figure::Default(_))
    }
}

/// Monthly starting point of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Baseline {
    pub monthly_revenue: Figure,
    pub monthly_expenses: Figure,
    pub starting_cash: Figure,
}

impl Baseline {
    /// Derives the baseline from the transactions of the lookback window.
    ///
    /// Totals are averaged over `baseline_months`; the fallback totals are
    /// averaged the same way.
    pub fn derive(transactions: &[Transaction], settings: &SimulationSettings) -> Result<Self> {
        let months = Decimal::from(settings.baseline_months);
        if months.is_zero() {
            return Err(ComputeError::InvalidRequest(
                "baseline_months must be at least 1".to_string(),
            ));
        }

        let inflows: Vec<Decimal> = transactions
            .iter()
            .filter(|t| t.is_inflow())
            .map(|t| t.amount())
            .collect();
        let outflows: Vec<Decimal> = transactions
            .iter()
            .filter(|t| t.is_outflow())
            .map(|t| t.amount())
            .collect();

        let monthly_revenue = if inflows.is_empty() {
            Figure::Default(settings.fallback_revenue / months)
        } else {
            Figure::Observed(inflows.iter().sum::<Decimal>() / months)
        };

        let monthly_expenses = if outflows.is_empty() {
            Figure::Default(settings.fallback_expenses / months)
        } else {
            Figure::Observed(outflows.iter().sum::<Decimal>().abs() / months)
        };

        // max_by_key keeps the last of equal dates, i.e. the latest booking that day
        let starting_cash = match transactions.iter().max_by_key(|t| t.date()) {
            Some(latest) => Figure::Observed(latest.balance()),
            None => Figure::Default(settings.fallback_cash),
        };

        Ok(Self {
            monthly_revenue,
            monthly_expenses,
            starting_cash,
        })
    }

    /// Baseline made only of defaults.
    pub fn fallback(settings: &SimulationSettings) -> Result<Self> {
        Self::derive(&[], settings)
    }

    /// Baseline with explicit monthly figures, marked as observed.
    pub fn from_figures(monthly_revenue: Decimal, monthly_expenses: Decimal, starting_cash: Decimal) -> Self {
        Self {
            monthly_revenue: Figure::Observed(monthly_revenue),
            monthly_expenses: Figure::Observed(monthly_expenses),
            starting_cash: Figure::Observed(starting_cash),
        }
    }

    pub fn uses_defaults(&self) -> bool {
        self.monthly_revenue.is_default()
            || self.monthly_expenses.is_default()
            || self.starting_cash.is_default()
    }
}

/// Loads the lookback window from `source` and derives the baseline.
///
/// A failing source never fails the caller, the defaults are used instead.
#[instrument(skip(source, settings))]
pub async fn load_baseline(
    source: &dyn TransactionSource,
    organization_id: i32,
    today: NaiveDate,
    settings: &SimulationSettings,
) -> Result<Baseline> {
    let start = today - Duration::days(settings.lookback_days);

    match source.transactions_between(organization_id, start, today).await {
        Ok(transactions) => {
            debug!(
                "Deriving baseline from {} transactions between {} and {}",
                transactions.len(),
                start,
                today
            );
            Baseline::derive(&transactions, settings)
        }
        Err(err) => {
            warn!(%err, "Transaction source failed, falling back to default baseline");
            Baseline::fallback(settings)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingSource, init_test_tracing};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_derive_from_history() {
        let transactions = vec![
            Transaction::new(1, date(2025, 1, 10), Decimal::new(9000, 0), "Sales", Decimal::new(59000, 0)),
            Transaction::new(1, date(2025, 2, 10), Decimal::new(-3000, 0), "Rent", Decimal::new(56000, 0)),
            Transaction::new(1, date(2025, 3, 10), Decimal::new(-3000, 0), "Payroll", Decimal::new(53000, 0)),
            Transaction::new(1, date(2025, 2, 1), Decimal::new(3000, 0), "Sales", Decimal::new(62000, 0)),
        ];

        let baseline = Baseline::derive(&transactions, &SimulationSettings::default()).unwrap();

        assert_eq!(baseline.monthly_revenue, Figure::Observed(Decimal::new(4000, 0)));
        assert_eq!(baseline.monthly_expenses, Figure::Observed(Decimal::new(2000, 0)));
        // The most recent transaction wins, regardless of list position
        assert_eq!(baseline.starting_cash, Figure::Observed(Decimal::new(53000, 0)));
        assert!(!baseline.uses_defaults());
    }

    #[test]
    fn test_only_expenses_keeps_revenue_default() {
        let transactions = vec![Transaction::new(
            1,
            date(2025, 1, 10),
            Decimal::new(-600, 0),
            "Rent",
            Decimal::new(1000, 0),
        )];

        let baseline = Baseline::derive(&transactions, &SimulationSettings::default()).unwrap();

        assert_eq!(baseline.monthly_revenue, Figure::Default(Decimal::new(10000, 0) / Decimal::new(3, 0)));
        assert_eq!(baseline.monthly_expenses, Figure::Observed(Decimal::new(200, 0)));
        assert_eq!(baseline.starting_cash.value(), Decimal::new(1000, 0));
        assert!(baseline.uses_defaults());
    }

    #[test]
    fn test_fallback_is_all_defaults() {
        let baseline = Baseline::fallback(&SimulationSettings::default()).unwrap();

        assert!(baseline.monthly_revenue.is_default());
        assert!(baseline.monthly_expenses.is_default());
        assert_eq!(baseline.starting_cash, Figure::Default(Decimal::new(50000, 0)));
        assert_eq!(
            baseline.monthly_expenses.value(),
            Decimal::new(8000, 0) / Decimal::new(3, 0)
        );
    }

    #[tokio::test]
    async fn test_failing_source_uses_fallback() {
        let _guard = init_test_tracing();
        let settings = SimulationSettings::default();

        let baseline = load_baseline(&FailingSource, 1, date(2025, 4, 1), &settings)
            .await
            .unwrap();

        assert_eq!(baseline, Baseline::fallback(&settings).unwrap());
    }

    #[tokio::test]
    async fn test_load_baseline_respects_lookback() {
        let source = vec![
            // 91 days before today, outside the window
            Transaction::new(1, date(2024, 12, 31), Decimal::new(90000, 0), "Sales", Decimal::new(1, 0)),
            Transaction::new(1, date(2025, 1, 1), Decimal::new(300, 0), "Sales", Decimal::new(700, 0)),
        ];

        let baseline = load_baseline(&source, 1, date(2025, 4, 1), &SimulationSettings::default())
            .await
            .unwrap();

        assert_eq!(baseline.monthly_revenue, Figure::Observed(Decimal::new(100, 0)));
        assert_eq!(baseline.starting_cash, Figure::Observed(Decimal::new(700, 0)));
        assert!(baseline.monthly_expenses.is_default());
    }
}
