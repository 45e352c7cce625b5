use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ComputeError, Result};

const DAYS_PER_MONTH: i64 = 30;

/// Sum of `values`, failing instead of overflowing.
pub fn checked_sum<'a, I>(values: I, what: &str) -> Result<Decimal>
where
    I: IntoIterator<Item = &'a Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
        .ok_or_else(|| ComputeError::Decimal(format!("overflow summing {}", what)))
}

/// `total_profit / total_revenue * 100` rounded to 2 dp, 0 without revenue.
pub fn profit_margin(total_profit: Decimal, total_revenue: Decimal) -> Decimal {
    if total_revenue <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (total_profit / total_revenue * Decimal::ONE_HUNDRED).round_dp(2)
}

/// Days the ending cash lasts at the average monthly expense rate.
///
/// `None` when there are no expenses to measure a burn from.
pub fn runway_days(ending_cash: Decimal, monthly_expenses: &[Decimal]) -> Result<Option<i64>> {
    if monthly_expenses.is_empty() {
        return Ok(None);
    }

    let total = checked_sum(monthly_expenses, "monthly expenses")?;
    if total <= Decimal::ZERO {
        return Ok(None);
    }

    // ending_cash / (total / n / 30), rearranged to keep the division last
    let days = ending_cash
        .checked_mul(Decimal::from(DAYS_PER_MONTH * monthly_expenses.len() as i64))
        .and_then(|scaled| scaled.checked_div(total))
        .ok_or_else(|| ComputeError::Decimal("runway computation overflowed".to_string()))?;
    days.trunc()
        .to_i64()
        .map(Some)
        .ok_or_else(|| ComputeError::Decimal(format!("runway of {} days does not fit", days)))
}

/// First 1-based month where revenue covers expenses, with that month's revenue.
pub fn break_even(monthly_revenue: &[Decimal], monthly_expenses: &[Decimal]) -> Option<(u32, Decimal)> {
    monthly_revenue
        .iter()
        .zip(monthly_expenses)
        .position(|(revenue, expenses)| revenue >= expenses)
        .map(|idx| (idx as u32 + 1, monthly_revenue[idx]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(v: i64) -> Decimal {
        Decimal::new(v, 0)
    }

    #[test]
    fn test_profit_margin() {
        assert_eq!(profit_margin(d(2000), d(10000)), Decimal::new(2000, 2));
        assert_eq!(profit_margin(d(1), d(3)), Decimal::new(3333, 2));
        assert_eq!(profit_margin(d(-500), d(0)), Decimal::ZERO);
        assert_eq!(profit_margin(d(-500), d(-10)), Decimal::ZERO);
    }

    #[test]
    fn test_runway_days() {
        assert_eq!(runway_days(d(52000), &[d(8000)]).unwrap(), Some(195));
        // 9000 per month is 300 per day
        assert_eq!(runway_days(d(45000), &[d(8000), d(10000)]).unwrap(), Some(150));
        // Truncated toward zero
        assert_eq!(runway_days(d(1000), &[d(9000)]).unwrap(), Some(3));
        assert_eq!(runway_days(d(-1000), &[d(9000)]).unwrap(), Some(-3));
        assert_eq!(runway_days(d(1000), &[]).unwrap(), None);
        assert_eq!(runway_days(d(1000), &[d(0), d(0)]).unwrap(), None);
        assert_eq!(runway_days(d(1000), &[d(-30)]).unwrap(), None);
    }

    #[test]
    fn test_checked_sum_overflow() {
        assert_eq!(checked_sum(&[d(1), d(2), d(3)], "values").unwrap(), d(6));
        assert!(matches!(
            checked_sum(&[Decimal::MAX, d(1)], "values"),
            Err(ComputeError::Decimal(_))
        ));
    }

    #[test]
    fn test_break_even() {
        assert_eq!(break_even(&[d(5), d(8), d(12)], &[d(10), d(10), d(10)]), Some((3, d(12))));
        // Equality counts as break-even
        assert_eq!(break_even(&[d(10)], &[d(10)]), Some((1, d(10))));
        assert_eq!(break_even(&[d(1), d(2)], &[d(3), d(4)]), None);
        assert_eq!(break_even(&[], &[]), None);
    }
}
