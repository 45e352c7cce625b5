use rust_decimal::{Decimal, MathematicalOps};

use model::entities::scenario_adjustment::{self, AdjustmentType, ChangeType};

use crate::error::{ComputeError, Result};

/// Month arithmetic of a scenario adjustment.
///
/// Months are 1-based forecast months.
pub trait AdjustmentRule {
    /// True when `month` lies in `start_month..=end_month` (open ended without `end_month`).
    fn applies_to(&self, month: i32) -> bool;

    /// Applies a revenue or expense adjustment to `amount` for `month`.
    /// Callers check `applies_to` first.
    fn apply(&self, amount: Decimal, month: i32) -> Result<Decimal>;

    fn validate(&self) -> Result<()>;
}

impl AdjustmentRule for scenario_adjustment::Model {
    fn applies_to(&self, month: i32) -> bool {
        if month < self.start_month {
            return false;
        }
        match self.end_month {
            Some(end) => month <= end,
            None => true,
        }
    }

    fn apply(&self, amount: Decimal, month: i32) -> Result<Decimal> {
        let rate = Decimal::ONE + self.value / Decimal::ONE_HUNDRED;
        match self.change_type {
            ChangeType::Percentage => amount.checked_mul(rate).ok_or_else(|| overflow(self)),
            ChangeType::Absolute => amount.checked_add(self.value).ok_or_else(|| overflow(self)),
            ChangeType::GrowthRate => {
                let elapsed = u64::try_from(month - self.start_month).map_err(|_| {
                    ComputeError::InvalidAdjustment(format!(
                        "adjustment '{}' applied to month {} before its start month {}",
                        self.name, month, self.start_month
                    ))
                })?;
                rate.checked_powu(elapsed)
                    .and_then(|factor| amount.checked_mul(factor))
                    .ok_or_else(|| overflow(self))
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.start_month < 1 {
            return Err(ComputeError::InvalidAdjustment(format!(
                "adjustment '{}' starts at month {}, months start at 1",
                self.name, self.start_month
            )));
        }
        if let Some(end) = self.end_month {
            if end < self.start_month {
                return Err(ComputeError::InvalidAdjustment(format!(
                    "adjustment '{}' ends at month {} before it starts at month {}",
                    self.name, end, self.start_month
                )));
            }
        }
        Ok(())
    }
}

fn overflow(adjustment: &scenario_adjustment::Model) -> ComputeError {
    ComputeError::Decimal(format!(
        "overflow while applying adjustment '{}'",
        adjustment.name
    ))
}

/// Sum of the one-time amounts landing in `month`.
pub fn one_time_total(adjustments: &[scenario_adjustment::Model], month: i32) -> Result<Decimal> {
    adjustments
        .iter()
        .filter(|a| a.adjustment_type == AdjustmentType::OneTime && a.start_month == month)
        .try_fold(Decimal::ZERO, |acc, a| acc.checked_add(a.value).ok_or_else(|| overflow(a)))
}

/// Folds all adjustments of `kind` active in `month` over `amount`, in list order.
pub fn apply_all(
    adjustments: &[scenario_adjustment::Model],
    kind: AdjustmentType,
    amount: Decimal,
    month: i32,
) -> Result<Decimal> {
    adjustments
        .iter()
        .filter(|a| a.adjustment_type == kind && a.applies_to(month))
        .try_fold(amount, |acc, a| a.apply(acc, month))
}

/// Natural adjustment order: start month, then name, then id.
pub fn sort_adjustments(adjustments: &mut [scenario_adjustment::Model]) {
    adjustments.sort_by(|a, b| {
        a.start_month
            .cmp(&b.start_month)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
pub(crate) fn adjustment(
    adjustment_type: AdjustmentType,
    change_type: ChangeType,
    value: Decimal,
    start_month: i32,
    end_month: Option<i32>,
) -> scenario_adjustment::Model {
    scenario_adjustment::Model {
        id: 0,
        scenario_id: 1,
        name: format!("{:?} {:?}", adjustment_type, change_type),
        adjustment_type,
        change_type,
        value,
        category: None,
        start_month,
        end_month,
        description: None,
        assumptions: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applies_to_month_window() {
        let bounded = adjustment(AdjustmentType::Revenue, ChangeType::Absolute, Decimal::ONE, 3, Some(5));
        assert!(!bounded.applies_to(2));
        assert!(bounded.applies_to(3));
        assert!(bounded.applies_to(5));
        assert!(!bounded.applies_to(6));

        let open = adjustment(AdjustmentType::Revenue, ChangeType::Absolute, Decimal::ONE, 2, None);
        assert!(!open.applies_to(1));
        assert!(open.applies_to(36));
    }

    #[test]
    fn test_percentage_zero_is_identity() {
        let adj = adjustment(AdjustmentType::Revenue, ChangeType::Percentage, Decimal::ZERO, 1, None);
        let amount = Decimal::new(123456, 2);
        assert_eq!(adj.apply(amount, 4).unwrap(), amount);
    }

    #[test]
    fn test_change_types() {
        let base = Decimal::new(1000, 0);

        let pct = adjustment(AdjustmentType::Expense, ChangeType::Percentage, Decimal::new(-20, 0), 1, None);
        assert_eq!(pct.apply(base, 1).unwrap(), Decimal::new(800, 0));

        let abs = adjustment(AdjustmentType::Expense, ChangeType::Absolute, Decimal::new(250, 0), 1, None);
        assert_eq!(abs.apply(base, 1).unwrap(), Decimal::new(1250, 0));

        // 10% compounding from month 2: month 2 is untouched, month 4 is two periods in
        let growth = adjustment(AdjustmentType::Revenue, ChangeType::GrowthRate, Decimal::new(10, 0), 2, None);
        assert_eq!(growth.apply(base, 2).unwrap(), base);
        assert_eq!(growth.apply(base, 4).unwrap(), Decimal::new(1210, 0));
    }

    #[test]
    fn test_apply_all_folds_in_list_order() {
        let base = Decimal::new(1000, 0);
        let plus = adjustment(AdjustmentType::Revenue, ChangeType::Absolute, Decimal::new(100, 0), 1, None);
        let double = adjustment(AdjustmentType::Revenue, ChangeType::Percentage, Decimal::new(100, 0), 1, None);
        let expense = adjustment(AdjustmentType::Expense, ChangeType::Absolute, Decimal::new(999, 0), 1, None);

        let a = apply_all(&[plus.clone(), double.clone(), expense.clone()], AdjustmentType::Revenue, base, 1).unwrap();
        let b = apply_all(&[double, plus, expense], AdjustmentType::Revenue, base, 1).unwrap();

        assert_eq!(a, Decimal::new(2200, 0));
        assert_eq!(b, Decimal::new(2100, 0));
    }

    #[test]
    fn test_one_time_total_only_counts_start_month() {
        let adjustments = vec![
            adjustment(AdjustmentType::OneTime, ChangeType::Absolute, Decimal::new(5000, 0), 3, None),
            adjustment(AdjustmentType::OneTime, ChangeType::Absolute, Decimal::new(-1000, 0), 3, Some(6)),
            adjustment(AdjustmentType::Revenue, ChangeType::Absolute, Decimal::new(7, 0), 3, None),
        ];

        assert_eq!(one_time_total(&adjustments, 2).unwrap(), Decimal::ZERO);
        assert_eq!(one_time_total(&adjustments, 3).unwrap(), Decimal::new(4000, 0));
        assert_eq!(one_time_total(&adjustments, 4).unwrap(), Decimal::ZERO);

        let huge = adjustment(AdjustmentType::OneTime, ChangeType::Absolute, Decimal::MAX, 1, None);
        let result = one_time_total(&[huge.clone(), huge], 1);
        assert!(matches!(result, Err(ComputeError::Decimal(_))));
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let inverted = adjustment(AdjustmentType::Revenue, ChangeType::Absolute, Decimal::ONE, 5, Some(4));
        assert!(matches!(inverted.validate(), Err(ComputeError::InvalidAdjustment(_))));

        let zero_start = adjustment(AdjustmentType::Revenue, ChangeType::Absolute, Decimal::ONE, 0, None);
        assert!(matches!(zero_start.validate(), Err(ComputeError::InvalidAdjustment(_))));

        let same_month = adjustment(AdjustmentType::Revenue, ChangeType::Absolute, Decimal::ONE, 4, Some(4));
        assert!(same_month.validate().is_ok());
    }

    #[test]
    fn test_sort_adjustments() {
        let mut a = adjustment(AdjustmentType::Revenue, ChangeType::Absolute, Decimal::ONE, 2, None);
        a.name = "b".to_string();
        a.id = 1;
        let mut b = a.clone();
        b.name = "a".to_string();
        b.id = 2;
        let mut c = a.clone();
        c.start_month = 1;
        c.id = 3;
        let mut d = a.clone();
        d.id = 0;

        let mut list = vec![a, b, c, d];
        sort_adjustments(&mut list);
        let ids: Vec<i32> = list.iter().map(|x| x.id).collect();
        assert_eq!(ids, vec![3, 2, 0, 1]);
    }
}
