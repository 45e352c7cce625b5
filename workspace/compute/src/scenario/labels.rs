use chrono::{Duration, NaiveDate};

use crate::error::{ComputeError, Result};

/// Labels like `Jan 2025` for each forecast month.
///
/// Months are approximated by `step_days` (30) from the first day of the
/// base month, so long horizons drift away from calendar months.
pub fn month_labels(base_year: i32, base_month: i32, months: u32, step_days: i64) -> Result<Vec<String>> {
    let start = u32::try_from(base_month)
        .ok()
        .and_then(|month| NaiveDate::from_ymd_opt(base_year, month, 1))
        .ok_or_else(|| {
            ComputeError::InvalidScenario(format!(
                "invalid base period {}-{}",
                base_year, base_month
            ))
        })?;

    Ok((0..i64::from(months))
        .map(|i| {
            (start + Duration::days(step_days * i))
                .format("%b %Y")
                .to_string()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_step_thirty_days() {
        let labels = month_labels(2025, 1, 4, 30).unwrap();
        // Jan 1 + 30 days is Jan 31, so January shows up twice and February never
        assert_eq!(labels, vec!["Jan 2025", "Jan 2025", "Mar 2025", "Apr 2025"]);
    }

    #[test]
    fn test_labels_cross_year() {
        let labels = month_labels(2024, 11, 3, 30).unwrap();
        assert_eq!(labels, vec!["Nov 2024", "Dec 2024", "Dec 2024"]);
    }

    #[test]
    fn test_invalid_base_month() {
        assert!(matches!(
            month_labels(2025, 13, 3, 30),
            Err(ComputeError::InvalidScenario(_))
        ));
        assert!(matches!(
            month_labels(2025, 0, 3, 30),
            Err(ComputeError::InvalidScenario(_))
        ));
    }
}
