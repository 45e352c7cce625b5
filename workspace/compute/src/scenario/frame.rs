//! Tabular export of a projection through polars.

use std::io::Write;

use polars::prelude::*;
use rust_decimal::Decimal;
use tracing::debug;

use common::ProjectionData;

use crate::error::Result;

/// One row per forecast month: `month, label, revenue, expenses, profit, cash_balance`.
///
/// Amounts are kept as strings so no precision is lost to floats.
pub fn projection_frame(projection: &ProjectionData) -> Result<DataFrame> {
    let months: Vec<u32> = (1..=projection.months() as u32).collect();

    let df = DataFrame::new(vec![
        Series::new("month".into(), months).into(),
        Series::new("label".into(), projection.month_labels.clone()).into(),
        Series::new("revenue".into(), as_strings(&projection.monthly_revenue)).into(),
        Series::new("expenses".into(), as_strings(&projection.monthly_expenses)).into(),
        Series::new("profit".into(), as_strings(&projection.monthly_profit)).into(),
        Series::new("cash_balance".into(), as_strings(&projection.monthly_cash_balance)).into(),
    ])?;

    debug!("Built projection frame with {} rows", df.height());
    Ok(df)
}

/// Writes the projection frame as CSV with a header row.
pub fn write_projection_csv<W: Write>(projection: &ProjectionData, writer: W) -> Result<()> {
    let mut df = projection_frame(projection)?;
    CsvWriter::new(writer).include_header(true).finish(&mut df)?;
    Ok(())
}

fn as_strings(values: &[Decimal]) -> Vec<String> {
    values.iter().map(|v| format!("{:.2}", v.round_dp(2))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{Baseline, Simulator};
    use crate::testing::created_at;
    use model::entities::scenario;

    fn projection() -> ProjectionData {
        let scenario = scenario::Model {
            id: 1,
            organization_id: 1,
            name: "Plan".to_string(),
            description: None,
            scenario_type: scenario::ScenarioType::Best,
            base_year: 2025,
            base_month: 6,
            forecast_months: 2,
            is_active: true,
            last_simulated_at: None,
            version: 1,
            created_at: created_at(),
        };
        let baseline = Baseline::from_figures(Decimal::new(1000, 0), Decimal::new(500, 0), Decimal::new(100, 0));
        Simulator::default().simulate(&scenario, &[], &baseline).unwrap()
    }

    #[test]
    fn test_projection_frame_shape() {
        let df = projection_frame(&projection()).unwrap();

        assert_eq!(df.height(), 2);
        let names: Vec<&str> = df.get_column_names().iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            vec!["month", "label", "revenue", "expenses", "profit", "cash_balance"]
        );
    }

    #[test]
    fn test_csv_export() {
        let mut buffer = Vec::new();
        write_projection_csv(&projection(), &mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "month,label,revenue,expenses,profit,cash_balance");
        assert_eq!(lines[1], "1,Jun 2025,1000.00,500.00,500.00,600.00");
        assert_eq!(lines[2], "2,Jul 2025,1020.00,505.00,515.00,1115.00");
    }
}
