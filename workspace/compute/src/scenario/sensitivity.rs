use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sea_orm::DatabaseConnection;
use tracing::{debug, info, instrument};

use common::{ProjectionData, SensitivityPoint, SensitivityReport, SensitivitySeries, SensitivityVariable};
use model::entities::{scenario, scenario_adjustment};

use super::baseline::{Baseline, load_baseline};
use super::simulator::Simulator;
use super::store;
use crate::error::{ComputeError, Result};
use crate::source::TransactionSource;

/// Percent variations tested when the caller does not pick any.
pub const DEFAULT_VARIATIONS: [i64; 7] = [-50, -25, -10, 0, 10, 25, 50];

pub fn default_variations() -> Vec<Decimal> {
    DEFAULT_VARIATIONS.iter().map(|v| Decimal::from(*v)).collect()
}

/// Closed-form elasticity around a single simulation.
///
/// The scenario is simulated once and every variation scales that result.
/// Adjustment interactions are not re-simulated.
#[derive(Debug, Clone, Default)]
pub struct SensitivityAnalyzer {
    simulator: Simulator,
}

impl SensitivityAnalyzer {
    pub fn new(simulator: Simulator) -> Self {
        Self { simulator }
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn analyze(
        &self,
        scenario: &scenario::Model,
        adjustments: &[scenario_adjustment::Model],
        baseline: &Baseline,
        variables: &[SensitivityVariable],
        variations: Option<&[Decimal]>,
    ) -> Result<SensitivityReport> {
        let base = self.simulator.simulate(scenario, adjustments, baseline)?;
        let defaults = default_variations();
        let variations = variations.unwrap_or(&defaults);

        let series = variables
            .iter()
            .map(|variable| {
                let points = variations
                    .iter()
                    .map(|variation| vary(&base, *variable, *variation))
                    .collect::<Result<Vec<_>>>()?;
                Ok(SensitivitySeries {
                    variable: *variable,
                    points,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(SensitivityReport {
            scenario_id: scenario.id,
            series,
        })
    }
}

/// Scales the base projection for one variable and one percent variation.
///
/// Revenue moves cash and profit proportionally. Expenses move cash, profit
/// and runway inversely (`2 - multiplier`).
pub fn vary(
    base: &ProjectionData,
    variable: SensitivityVariable,
    variation: Decimal,
) -> Result<SensitivityPoint> {
    let overflow = || ComputeError::Decimal(format!("overflow applying a {}% variation", variation));
    let multiplier = (variation / Decimal::ONE_HUNDRED)
        .checked_add(Decimal::ONE)
        .ok_or_else(overflow)?;
    let scale = |amount: Decimal, factor: Decimal| amount.checked_mul(factor).ok_or_else(overflow);

    let point = match variable {
        SensitivityVariable::Revenue => SensitivityPoint {
            variation,
            ending_cash: scale(base.ending_cash, multiplier)?,
            total_profit: scale(base.total_profit, multiplier)?,
            runway_days: base.runway_days,
        },
        SensitivityVariable::Expenses => {
            let inverse = Decimal::TWO.checked_sub(multiplier).ok_or_else(overflow)?;
            let runway_days = match base.runway_days {
                Some(days) => {
                    let scaled = scale(Decimal::from(days), inverse)?.trunc();
                    Some(scaled.to_i64().ok_or_else(|| {
                        ComputeError::Decimal(format!("scaled runway {} does not fit", scaled))
                    })?)
                }
                None => None,
            };
            SensitivityPoint {
                variation,
                ending_cash: scale(base.ending_cash, inverse)?,
                total_profit: scale(base.total_profit, inverse)?,
                runway_days,
            }
        }
    };

    Ok(point)
}

/// Loads a stored scenario, derives its baseline and runs the analysis.
#[instrument(skip(db, source, analyzer))]
pub async fn analyze_scenario(
    db: &DatabaseConnection,
    source: &dyn TransactionSource,
    analyzer: &SensitivityAnalyzer,
    scenario_id: i32,
    variables: &[SensitivityVariable],
    variations: Option<&[Decimal]>,
    today: NaiveDate,
) -> Result<SensitivityReport> {
    let (scenario, adjustments) = store::load_scenario(db, scenario_id).await?;
    let baseline = load_baseline(
        source,
        scenario.organization_id,
        today,
        analyzer.simulator.settings(),
    )
    .await?;
    debug!(?variables, "Running sensitivity analysis");

    let report = analyzer.analyze(&scenario, &adjustments, &baseline, variables, variations)?;
    info!(scenario_id, series = report.series.len(), "Sensitivity analysis finished");
    Ok(report)
}
