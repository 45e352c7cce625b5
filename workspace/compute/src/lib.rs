//! Calculators of the planning engine: scenario simulation, sensitivity
//! analysis, budget tracking, goal progress and the batch jobs that run
//! them over stored data.

pub mod budget;
pub mod error;
pub mod goal;
pub mod jobs;
pub mod scenario;
pub mod settings;
pub mod source;

#[cfg(test)]
mod testing;

use budget::BudgetCalculator;
use scenario::{SensitivityAnalyzer, Simulator};
use settings::{BudgetPolicy, SimulationSettings};

/// The calculators wired from one set of settings.
///
/// Built once by the caller and passed by reference.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    pub simulator: Simulator,
    pub analyzer: SensitivityAnalyzer,
    pub budgets: BudgetCalculator,
}

impl Engine {
    pub fn new(simulation: SimulationSettings, policy: BudgetPolicy) -> Self {
        let simulator = Simulator::new(simulation);
        Self {
            analyzer: SensitivityAnalyzer::new(simulator.clone()),
            simulator,
            budgets: BudgetCalculator::new(policy),
        }
    }
}

/// Returns an engine with default settings, the configuration used most of the time.
pub fn default_engine() -> Engine {
    Engine::new(SimulationSettings::default(), BudgetPolicy::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_engine_shares_simulation_settings() {
        let settings = SimulationSettings {
            revenue_growth: Decimal::new(5, 2),
            ..Default::default()
        };
        let engine = Engine::new(settings.clone(), BudgetPolicy { check_fifty_percent: true });

        assert_eq!(engine.simulator.settings(), &settings);
        assert_eq!(engine.analyzer.simulator().settings(), &settings);
        assert!(engine.budgets.policy().check_fifty_percent);
    }

    #[test]
    fn test_default_engine() {
        let engine = default_engine();
        assert_eq!(engine.simulator.settings(), &SimulationSettings::default());
        assert!(!engine.budgets.policy().check_fifty_percent);
    }
}
