//! Scenario planning: baseline derivation, the month-by-month simulator,
//! sensitivity analysis and the persistence glue around them.

pub mod adjustment;
pub mod baseline;
pub mod frame;
pub mod labels;
pub mod metrics;
pub mod sensitivity;
pub mod simulator;
pub mod store;

pub use adjustment::AdjustmentRule;
pub use baseline::{Baseline, Figure};
pub use sensitivity::SensitivityAnalyzer;
pub use simulator::{Simulator, simulate_scenario};
pub use store::{compare_scenarios, duplicate_scenario};
