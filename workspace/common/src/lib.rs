//! Plain result types shared between the calculators and the command line.
//! Nothing in here knows about the database; every struct is built by the
//! `compute` crate and rendered by the `finplan` binary.

mod batch;
mod budget;
mod goal;
mod money;
mod simulation;

pub use batch::BatchReport;
pub use budget::{
    AlertLevel, BudgetAlert, BudgetRecommendation, LineStatus, VarianceLine, VarianceReport,
};
pub use goal::{GoalDashboard, GoalProgress};
pub use money::format_money;
pub use simulation::{
    ComparedScenario, ProjectionData, SensitivityPoint, SensitivityReport, SensitivitySeries,
    SensitivityVariable,
};
