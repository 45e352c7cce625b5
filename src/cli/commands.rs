pub mod budgets;
pub mod goals;
pub mod import;
pub mod initdb;
pub mod jobs;
pub mod scenarios;

pub use budgets::{budget, recommend_budgets};
pub use goals::goals;
pub use import::import_planning;
pub use initdb::{connect, init_database};
pub use jobs::run_jobs;
pub use scenarios::{compare_scenarios, duplicate_scenario, run_sensitivity, simulate};
