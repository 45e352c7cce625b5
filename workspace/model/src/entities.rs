//! SeaORM entity modules for the planning data model:
//! scenarios with their adjustments and simulation results,
//! budgets with line items, goals, and the read-only transaction ledger.

pub mod budget;
pub mod budget_line_item;
pub mod goal;
pub mod scenario;
pub mod scenario_adjustment;
pub mod scenario_result;
pub mod transaction;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::budget::Entity as Budget;
    pub use super::budget_line_item::Entity as BudgetLineItem;
    pub use super::goal::Entity as Goal;
    pub use super::scenario::Entity as Scenario;
    pub use super::scenario_adjustment::Entity as ScenarioAdjustment;
    pub use super::scenario_result::Entity as ScenarioResult;
    pub use super::transaction::Entity as Transaction;
}
