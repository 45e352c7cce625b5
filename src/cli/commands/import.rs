use std::fmt;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DatabaseTransaction, Set, TransactionTrait};
use serde::Deserialize;
use tracing::{debug, info, trace};
use validator::{Validate, ValidationError};

use model::entities::{
    budget, budget_line_item, goal, scenario, scenario_adjustment, transaction,
};

/// Money and adjustment values are stored with 15 digits, 2 of them decimals.
const MAX_AMOUNT_DIGITS: u32 = 13;
const MAX_AMOUNT_SCALE: u32 = 2;

fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    let limit = Decimal::from(10_i64.pow(MAX_AMOUNT_DIGITS));
    if value.abs() >= limit {
        return Err(ValidationError::new("amount_too_large"));
    }
    if value.normalize().scale() > MAX_AMOUNT_SCALE {
        return Err(ValidationError::new("amount_too_precise"));
    }
    Ok(())
}

/// Planning data dump accepted by `finplan import`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct PlanningDump {
    #[validate(nested)]
    pub transactions: Vec<ImportTransaction>,
    #[validate(nested)]
    pub scenarios: Vec<ImportScenario>,
    #[validate(nested)]
    pub budgets: Vec<ImportBudget>,
    #[validate(nested)]
    pub goals: Vec<ImportGoal>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ImportTransaction {
    pub organization_id: i32,
    pub date: NaiveDate,
    #[validate(custom(function = "validate_amount"))]
    pub amount: Decimal,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(custom(function = "validate_amount"))]
    pub balance: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ImportScenario {
    pub organization_id: i32,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub scenario_type: scenario::ScenarioType,
    pub base_year: i32,
    #[validate(range(min = 1, max = 12))]
    pub base_month: i32,
    #[validate(range(min = 1, max = 36))]
    pub forecast_months: i32,
    #[serde(default)]
    #[validate(nested)]
    pub adjustments: Vec<ImportAdjustment>,
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_month_range"))]
pub struct ImportAdjustment {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub adjustment_type: scenario_adjustment::AdjustmentType,
    pub change_type: scenario_adjustment::ChangeType,
    #[validate(custom(function = "validate_amount"))]
    pub value: Decimal,
    #[serde(default)]
    pub category: Option<String>,
    #[validate(range(min = 1))]
    pub start_month: i32,
    #[serde(default)]
    pub end_month: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assumptions: Option<String>,
}

fn validate_month_range(adjustment: &ImportAdjustment) -> Result<(), ValidationError> {
    match adjustment.end_month {
        Some(end) if end < adjustment.start_month => {
            Err(ValidationError::new("end_month_before_start_month"))
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_budget_period"))]
pub struct ImportBudget {
    pub organization_id: i32,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub budget_type: budget::BudgetType,
    pub period_type: budget::PeriodType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(custom(function = "validate_amount"))]
    pub total_amount: Decimal,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default = "enabled")]
    pub alert_at_50_percent: bool,
    #[serde(default = "enabled")]
    pub alert_at_75_percent: bool,
    #[serde(default = "enabled")]
    pub alert_at_90_percent: bool,
    #[serde(default = "enabled")]
    pub alert_at_100_percent: bool,
    #[serde(default)]
    #[validate(nested)]
    pub line_items: Vec<ImportLineItem>,
}

fn enabled() -> bool {
    true
}

fn validate_budget_period(budget: &ImportBudget) -> Result<(), ValidationError> {
    if budget.end_date < budget.start_date {
        return Err(ValidationError::new("end_date_before_start_date"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct ImportLineItem {
    #[validate(length(min = 1, max = 100))]
    pub category_name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[validate(custom(function = "validate_amount"))]
    pub budgeted_amount: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_goal_dates"))]
pub struct ImportGoal {
    pub organization_id: i32,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub goal_type: goal::GoalType,
    #[validate(custom(function = "validate_amount"))]
    pub target_value: Decimal,
    pub start_date: NaiveDate,
    pub target_date: NaiveDate,
}

fn validate_goal_dates(goal: &ImportGoal) -> Result<(), ValidationError> {
    if goal.target_date < goal.start_date {
        return Err(ValidationError::new("target_date_before_start_date"));
    }
    Ok(())
}

/// Row counts written by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub transactions: usize,
    pub scenarios: usize,
    pub adjustments: usize,
    pub budgets: usize,
    pub line_items: usize,
    pub goals: usize,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Imported {} transactions, {} scenarios ({} adjustments), {} budgets ({} line items), {} goals",
            self.transactions,
            self.scenarios,
            self.adjustments,
            self.budgets,
            self.line_items,
            self.goals
        )
    }
}

/// Reads, validates and imports a planning dump.
///
/// Either everything is imported or nothing is.
pub async fn import_planning(db: &DatabaseConnection, json_path: &Path) -> Result<ImportSummary> {
    trace!("Entering import_planning function");
    info!("Starting planning data import");
    debug!("JSON path: {}", json_path.display());

    let file = File::open(json_path)
        .with_context(|| format!("Failed to open file: {}", json_path.display()))?;
    let dump: PlanningDump = serde_json::from_reader(file).context("Failed to parse JSON")?;

    import_dump(db, &dump).await
}

pub async fn import_dump(db: &DatabaseConnection, dump: &PlanningDump) -> Result<ImportSummary> {
    if let Err(errors) = dump.validate() {
        bail!("Invalid planning dump: {}", errors);
    }

    let txn = db.begin().await?;
    let summary = write_dump(&txn, dump).await?;
    txn.commit().await?;

    info!("{}", summary);
    Ok(summary)
}

async fn write_dump(txn: &DatabaseTransaction, dump: &PlanningDump) -> Result<ImportSummary> {
    let now = Utc::now().naive_utc();
    let mut summary = ImportSummary::default();

    info!("Importing transactions...");
    for t in &dump.transactions {
        transaction::ActiveModel {
            organization_id: Set(t.organization_id),
            date: Set(t.date),
            amount: Set(t.amount),
            category: Set(t.category.clone()),
            balance: Set(t.balance),
            description: Set(t.description.clone()),
            ..Default::default()
        }
        .insert(txn)
        .await?;
        summary.transactions += 1;
    }

    info!("Importing scenarios...");
    for s in &dump.scenarios {
        let inserted = scenario::ActiveModel {
            organization_id: Set(s.organization_id),
            name: Set(s.name.clone()),
            description: Set(s.description.clone()),
            scenario_type: Set(s.scenario_type),
            base_year: Set(s.base_year),
            base_month: Set(s.base_month),
            forecast_months: Set(s.forecast_months),
            is_active: Set(true),
            last_simulated_at: Set(None),
            version: Set(1),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(txn)
        .await?;
        debug!("Imported scenario {} -> ID {}", s.name, inserted.id);
        summary.scenarios += 1;

        for a in &s.adjustments {
            scenario_adjustment::ActiveModel {
                scenario_id: Set(inserted.id),
                name: Set(a.name.clone()),
                adjustment_type: Set(a.adjustment_type),
                change_type: Set(a.change_type),
                value: Set(a.value),
                category: Set(a.category.clone()),
                start_month: Set(a.start_month),
                end_month: Set(a.end_month),
                description: Set(a.description.clone()),
                assumptions: Set(a.assumptions.clone()),
                ..Default::default()
            }
            .insert(txn)
            .await?;
            summary.adjustments += 1;
        }
    }

    info!("Importing budgets...");
    for b in &dump.budgets {
        let inserted = budget::ActiveModel {
            organization_id: Set(b.organization_id),
            name: Set(b.name.clone()),
            description: Set(b.description.clone()),
            budget_type: Set(b.budget_type),
            period_type: Set(b.period_type),
            start_date: Set(b.start_date),
            end_date: Set(b.end_date),
            total_amount: Set(b.total_amount),
            is_active: Set(true),
            is_approved: Set(b.is_approved),
            approved_at: Set(b.is_approved.then_some(now)),
            alert_at_50_percent: Set(b.alert_at_50_percent),
            alert_at_75_percent: Set(b.alert_at_75_percent),
            alert_at_90_percent: Set(b.alert_at_90_percent),
            alert_at_100_percent: Set(b.alert_at_100_percent),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(txn)
        .await?;
        debug!("Imported budget {} -> ID {}", b.name, inserted.id);
        summary.budgets += 1;

        for item in &b.line_items {
            budget_line_item::ActiveModel {
                budget_id: Set(inserted.id),
                category_name: Set(item.category_name.clone()),
                department: Set(item.department.clone()),
                budgeted_amount: Set(item.budgeted_amount),
                actual_amount: Set(Decimal::ZERO),
                variance_amount: Set(Decimal::ZERO),
                variance_percent: Set(Decimal::ZERO),
                alert_sent_50: Set(false),
                alert_sent_75: Set(false),
                alert_sent_90: Set(false),
                alert_sent_100: Set(false),
                notes: Set(item.notes.clone()),
                ..Default::default()
            }
            .insert(txn)
            .await?;
            summary.line_items += 1;
        }
    }

    info!("Importing goals...");
    for g in &dump.goals {
        goal::ActiveModel {
            organization_id: Set(g.organization_id),
            name: Set(g.name.clone()),
            description: Set(g.description.clone()),
            goal_type: Set(g.goal_type),
            target_value: Set(g.target_value),
            current_value: Set(Decimal::ZERO),
            start_date: Set(g.start_date),
            target_date: Set(g.target_date),
            progress_percent: Set(Decimal::ZERO),
            status: Set(goal::GoalStatus::OffTrack),
            is_active: Set(true),
            last_updated_at: Set(None),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(txn)
        .await?;
        summary.goals += 1;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{PLANNING_DUMP, setup_test_db};
    use sea_orm::EntityTrait;
    use validator::ValidationErrorsKind;

    #[tokio::test]
    async fn test_import_dump_file() {
        let db = setup_test_db().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        std::fs::write(&path, PLANNING_DUMP).unwrap();

        let summary = import_planning(&db, &path).await.unwrap();

        assert_eq!(
            summary,
            ImportSummary {
                transactions: 4,
                scenarios: 2,
                adjustments: 2,
                budgets: 1,
                line_items: 2,
                goals: 2,
            }
        );
        let adjustments = scenario_adjustment::Entity::find().all(&db).await.unwrap();
        assert_eq!(adjustments[0].change_type, scenario_adjustment::ChangeType::Percentage);
    }

    #[tokio::test]
    async fn test_invalid_dump_imports_nothing() {
        let db = setup_test_db().await;
        let dump: PlanningDump = serde_json::from_str(
            r#"{
                "transactions": [
                    {"organization_id": 1, "date": "2025-01-05", "amount": "100", "category": "Sales", "balance": "100"}
                ],
                "scenarios": [{
                    "organization_id": 1, "name": "Bad", "scenario_type": "custom",
                    "base_year": 2025, "base_month": 1, "forecast_months": 6,
                    "adjustments": [{
                        "name": "Backwards", "adjustment_type": "revenue", "change_type": "absolute",
                        "value": "10", "start_month": 4, "end_month": 2
                    }]
                }]
            }"#,
        )
        .unwrap();

        assert!(import_dump(&db, &dump).await.is_err());
        assert!(transaction::Entity::find().all(&db).await.unwrap().is_empty());
    }

    #[test]
    fn test_amount_bounds() {
        assert!(validate_amount(&Decimal::new(999_999_999_999_999, 2)).is_ok());
        assert!(validate_amount(&Decimal::new(-1050, 2)).is_ok());
        assert!(validate_amount(&Decimal::new(10_000_000_000_000, 0)).is_err());
        assert!(validate_amount(&Decimal::new(1005, 3)).is_err());
    }

    #[tokio::test]
    async fn test_oversized_one_time_events_are_rejected() {
        let db = setup_test_db().await;
        let dump: PlanningDump = serde_json::from_str(
            r#"{"scenarios": [{
                "organization_id": 1, "name": "Windfall", "scenario_type": "best",
                "base_year": 2025, "base_month": 1, "forecast_months": 3,
                "adjustments": [
                    {"name": "First", "adjustment_type": "one_time", "change_type": "absolute",
                     "value": "50000000000000000000000000000", "start_month": 1},
                    {"name": "Second", "adjustment_type": "one_time", "change_type": "absolute",
                     "value": "50000000000000000000000000000", "start_month": 2}
                ]
            }]}"#,
        )
        .unwrap();

        let errors = dump.validate().unwrap_err();
        let Some(ValidationErrorsKind::List(scenarios)) = errors.errors().get("scenarios") else {
            panic!("expected scenario errors, got {:?}", errors);
        };
        let Some(ValidationErrorsKind::List(adjustments)) = scenarios[&0].errors().get("adjustments") else {
            panic!("expected adjustment errors, got {:?}", scenarios[&0]);
        };
        assert!(adjustments[&0].field_errors().contains_key("value"));

        assert!(import_dump(&db, &dump).await.is_err());
        assert!(scenario::Entity::find().all(&db).await.unwrap().is_empty());
    }

    #[test]
    fn test_horizon_is_validated() {
        let dump: PlanningDump = serde_json::from_str(
            r#"{"scenarios": [{
                "organization_id": 1, "name": "Too long", "scenario_type": "best",
                "base_year": 2025, "base_month": 13, "forecast_months": 48
            }]}"#,
        )
        .unwrap();

        let errors = dump.validate().unwrap_err();
        let Some(ValidationErrorsKind::List(scenarios)) = errors.errors().get("scenarios") else {
            panic!("expected scenario errors, got {:?}", errors);
        };
        let fields = scenarios[&0].field_errors();
        assert!(fields.contains_key("forecast_months"));
        assert!(fields.contains_key("base_month"));
    }
}
