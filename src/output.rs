//! Rendering of command results as text, JSON, YAML or CSV.

use std::fmt::Write as _;

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use serde::Serialize;

use common::{
    BatchReport, BudgetAlert, BudgetRecommendation, ComparedScenario, GoalDashboard,
    SensitivityReport, VarianceReport, format_money,
};
use compute::scenario::frame::write_projection_csv;
use compute::scenario::simulator::SimulationRun;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
    Csv,
}

/// A command result that can be shown to the user.
pub trait Report: Serialize {
    /// Human readable rendering, money formatted in `currency`.
    fn to_text(&self, currency: &str) -> String;

    fn to_csv(&self) -> Result<String> {
        bail!("CSV output is only available for simulations")
    }
}

pub fn render<R: Report + ?Sized>(report: &R, format: OutputFormat, currency: &str) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(report.to_text(currency)),
        OutputFormat::Json => serde_json::to_string_pretty(report).context("Failed to encode JSON"),
        OutputFormat::Yaml => serde_yaml::to_string(report).context("Failed to encode YAML"),
        OutputFormat::Csv => report.to_csv(),
    }
}

impl Report for SimulationRun {
    fn to_text(&self, currency: &str) -> String {
        let p = &self.projection;
        let mut out = String::new();
        let _ = writeln!(out, "Simulation result #{}", self.result_id);
        if self.baseline.uses_defaults() {
            let _ = writeln!(out, "(no usable transaction history, default baseline figures used)");
        }
        let _ = writeln!(
            out,
            "{:<10} {:>16} {:>16} {:>16} {:>16}",
            "Month", "Revenue", "Expenses", "Profit", "Cash"
        );
        for (i, label) in p.month_labels.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:<10} {:>16} {:>16} {:>16} {:>16}",
                label,
                format_money(p.monthly_revenue[i], currency),
                format_money(p.monthly_expenses[i], currency),
                format_money(p.monthly_profit[i], currency),
                format_money(p.monthly_cash_balance[i], currency),
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Total revenue:  {}", format_money(p.total_revenue, currency));
        let _ = writeln!(out, "Total expenses: {}", format_money(p.total_expenses, currency));
        let _ = writeln!(out, "Total profit:   {}", format_money(p.total_profit, currency));
        let _ = writeln!(out, "Profit margin:  {}%", p.profit_margin);
        let _ = writeln!(out, "Ending cash:    {}", format_money(p.ending_cash, currency));
        let _ = writeln!(out, "Lowest cash:    {}", format_money(p.lowest_cash, currency));
        let _ = writeln!(
            out,
            "Runway:         {}",
            p.runway_days.map_or("n/a".to_string(), |d| format!("{} days", d))
        );
        let _ = writeln!(
            out,
            "Break-even:     {}",
            match (p.break_even_month, p.break_even_revenue) {
                (Some(month), Some(revenue)) => format!("month {} at {}", month, format_money(revenue, currency)),
                _ => "not reached".to_string(),
            }
        );
        out
    }

    fn to_csv(&self) -> Result<String> {
        let mut buffer = Vec::new();
        write_projection_csv(&self.projection, &mut buffer)?;
        String::from_utf8(buffer).context("CSV output is not valid UTF-8")
    }
}

impl Report for SensitivityReport {
    fn to_text(&self, currency: &str) -> String {
        let mut out = format!("Sensitivity of scenario #{}\n", self.scenario_id);
        for series in &self.series {
            let _ = writeln!(out, "\n{}", series.variable);
            let _ = writeln!(out, "{:>9} {:>16} {:>16} {:>10}", "Change", "Ending cash", "Profit", "Runway");
            for point in &series.points {
                let _ = writeln!(
                    out,
                    "{:>8}% {:>16} {:>16} {:>10}",
                    point.variation,
                    format_money(point.ending_cash, currency),
                    format_money(point.total_profit, currency),
                    point.runway_days.map_or("n/a".to_string(), |d| d.to_string()),
                );
            }
        }
        out
    }
}

impl Report for [ComparedScenario] {
    fn to_text(&self, currency: &str) -> String {
        let mut out = String::new();
        for scenario in self {
            let _ = write!(out, "#{} {} ({})", scenario.scenario_id, scenario.name, scenario.scenario_type);
            match &scenario.result {
                Some(p) => {
                    let _ = writeln!(
                        out,
                        ": ending cash {}, profit {}, margin {}%, runway {}",
                        format_money(p.ending_cash, currency),
                        format_money(p.total_profit, currency),
                        p.profit_margin,
                        p.runway_days.map_or("n/a".to_string(), |d| format!("{} days", d)),
                    );
                }
                None => {
                    let _ = writeln!(out, ": not simulated yet");
                }
            }
        }
        out
    }
}

impl Report for [BudgetAlert] {
    fn to_text(&self, _currency: &str) -> String {
        if self.is_empty() {
            return "No new alerts\n".to_string();
        }
        self.iter()
            .map(|alert| format!("[{}] {}\n", alert.level, alert.message))
            .collect()
    }
}

impl Report for VarianceReport {
    fn to_text(&self, currency: &str) -> String {
        let mut out = format!("Budget #{} {}\n", self.budget_id, self.budget_name);
        let _ = writeln!(
            out,
            "{:<24} {:>16} {:>16} {:>16} {:>9}",
            "Category", "Budgeted", "Actual", "Variance", "Used"
        );
        for line in &self.lines {
            let _ = writeln!(
                out,
                "{:<24} {:>16} {:>16} {:>16} {:>8}%",
                line.category,
                format_money(line.budgeted, currency),
                format_money(line.actual, currency),
                format_money(line.variance, currency),
                line.utilization,
            );
        }
        let _ = writeln!(
            out,
            "{:<24} {:>16} {:>16} {:>16} {:>8}%",
            "Total",
            format_money(self.total_budgeted, currency),
            format_money(self.total_actual, currency),
            format_money(self.total_variance, currency),
            self.utilization,
        );
        out
    }
}

impl Report for [BudgetRecommendation] {
    fn to_text(&self, currency: &str) -> String {
        if self.is_empty() {
            return "No spending in the last 90 days\n".to_string();
        }
        self.iter()
            .map(|r| {
                format!(
                    "{}: average {} per month over {} transactions, suggested {}\n",
                    r.category,
                    format_money(r.monthly_average, currency),
                    r.transaction_count,
                    format_money(r.suggested_budget, currency),
                )
            })
            .collect()
    }
}

impl Report for GoalDashboard {
    fn to_text(&self, _currency: &str) -> String {
        let mut out = format!("{} goals for organization {}\n", self.total, self.organization_id);
        for (status, count) in &self.by_status {
            let _ = writeln!(out, "  {}: {}", status, count);
        }
        for goal in &self.goals {
            let _ = writeln!(
                out,
                "#{} {} [{}] {}% ({} of {}), {} days left",
                goal.goal_id,
                goal.name,
                goal.status,
                goal.progress_percent,
                goal.current_value,
                goal.target_value,
                goal.days_remaining,
            );
        }
        out
    }
}

impl Report for BatchReport {
    fn to_text(&self, _currency: &str) -> String {
        format!(
            "processed {}, skipped {}, failed {}\n",
            self.processed, self.skipped, self.failed
        )
    }
}
