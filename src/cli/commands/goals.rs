use anyhow::{Context, Result};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use tracing::{info, trace};

use compute::goal::{organization_dashboard, set_goal_value};

use crate::cli::GoalCommands;
use crate::output::render;

pub async fn goals(db: &DatabaseConnection, command: GoalCommands, currency: &str) -> Result<String> {
    trace!("Entering goals function");

    match command {
        GoalCommands::Update { goal_id, value } => {
            let goal = set_goal_value(db, goal_id, value, Utc::now().naive_utc())
                .await
                .with_context(|| format!("Failed to update goal {}", goal_id))?;
            info!("Goal {} is now {:?}", goal.id, goal.status);
            Ok(format!(
                "Goal #{} '{}': {} of {} ({}%), {:?}\n",
                goal.id, goal.name, goal.current_value, goal.target_value, goal.progress_percent, goal.status
            ))
        }
        GoalCommands::Dashboard { organization_id, today, format } => {
            let today = today.unwrap_or_else(|| Utc::now().date_naive());
            let dashboard = organization_dashboard(db, organization_id, today)
                .await
                .with_context(|| format!("Failed to load goals of organization {}", organization_id))?;
            render(&dashboard, format, currency)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use crate::test_utils::{seed_planning_data, setup_test_db};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_update_then_dashboard() {
        let db = setup_test_db().await;
        seed_planning_data(&db).await;

        let updated = goals(&db, GoalCommands::Update { goal_id: 2, value: Decimal::new(45, 0) }, "USD")
            .await
            .unwrap();
        assert!(updated.starts_with("Goal #2"));
        assert!(updated.ends_with("OnTrack\n"));

        let dashboard = goals(
            &db,
            GoalCommands::Dashboard {
                organization_id: 1,
                today: Some(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()),
                format: OutputFormat::Json,
            },
            "USD",
        )
        .await
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&dashboard).unwrap();
        assert_eq!(json["total"], 2);
        assert_eq!(json["by_status"]["on_track"], 1);
        assert_eq!(json["by_status"]["off_track"], 1);
    }
}
