#[cfg(test)]
mod integration_tests {
    use crate::cli::{BudgetAction, Cli, Commands, Job};
    use crate::output::OutputFormat;
    use crate::test_utils::{PLANNING_DUMP, init_test_tracing};
    use clap::Parser;
    use common::SensitivityVariable;
    use model::entities::{budget_line_item, scenario, scenario_result};
    use rust_decimal::Decimal;
    use sea_orm::{Database, EntityTrait};

    fn cli(database_url: &str, args: &[&str]) -> Cli {
        let mut argv = vec!["finplan", "--database-url", database_url];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("Invalid test arguments")
    }

    #[test]
    fn test_parse_sensitivity_arguments() {
        let parsed = Cli::try_parse_from([
            "finplan",
            "sensitivity",
            "--scenario-id",
            "3",
            "--variable",
            "expenses",
            "--variation",
            "-20",
            "--variation",
            "15",
            "--format",
            "yaml",
        ])
        .unwrap();

        match parsed.command {
            Commands::Sensitivity { scenario_id, variables, variations, format, .. } => {
                assert_eq!(scenario_id, 3);
                assert_eq!(variables, vec![SensitivityVariable::Expenses]);
                assert_eq!(variations, vec![Decimal::new(-20, 0), Decimal::new(15, 0)]);
                assert_eq!(format, OutputFormat::Yaml);
            }
            _ => panic!("expected the sensitivity command"),
        }
    }

    #[test]
    fn test_parse_budget_and_jobs() {
        let parsed = Cli::try_parse_from(["finplan", "budget", "alerts", "--budget-id", "7"]).unwrap();
        assert!(matches!(
            parsed.command,
            Commands::Budget { action: BudgetAction::Alerts, budget_id: 7, format: OutputFormat::Text }
        ));

        let parsed = Cli::try_parse_from(["finplan", "run-jobs"]).unwrap();
        assert!(matches!(parsed.command, Commands::RunJobs { job: Job::All, .. }));

        assert!(Cli::try_parse_from(["finplan", "compare", "--organization-id", "1"]).is_err());
    }

    #[tokio::test]
    async fn test_command_line_end_to_end() {
        let _guard = init_test_tracing();
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("dump.json");
        std::fs::write(&dump, PLANNING_DUMP).unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("finplan.db").display());
        let dump = dump.to_string_lossy().to_string();

        cli(&url, &["init-db"]).run().await.unwrap();
        cli(&url, &["import", "--json-path", &dump]).run().await.unwrap();
        cli(&url, &["simulate", "--scenario-id", "1", "--today", "2025-04-01", "--format", "csv"])
            .run()
            .await
            .unwrap();
        cli(&url, &["duplicate", "--scenario-id", "1"]).run().await.unwrap();
        cli(&url, &["compare", "--organization-id", "1", "--scenario-id", "1", "--scenario-id", "3"])
            .run()
            .await
            .unwrap();
        cli(&url, &["budget", "actuals", "--budget-id", "1"]).run().await.unwrap();
        cli(&url, &["goals", "dashboard", "--organization-id", "1", "--format", "json"])
            .run()
            .await
            .unwrap();

        // Missing scenarios surface as errors
        assert!(cli(&url, &["simulate", "--scenario-id", "99"]).run().await.is_err());

        let db = Database::connect(&url).await.unwrap();
        let scenarios = scenario::Entity::find().all(&db).await.unwrap();
        assert_eq!(scenarios.len(), 3);
        assert_eq!(scenarios[2].name, "Base plan (Copy)");
        assert!(scenarios[0].last_simulated_at.is_some());

        let results = scenario_result::Entity::find().all(&db).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].monthly_revenue.0.len(), 12);

        let items = budget_line_item::Entity::find().all(&db).await.unwrap();
        assert_eq!(items[0].actual_amount, Decimal::new(1200, 0));
    }
}
