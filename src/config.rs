use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::{debug, trace};

use compute::settings::{BudgetPolicy, SimulationSettings};

pub const DEFAULT_CONFIG_FILE: &str = "finplan.toml";

/// Application settings.
///
/// Layered from built-in defaults, an optional TOML file and `FINPLAN__*`
/// environment variables (`FINPLAN__SIMULATION__REVENUE_GROWTH=0.03`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database_url: String,
    /// ISO 4217 code used to format money in text output.
    pub display_currency: String,
    pub simulation: SimulationSettings,
    pub budget: BudgetPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://finplan.db?mode=rwc".to_string(),
            display_currency: "USD".to_string(),
            simulation: SimulationSettings::default(),
            budget: BudgetPolicy::default(),
        }
    }
}

/// Loads settings from `path`, or from `finplan.toml` in the working
/// directory when it exists.
///
/// An explicitly given file must exist.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    trace!("Loading settings");
    let file = match path {
        Some(path) => {
            debug!("Config file: {}", path.display());
            File::from(path).required(true)
        }
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let settings: Settings = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix("FINPLAN")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Invalid configuration")?;

    debug!(?settings, "Settings loaded");
    Ok(settings)
}
