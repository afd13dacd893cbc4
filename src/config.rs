use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------
//
// Two formerly hard-coded dispatch tables, made data:
//   * filename classification rules (substring → category), and
//   * driver triggers (selected SLA column → driver category chart).
//
// Defaults reproduce the shipped behavior; a `costboard.json` next to the
// working directory can override them to add new driver categories without
// touching code.

/// One filename rule: files whose name contains `pattern` belong to
/// `category`. Rules are evaluated in order, first match wins; files no rule
/// matches are SLA data.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyRule {
    pub pattern: String,
    pub category: String,
}

/// Links an SLA column name to the driver dataset that explains it. When the
/// column is selected, the driver's grouped bar chart is rendered over the
/// same date window.
#[derive(Debug, Clone, Deserialize)]
pub struct DriverTrigger {
    /// Exact SLA column name that activates this trigger.
    pub column: String,
    /// Category the classifier files the driver spreadsheet under.
    pub category: String,
    /// Human-readable chart title / notice subject.
    pub title: String,
    /// Whether a missing driver file warrants an inline notice (as opposed
    /// to silently omitting the chart).
    #[serde(default)]
    pub notice_when_absent: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_rules")]
    pub rules: Vec<ClassifyRule>,
    #[serde(default = "default_triggers")]
    pub triggers: Vec<DriverTrigger>,
}

fn default_rules() -> Vec<ClassifyRule> {
    vec![
        ClassifyRule {
            pattern: "FNB_CARD_DRIVERS".into(),
            category: "card_drivers".into(),
        },
        ClassifyRule {
            pattern: "GROUP_CRIME_DRIVERS".into(),
            category: "group_crime".into(),
        },
    ]
}

fn default_triggers() -> Vec<DriverTrigger> {
    vec![
        DriverTrigger {
            column: "FNB Cards".into(),
            category: "card_drivers".into(),
            title: "Card Drivers".into(),
            // The original dashboard silently skips the chart when the card
            // drivers file was never opened.
            notice_when_absent: false,
        },
        DriverTrigger {
            column: "Group Crime".into(),
            category: "group_crime".into(),
            title: "Group Crime Drivers".into(),
            notice_when_absent: true,
        },
    ]
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            rules: default_rules(),
            triggers: default_triggers(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing dashboard config")
    }

    /// Read `path` if it exists; fall back to the defaults (logging the
    /// reason) when it is absent or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match Self::from_json(&text) {
                Ok(config) => {
                    log::info!("Loaded dashboard config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::error!("Ignoring invalid config {}: {e:#}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn trigger_for(&self, column: &str) -> Option<&DriverTrigger> {
        self.triggers.iter().find(|t| t.column == column)
    }
}
