use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reporting: ReportingPolicy,
    pub store: StoreSettings,
    pub logging: LoggingSettings,
}

/// Policy constants used by the dashboard aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReportingPolicy {
    /// Items with stock strictly below this (and above zero) are flagged as low.
    pub low_stock_threshold: u32,
    /// How many days ahead an active membership counts as expiring.
    pub expiring_window_days: u32,
    /// How many of the newest transactions the dashboard lists.
    pub recent_transactions_limit: usize,
}

impl Default for ReportingPolicy {
    fn default() -> Self {
        Self {
            low_stock_threshold: 10,
            expiring_window_days: 30,
            recent_transactions_limit: 5,
        }
    }
}

/// Where the gym's seed snapshot lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub snapshot_path: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("gym.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, used when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Command-line overrides for the reporting policy.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct PolicyOverrides {
    /// Override the low-stock threshold.
    #[cfg_attr(feature = "clap", arg(long))]
    pub low_stock_threshold: Option<u32>,
    /// Override the expiring-membership window, in days.
    #[cfg_attr(feature = "clap", arg(long))]
    pub expiring_window_days: Option<u32>,
    /// Override how many recent transactions are listed.
    #[cfg_attr(feature = "clap", arg(long))]
    pub recent_limit: Option<usize>,
}

impl PolicyOverrides {
    pub fn apply(&self, policy: &mut ReportingPolicy) {
        if let Some(threshold) = self.low_stock_threshold {
            policy.low_stock_threshold = threshold;
        }
        if let Some(days) = self.expiring_window_days {
            policy.expiring_window_days = days;
        }
        if let Some(limit) = self.recent_limit {
            policy.recent_transactions_limit = limit;
        }
    }
}
