use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, LoggingSettings, PolicyOverrides, ReportingPolicy, StoreSettings};

/// The file `load_config` reads when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "gymdesk.toml";

/// Loads the application configuration from `gymdesk.toml` in the working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Loads the configuration from `path`, then applies `GYMDESK__*` environment overrides.
///
/// The file is optional; every setting has a default. For example,
/// `GYMDESK__REPORTING__LOW_STOCK_THRESHOLD=5` overrides `[reporting] low_stock_threshold`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("GYMDESK")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(path = %path.display(), "Configuration loaded.");
    Ok(config)
}

impl Config {
    /// Rejects settings the reporting layer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.reporting.validate()
    }
}

impl ReportingPolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.low_stock_threshold == 0 {
            return Err(ConfigError::ValidationError(
                "reporting.low_stock_threshold must be greater than 0".to_string(),
            ));
        }
        if self.recent_transactions_limit == 0 {
            return Err(ConfigError::ValidationError(
                "reporting.recent_transactions_limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
