//! Configuration management for soaralarm
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::ForecastError;
use crate::flyability::PreferenceWindow;
use crate::flyability::window::parse_time_of_day;
use crate::forecast::DEFAULT_MODEL;
use crate::models::{SiteCatalog, SiteKind};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoarAlarmConfig {
    /// What to forecast and when
    #[serde(default)]
    pub preferences: PreferencesConfig,
    /// Where the site list comes from
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// User preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesConfig {
    /// Site type to forecast (soar or thermal)
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Weather model label to pick from multi-model input
    #[serde(default = "default_model")]
    pub model: String,
    /// Earliest wall-clock time of interest, HH:MM
    #[serde(default = "default_time_range_start")]
    pub time_range_start: String,
    /// Latest wall-clock time of interest, HH:MM
    #[serde(default = "default_time_range_end")]
    pub time_range_end: String,
}

/// Site catalog settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON site list; built-in presets when unset
    pub path: Option<PathBuf>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_mode() -> String {
    "soar".to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_time_range_start() -> String {
    "00:00".to_string()
}

fn default_time_range_end() -> String {
    "23:59".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            model: default_model(),
            time_range_start: default_time_range_start(),
            time_range_end: default_time_range_end(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl SoarAlarmConfig {
    /// Load configuration from `config_path`, or the default location when
    /// none is given, layered under environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.or_else(Self::get_config_path);
        if let Some(config_file) = config_file.filter(|path| path.exists()) {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. SOARALARM_PREFERENCES__MODE=thermal
        builder = builder.add_source(
            Environment::with_prefix("SOARALARM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SoarAlarmConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("soaralarm").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        let preferences = &mut self.preferences;
        if preferences.mode.is_empty() {
            preferences.mode = default_mode();
        }
        if preferences.model.is_empty() {
            preferences.model = default_model();
        }
        if preferences.time_range_start.is_empty() {
            preferences.time_range_start = default_time_range_start();
        }
        if preferences.time_range_end.is_empty() {
            preferences.time_range_end = default_time_range_end();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_preferences()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_preferences(&self) -> Result<()> {
        self.site_kind().map_err(|e| ForecastError::config(e.to_string()))?;

        let window = self.preference_window().map_err(|e| ForecastError::config(e.to_string()))?;
        if window.crosses_midnight() {
            return Err(ForecastError::config(format!(
                "Preferred time range {}-{} crosses midnight, which is not supported",
                self.preferences.time_range_start, self.preferences.time_range_end
            ))
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ForecastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ForecastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }

    /// Configured site type
    pub fn site_kind(&self) -> crate::Result<SiteKind> {
        self.preferences.mode.parse()
    }

    /// Configured preference window
    pub fn preference_window(&self) -> crate::Result<PreferenceWindow> {
        Ok(PreferenceWindow::new(
            parse_time_of_day(&self.preferences.time_range_start)?,
            parse_time_of_day(&self.preferences.time_range_end)?,
        ))
    }

    /// Site catalog from the configured file, or the presets
    pub fn load_catalog(&self) -> Result<SiteCatalog> {
        match &self.catalog.path {
            Some(path) => SiteCatalog::load(path)
                .with_context(|| format!("Failed to load site catalog from {}", path.display())),
            None => Ok(SiteCatalog::presets()),
        }
    }
}
