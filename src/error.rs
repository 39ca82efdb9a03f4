//! Error types and handling for the soaralarm forecast engine

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for the forecast engine
#[derive(Error, Debug)]
pub enum ForecastError {
    /// The requested date has no sunrise/sunset entry for a site
    #[error("No daylight entry for {date}")]
    MissingDayData { date: NaiveDate },

    /// Upstream series violates the hourly input contract
    #[error("Malformed series: {message}")]
    MalformedSeries { message: String },

    /// Catalog, batch or command line input errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON decoding errors
    #[error("Parse error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl ForecastError {
    /// Create a new missing day error
    #[must_use]
    pub fn missing_day(date: NaiveDate) -> Self {
        Self::MissingDayData { date }
    }

    /// Create a new malformed series error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedSeries {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the error only concerns a single (site, date) pair
    #[must_use]
    pub fn is_scoped_to_day(&self) -> bool {
        matches!(self, ForecastError::MissingDayData { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ForecastError::MissingDayData { .. } => "No data".to_string(),
            ForecastError::MalformedSeries { message } => {
                format!("Forecast data is inconsistent ({message}). This is a bug in the data feed.")
            }
            ForecastError::Validation { message } => format!("Invalid input: {message}"),
            ForecastError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            ForecastError::Io { .. } => {
                "File operation failed. Please check file paths and permissions.".to_string()
            }
            ForecastError::Json { .. } => {
                "Input file is not valid JSON for this command.".to_string()
            }
        }
    }
}
