//! Error type shared across the crate.

/// Everything that can stop the map from loading or a handler from finishing.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// The restaurant table could not be read as CSV with the expected columns.
    #[error("failed to parse restaurant data: {0}")]
    Csv(#[from] csv::Error),
    /// A configuration override was not valid JSON for [`crate::config::MapConfig`].
    #[error("failed to parse map config: {0}")]
    ConfigJson(#[from] serde_json::Error),
    /// A configuration value is out of range.
    #[error("invalid map config: {0}")]
    Config(String),
    /// A startup asset could not be fetched.
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },
    /// A required DOM element or browser API call failed.
    #[error("dom error: {0}")]
    Dom(String),
}
