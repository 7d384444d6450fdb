use std::path::PathBuf;
use thiserror::Error;

/// Problems loading or validating a `WidgetConfig`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failures while producing or revealing an assistant reply
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("reply generation failed: {0}")]
    Failed(String),

    #[error("conversation log is closed")]
    LogClosed,
}

/// Failures while loading FAQ items from a remote source
#[derive(Debug, Error)]
pub enum FaqError {
    #[error("Fetch failed: {0}")]
    Status(u16),

    #[error("No data returned")]
    Empty,

    #[error("Failed to load FAQs: {0}")]
    Http(#[from] reqwest::Error),
}
