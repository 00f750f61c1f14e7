//! Logging initialization

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter: bridge events at `info`, everything else at `warn`
pub const DEFAULT_FILTER: &str = "warn,trezor=info";

/// Logging setup failed
#[derive(Error, Debug)]
pub enum LoggingError {
    /// A global subscriber is already installed
    #[error("Failed to initialize logging: {0}")]
    Init(String),
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directives, e.g. `info` or `warn,trezor::signer=debug`
    pub filter: String,

    /// Output format
    pub format: LogFormat,

    /// Enable ANSI colors (text output only)
    pub color: bool,

    /// Include the event target (`trezor::signer`, `trezor::discovery`)
    pub include_target: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// Compact single-line format
    Compact,
    /// JSON format for machine parsing
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::Text,
            color: true,
            include_target: true,
        }
    }
}

/// Install a global subscriber. `RUST_LOG` overrides `config.filter` when set.
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_ansi(config.color)
                    .with_target(config.include_target),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_ansi(config.color)
                    .with_target(config.include_target),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(config.include_target))
            .try_init(),
    };
    result.map_err(|e| LoggingError::Init(e.to_string()))?;

    tracing::debug!(target: "trezor::bridge", filter = %config.filter, "logging initialized");
    Ok(())
}

/// Install a text subscriber driven by `RUST_LOG`, falling back to [`DEFAULT_FILTER`]
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    init_logging(&LogConfig::default())
}
