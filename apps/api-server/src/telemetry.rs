//! Tracing subscriber setup.

use std::env;
use std::str::FromStr;

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ConfigError, Vars};

const DEFAULT_DIRECTIVES: &str = "info,api_server=debug,thoughtlane_core=debug,thoughtlane_infra=debug";

/// Log line format, from `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, for a terminal.
    Pretty,
    Compact,
    /// One JSON object per event, with the request span's fields inlined.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err("expected `pretty`, `compact` or `json`".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub format: LogFormat,
    /// `EnvFilter` directives, from `RUST_LOG`.
    pub directives: String,
}

impl TelemetryConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(&lookup);

        let directives = vars
            .get("RUST_LOG")
            .unwrap_or_else(|| DEFAULT_DIRECTIVES.to_string());
        if let Err(e) = EnvFilter::try_new(&directives) {
            return Err(ConfigError::Invalid {
                key: "RUST_LOG",
                value: directives,
                reason: e.to_string(),
            });
        }

        Ok(Self {
            format: vars.parse_or("LOG_FORMAT", LogFormat::Pretty)?,
            directives,
        })
    }
}

/// Install the global subscriber. Fails if one is already set.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(EnvFilter::new(&config.directives));

    match config.format {
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init()?,
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init()?,
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init()?,
    }

    tracing::info!(
        format = ?config.format,
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );
    Ok(())
}
