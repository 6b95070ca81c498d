//! `tracing` setup shared by the binaries.
//!
//! Events go to stderr so that stdout stays free for reports. `RUST_LOG`
//! overrides the default filter.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter applied when `RUST_LOG` is unset.
    pub default_filter: &'static str,
    pub format: LogFormat,
}

impl LogConfig {
    /// Switch to one JSON object per event, for log collectors.
    pub fn json(self, enabled: bool) -> Self {
        let format = if enabled { LogFormat::Json } else { LogFormat::Text };
        Self { format, ..self }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_filter: "info",
            format: LogFormat::Text,
        }
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: LogConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };
    result.map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))
}
