//! Tracing setup
//!
//! Library code only emits `tracing` events under the `edge_collect` target.
//! Hosts that do not install their own subscriber can use [`init_tracing`].
//!
//! ```rust,ignore
//! use edge_collect::observability::{init_tracing, OutputFormat, TracingConfig};
//!
//! init_tracing(&TracingConfig::default().with_format(OutputFormat::Json))?;
//! ```

use tracing_subscriber::EnvFilter;

use crate::error::NetworkError;

/// Environment variable consulted for extra filter directives.
pub const LOG_ENV: &str = "EDGE_COLLECT_LOG";

/// Output format for tracing logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Multi-line, human-readable
    #[default]
    Pretty,
    /// Single-line text
    Compact,
    /// One JSON object per line
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(NetworkError::ConfigurationError(format!(
                "Invalid log format: {other}. Valid options: pretty, compact, json"
            ))),
        }
    }
}

/// Subscriber configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub level: tracing::Level,
    pub format: OutputFormat,
    /// Include the event target in each record.
    pub with_target: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            format: OutputFormat::Pretty,
            with_target: true,
        }
    }
}

impl TracingConfig {
    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_target(mut self, with_target: bool) -> Self {
        self.with_target = with_target;
        self
    }

    /// Filter directives: this crate at the configured level, followed by
    /// whatever `EDGE_COLLECT_LOG` adds.
    pub fn directives(&self, extra: Option<&str>) -> String {
        let level = self.level.as_str().to_lowercase();
        let mut directives = format!("edge_collect={level}");
        if let Some(extra) = extra.map(str::trim).filter(|s| !s.is_empty()) {
            directives.push(',');
            directives.push_str(extra);
        }
        directives
    }

    pub fn env_filter(&self) -> Result<EnvFilter, NetworkError> {
        let extra = std::env::var(LOG_ENV).ok();
        let directives = self.directives(extra.as_deref());
        EnvFilter::try_new(&directives).map_err(|e| {
            NetworkError::ConfigurationError(format!("Invalid log filter '{directives}': {e}"))
        })
    }
}

/// Install a global `fmt` subscriber.
///
/// Fails with `ConfigurationError` when a global subscriber is already set.
pub fn init_tracing(config: &TracingConfig) -> Result<(), NetworkError> {
    let filter = config.env_filter()?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target);

    let result = match config.format {
        OutputFormat::Pretty => builder.pretty().try_init(),
        OutputFormat::Compact => builder.compact().try_init(),
        OutputFormat::Json => builder
            .json()
            .with_thread_ids(true)
            .with_current_span(true)
            .try_init(),
    };

    result.map_err(|e| NetworkError::ConfigurationError(format!("Failed to initialize tracing: {e}")))
}
