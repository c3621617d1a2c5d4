//! Tracing and observability plugin.
//!
//! Provides [`TracingPlugin`], which installs a `tracing` subscriber when the
//! plugin is configured on an [`App`]. Beacon crates log through `tracing`
//! (service registration, hook registration, realtime installs, emission
//! failures); without a subscriber those records are dropped.
//!
//! # Example
//!
//! ```
//! use beacon_core_plugins::{TracingFormat, TracingPlugin};
//! use beacon_service::App;
//! use tracing::Level;
//!
//! let mut app = App::new();
//! app.configure(
//!     TracingPlugin::default()
//!         .with_level(Level::DEBUG)
//!         .with_format(TracingFormat::Compact),
//! )
//! .unwrap();
//! ```

use core::str::FromStr;

use beacon_service::{App, Plugin, PluginError};
use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TracingFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Errors raised while turning a [`TracingConfig`] into a [`TracingPlugin`].
#[derive(Debug, thiserror::Error)]
pub enum TracingConfigError {
    /// The document could not be parsed.
    #[error("invalid tracing configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The level is not one of `trace`, `debug`, `info`, `warn`, `error`.
    #[error("unknown log level '{0}'")]
    UnknownLevel(String),
}

/// Serializable tracing settings.
///
/// ```
/// use beacon_core_plugins::{TracingConfig, TracingFormat};
///
/// let config = TracingConfig::from_json(r#"{ "level": "debug", "format": "json" }"#).unwrap();
/// assert_eq!(config.format, TracingFormat::Json);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TracingConfig {
    /// Maximum log level, e.g. `info`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Output format.
    #[serde(default)]
    pub format: TracingFormat,
    /// Directive string such as `beacon_realtime=debug,beacon_service=warn`.
    #[serde(default)]
    pub env_filter: Option<String>,
    /// Whether to print span enter/exit events.
    #[serde(default)]
    pub span_events: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: TracingFormat::default(),
            env_filter: None,
            span_events: false,
        }
    }
}

impl TracingConfig {
    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or unknown keys.
    pub fn from_json(json: &str) -> Result<Self, TracingConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingPlugin
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing and logging plugin.
///
/// Installs a global subscriber on [`build`](Plugin::build). If a global
/// subscriber already exists (another plugin, a test harness) the existing
/// one is kept.
///
/// # Configuration Options
///
/// ```
/// use beacon_core_plugins::{TracingFormat, TracingPlugin};
/// use tracing::Level;
///
/// // Development: pretty output with span events
/// let dev_plugin = TracingPlugin::default()
///     .with_level(Level::DEBUG)
///     .with_span_events(true);
///
/// // Production: JSON output, realtime internals at debug
/// let prod_plugin = TracingPlugin::default()
///     .with_format(TracingFormat::Json)
///     .with_env_filter("info,beacon_realtime=debug");
/// ```
#[derive(Debug, Clone)]
pub struct TracingPlugin {
    level: Level,
    format: TracingFormat,
    env_filter: Option<String>,
    span_events: bool,
}

impl Default for TracingPlugin {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TracingPlugin {
    /// Creates a new `TracingPlugin` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a plugin from serializable settings.
    ///
    /// # Errors
    ///
    /// Returns [`TracingConfigError::UnknownLevel`] for an unrecognized level.
    pub fn from_config(config: &TracingConfig) -> Result<Self, TracingConfigError> {
        let level = Level::from_str(&config.level)
            .map_err(|_| TracingConfigError::UnknownLevel(config.level.clone()))?;
        Ok(Self {
            level,
            format: config.format,
            env_filter: config.env_filter.clone(),
            span_events: config.span_events,
        })
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a custom environment filter string.
    ///
    /// Format: `target=level,target=level,...`. Takes precedence over the level.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Returns the settings as a serializable [`TracingConfig`].
    #[must_use]
    pub fn config(&self) -> TracingConfig {
        TracingConfig {
            level: self.level.as_str().to_ascii_lowercase(),
            format: self.format,
            env_filter: self.env_filter.clone(),
            span_events: self.span_events,
        }
    }

    fn filter(&self) -> Result<EnvFilter, PluginError> {
        match &self.env_filter {
            Some(directives) => Ok(EnvFilter::try_new(directives)?),
            None => Ok(EnvFilter::new(self.level.as_str())),
        }
    }
}

impl Plugin for TracingPlugin {
    fn name(&self) -> String {
        "beacon::tracing".to_string()
    }

    fn build(&self, _app: &mut App) -> Result<(), PluginError> {
        let env_filter = self.filter()?;
        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };

        // try_init fails if a global subscriber is already set; keep that one.
        let installed = match self.format {
            TracingFormat::Pretty => tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_span_events(span_events),
                )
                .try_init()
                .is_ok(),
            TracingFormat::Compact => tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_span_events(span_events),
                )
                .try_init()
                .is_ok(),
            TracingFormat::Json => tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_span_events(span_events),
                )
                .try_init()
                .is_ok(),
        };

        tracing::info!(
            level = %self.level,
            format = ?self.format,
            installed,
            "TracingPlugin initialized"
        );
        Ok(())
    }
}
