//! Core infrastructure plugins for Beacon.
//!
//! - [`TracingPlugin`] - Logging and observability via the `tracing` crate
//!
//! # Example
//!
//! ```
//! use beacon_core_plugins::{TracingConfig, TracingPlugin};
//! use beacon_service::App;
//!
//! let config = TracingConfig::from_json(r#"{ "level": "debug", "envFilter": "beacon_realtime=trace" }"#)
//!     .unwrap();
//!
//! let mut app = App::new();
//! app.configure(TracingPlugin::from_config(&config).unwrap()).unwrap();
//! ```

mod tracing_plugin;

pub use tracing_plugin::{TracingConfig, TracingConfigError, TracingFormat, TracingPlugin};
