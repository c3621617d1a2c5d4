//! # Beacon Internal Library
//!
//! Re-exports the core Beacon crates for convenience.

/// Services, hooks, events and the application registry.
pub use beacon_service;

/// Realtime lifecycle events for registered services.
pub use beacon_realtime;

/// Infrastructure plugins.
pub use beacon_core_plugins;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use beacon_core_plugins::{TracingConfig, TracingFormat, TracingPlugin};
    pub use beacon_realtime::prelude::*;
    pub use beacon_service::prelude::*;
}
