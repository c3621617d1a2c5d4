//! Realtime lifecycle events for Beacon services.
//!
//! Installing the realtime wrapper on a registered service makes every
//! successful call to an instrumented method publish a [`ServiceEvent`]
//! carrying the final, post-hook result. The wrapper is transparent: callers
//! receive exactly what they would have received without it, and failed
//! calls never emit.
//!
//! | method   | default event |
//! |----------|---------------|
//! | `create` | `created`     |
//! | `update` | `updated`     |
//! | `patch`  | `patched`     |
//! | `remove` | `removed`     |
//! | `get`, `find` | none     |
//!
//! # Example
//!
//! ```
//! use beacon_realtime::{RealtimeConfig, install};
//! use beacon_service::{App, MemoryService, Params};
//! use serde_json::json;
//! use std::sync::{Arc, Mutex};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let mut app = App::new();
//! app.use_service("messages", MemoryService::new()).unwrap();
//! install(&mut app, "messages", RealtimeConfig::default()).unwrap();
//!
//! let messages = app.service("messages").unwrap();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! messages.events().on("created", move |event| {
//!     sink.lock().unwrap().push(event.payload.clone());
//! });
//!
//! let created = messages.create(json!({ "text": "hi" }), Params::default()).await.unwrap();
//! assert_eq!(*seen.lock().unwrap(), vec![created]);
//! # });
//! ```
//!
//! [`ServiceEvent`]: beacon_service::ServiceEvent

pub mod config;
pub mod error;
pub mod install;
pub mod interceptor;
pub mod plugin;
pub mod registry;
pub mod relay;

pub use config::{ConfigError, EmissionErrorPolicy, EmitTiming, EventMap, RealtimeConfig};
pub use error::InstallError;
pub use install::{effective_methods, install, realtime_wrapper};
pub use interceptor::RealtimeService;
pub use plugin::RealtimePlugin;
pub use relay::EventRelay;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::{
        EmissionErrorPolicy, EmitTiming, EventMap, InstallError, RealtimeConfig, RealtimePlugin,
        install, realtime_wrapper,
    };
}
