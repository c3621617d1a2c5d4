//! Services, hooks and events for Beacon applications.
//!
//! This crate is the host side of Beacon: the application registry that
//! realtime instrumentation attaches to.
//!
//! - [`Service`] - a resource exposing some of `get`, `find`, `create`,
//!   `update`, `patch`, `remove`
//! - [`hooks`] - named before/after/error hooks run around every call
//! - [`HookedService`] - the pipeline that runs a service through its hooks
//! - [`ServiceHandle`] - the hook-integrated entry point the app hands out
//! - [`EventBus`] / [`Publisher`] - delivery of [`ServiceEvent`]s
//! - [`App`] / [`Plugin`] - the service registry and its setup units
//! - [`MemoryService`] - an in-memory store, handy for tests
//!
//! # Example
//!
//! ```
//! use beacon_service::{App, HookScope, MemoryService, Params};
//! use serde_json::json;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let mut app = App::new();
//! app.use_service("tasks", MemoryService::new()).unwrap();
//!
//! let tasks = app.service("tasks").unwrap();
//! tasks
//!     .hooks()
//!     .after(HookScope::All, "flag", |ctx| {
//!         if let Some(result) = ctx.result_object_mut() {
//!             result.insert("seen".into(), json!(true));
//!         }
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let created = tasks.create(json!({ "text": "ship it" }), Params::default()).await.unwrap();
//! assert_eq!(created["seen"], json!(true));
//! # });
//! ```

pub mod app;
pub mod call;
pub mod error;
pub mod events;
pub mod handle;
pub mod hooked;
pub mod hooks;
pub mod memory;
pub mod method;
pub mod plugin;
pub mod service;

pub use app::{App, normalize_path};
pub use call::{Id, Params, ServiceCall};
pub use error::{AppError, PluginError, PublishError, ServiceError, ServiceResult};
pub use events::{EventBus, Publisher, ServiceEvent};
pub use handle::ServiceHandle;
pub use hooked::HookedService;
pub use hooks::{Hook, HookContext, HookRegistrationError, HookScope, HookStage, ServiceHooks};
pub use memory::MemoryService;
pub use method::{Method, MethodSet, UnknownMethod};
pub use plugin::Plugin;
pub use service::{Service, dispatch};

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::{
        App, EventBus, Hook, HookContext, HookScope, HookStage, Id, MemoryService, Method,
        MethodSet, Params, Plugin, Publisher, Service, ServiceCall, ServiceError, ServiceEvent,
        ServiceHandle, ServiceResult,
    };
}
