//! Plugin trait for extending an [`App`].
//!
//! Plugins bundle setup that touches the service registry: registering
//! services, attaching hooks, or decorating existing services.
//!
//! # Example
//!
//! ```
//! use beacon_service::{App, MemoryService, Plugin, PluginError};
//!
//! struct TasksPlugin;
//!
//! impl Plugin for TasksPlugin {
//!     fn build(&self, app: &mut App) -> Result<(), PluginError> {
//!         app.use_service("tasks", MemoryService::new())?;
//!         Ok(())
//!     }
//! }
//!
//! let mut app = App::new();
//! app.configure(TasksPlugin).unwrap();
//! assert!(app.service("tasks").is_some());
//! ```

use crate::app::App;
use crate::error::PluginError;

/// A unit of application setup.
///
/// Plugins run once, immediately, when passed to [`App::configure`]. A plugin
/// [`name`](Plugin::name) may be configured only once per application.
pub trait Plugin: Send + Sync + 'static {
    /// Returns the plugin's unique name. Defaults to the type name.
    fn name(&self) -> String {
        core::any::type_name::<Self>().to_string()
    }

    /// Applies the plugin to the application.
    fn build(&self, app: &mut App) -> Result<(), PluginError>;
}
