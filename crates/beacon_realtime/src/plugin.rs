//! Plugin form of the realtime wrapper.

use beacon_service::{App, Plugin, PluginError, normalize_path};

use crate::config::RealtimeConfig;
use crate::install::install;

/// Installs the realtime wrapper on one service when configured.
///
/// # Example
///
/// ```
/// use beacon_realtime::{RealtimeConfig, RealtimePlugin};
/// use beacon_service::{App, MemoryService, MethodSet};
///
/// let mut app = App::new();
/// app.use_service("messages", MemoryService::new()).unwrap();
/// app.configure(RealtimePlugin::new("messages", RealtimeConfig::default()))
///     .unwrap();
///
/// let messages = app.service("messages").unwrap();
/// assert_eq!(messages.realtime_methods(), MethodSet::MUTATING);
/// ```
#[derive(Debug, Clone)]
pub struct RealtimePlugin {
    service: String,
    config: RealtimeConfig,
}

impl RealtimePlugin {
    /// Creates a plugin wrapping the service at `service`.
    #[must_use]
    pub fn new(service: impl Into<String>, config: RealtimeConfig) -> Self {
        Self {
            service: service.into(),
            config,
        }
    }

    /// Returns the target service path.
    #[must_use]
    pub fn service(&self) -> &str {
        normalize_path(&self.service)
    }

    /// Returns the configuration the plugin installs with.
    #[must_use]
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }
}

impl Plugin for RealtimePlugin {
    fn name(&self) -> String {
        format!("beacon::realtime@{}", self.service())
    }

    fn build(&self, app: &mut App) -> Result<(), PluginError> {
        install(app, &self.service, self.config.clone())?;
        Ok(())
    }
}
