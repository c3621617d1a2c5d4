//! Application service registry.
//!
//! The [`App`] maps normalized paths to [`ServiceHandle`]s. Setup
//! (registering services, configuring plugins, decorating services) takes
//! `&mut App`; once assembled the app is typically shared behind an [`Arc`]
//! and only read.

use std::sync::Arc;

use hashbrown::HashSet;
use indexmap::IndexMap;

use crate::call::ServiceCall;
use crate::error::{AppError, ServiceError, ServiceResult};
use crate::handle::ServiceHandle;
use crate::hooked::HookedService;
use crate::plugin::Plugin;
use crate::service::Service;

/// Strips leading and trailing slashes from a service path.
#[must_use]
pub fn normalize_path(path: &str) -> &str {
    path.trim_matches('/')
}

/// Registry of the application's services.
#[derive(Default)]
pub struct App {
    services: IndexMap<String, Arc<dyn ServiceHandle>>,
    plugins: HashSet<String>,
}

impl core::fmt::Debug for App {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("App")
            .field("services", &self.paths())
            .field("plugins", &self.plugins)
            .finish()
    }
}

impl App {
    /// Creates an empty application.
    #[must_use]
    pub fn new() -> Self {
        Self {
            services: IndexMap::new(),
            plugins: HashSet::new(),
        }
    }

    /// Registers `service` under `path` with an empty hook chain.
    ///
    /// # Errors
    ///
    /// Fails if the path is empty or already taken.
    pub fn use_service(
        &mut self,
        path: &str,
        service: impl Service,
    ) -> Result<&mut Self, AppError> {
        let path = normalize_path(path);
        if path.is_empty() {
            return Err(AppError::InvalidPath(path.to_string()));
        }
        if self.services.contains_key(path) {
            return Err(AppError::DuplicateService(path.to_string()));
        }

        let methods = service.methods();
        tracing::debug!(service = path, ?methods, "registered service");
        self.services
            .insert(path.to_string(), Arc::new(HookedService::new(path, service)));
        Ok(self)
    }

    /// Looks up the service registered under `path`.
    #[must_use]
    pub fn service(&self, path: &str) -> Option<Arc<dyn ServiceHandle>> {
        self.services.get(normalize_path(path)).cloned()
    }

    /// Returns whether a service is registered under `path`.
    #[must_use]
    pub fn has_service(&self, path: &str) -> bool {
        self.services.contains_key(normalize_path(path))
    }

    /// Returns the registered paths in registration order.
    #[must_use]
    pub fn paths(&self) -> Vec<&str> {
        self.services.keys().map(String::as_str).collect()
    }

    /// Replaces the handle registered under `handle.path()`.
    ///
    /// Returns the previous handle, or `None` (and registers nothing) if the
    /// path was not registered. Handles cloned out of the app before the
    /// replacement keep pointing at the previous handle.
    pub fn replace_service(
        &mut self,
        handle: Arc<dyn ServiceHandle>,
    ) -> Option<Arc<dyn ServiceHandle>> {
        let slot = self.services.get_mut(handle.path())?;
        Some(core::mem::replace(slot, handle))
    }

    /// Applies a plugin.
    ///
    /// # Errors
    ///
    /// Fails if a plugin with the same name was already configured, or if the
    /// plugin itself fails.
    pub fn configure<P: Plugin>(&mut self, plugin: P) -> Result<&mut Self, AppError> {
        let name = plugin.name();
        if self.plugins.contains(&name) {
            return Err(AppError::DuplicatePlugin(name));
        }

        plugin
            .build(self)
            .map_err(|source| AppError::Plugin {
                name: name.clone(),
                source,
            })?;

        tracing::debug!(plugin = %name, "configured plugin");
        self.plugins.insert(name);
        Ok(self)
    }

    /// Routes `call` to the service at `path`, the way a transport would.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for unknown paths, otherwise
    /// whatever the service's hook chain returns.
    pub async fn dispatch(&self, path: &str, call: ServiceCall) -> ServiceResult {
        let service = self
            .service(path)
            .ok_or_else(|| ServiceError::not_found(format!("service '{}'", normalize_path(path))))?;
        service.invoke(call).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::Params;
    use crate::memory::MemoryService;
    use serde_json::json;

    #[test]
    fn paths_are_normalized() {
        let mut app = App::new();
        app.use_service("/tasks/", MemoryService::new()).unwrap();

        assert!(app.has_service("tasks"));
        assert!(app.has_service("/tasks"));
        assert_eq!(app.service("tasks/").unwrap().path(), "tasks");
        assert_eq!(app.paths(), vec!["tasks"]);
    }

    #[test]
    fn duplicate_and_empty_paths_are_rejected() {
        let mut app = App::new();
        app.use_service("tasks", MemoryService::new()).unwrap();

        assert!(matches!(
            app.use_service("/tasks", MemoryService::new()),
            Err(AppError::DuplicateService(path)) if path == "tasks"
        ));
        assert!(matches!(
            app.use_service("//", MemoryService::new()),
            Err(AppError::InvalidPath(_))
        ));
    }

    #[test]
    fn replace_requires_existing_path() {
        let mut app = App::new();
        let orphan: Arc<dyn ServiceHandle> =
            Arc::new(HookedService::new("orphan", MemoryService::new()));
        assert!(app.replace_service(orphan).is_none());
        assert!(!app.has_service("orphan"));

        app.use_service("tasks", MemoryService::new()).unwrap();
        let original = app.service("tasks").unwrap();
        let replacement: Arc<dyn ServiceHandle> =
            Arc::new(HookedService::new("tasks", MemoryService::new()));

        let previous = app.replace_service(Arc::clone(&replacement)).unwrap();
        assert!(Arc::ptr_eq(&previous, &original));
        assert!(Arc::ptr_eq(&app.service("tasks").unwrap(), &replacement));
    }

    struct Tasks;

    impl Plugin for Tasks {
        fn build(&self, app: &mut App) -> Result<(), crate::error::PluginError> {
            app.use_service("tasks", MemoryService::new())?;
            Ok(())
        }
    }

    #[test]
    fn plugins_are_configured_once() {
        let mut app = App::new();
        app.configure(Tasks).unwrap();
        assert!(app.has_service("tasks"));

        assert!(matches!(
            app.configure(Tasks),
            Err(AppError::DuplicatePlugin(_))
        ));
    }

    struct Failing;

    impl Plugin for Failing {
        fn name(&self) -> String {
            "failing".to_string()
        }

        fn build(&self, app: &mut App) -> Result<(), crate::error::PluginError> {
            app.use_service("", MemoryService::new())?;
            Ok(())
        }
    }

    #[test]
    fn plugin_failures_carry_the_plugin_name() {
        let mut app = App::new();
        let err = app.configure(Failing).unwrap_err();
        assert!(matches!(&err, AppError::Plugin { name, .. } if name == "failing"));

        // A failed plugin may be retried.
        assert!(matches!(
            app.configure(Failing),
            Err(AppError::Plugin { .. })
        ));
    }

    #[tokio::test]
    async fn dispatch_routes_to_the_service() {
        let mut app = App::new();
        app.use_service("tasks", MemoryService::new()).unwrap();

        let created = app
            .dispatch(
                "/tasks",
                ServiceCall::Create {
                    data: json!({ "text": "write docs" }),
                    params: Params::from_provider("rest"),
                },
            )
            .await
            .unwrap();
        assert_eq!(created, json!({ "id": 0, "text": "write docs" }));

        let missing = app
            .dispatch("users", ServiceCall::Find { params: Params::default() })
            .await;
        assert_eq!(missing, Err(ServiceError::not_found("service 'users'")));
    }
}
