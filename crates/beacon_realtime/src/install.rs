//! Installing the realtime wrapper on a registered service.

use std::sync::Arc;

use beacon_service::{App, MethodSet, ServiceHandle};

use crate::config::RealtimeConfig;
use crate::error::InstallError;
use crate::interceptor::RealtimeService;
use crate::registry::resolve;
use crate::relay::EventRelay;

/// Returns the methods an installation on `handle` would instrument: those
/// requested, implemented by the service, and mapped to an event name.
#[must_use]
pub fn effective_methods(handle: &dyn ServiceHandle, config: &RealtimeConfig) -> MethodSet {
    config
        .methods
        .intersection(handle.methods())
        .intersection(config.event_map.emitting())
}

/// Wraps the service registered under `service_name` so that every
/// successful call to an instrumented method emits a lifecycle event.
///
/// The wrapper replaces the registry entry in place. It keeps the service's
/// path, hooks and event bus, so hooks registered before or after the install
/// run as usual and the emitted payload is the final, post-hook result.
/// Handles looked up before the install keep calling the unwrapped service.
///
/// Installing on a service for which no requested method is both implemented
/// and event-mapped is a no-op.
///
/// # Errors
///
/// - [`InstallError::InvalidConfig`] if the configuration fails validation
/// - [`InstallError::ServiceNotFound`] if nothing is registered there
/// - [`InstallError::AlreadyWrapped`] if a previous install already emits for
///   one of the methods this one would instrument
pub fn install(app: &mut App, service_name: &str, config: RealtimeConfig) -> Result<(), InstallError> {
    config.validate()?;
    let handle = resolve(app, service_name)?;

    let methods = effective_methods(handle.as_ref(), &config);
    let overlap = methods.intersection(handle.realtime_methods());
    if !overlap.is_empty() {
        return Err(InstallError::AlreadyWrapped {
            service: handle.path().to_string(),
            methods: overlap,
        });
    }

    if methods.is_empty() {
        tracing::debug!(
            service = handle.path(),
            requested = ?config.methods,
            "no method to instrument, realtime wrapper not installed"
        );
        return Ok(());
    }

    let publisher = config
        .publisher()
        .cloned()
        .unwrap_or_else(|| handle.publisher());
    let relay = EventRelay::new(handle.path(), publisher, &config);
    let wrapped = RealtimeService::new(Arc::clone(&handle), relay, methods);

    tracing::info!(
        service = handle.path(),
        ?methods,
        emit_on = ?config.emit_on,
        "realtime wrapper installed"
    );
    app.replace_service(Arc::new(wrapped));
    Ok(())
}

/// Alias of [`install`].
///
/// # Errors
///
/// See [`install`].
pub fn realtime_wrapper(
    app: &mut App,
    service_name: &str,
    config: RealtimeConfig,
) -> Result<(), InstallError> {
    install(app, service_name, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_service::{MemoryService, Method, Params, Service, ServiceResult};
    use serde_json::{Value, json};

    struct ReadOnly;

    #[async_trait::async_trait]
    impl Service for ReadOnly {
        fn methods(&self) -> MethodSet {
            MethodSet::from([Method::Get, Method::Find])
        }

        async fn find(&self, _params: Params) -> ServiceResult {
            Ok(Value::Array(Vec::new()))
        }
    }

    #[test]
    fn effective_set_requires_support_and_an_event_name() {
        let mut app = App::new();
        app.use_service("tasks", MemoryService::new()).unwrap();
        let handle = app.service("tasks").unwrap();

        let config = RealtimeConfig::default().with_methods([Method::Create, Method::Get]);
        assert_eq!(
            effective_methods(handle.as_ref(), &config),
            MethodSet::from([Method::Create])
        );

        let config = config.with_event(Method::Get, "fetched");
        assert_eq!(
            effective_methods(handle.as_ref(), &config),
            MethodSet::from([Method::Create, Method::Get])
        );
    }

    #[test]
    fn installing_on_a_read_only_service_is_a_no_op() {
        let mut app = App::new();
        app.use_service("reports", ReadOnly).unwrap();
        let before = app.service("reports").unwrap();

        install(&mut app, "reports", RealtimeConfig::default()).unwrap();

        let after = app.service("reports").unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert!(after.realtime_methods().is_empty());
    }

    #[test]
    fn install_replaces_the_registry_entry() {
        let mut app = App::new();
        app.use_service("tasks", MemoryService::new()).unwrap();

        realtime_wrapper(&mut app, "/tasks", RealtimeConfig::default()).unwrap();

        let handle = app.service("tasks").unwrap();
        assert_eq!(handle.path(), "tasks");
        assert_eq!(handle.realtime_methods(), MethodSet::MUTATING);
    }

    #[test]
    fn invalid_config_is_rejected_before_lookup() {
        let mut app = App::new();
        let config = RealtimeConfig::default().with_event(Method::Create, "");

        assert!(matches!(
            install(&mut app, "missing", config),
            Err(InstallError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn overlapping_reinstall_is_rejected() {
        let mut app = App::new();
        app.use_service("tasks", MemoryService::new()).unwrap();
        install(&mut app, "tasks", RealtimeConfig::default().with_methods([Method::Create])).unwrap();

        let err = install(&mut app, "tasks", RealtimeConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            InstallError::AlreadyWrapped { ref service, methods }
                if service == "tasks" && methods == MethodSet::from([Method::Create])
        ));

        let created = app
            .service("tasks")
            .unwrap()
            .create(json!({ "n": 1 }), Params::default())
            .await
            .unwrap();
        assert_eq!(created["n"], json!(1));
    }
}
