//! The realtime decorator around a service handle.

use std::sync::Arc;

use async_trait::async_trait;
use beacon_service::{
    EventBus, MethodSet, Publisher, ServiceCall, ServiceHandle, ServiceHooks, ServiceResult,
};

use crate::relay::EventRelay;

/// A [`ServiceHandle`] that republishes successful calls as lifecycle events.
///
/// Every call is forwarded unchanged to the wrapped handle, which runs the
/// service's full hook chain. For instrumented methods the final, post-hook
/// result is then handed to the [`EventRelay`] before being returned
/// untouched. Failures are returned as-is and never emit.
///
/// Path, hooks and event bus belong to the wrapped handle, so hooks added
/// after wrapping still run for every caller.
pub struct RealtimeService {
    inner: Arc<dyn ServiceHandle>,
    relay: EventRelay,
    instrumented: MethodSet,
}

impl core::fmt::Debug for RealtimeService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RealtimeService")
            .field("path", &self.inner.path())
            .field("instrumented", &self.instrumented)
            .field("relay", &self.relay)
            .finish()
    }
}

impl RealtimeService {
    /// Wraps `inner`, instrumenting the given methods.
    #[must_use]
    pub fn new(inner: Arc<dyn ServiceHandle>, relay: EventRelay, instrumented: MethodSet) -> Self {
        Self {
            inner,
            relay,
            instrumented,
        }
    }
}

#[async_trait]
impl ServiceHandle for RealtimeService {
    fn path(&self) -> &str {
        self.inner.path()
    }

    fn methods(&self) -> MethodSet {
        self.inner.methods()
    }

    fn hooks(&self) -> &ServiceHooks {
        self.inner.hooks()
    }

    fn events(&self) -> &Arc<EventBus> {
        self.inner.events()
    }

    fn publisher(&self) -> Arc<dyn Publisher> {
        self.inner.publisher()
    }

    fn realtime_methods(&self) -> MethodSet {
        self.inner.realtime_methods().union(self.instrumented)
    }

    async fn invoke(&self, call: ServiceCall) -> ServiceResult {
        let method = call.method();
        if !self.instrumented.contains(method) {
            return self.inner.invoke(call).await;
        }

        let result = self.inner.invoke(call).await?;
        self.relay.emit(method, &result).await?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RealtimeConfig;
    use beacon_service::{HookScope, HookedService, Id, MemoryService, Method, Params, ServiceError};
    use serde_json::json;
    use std::sync::Mutex;

    fn wrap(instrumented: MethodSet) -> (Arc<dyn ServiceHandle>, Arc<Mutex<Vec<String>>>) {
        let inner: Arc<dyn ServiceHandle> = Arc::new(HookedService::new("tasks", MemoryService::new()));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        for event in ["created", "updated", "patched", "removed"] {
            let seen = Arc::clone(&seen_clone);
            inner.events().on(event, move |e| seen.lock().unwrap().push(e.event.clone()));
        }

        let relay = EventRelay::new("tasks", inner.publisher(), &RealtimeConfig::default());
        let wrapped: Arc<dyn ServiceHandle> =
            Arc::new(RealtimeService::new(inner, relay, instrumented));
        (wrapped, seen)
    }

    #[tokio::test]
    async fn instrumented_call_emits_once_and_returns_result() {
        let (service, seen) = wrap(MethodSet::MUTATING);

        let created = service.create(json!({ "text": "a" }), Params::default()).await.unwrap();
        assert_eq!(created, json!({ "text": "a", "id": 0 }));
        assert_eq!(*seen.lock().unwrap(), vec!["created"]);
    }

    #[tokio::test]
    async fn uninstrumented_methods_pass_through() {
        let (service, seen) = wrap(MethodSet::from([Method::Create]));

        service.create(json!({ "text": "a" }), Params::default()).await.unwrap();
        let removed = service.remove(Some(Id::from(0u64)), Params::default()).await.unwrap();

        assert_eq!(removed["text"], json!("a"));
        assert_eq!(*seen.lock().unwrap(), vec!["created"]);
    }

    #[tokio::test]
    async fn failures_propagate_without_emitting() {
        let (service, seen) = wrap(MethodSet::MUTATING);

        let result = service.remove(Some(Id::from(42u64)), Params::default()).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delegates_hooks_to_the_wrapped_handle() {
        let (service, _) = wrap(MethodSet::MUTATING);
        service
            .hooks()
            .after(HookScope::All, "late", |ctx| {
                if let Some(result) = ctx.result_object_mut() {
                    result.insert("late".into(), json!(true));
                }
                Ok(())
            })
            .unwrap();

        let created = service.create(json!({}), Params::default()).await.unwrap();
        assert_eq!(created["late"], json!(true));
        assert_eq!(service.path(), "tasks");
        assert_eq!(service.realtime_methods(), MethodSet::MUTATING);
    }
}
