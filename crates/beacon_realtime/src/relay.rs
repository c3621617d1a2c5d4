//! Republishes successful operations as lifecycle events.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use beacon_service::{Method, PublishError, Publisher, ServiceError, ServiceEvent};
use futures::FutureExt;
use serde_json::Value;

use crate::config::{EmissionErrorPolicy, EmitTiming, EventMap, RealtimeConfig};

/// Maps a finished operation to its event and hands it to the publisher.
pub struct EventRelay {
    service: String,
    publisher: Arc<dyn Publisher>,
    events: EventMap,
    timing: EmitTiming,
    on_error: EmissionErrorPolicy,
}

impl core::fmt::Debug for EventRelay {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventRelay")
            .field("service", &self.service)
            .field("events", &self.events)
            .field("timing", &self.timing)
            .field("on_error", &self.on_error)
            .finish_non_exhaustive()
    }
}

impl EventRelay {
    /// Creates a relay for the named service.
    #[must_use]
    pub fn new(
        service: impl Into<String>,
        publisher: Arc<dyn Publisher>,
        config: &RealtimeConfig,
    ) -> Self {
        Self {
            service: service.into(),
            publisher,
            events: config.event_map.clone(),
            timing: config.emit_on,
            on_error: config.on_emission_error,
        }
    }

    /// Returns the event name `method` maps to.
    #[must_use]
    pub fn event_name(&self, method: Method) -> Option<&str> {
        self.events.event_for(method)
    }

    /// Emits the lifecycle event for a successful `method` call.
    ///
    /// `result` is the value returned to the caller; the event carries a copy
    /// of it. Does nothing for methods without an event name.
    ///
    /// # Errors
    ///
    /// Only under [`EmissionErrorPolicy::Propagate`] with inline timing, when
    /// the publisher fails.
    pub async fn emit(&self, method: Method, result: &Value) -> Result<(), ServiceError> {
        let Some(name) = self.event_name(method) else {
            return Ok(());
        };
        let event = ServiceEvent::new(self.service.as_str(), name, method, result.clone());

        if self.timing == EmitTiming::Background {
            if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                let publisher = Arc::clone(&self.publisher);
                let policy = match self.on_error {
                    EmissionErrorPolicy::Propagate => EmissionErrorPolicy::Log,
                    other => other,
                };
                runtime.spawn(async move {
                    let service = event.service.clone();
                    let name = event.event.clone();
                    if let Err(error) = deliver(publisher.as_ref(), event).await {
                        // Nobody is waiting on the outcome, so this cannot fail the call.
                        let _ = report(policy, &service, &name, &error);
                    }
                });
                return Ok(());
            }
            tracing::debug!(service = %self.service, "no tokio runtime, emitting inline");
        }

        let name = event.event.clone();
        match deliver(self.publisher.as_ref(), event).await {
            Ok(()) => {
                tracing::debug!(service = %self.service, %method, event = %name, "lifecycle event emitted");
                Ok(())
            }
            Err(error) => report(self.on_error, &self.service, &name, &error),
        }
    }
}

/// Publishes `event`, turning a panicking observer into [`PublishError::Panicked`].
async fn deliver(publisher: &dyn Publisher, event: ServiceEvent) -> Result<(), PublishError> {
    match AssertUnwindSafe(publisher.publish(event)).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|msg| (*msg).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            Err(PublishError::Panicked(message))
        }
    }
}

fn report(
    policy: EmissionErrorPolicy,
    service: &str,
    event: &str,
    error: &PublishError,
) -> Result<(), ServiceError> {
    match policy {
        EmissionErrorPolicy::Ignore => {
            tracing::trace!(service, event, %error, "emission failure ignored");
            Ok(())
        }
        EmissionErrorPolicy::Log => {
            tracing::warn!(service, event, %error, "failed to emit lifecycle event");
            Ok(())
        }
        EmissionErrorPolicy::Propagate => Err(ServiceError::Emission(format!("{event}: {error}"))),
    }
}
