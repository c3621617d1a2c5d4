//! Service lifecycle events and their delivery.
//!
//! A [`Publisher`] is the only capability the realtime layer needs: hand it a
//! [`ServiceEvent`] and it delivers it somewhere. [`EventBus`] is the default
//! per-service publisher. It supports two kinds of observers:
//!
//! - named synchronous listeners registered with [`EventBus::on`], run in
//!   registration order during [`publish`](Publisher::publish)
//! - async subscribers receiving every event through a
//!   [`tokio::sync::broadcast`] channel via [`EventBus::subscribe`]

use core::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::PublishError;
use crate::method::Method;

/// Default capacity of the broadcast channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// A named notification about a completed service operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceEvent {
    /// Path of the service that produced the event.
    pub service: String,
    /// Event name, e.g. `created`.
    pub event: String,
    /// The operation that produced the event.
    pub method: Method,
    /// The operation's final result.
    pub payload: Value,
}

impl ServiceEvent {
    /// Creates an event.
    #[must_use]
    pub fn new(
        service: impl Into<String>,
        event: impl Into<String>,
        method: Method,
        payload: Value,
    ) -> Self {
        Self {
            service: service.into(),
            event: event.into(),
            method,
            payload,
        }
    }
}

/// Capability to deliver [`ServiceEvent`]s to observers.
#[async_trait]
pub trait Publisher: Send + Sync + 'static {
    /// Publishes an event.
    async fn publish(&self, event: ServiceEvent) -> Result<(), PublishError>;
}

type Listener = Arc<dyn Fn(&ServiceEvent) + Send + Sync>;

/// In-process event bus owned by a service.
pub struct EventBus {
    service: String,
    listeners: RwLock<IndexMap<String, Vec<Listener>>>,
    sender: broadcast::Sender<ServiceEvent>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.read();
        f.debug_struct("EventBus")
            .field("service", &self.service)
            .field("events", &listeners.keys().collect::<Vec<_>>())
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}

impl EventBus {
    /// Creates a bus for the named service with the default capacity.
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self::with_capacity(service, DEFAULT_EVENT_CAPACITY)
    }

    /// Creates a bus whose broadcast channel buffers `capacity` events per
    /// lagging subscriber.
    #[must_use]
    pub fn with_capacity(service: impl Into<String>, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            service: service.into(),
            listeners: RwLock::new(IndexMap::new()),
            sender,
        }
    }

    /// Registers a listener for the named event.
    pub fn on<F>(&self, event: impl Into<String>, listener: F) -> &Self
    where
        F: Fn(&ServiceEvent) + Send + Sync + 'static,
    {
        self.listeners
            .write()
            .entry(event.into())
            .or_default()
            .push(Arc::new(listener));
        self
    }

    /// Returns the number of listeners registered for the named event.
    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.read().get(event).map_or(0, Vec::len)
    }

    /// Subscribes to every event published on this bus.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ServiceEvent> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl Publisher for EventBus {
    async fn publish(&self, event: ServiceEvent) -> Result<(), PublishError> {
        let listeners: Vec<Listener> = self
            .listeners
            .read()
            .get(&event.event)
            .cloned()
            .unwrap_or_default();

        for listener in &listeners {
            listener(&event);
        }

        // No subscribers is not a failure.
        let subscribers = self.sender.send(event).unwrap_or(0);
        tracing::trace!(
            service = %self.service,
            listeners = listeners.len(),
            subscribers,
            "event published"
        );
        Ok(())
    }
}
