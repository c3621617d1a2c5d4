//! Shared services and publishers for `beacon_realtime` integration tests.

#![allow(
    dead_code,
    missing_docs,
    reason = "shared test utilities, not all items used in every test binary"
)]

use async_trait::async_trait;
use beacon_service::{
    App, Id, Method, MethodSet, Params, PublishError, Publisher, Service, ServiceError,
    ServiceEvent, ServiceHandle, ServiceResult,
};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ═══════════════════════════════════════════════════════════════════════════════
// SERVICES
// ═══════════════════════════════════════════════════════════════════════════════

/// Echo service implementing `get` and `create` only.
///
/// `get` returns `{ id, get: "ok" }`; `create` returns the data with
/// `create: "ok"` added.
pub struct CodeService;

#[async_trait]
impl Service for CodeService {
    fn methods(&self) -> MethodSet {
        MethodSet::from([Method::Get, Method::Create])
    }

    async fn get(&self, id: Id, _params: Params) -> ServiceResult {
        Ok(json!({ "id": Value::from(id), "get": "ok" }))
    }

    async fn create(&self, mut data: Value, _params: Params) -> ServiceResult {
        if let Some(map) = data.as_object_mut() {
            map.insert("create".into(), json!("ok"));
        }
        Ok(data)
    }
}

/// Service counting how often its `create` runs.
pub struct CountingService {
    pub calls: Arc<AtomicUsize>,
}

impl CountingService {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

#[async_trait]
impl Service for CountingService {
    fn methods(&self) -> MethodSet {
        MethodSet::from([Method::Create])
    }

    async fn create(&self, data: Value, _params: Params) -> ServiceResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(data)
    }
}

/// Registers before and after hooks on `create` that count their runs.
///
/// Returns `(before, after)` counters.
pub fn counting_hooks(handle: &Arc<dyn ServiceHandle>) -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let before = Arc::new(AtomicUsize::new(0));
    let after = Arc::new(AtomicUsize::new(0));
    let (b, a) = (Arc::clone(&before), Arc::clone(&after));
    handle
        .hooks()
        .before(Method::Create, "count-before", move |_| {
            b.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .unwrap()
        .after(Method::Create, "count-after", move |_| {
            a.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .unwrap();
    (before, after)
}

/// Service whose every mutation fails.
pub struct FailingService;

#[async_trait]
impl Service for FailingService {
    fn methods(&self) -> MethodSet {
        MethodSet::ALL
    }

    async fn create(&self, _data: Value, _params: Params) -> ServiceResult {
        Err(ServiceError::general("database unavailable"))
    }

    async fn remove(&self, _id: Option<Id>, _params: Params) -> ServiceResult {
        Err(ServiceError::general("database unavailable"))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PUBLISHERS AND LISTENERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Publisher recording every event it is handed.
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<ServiceEvent>>,
    fail: bool,
}

impl RecordingPublisher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A publisher that rejects every event.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn events(&self) -> Vec<ServiceEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|event| event.event.clone())
            .collect()
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, event: ServiceEvent) -> Result<(), PublishError> {
        if self.fail {
            return Err(PublishError::Delivery("transport down".into()));
        }
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

/// Payloads received by a listener on the service's event bus.
pub type Received = Arc<Mutex<Vec<Value>>>;

/// Registers a listener for `event` that records payloads.
pub fn listen(handle: &Arc<dyn ServiceHandle>, event: &str) -> Received {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    handle.events().on(event, move |e| {
        sink.lock().unwrap().push(e.payload.clone());
    });
    received
}

// ═══════════════════════════════════════════════════════════════════════════════
// APP SETUP
// ═══════════════════════════════════════════════════════════════════════════════

/// Creates an app with a [`CodeService`] registered at `code`.
pub fn code_app() -> App {
    let mut app = App::new();
    app.use_service("code", CodeService).unwrap();
    app
}
