//! The hook-integrated entry point of a registered service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::call::{Id, Params, ServiceCall};
use crate::error::ServiceResult;
use crate::events::{EventBus, Publisher};
use crate::hooks::ServiceHooks;
use crate::method::MethodSet;

/// A service as the application exposes it: calls go through its hook chain.
///
/// [`HookedService`](crate::hooked::HookedService) is the host implementation.
/// Decorators (such as the realtime wrapper) implement this trait by
/// delegating to another handle, so a decorated service keeps the same
/// path, hooks and event bus.
#[async_trait]
pub trait ServiceHandle: Send + Sync + 'static {
    /// Returns the normalized service path.
    fn path(&self) -> &str;

    /// Returns the operations the underlying service implements.
    fn methods(&self) -> MethodSet;

    /// Returns the service's hook registry.
    fn hooks(&self) -> &ServiceHooks;

    /// Returns the service's event bus.
    fn events(&self) -> &Arc<EventBus>;

    /// Returns the publisher lifecycle events should go to.
    ///
    /// Defaults to the service's event bus.
    fn publisher(&self) -> Arc<dyn Publisher> {
        Arc::clone(self.events()) as Arc<dyn Publisher>
    }

    /// Returns the methods already instrumented with lifecycle events.
    fn realtime_methods(&self) -> MethodSet {
        MethodSet::empty()
    }

    /// Invokes an operation through the full hook chain.
    async fn invoke(&self, call: ServiceCall) -> ServiceResult;
}

impl dyn ServiceHandle {
    /// Calls `get` through the hook chain.
    pub async fn get(&self, id: impl Into<Id>, params: Params) -> ServiceResult {
        self.invoke(ServiceCall::Get {
            id: id.into(),
            params,
        })
        .await
    }

    /// Calls `find` through the hook chain.
    pub async fn find(&self, params: Params) -> ServiceResult {
        self.invoke(ServiceCall::Find { params }).await
    }

    /// Calls `create` through the hook chain.
    pub async fn create(&self, data: Value, params: Params) -> ServiceResult {
        self.invoke(ServiceCall::Create { data, params }).await
    }

    /// Calls `update` through the hook chain.
    pub async fn update(&self, id: impl Into<Id>, data: Value, params: Params) -> ServiceResult {
        self.invoke(ServiceCall::Update {
            id: id.into(),
            data,
            params,
        })
        .await
    }

    /// Calls `patch` through the hook chain.
    pub async fn patch(&self, id: Option<Id>, data: Value, params: Params) -> ServiceResult {
        self.invoke(ServiceCall::Patch { id, data, params }).await
    }

    /// Calls `remove` through the hook chain.
    pub async fn remove(&self, id: Option<Id>, params: Params) -> ServiceResult {
        self.invoke(ServiceCall::Remove { id, params }).await
    }
}
