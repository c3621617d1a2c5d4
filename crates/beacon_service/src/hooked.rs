//! The host hook pipeline.

use std::sync::Arc;

use async_trait::async_trait;

use crate::call::ServiceCall;
use crate::error::{ServiceError, ServiceResult};
use crate::events::EventBus;
use crate::handle::ServiceHandle;
use crate::hooks::{HookContext, HookStage, ServiceHooks};
use crate::method::MethodSet;
use crate::service::{Service, dispatch};

/// A [`Service`] together with its hook registry and event bus.
///
/// [`invoke`](ServiceHandle::invoke) is the only way to reach the inner
/// service from the application, so every call runs the full chain.
pub struct HookedService {
    path: String,
    service: Arc<dyn Service>,
    hooks: ServiceHooks,
    events: Arc<EventBus>,
}

impl core::fmt::Debug for HookedService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HookedService")
            .field("path", &self.path)
            .field("methods", &self.service.methods())
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

impl HookedService {
    /// Wraps `service` with an empty hook registry and a fresh event bus.
    #[must_use]
    pub fn new(path: impl Into<String>, service: impl Service) -> Self {
        Self::from_arc(path, Arc::new(service))
    }

    /// Like [`new`](Self::new) for an already shared service.
    #[must_use]
    pub fn from_arc(path: impl Into<String>, service: Arc<dyn Service>) -> Self {
        let path = path.into();
        Self {
            events: Arc::new(EventBus::new(path.clone())),
            path,
            service,
            hooks: ServiceHooks::new(),
        }
    }

    async fn run_success_path(&self, ctx: &mut HookContext) -> Result<(), ServiceError> {
        self.hooks.run(HookStage::Before, ctx).await?;

        if ctx.result.is_none() {
            let result = dispatch(self.service.as_ref(), ctx.call().clone()).await?;
            ctx.result = Some(result);
        } else {
            tracing::debug!(service = %self.path, method = %ctx.method(), "before hook supplied result");
        }

        self.hooks.run(HookStage::After, ctx).await
    }
}

#[async_trait]
impl ServiceHandle for HookedService {
    fn path(&self) -> &str {
        &self.path
    }

    fn methods(&self) -> MethodSet {
        self.service.methods()
    }

    fn hooks(&self) -> &ServiceHooks {
        &self.hooks
    }

    fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    async fn invoke(&self, call: ServiceCall) -> ServiceResult {
        let method = call.method();
        if !self.service.methods().contains(method) {
            return Err(ServiceError::method_not_allowed(&self.path, method));
        }

        let mut ctx = HookContext::new(self.path.clone(), call);
        match self.run_success_path(&mut ctx).await {
            Ok(()) => Ok(ctx.result.take().unwrap_or_default()),
            Err(error) => {
                tracing::debug!(service = %self.path, %method, %error, "call failed, running error hooks");
                ctx.error = Some(error.clone());
                if let Err(replaced) = self.hooks.run(HookStage::Error, &mut ctx).await {
                    ctx.error = Some(replaced);
                }
                Err(ctx.error.take().unwrap_or(error))
            }
        }
    }
}
