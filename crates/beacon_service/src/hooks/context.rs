//! The mutable context handed to every hook.

use core::fmt;

use serde_json::Value;

use crate::call::{Params, ServiceCall};
use crate::error::ServiceError;
use crate::method::Method;

/// Point of the pipeline at which a hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookStage {
    /// Before the service operation. May rewrite arguments or short-circuit
    /// by setting [`HookContext::result`].
    Before,
    /// After a successful operation. May reshape [`HookContext::result`].
    After,
    /// After any failure in the before/call/after stages. May replace
    /// [`HookContext::error`].
    Error,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HookStage::Before => "before",
            HookStage::After => "after",
            HookStage::Error => "error",
        })
    }
}

/// Methods a hook applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookScope {
    /// Every method of the service.
    All,
    /// A single method.
    Method(Method),
}

impl From<Method> for HookScope {
    fn from(method: Method) -> Self {
        HookScope::Method(method)
    }
}

/// State of one call as it moves through the hook chain.
#[derive(Debug)]
pub struct HookContext {
    /// Path of the service being called.
    pub service: String,
    /// Current stage.
    pub stage: HookStage,
    call: ServiceCall,
    /// The operation result. Set by the service call, or by a before hook
    /// to skip it; after hooks may replace or mutate it.
    pub result: Option<Value>,
    /// The failure being handled during the error stage.
    pub error: Option<ServiceError>,
}

impl HookContext {
    /// Creates a context for a call entering the before stage.
    #[must_use]
    pub fn new(service: impl Into<String>, call: ServiceCall) -> Self {
        Self {
            service: service.into(),
            stage: HookStage::Before,
            call,
            result: None,
            error: None,
        }
    }

    /// Returns the method being called.
    #[must_use]
    pub fn method(&self) -> Method {
        self.call.method()
    }

    /// Returns the call arguments.
    #[must_use]
    pub fn call(&self) -> &ServiceCall {
        &self.call
    }

    /// Returns the call data for mutation, if the method carries data.
    pub fn data_mut(&mut self) -> Option<&mut Value> {
        self.call.data_mut()
    }

    /// Returns the call parameters for mutation.
    pub fn params_mut(&mut self) -> &mut Params {
        self.call.params_mut()
    }

    /// Returns mutable access to the result as a JSON object, if it is one.
    pub fn result_object_mut(&mut self) -> Option<&mut serde_json::Map<String, Value>> {
        self.result.as_mut().and_then(Value::as_object_mut)
    }
}
