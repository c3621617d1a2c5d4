//! Hook registration and execution for a single service.
//!
//! [`ServiceHooks`] stores named hooks per (stage, scope) pair. At call time
//! the pipeline asks for the hooks of one stage and method: `all`-scoped hooks
//! run first, then method-scoped ones, each group in registration order.
//!
//! # Example
//!
//! ```
//! use beacon_service::hooks::{HookScope, ServiceHooks};
//!
//! let hooks = ServiceHooks::new();
//! hooks
//!     .after(HookScope::All, "stamp", |ctx| {
//!         if let Some(result) = ctx.result_object_mut() {
//!             result.insert("stamped".into(), true.into());
//!         }
//!         Ok(())
//!     })
//!     .unwrap();
//! ```

use core::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use hashbrown::HashMap;
use parking_lot::RwLock;

use super::context::{HookContext, HookScope, HookStage};
use crate::error::ServiceError;
use crate::method::Method;

// ─────────────────────────────────────────────────────────────────────────────
// Hook
// ─────────────────────────────────────────────────────────────────────────────

/// An asynchronous hook.
///
/// Synchronous closures can be registered directly through
/// [`ServiceHooks::register`]; implement this trait for hooks that need to
/// await.
#[async_trait]
pub trait Hook: Send + Sync + 'static {
    /// Runs the hook. Returning an error moves the call to the error stage.
    async fn run(&self, ctx: &mut HookContext) -> Result<(), ServiceError>;
}

/// Adapter for synchronous closures.
struct FnHook<F>(F);

#[async_trait]
impl<F> Hook for FnHook<F>
where
    F: Fn(&mut HookContext) -> Result<(), ServiceError> + Send + Sync + 'static,
{
    async fn run(&self, ctx: &mut HookContext) -> Result<(), ServiceError> {
        (self.0)(ctx)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HookRegistrationError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during hook registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookRegistrationError {
    /// A hook with this name already exists for the stage and scope.
    DuplicateName {
        /// Stage of the duplicate.
        stage: HookStage,
        /// Scope of the duplicate.
        scope: HookScope,
        /// The duplicate hook name.
        name: String,
    },
}

impl fmt::Display for HookRegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookRegistrationError::DuplicateName { stage, scope, name } => {
                let scope = match scope {
                    HookScope::All => "all",
                    HookScope::Method(method) => method.as_str(),
                };
                write!(f, "hook '{}' already registered for {} {}", name, stage, scope)
            }
        }
    }
}

impl core::error::Error for HookRegistrationError {}

// ─────────────────────────────────────────────────────────────────────────────
// ServiceHooks
// ─────────────────────────────────────────────────────────────────────────────

struct HookEntry {
    name: String,
    hook: Arc<dyn Hook>,
}

/// Hook registry of one service.
///
/// Uses interior mutability so hooks can be added through a shared
/// service handle at any time; calls already in flight keep the snapshot
/// they started with.
#[derive(Default)]
pub struct ServiceHooks {
    hooks: RwLock<HashMap<(HookStage, HookScope), Vec<HookEntry>>>,
}

impl fmt::Debug for ServiceHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hooks = self.hooks.read();
        let mut map = f.debug_map();
        for (key, entries) in hooks.iter() {
            let names: Vec<&str> = entries.iter().map(|entry| entry.name.as_str()).collect();
            map.entry(key, &names);
        }
        map.finish()
    }
}

impl ServiceHooks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hooks: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a synchronous hook.
    pub fn register<F>(
        &self,
        stage: HookStage,
        scope: impl Into<HookScope>,
        name: impl Into<String>,
        hook: F,
    ) -> Result<&Self, HookRegistrationError>
    where
        F: Fn(&mut HookContext) -> Result<(), ServiceError> + Send + Sync + 'static,
    {
        self.register_hook(stage, scope, name, FnHook(hook))
    }

    /// Registers an asynchronous [`Hook`].
    pub fn register_hook(
        &self,
        stage: HookStage,
        scope: impl Into<HookScope>,
        name: impl Into<String>,
        hook: impl Hook,
    ) -> Result<&Self, HookRegistrationError> {
        let scope = scope.into();
        let name = name.into();

        let mut hooks = self.hooks.write();
        let entries = hooks.entry((stage, scope)).or_default();

        if entries.iter().any(|entry| entry.name == name) {
            return Err(HookRegistrationError::DuplicateName { stage, scope, name });
        }

        tracing::debug!(%stage, ?scope, hook = %name, "registered hook");
        entries.push(HookEntry {
            name,
            hook: Arc::new(hook),
        });
        Ok(self)
    }

    /// Registers a synchronous before hook.
    pub fn before<F>(
        &self,
        scope: impl Into<HookScope>,
        name: impl Into<String>,
        hook: F,
    ) -> Result<&Self, HookRegistrationError>
    where
        F: Fn(&mut HookContext) -> Result<(), ServiceError> + Send + Sync + 'static,
    {
        self.register(HookStage::Before, scope, name, hook)
    }

    /// Registers a synchronous after hook.
    pub fn after<F>(
        &self,
        scope: impl Into<HookScope>,
        name: impl Into<String>,
        hook: F,
    ) -> Result<&Self, HookRegistrationError>
    where
        F: Fn(&mut HookContext) -> Result<(), ServiceError> + Send + Sync + 'static,
    {
        self.register(HookStage::After, scope, name, hook)
    }

    /// Registers a synchronous error hook.
    pub fn error<F>(
        &self,
        scope: impl Into<HookScope>,
        name: impl Into<String>,
        hook: F,
    ) -> Result<&Self, HookRegistrationError>
    where
        F: Fn(&mut HookContext) -> Result<(), ServiceError> + Send + Sync + 'static,
    {
        self.register(HookStage::Error, scope, name, hook)
    }

    /// Returns the hooks of `stage` that apply to `method`, in execution order.
    fn chain(&self, stage: HookStage, method: Method) -> Vec<Arc<dyn Hook>> {
        let hooks = self.hooks.read();
        [HookScope::All, HookScope::Method(method)]
            .iter()
            .filter_map(|scope| hooks.get(&(stage, *scope)))
            .flatten()
            .map(|entry| Arc::clone(&entry.hook))
            .collect()
    }

    /// Runs every hook of `stage` for the context's method.
    ///
    /// Stops at the first hook that fails and returns its error.
    pub async fn run(&self, stage: HookStage, ctx: &mut HookContext) -> Result<(), ServiceError> {
        ctx.stage = stage;
        for hook in self.chain(stage, ctx.method()) {
            hook.run(ctx).await?;
        }
        Ok(())
    }

    /// Returns the number of hooks registered for the stage and scope.
    #[must_use]
    pub fn hook_count(&self, stage: HookStage, scope: impl Into<HookScope>) -> usize {
        let hooks = self.hooks.read();
        hooks.get(&(stage, scope.into())).map_or(0, Vec::len)
    }

    /// Checks if a hook with the given name exists for the stage and scope.
    #[must_use]
    pub fn contains_hook(&self, stage: HookStage, scope: impl Into<HookScope>, name: &str) -> bool {
        let hooks = self.hooks.read();
        hooks
            .get(&(stage, scope.into()))
            .is_some_and(|entries| entries.iter().any(|entry| entry.name == name))
    }
}
