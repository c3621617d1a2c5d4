//! Before/after/error hooks around service operations.
//!
//! Every registered service owns a [`ServiceHooks`] registry. The
//! [`HookedService`](crate::hooked::HookedService) pipeline runs it around
//! each call:
//!
//! 1. `before` hooks, which may rewrite the arguments or short-circuit by
//!    setting a result
//! 2. the service operation itself, unless a result is already set
//! 3. `after` hooks, which may reshape the result
//! 4. on any failure, `error` hooks, which may replace the error
//!
//! Error hooks cannot turn a failure back into a success.

pub mod api;
pub mod context;

pub use api::{Hook, HookRegistrationError, ServiceHooks};
pub use context::{HookContext, HookScope, HookStage};
