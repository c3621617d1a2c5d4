//! Realtime lifecycle events for hook-driven CRUD services.
//!
//! Wrap a registered service with [`realtime_wrapper`](beacon_realtime::realtime_wrapper)
//! and every successful mutating call is republished on the service's
//! [`EventBus`](beacon_service::EventBus) with the same value the caller receives.

pub use beacon_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use beacon_internal::prelude::*;
}
