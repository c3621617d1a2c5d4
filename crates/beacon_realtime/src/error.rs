//! Install-time errors.

use beacon_service::MethodSet;

use crate::config::ConfigError;

/// Errors returned by [`install`](crate::install::install).
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    /// No service is registered under the requested path.
    #[error("service '{0}' is not registered")]
    ServiceNotFound(String),

    /// Some of the requested methods already emit lifecycle events.
    #[error("service '{service}' already emits lifecycle events for {methods:?}")]
    AlreadyWrapped {
        /// Service path.
        service: String,
        /// The methods that were already instrumented.
        methods: MethodSet,
    },

    /// The configuration is invalid.
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}
