//! Error types for service calls, event publication and the application registry.

use crate::method::Method;

/// Error returned by a service operation or its hook chain.
///
/// The variants loosely follow the usual REST error classes so a transport
/// layer can map them to status codes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    /// The request was malformed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The caller is not allowed to perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The addressed record or service does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The service does not implement the method.
    #[error("method '{method}' is not allowed on service '{service}'")]
    MethodNotAllowed {
        /// Service path.
        service: String,
        /// The unsupported method.
        method: Method,
    },

    /// The operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Publishing the lifecycle event failed and the caller asked to be told.
    #[error("event emission failed: {0}")]
    Emission(String),

    /// Any other failure.
    #[error("{0}")]
    General(String),
}

impl ServiceError {
    /// Creates a [`BadRequest`](Self::BadRequest).
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Creates a [`NotFound`](Self::NotFound).
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Creates a [`General`](Self::General) error.
    pub fn general(msg: impl Into<String>) -> Self {
        Self::General(msg.into())
    }

    /// Creates a [`MethodNotAllowed`](Self::MethodNotAllowed).
    pub fn method_not_allowed(service: impl Into<String>, method: Method) -> Self {
        Self::MethodNotAllowed {
            service: service.into(),
            method,
        }
    }
}

/// Result of a service operation.
pub type ServiceResult = Result<serde_json::Value, ServiceError>;

/// Error returned by a [`Publisher`](crate::events::Publisher).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishError {
    /// The publisher no longer accepts events.
    #[error("publisher for '{0}' is closed")]
    Closed(String),

    /// The underlying delivery mechanism rejected the event.
    #[error("delivery failed: {0}")]
    Delivery(String),

    /// An observer panicked while the event was being delivered.
    #[error("observer panicked: {0}")]
    Panicked(String),
}

/// Boxed error returned by a failing plugin.
pub type PluginError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Errors raised while assembling an [`App`](crate::app::App).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A service is already registered under this path.
    #[error("service '{0}' is already registered")]
    DuplicateService(String),

    /// The service path is empty after normalization.
    #[error("invalid service path '{0}'")]
    InvalidPath(String),

    /// A plugin with this name has already been configured.
    #[error("plugin '{0}' is already configured")]
    DuplicatePlugin(String),

    /// A plugin failed while building.
    #[error("plugin '{name}' failed: {source}")]
    Plugin {
        /// The plugin's name.
        name: String,
        /// The underlying failure.
        #[source]
        source: PluginError,
    },
}
