//! The core [`Service`] trait for CRUD-style resources.

use async_trait::async_trait;
use serde_json::Value;

use crate::call::{Id, Params, ServiceCall};
use crate::error::{ServiceError, ServiceResult};
use crate::method::{Method, MethodSet};

/// A resource collection exposing some subset of the six CRUD operations.
///
/// Implementors declare what they support through [`methods`](Service::methods)
/// and override the matching operations. Unsupported operations fall back to
/// [`ServiceError::MethodNotAllowed`].
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use beacon_service::{Method, MethodSet, Params, Service, ServiceResult};
/// use serde_json::Value;
///
/// struct Echo;
///
/// #[async_trait]
/// impl Service for Echo {
///     fn methods(&self) -> MethodSet {
///         MethodSet::from([Method::Create])
///     }
///
///     async fn create(&self, data: Value, _params: Params) -> ServiceResult {
///         Ok(data)
///     }
/// }
/// ```
#[async_trait]
pub trait Service: Send + Sync + 'static {
    /// Returns the operations this service implements.
    fn methods(&self) -> MethodSet;

    /// Fetches a single record.
    async fn get(&self, _id: Id, _params: Params) -> ServiceResult {
        Err(ServiceError::method_not_allowed("", Method::Get))
    }

    /// Queries the collection.
    async fn find(&self, _params: Params) -> ServiceResult {
        Err(ServiceError::method_not_allowed("", Method::Find))
    }

    /// Creates a record.
    async fn create(&self, _data: Value, _params: Params) -> ServiceResult {
        Err(ServiceError::method_not_allowed("", Method::Create))
    }

    /// Replaces a record.
    async fn update(&self, _id: Id, _data: Value, _params: Params) -> ServiceResult {
        Err(ServiceError::method_not_allowed("", Method::Update))
    }

    /// Merges `data` into one record, or into every record matching the query.
    async fn patch(&self, _id: Option<Id>, _data: Value, _params: Params) -> ServiceResult {
        Err(ServiceError::method_not_allowed("", Method::Patch))
    }

    /// Removes one record, or every record matching the query.
    async fn remove(&self, _id: Option<Id>, _params: Params) -> ServiceResult {
        Err(ServiceError::method_not_allowed("", Method::Remove))
    }
}

/// Routes a [`ServiceCall`] to the matching operation on `service`.
///
/// This is the raw call: it runs no hooks.
pub async fn dispatch(service: &dyn Service, call: ServiceCall) -> ServiceResult {
    match call {
        ServiceCall::Get { id, params } => service.get(id, params).await,
        ServiceCall::Find { params } => service.find(params).await,
        ServiceCall::Create { data, params } => service.create(data, params).await,
        ServiceCall::Update { id, data, params } => service.update(id, data, params).await,
        ServiceCall::Patch { id, data, params } => service.patch(id, data, params).await,
        ServiceCall::Remove { id, params } => service.remove(id, params).await,
    }
}
