//! Arguments of a single service operation.

use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::method::Method;

/// Record identifier, either numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// Numeric id, as produced by auto-incrementing stores.
    Number(u64),
    /// Textual id.
    String(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{n}"),
            Id::String(s) => f.write_str(s),
        }
    }
}

impl From<u64> for Id {
    fn from(value: u64) -> Self {
        Id::Number(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::String(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id::String(value)
    }
}

impl From<Id> for Value {
    fn from(id: Id) -> Self {
        match id {
            Id::Number(n) => Value::from(n),
            Id::String(s) => Value::String(s),
        }
    }
}

/// Per-call parameters passed alongside the data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// Query fields; stores interpret them as equality filters.
    #[serde(default)]
    pub query: Map<String, Value>,
    /// The transport that issued the call (e.g. `"rest"`), `None` for internal calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Free-form values hooks may use to pass data along the chain.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl Params {
    /// Creates params for a call issued by the given transport.
    #[must_use]
    pub fn from_provider(provider: impl Into<String>) -> Self {
        Self {
            provider: Some(provider.into()),
            ..Self::default()
        }
    }

    /// Adds a query field.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }
}

/// One operation and its arguments, exactly as the caller issued them.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceCall {
    /// `get(id, params)`
    Get {
        /// Record id.
        id: Id,
        /// Call parameters.
        params: Params,
    },
    /// `find(params)`
    Find {
        /// Call parameters.
        params: Params,
    },
    /// `create(data, params)`
    Create {
        /// Record to create.
        data: Value,
        /// Call parameters.
        params: Params,
    },
    /// `update(id, data, params)`
    Update {
        /// Record id.
        id: Id,
        /// Replacement record.
        data: Value,
        /// Call parameters.
        params: Params,
    },
    /// `patch(id?, data, params)`; `None` patches every record matching the query.
    Patch {
        /// Record id, or `None` for a multi-record patch.
        id: Option<Id>,
        /// Fields to merge.
        data: Value,
        /// Call parameters.
        params: Params,
    },
    /// `remove(id?, params)`; `None` removes every record matching the query.
    Remove {
        /// Record id, or `None` for a multi-record removal.
        id: Option<Id>,
        /// Call parameters.
        params: Params,
    },
}

impl ServiceCall {
    /// Returns the operation this call invokes.
    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            ServiceCall::Get { .. } => Method::Get,
            ServiceCall::Find { .. } => Method::Find,
            ServiceCall::Create { .. } => Method::Create,
            ServiceCall::Update { .. } => Method::Update,
            ServiceCall::Patch { .. } => Method::Patch,
            ServiceCall::Remove { .. } => Method::Remove,
        }
    }

    /// Returns the record id, if the call carries one.
    #[must_use]
    pub fn id(&self) -> Option<&Id> {
        match self {
            ServiceCall::Get { id, .. } | ServiceCall::Update { id, .. } => Some(id),
            ServiceCall::Patch { id, .. } | ServiceCall::Remove { id, .. } => id.as_ref(),
            ServiceCall::Find { .. } | ServiceCall::Create { .. } => None,
        }
    }

    /// Returns the call data, if the call carries any.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        match self {
            ServiceCall::Create { data, .. }
            | ServiceCall::Update { data, .. }
            | ServiceCall::Patch { data, .. } => Some(data),
            ServiceCall::Get { .. } | ServiceCall::Find { .. } | ServiceCall::Remove { .. } => None,
        }
    }

    /// Returns mutable access to the call data, if the call carries any.
    pub fn data_mut(&mut self) -> Option<&mut Value> {
        match self {
            ServiceCall::Create { data, .. }
            | ServiceCall::Update { data, .. }
            | ServiceCall::Patch { data, .. } => Some(data),
            ServiceCall::Get { .. } | ServiceCall::Find { .. } | ServiceCall::Remove { .. } => None,
        }
    }

    /// Returns the call parameters.
    #[must_use]
    pub fn params(&self) -> &Params {
        match self {
            ServiceCall::Get { params, .. }
            | ServiceCall::Find { params }
            | ServiceCall::Create { params, .. }
            | ServiceCall::Update { params, .. }
            | ServiceCall::Patch { params, .. }
            | ServiceCall::Remove { params, .. } => params,
        }
    }

    /// Returns mutable access to the call parameters.
    pub fn params_mut(&mut self) -> &mut Params {
        match self {
            ServiceCall::Get { params, .. }
            | ServiceCall::Find { params }
            | ServiceCall::Create { params, .. }
            | ServiceCall::Update { params, .. }
            | ServiceCall::Patch { params, .. }
            | ServiceCall::Remove { params, .. } => params,
        }
    }
}
