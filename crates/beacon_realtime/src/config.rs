//! Realtime wrapper configuration.
//!
//! [`RealtimeConfig`] is fixed at install time. It can be built in code:
//!
//! ```
//! use beacon_realtime::{EmissionErrorPolicy, RealtimeConfig};
//! use beacon_service::{Method, MethodSet};
//!
//! let config = RealtimeConfig::default()
//!     .with_methods(MethodSet::from([Method::Create, Method::Get]))
//!     .with_event(Method::Get, "fetched")
//!     .with_emission_error_policy(EmissionErrorPolicy::Log);
//! ```
//!
//! or loaded from JSON:
//!
//! ```
//! use beacon_realtime::RealtimeConfig;
//!
//! let config = RealtimeConfig::from_json(
//!     r#"{ "methods": ["create"], "eventMap": { "create": "added" }, "onEmissionError": "log" }"#,
//! )
//! .unwrap();
//! ```

use core::fmt;
use std::sync::Arc;

use beacon_service::{Method, MethodSet, Publisher};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// ConfigError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors raised while loading or validating a [`RealtimeConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("invalid realtime configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// An event name override is empty.
    #[error("event name for method '{0}' is empty")]
    EmptyEventName(Method),
}

// ─────────────────────────────────────────────────────────────────────────────
// EventMap
// ─────────────────────────────────────────────────────────────────────────────

/// Maps methods to lifecycle event names.
///
/// Starts from the default table (`create` → `created`, `update` →
/// `updated`, `patch` → `patched`, `remove` → `removed`; reads emit nothing)
/// and applies overrides on top.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventMap {
    overrides: IndexMap<Method, String>,
}

impl EventMap {
    /// Returns the event name of the default table.
    #[must_use]
    pub fn default_event(method: Method) -> Option<&'static str> {
        match method {
            Method::Create => Some("created"),
            Method::Update => Some("updated"),
            Method::Patch => Some("patched"),
            Method::Remove => Some("removed"),
            Method::Get | Method::Find => None,
        }
    }

    /// Returns the event name for `method`, if it emits one.
    #[must_use]
    pub fn event_for(&self, method: Method) -> Option<&str> {
        self.overrides
            .get(&method)
            .map(String::as_str)
            .or_else(|| Self::default_event(method))
    }

    /// Overrides the event name of `method`.
    #[must_use]
    pub fn with(mut self, method: Method, event: impl Into<String>) -> Self {
        self.overrides.insert(method, event.into());
        self
    }

    /// Returns the methods that emit an event.
    #[must_use]
    pub fn emitting(&self) -> MethodSet {
        Method::ALL
            .into_iter()
            .filter(|method| self.event_for(*method).is_some())
            .collect()
    }

    /// Checks that no override is empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyEventName`] for the first empty override.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.overrides.iter().find(|(_, event)| event.trim().is_empty()) {
            Some((method, _)) => Err(ConfigError::EmptyEventName(*method)),
            None => Ok(()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Policies
// ─────────────────────────────────────────────────────────────────────────────

/// When an event is emitted relative to the caller receiving its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmitTiming {
    /// Emit after the hook chain finishes and before the result is returned.
    #[default]
    AfterHooks,
    /// Spawn emission on the tokio runtime and return immediately. Falls
    /// back to [`AfterHooks`](Self::AfterHooks) outside a runtime.
    Background,
}

/// What to do when the publisher fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmissionErrorPolicy {
    /// Drop the failure.
    #[default]
    Ignore,
    /// Log the failure at `warn` level.
    Log,
    /// Fail the call with [`ServiceError::Emission`](beacon_service::ServiceError::Emission).
    ///
    /// The operation itself has already succeeded; callers opting in must be
    /// prepared for that. Degrades to [`Log`](Self::Log) for background emission.
    #[serde(alias = "rethrow")]
    Propagate,
}

// ─────────────────────────────────────────────────────────────────────────────
// RealtimeConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration of one realtime wrapper installation.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RealtimeConfig {
    /// Methods to instrument. Defaults to the mutating methods.
    #[serde(default = "default_methods")]
    pub methods: MethodSet,
    /// Event name overrides.
    #[serde(default)]
    pub event_map: EventMap,
    /// Emission timing.
    #[serde(default)]
    pub emit_on: EmitTiming,
    /// Emission failure handling.
    #[serde(default)]
    pub on_emission_error: EmissionErrorPolicy,
    #[serde(skip)]
    publisher: Option<Arc<dyn Publisher>>,
}

fn default_methods() -> MethodSet {
    MethodSet::MUTATING
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            methods: default_methods(),
            event_map: EventMap::default(),
            emit_on: EmitTiming::default(),
            on_emission_error: EmissionErrorPolicy::default(),
            publisher: None,
        }
    }
}

impl fmt::Debug for RealtimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealtimeConfig")
            .field("methods", &self.methods)
            .field("event_map", &self.event_map)
            .field("emit_on", &self.emit_on)
            .field("on_emission_error", &self.on_emission_error)
            .field("custom_publisher", &self.publisher.is_some())
            .finish()
    }
}

impl RealtimeConfig {
    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, unknown keys or method names, and empty
    /// event names.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds a configuration from an already parsed JSON value.
    ///
    /// # Errors
    ///
    /// Same as [`from_json`](Self::from_json).
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the methods to instrument.
    #[must_use]
    pub fn with_methods(mut self, methods: impl Into<MethodSet>) -> Self {
        self.methods = methods.into();
        self
    }

    /// Overrides the event name of `method`.
    #[must_use]
    pub fn with_event(mut self, method: Method, event: impl Into<String>) -> Self {
        self.event_map = self.event_map.with(method, event);
        self
    }

    /// Sets the emission timing.
    #[must_use]
    pub fn with_emit_on(mut self, timing: EmitTiming) -> Self {
        self.emit_on = timing;
        self
    }

    /// Sets the emission failure policy.
    #[must_use]
    pub fn with_emission_error_policy(mut self, policy: EmissionErrorPolicy) -> Self {
        self.on_emission_error = policy;
        self
    }

    /// Publishes through `publisher` instead of the service's event bus.
    #[must_use]
    pub fn with_publisher(mut self, publisher: Arc<dyn Publisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Returns the publisher override, if any.
    #[must_use]
    pub fn publisher(&self) -> Option<&Arc<dyn Publisher>> {
        self.publisher.as_ref()
    }

    /// Checks the configuration for errors serde cannot catch.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyEventName`] for empty event names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.event_map.validate()
    }
}
