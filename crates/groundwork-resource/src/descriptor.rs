//! Resource descriptors handed to providers and policies by the engine

use crate::error::{ResourceError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fully resolved property bag of a single resource.
///
/// Values are plain JSON values (string, number, boolean, sequence,
/// mapping); nothing is deferred or pending by the time a bag reaches a
/// provider or a policy predicate.
pub type PropertyBag = serde_json::Map<String, Value>;

/// Immutable (type, property bag) pair describing a single managed unit.
///
/// The engine produces a fresh descriptor for every check or policy
/// evaluation; fields are private so nothing mutates after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    resource_type: String,
    properties: PropertyBag,
}

impl ResourceDescriptor {
    pub fn new(resource_type: impl Into<String>, properties: PropertyBag) -> Self {
        Self {
            resource_type: resource_type.into(),
            properties,
        }
    }

    /// Builder-style property insertion, for engine glue and tests.
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Namespaced type tag (e.g. "ec2:Instance").
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    /// Get a raw property value.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Get a property deserialized into a specific type.
    pub fn property_as<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.property(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// Fetch a required string property from a bag.
pub fn require_str<'a>(bag: &'a PropertyBag, key: &str) -> Result<&'a str> {
    bag.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ResourceError::InvalidInput(format!("property '{key}' must be a string")))
}

/// Fetch an optional string property from a bag.
pub fn optional_str<'a>(bag: &'a PropertyBag, key: &str) -> Option<&'a str> {
    bag.get(key).and_then(Value::as_str)
}
