//! Four-verb lifecycle contract for externally managed side effects

use crate::descriptor::PropertyBag;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A failed input validation for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        let field = field.into();
        let reason = format!("required property '{}' missing", field);
        Self { field, reason }
    }
}

/// Outcome of a `check` call: normalized inputs plus any field errors.
///
/// Field errors are data for the engine to inspect; `check` itself never
/// fails and never performs the side effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Inputs the subsequent create/update should use.
    pub inputs: PropertyBag,

    /// Validation failures, empty when the inputs are acceptable.
    pub failures: Vec<FieldError>,
}

impl CheckOutcome {
    pub fn new(inputs: PropertyBag, failures: Vec<FieldError>) -> Self {
        Self { inputs, failures }
    }

    pub fn ok(inputs: PropertyBag) -> Self {
        Self {
            inputs,
            failures: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The engine's persisted view of one externally managed side effect.
///
/// Records are passed in and returned across the engine boundary; providers
/// never cache them between calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleRecord {
    /// Opaque identity assigned by `create`, stable until `delete` and
    /// never reused afterwards.
    pub id: String,

    /// Last-applied inputs.
    pub inputs: PropertyBag,

    /// Last-observed outputs; equals `inputs` unless the side effect
    /// yielded derived data.
    pub outputs: PropertyBag,
}

impl LifecycleRecord {
    pub fn new(id: impl Into<String>, inputs: PropertyBag) -> Self {
        let outputs = inputs.clone();
        Self {
            id: id.into(),
            inputs,
            outputs,
        }
    }

    /// Graft a derived value (e.g. a remote-assigned identifier) into the
    /// outputs.
    pub fn with_output(mut self, key: impl Into<String>, value: Value) -> Self {
        self.outputs.insert(key.into(), value);
        self
    }
}

/// Report every required field absent from `proposed`.
pub fn validate_required(proposed: &PropertyBag, required: &[&str]) -> Vec<FieldError> {
    required
        .iter()
        .filter(|field| !proposed.contains_key(**field))
        .map(|field| FieldError::missing(*field))
        .collect()
}

/// Lifecycle adapter for a non-declarative side effect.
///
/// Implementations present a shell invocation or a remote API call as a
/// managed resource the orchestration engine can diff and apply. The engine
/// invokes the verbs (user code never calls them directly), owns record
/// persistence, and guarantees at most one in-flight operation per resource
/// id — so implementations hold no internal locks.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// Namespaced type tag for resources managed by this provider.
    fn resource_type(&self) -> &str;

    /// Input fields that must be present for the side effect to run.
    fn required_fields(&self) -> &[&str];

    /// Validate proposed inputs without performing the side effect.
    ///
    /// Safe to call any number of times; the engine uses it for previews
    /// and dry runs. The default implementation reports each missing
    /// required field and echoes the proposed inputs back unchanged.
    async fn check(&self, _previous: Option<&PropertyBag>, proposed: &PropertyBag) -> CheckOutcome {
        let failures = validate_required(proposed, self.required_fields());
        CheckOutcome::new(proposed.clone(), failures)
    }

    /// Perform the side effect for the first time.
    ///
    /// Returns a record with a non-empty id. On failure no record exists
    /// and the engine's tracked state is unchanged; whether to retry is the
    /// engine's decision.
    async fn create(&self, inputs: &PropertyBag) -> Result<LifecycleRecord>;

    /// Re-execute the side effect with new inputs under an existing id.
    ///
    /// Must succeed when `proposed` equals `previous`, though the side
    /// effect may still be re-issued.
    async fn update(
        &self,
        id: &str,
        previous: &PropertyBag,
        proposed: &PropertyBag,
    ) -> Result<LifecycleRecord>;

    /// Reverse the side effect.
    ///
    /// An already-absent target is success, not an error: the engine may
    /// delete again after a partial earlier failure.
    async fn delete(&self, id: &str, last_inputs: &PropertyBag) -> Result<()>;
}
