//! Violations reported by policy predicates

use crate::policy::EnforcementLevel;
use serde::{Deserialize, Serialize};

/// What a violation record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A rule rejected the resource.
    Rule,
    /// The policy itself crashed while evaluating.
    Fault,
}

/// A reported rule failure.
///
/// Violations are plain values, never errors: a predicate emits zero or
/// more of them per evaluation and the engine decides what to do with the
/// aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Name of the policy that reported it.
    pub policy: String,

    /// Human-readable description of the failure.
    pub message: String,

    /// Opaque reference to the offending resource in the caller's graph.
    pub resource: Option<String>,

    pub enforcement_level: EnforcementLevel,

    pub kind: ViolationKind,
}

impl Violation {
    /// Whether the engine should halt the apply over this violation.
    pub fn blocks(&self) -> bool {
        self.enforcement_level == EnforcementLevel::Mandatory
    }
}

/// Callback handed to predicates for reporting violations.
///
/// Collects everything reported during one policy's evaluation, in call
/// order.
pub struct ViolationReporter {
    policy: String,
    enforcement_level: EnforcementLevel,
    violations: Vec<Violation>,
}

impl ViolationReporter {
    pub(crate) fn new(policy: &str, enforcement_level: EnforcementLevel) -> Self {
        Self {
            policy: policy.to_string(),
            enforcement_level,
            violations: Vec::new(),
        }
    }

    /// Report a violation.
    pub fn report(&mut self, message: impl Into<String>) {
        self.push(message.into(), None, ViolationKind::Rule);
    }

    /// Report a violation tied to a specific resource reference.
    pub fn report_for(&mut self, message: impl Into<String>, resource: impl Into<String>) {
        self.push(message.into(), Some(resource.into()), ViolationKind::Rule);
    }

    pub(crate) fn fault(&mut self, message: String) {
        self.push(message, None, ViolationKind::Fault);
    }

    fn push(&mut self, message: String, resource: Option<String>, kind: ViolationKind) {
        self.violations.push(Violation {
            policy: self.policy.clone(),
            message,
            resource,
            enforcement_level: self.enforcement_level,
            kind,
        });
    }

    pub(crate) fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}
