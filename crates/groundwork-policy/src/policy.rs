//! Policy model and violation aggregation

use crate::error::{PolicyError, Result};
use crate::violation::{Violation, ViolationReporter};
use groundwork_resource::ResourceDescriptor;
use serde::{Deserialize, Serialize};

/// How the engine treats a policy's violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementLevel {
    /// Violations are reported but do not block an apply.
    Advisory,
    /// Violations block the apply.
    Mandatory,
    /// The policy is skipped entirely.
    Disabled,
}

impl std::fmt::Display for EnforcementLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnforcementLevel::Advisory => write!(f, "advisory"),
            EnforcementLevel::Mandatory => write!(f, "mandatory"),
            EnforcementLevel::Disabled => write!(f, "disabled"),
        }
    }
}

/// Which resource types a policy applies to.
///
/// Filtering happens on the descriptor's type tag before any predicate
/// runs; predicates never probe property shapes to decide applicability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceFilter {
    /// Every resource type.
    Any,
    /// Exact type tags (e.g. "ec2:Instance").
    Types(Vec<String>),
    /// Tag prefix (e.g. "elasticbeanstalk:").
    TypePrefix(String),
}

impl ResourceFilter {
    pub fn matches(&self, resource_type: &str) -> bool {
        match self {
            ResourceFilter::Any => true,
            ResourceFilter::Types(types) => types.iter().any(|t| t == resource_type),
            ResourceFilter::TypePrefix(prefix) => resource_type.starts_with(prefix.as_str()),
        }
    }
}

/// A single validation rule run against a descriptor.
///
/// Rule failures go through the reporter; returning `Err` means the policy
/// itself is broken.
pub type ValidateFn =
    dyn Fn(&ResourceDescriptor, &mut ViolationReporter) -> anyhow::Result<()> + Send + Sync;

/// A named, independent rule with an enforcement level and one or more
/// predicates.
pub struct Policy {
    name: String,
    description: String,
    enforcement_level: EnforcementLevel,
    filter: ResourceFilter,
    validators: Vec<Box<ValidateFn>>,
}

impl Policy {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        enforcement_level: EnforcementLevel,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            enforcement_level,
            filter: ResourceFilter::Any,
            validators: Vec::new(),
        }
    }

    /// Restrict the policy to exact resource type tags.
    pub fn for_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter = ResourceFilter::Types(types.into_iter().map(Into::into).collect());
        self
    }

    /// Restrict the policy to a resource type prefix.
    pub fn for_type_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.filter = ResourceFilter::TypePrefix(prefix.into());
        self
    }

    /// Add a predicate; a policy may carry several, run in declaration
    /// order.
    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&ResourceDescriptor, &mut ViolationReporter) -> anyhow::Result<()>
            + Send
            + Sync
            + 'static,
    {
        self.validators.push(Box::new(f));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn enforcement_level(&self) -> EnforcementLevel {
        self.enforcement_level
    }

    pub fn filter(&self) -> &ResourceFilter {
        &self.filter
    }
}

impl std::fmt::Debug for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Policy")
            .field("name", &self.name)
            .field("enforcement_level", &self.enforcement_level)
            .field("filter", &self.filter)
            .field("validators", &self.validators.len())
            .finish()
    }
}

/// Ordered collection of policies evaluated together.
#[derive(Debug)]
pub struct PolicyPack {
    name: String,
    policies: Vec<Policy>,
}

impl PolicyPack {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            policies: Vec::new(),
        }
    }

    /// Register a policy; names are unique within a pack.
    pub fn register(&mut self, policy: Policy) -> Result<()> {
        if self.policies.iter().any(|p| p.name == policy.name) {
            return Err(PolicyError::DuplicateName(policy.name));
        }
        self.policies.push(policy);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    /// Evaluate every applicable policy against one descriptor.
    ///
    /// Violations come back in registration order, then report order
    /// within a policy; the ordering is stable and callers may rely on it.
    /// A predicate returning `Err` ends that policy's evaluation with a
    /// single `Fault` violation (anything it reported before the fault is
    /// kept) and the remaining policies still run.
    pub fn evaluate(&self, descriptor: &ResourceDescriptor) -> Vec<Violation> {
        let mut violations = Vec::new();

        for policy in &self.policies {
            if policy.enforcement_level == EnforcementLevel::Disabled {
                tracing::debug!("Skipping disabled policy: {}", policy.name);
                continue;
            }
            if !policy.filter.matches(descriptor.resource_type()) {
                continue;
            }

            let mut reporter = ViolationReporter::new(&policy.name, policy.enforcement_level);
            for validator in &policy.validators {
                if let Err(err) = validator(descriptor, &mut reporter) {
                    tracing::warn!("Policy {} failed to evaluate: {:#}", policy.name, err);
                    reporter.fault(format!(
                        "policy '{}' failed to evaluate: {:#}",
                        policy.name, err
                    ));
                    break;
                }
            }
            violations.extend(reporter.into_violations());
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::ViolationKind;
    use anyhow::anyhow;
    use groundwork_resource::PropertyBag;

    fn descriptor(resource_type: &str) -> ResourceDescriptor {
        ResourceDescriptor::new(resource_type, PropertyBag::new())
    }

    fn reporting_policy(name: &str, level: EnforcementLevel, messages: &[&str]) -> Policy {
        let messages: Vec<String> = messages.iter().map(|m| m.to_string()).collect();
        Policy::new(name, "test policy", level).validate(move |_resource, report| {
            for message in &messages {
                report.report(message.clone());
            }
            Ok(())
        })
    }

    #[test]
    fn test_filter_matching() {
        assert!(ResourceFilter::Any.matches("ec2:Instance"));
        assert!(
            ResourceFilter::Types(vec!["ec2:Instance".to_string(), "ec2:Vpc".to_string()])
                .matches("ec2:Vpc")
        );
        assert!(!ResourceFilter::Types(vec!["ec2:Instance".to_string()]).matches("ec2:Vpc"));
        assert!(
            ResourceFilter::TypePrefix("elasticbeanstalk:".to_string())
                .matches("elasticbeanstalk:Application")
        );
        assert!(!ResourceFilter::TypePrefix("elasticbeanstalk:".to_string()).matches("ec2:Vpc"));
    }

    #[test]
    fn test_register_rejects_duplicate_names() {
        let mut pack = PolicyPack::new("test");
        pack.register(reporting_policy("p1", EnforcementLevel::Advisory, &[]))
            .unwrap();

        let err = pack
            .register(reporting_policy("p1", EnforcementLevel::Mandatory, &[]))
            .unwrap_err();
        assert!(matches!(err, PolicyError::DuplicateName(name) if name == "p1"));
    }

    #[test]
    fn test_evaluate_orders_by_registration_then_report() {
        let mut pack = PolicyPack::new("test");
        pack.register(reporting_policy(
            "first",
            EnforcementLevel::Advisory,
            &["a", "b"],
        ))
        .unwrap();
        pack.register(reporting_policy("second", EnforcementLevel::Mandatory, &["c"]))
            .unwrap();

        let violations = pack.evaluate(&descriptor("ec2:Instance"));

        let messages: Vec<&str> = violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(messages, vec!["a", "b", "c"]);
        assert_eq!(violations[0].policy, "first");
        assert_eq!(violations[2].policy, "second");
    }

    #[test]
    fn test_multiple_predicates_run_in_declaration_order() {
        let policy = Policy::new("multi", "two predicates", EnforcementLevel::Mandatory)
            .validate(|_resource, report| {
                report.report("from first predicate");
                Ok(())
            })
            .validate(|_resource, report| {
                report.report("from second predicate");
                Ok(())
            });

        let mut pack = PolicyPack::new("test");
        pack.register(policy).unwrap();

        let violations = pack.evaluate(&descriptor("ec2:Instance"));
        let messages: Vec<&str> = violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(messages, vec!["from first predicate", "from second predicate"]);
    }

    #[test]
    fn test_disabled_policy_contributes_nothing() {
        let mut pack = PolicyPack::new("test");
        pack.register(reporting_policy(
            "off",
            EnforcementLevel::Disabled,
            &["never seen"],
        ))
        .unwrap();

        assert!(pack.evaluate(&descriptor("ec2:Instance")).is_empty());
    }

    #[test]
    fn test_type_filter_skips_without_error() {
        let mut pack = PolicyPack::new("test");
        pack.register(
            reporting_policy("scoped", EnforcementLevel::Mandatory, &["violation"])
                .for_types(["ec2:Instance"]),
        )
        .unwrap();

        assert!(pack.evaluate(&descriptor("s3:Bucket")).is_empty());
        assert_eq!(pack.evaluate(&descriptor("ec2:Instance")).len(), 1);
    }

    #[test]
    fn test_faulting_predicate_does_not_suppress_later_policies() {
        let mut pack = PolicyPack::new("test");
        pack.register(
            Policy::new("broken", "always faults", EnforcementLevel::Mandatory).validate(
                |_resource, _report| Err(anyhow!("account lookup failed")),
            ),
        )
        .unwrap();
        pack.register(reporting_policy(
            "healthy",
            EnforcementLevel::Mandatory,
            &["still evaluated"],
        ))
        .unwrap();

        let violations = pack.evaluate(&descriptor("ec2:Instance"));

        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].policy, "broken");
        assert_eq!(violations[0].kind, ViolationKind::Fault);
        assert!(violations[0].message.contains("account lookup failed"));
        assert_eq!(violations[1].policy, "healthy");
        assert_eq!(violations[1].kind, ViolationKind::Rule);
    }

    #[test]
    fn test_fault_keeps_earlier_reports_and_skips_later_predicates() {
        let policy = Policy::new("partial", "reports then faults", EnforcementLevel::Advisory)
            .validate(|_resource, report| {
                report.report("reported before fault");
                Err(anyhow!("boom"))
            })
            .validate(|_resource, report| {
                report.report("never reached");
                Ok(())
            });

        let mut pack = PolicyPack::new("test");
        pack.register(policy).unwrap();

        let violations = pack.evaluate(&descriptor("ec2:Instance"));

        let kinds: Vec<ViolationKind> = violations.iter().map(|v| v.kind).collect();
        assert_eq!(kinds, vec![ViolationKind::Rule, ViolationKind::Fault]);
        assert_eq!(violations[0].message, "reported before fault");
        assert!(!violations.iter().any(|v| v.message == "never reached"));
    }
}
