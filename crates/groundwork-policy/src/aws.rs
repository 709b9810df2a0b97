//! Stock policies for AWS-shaped resource graphs

use crate::error::Result;
use crate::policy::{EnforcementLevel, Policy, PolicyPack};
use serde_json::Value;
use std::collections::HashSet;

/// The default AWS policy pack.
pub fn aws_policy_pack() -> Result<PolicyPack> {
    let mut pack = PolicyPack::new("aws");

    pack.register(
        Policy::new(
            "discouraged-ec2-public-ip-address",
            "Associating public IP addresses is discouraged.",
            EnforcementLevel::Advisory,
        )
        .for_types(["ec2:Instance"])
        .validate(|resource, report| {
            if resource
                .property_as::<bool>("associate_public_ip_address")
                .unwrap_or(false)
            {
                report.report("Consider not setting associate_public_ip_address to true.");
            }
            Ok(())
        }),
    )?;

    pack.register(require_name_tag(
        "required-name-tag-ec2-instance",
        ["ec2:Instance"],
    ))?;
    pack.register(require_name_tag("required-name-tag-ec2-vpc", ["ec2:Vpc"]))?;

    pack.register(
        Policy::new(
            "prohibited-public-internet",
            "Ingress rules with public internet access are prohibited.",
            EnforcementLevel::Mandatory,
        )
        .for_types(["ec2:SecurityGroup"])
        .validate(|resource, report| {
            let open_rule = resource
                .property("ingress")
                .and_then(Value::as_array)
                .is_some_and(|rules| rules.iter().any(rule_allows_public_internet));
            if open_rule {
                report.report("Ingress rules with public internet access are prohibited.");
            }
            Ok(())
        }),
    )?;

    pack.register(
        Policy::new(
            "prohibited-elasticbeanstalk",
            "Use of Elastic Beanstalk is prohibited.",
            EnforcementLevel::Mandatory,
        )
        .for_type_prefix("elasticbeanstalk:")
        .validate(|_resource, report| {
            report.report("Use of Elastic Beanstalk is prohibited.");
            Ok(())
        }),
    )?;

    Ok(pack)
}

/// A 'Name' tag requirement over the given resource types.
pub fn require_name_tag<I, S>(name: &str, types: I) -> Policy
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Policy::new(name, "A 'Name' tag is required.", EnforcementLevel::Mandatory)
        .for_types(types)
        .validate(|resource, report| {
            let has_name = resource
                .property("tags")
                .and_then(|tags| tags.get("Name"))
                .is_some();
            if !has_name {
                report.report("A 'Name' tag is required.");
            }
            Ok(())
        })
}

/// EC2 instances must boot from an approved image.
pub fn require_approved_amis<I, S>(name: &str, approved: I) -> Policy
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let approved: HashSet<String> = approved.into_iter().map(Into::into).collect();

    Policy::new(
        name,
        "EC2 Instances should use approved AMIs.",
        EnforcementLevel::Mandatory,
    )
    .for_types(["ec2:Instance"])
    .validate(move |resource, report| {
        let uses_approved = resource
            .property_as::<String>("ami")
            .is_some_and(|ami| approved.contains(&ami));
        if !uses_approved {
            report.report("EC2 Instances should use approved AMIs.");
        }
        Ok(())
    })
}

/// Instances and launch configurations must use approved instance types.
///
/// Two predicates share one policy, each keyed to its own type tag.
pub fn require_instance_types<I, S>(name: &str, allowed: I) -> Policy
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let allowed: HashSet<String> = allowed.into_iter().map(Into::into).collect();
    let allowed_for_configs = allowed.clone();

    Policy::new(
        name,
        "EC2 instances should use approved instance types.",
        EnforcementLevel::Mandatory,
    )
    .for_types(["ec2:Instance", "ec2:LaunchConfiguration"])
    .validate(move |resource, report| {
        if resource.resource_type() != "ec2:Instance" {
            return Ok(());
        }
        let approved = resource
            .property_as::<String>("instance_type")
            .is_some_and(|t| allowed.contains(&t));
        if !approved {
            report.report("EC2 Instance should use the approved instance types.");
        }
        Ok(())
    })
    .validate(move |resource, report| {
        if resource.resource_type() != "ec2:LaunchConfiguration" {
            return Ok(());
        }
        let approved = resource
            .property_as::<String>("instance_type")
            .is_some_and(|t| allowed_for_configs.contains(&t));
        if !approved {
            report.report("EC2 LaunchConfiguration should use the approved instance types.");
        }
        Ok(())
    })
}

fn rule_allows_public_internet(rule: &Value) -> bool {
    rule.get("cidr_blocks")
        .and_then(Value::as_array)
        .is_some_and(|blocks| blocks.iter().any(|b| b.as_str() == Some("0.0.0.0/0")))
}
