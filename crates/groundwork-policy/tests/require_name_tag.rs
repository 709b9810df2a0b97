use groundwork_policy::aws::require_name_tag;
use groundwork_policy::{Policy, PolicyPack, Violation};
use groundwork_resource::{PropertyBag, ResourceDescriptor};
use serde_json::{Value, json};

fn check_policy(policy: Policy, resource_type: &str, props: Value) -> Vec<Violation> {
    let mut pack = PolicyPack::new("test");
    pack.register(policy).unwrap();

    let bag: PropertyBag = serde_json::from_value(props).expect("object literal");
    pack.evaluate(&ResourceDescriptor::new(resource_type, bag))
}

fn policy_under_test() -> Policy {
    require_name_tag("require-name-tag", ["ec2:Instance", "ec2:Vpc"])
}

#[test]
fn rejects_tags_missing_null_empty_or_without_name() {
    let types = ["ec2:Instance", "ec2:Vpc"];
    let props = [
        json!({}),
        json!({"tags": null}),
        json!({"tags": {}}),
        json!({"tags": {"Foo": "bar"}}),
    ];

    for ty in types {
        for p in &props {
            let violations = check_policy(policy_under_test(), ty, p.clone());
            assert_eq!(violations.len(), 1, "type {ty}, props {p}");
            assert_eq!(violations[0].message, "A 'Name' tag is required.");
            assert!(violations[0].blocks());
        }
    }
}

#[test]
fn accepts_tags_with_name() {
    for ty in ["ec2:Instance", "ec2:Vpc"] {
        let violations = check_policy(policy_under_test(), ty, json!({"tags": {"Name": "foo"}}));
        assert!(violations.is_empty(), "type {ty}");
    }
}

#[test]
fn skips_resource_types_outside_the_filter() {
    let violations = check_policy(policy_under_test(), "s3:Bucket", json!({"tags": {}}));
    assert!(violations.is_empty());
}
