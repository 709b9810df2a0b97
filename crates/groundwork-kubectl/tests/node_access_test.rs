use groundwork_kubectl::{Kubectl, NodeAccessProvider};
use groundwork_resource::{PropertyBag, ResourceError, ResourceProvider};
use serde_json::json;

fn inputs() -> PropertyBag {
    let mut bag = PropertyBag::new();
    bag.insert(
        "kubeconfig".to_string(),
        json!("apiVersion: v1\nkind: Config\nclusters: []\n"),
    );
    bag.insert(
        "instance_role_arn".to_string(),
        json!("arn:aws:iam::123456789012:role/nodes"),
    );
    bag
}

#[tokio::test]
async fn check_reports_missing_fields() {
    let provider = NodeAccessProvider::new();
    let outcome = provider.check(None, &PropertyBag::new()).await;

    let fields: Vec<&str> = outcome.failures.iter().map(|f| f.field.as_str()).collect();
    assert_eq!(fields, vec!["kubeconfig", "instance_role_arn"]);
    assert!(outcome.inputs.is_empty());
}

#[tokio::test]
async fn check_passes_complete_inputs_through() {
    let provider = NodeAccessProvider::new();
    let proposed = inputs();
    let outcome = provider.check(None, &proposed).await;

    assert!(outcome.is_ok());
    assert_eq!(outcome.inputs, proposed);
}

#[tokio::test]
async fn create_with_failing_command_returns_operation_error() {
    let provider = NodeAccessProvider::with_kubectl(Kubectl::with_program("false"));
    let err = provider.create(&inputs()).await.unwrap_err();

    match err {
        ResourceError::CommandFailed { code, .. } => assert_eq!(code, 1),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn create_assigns_stable_id_and_echoes_outputs() {
    let provider = NodeAccessProvider::with_kubectl(Kubectl::with_program("true"));
    let record = provider.create(&inputs()).await.unwrap();

    assert_eq!(record.id, "kube-system/aws-auth");
    assert_eq!(record.outputs, record.inputs);
}

#[tokio::test]
async fn update_with_identical_inputs_keeps_id() {
    let provider = NodeAccessProvider::with_kubectl(Kubectl::with_program("true"));
    let record = provider.create(&inputs()).await.unwrap();
    let updated = provider
        .update(&record.id, &record.inputs, &inputs())
        .await
        .unwrap();

    assert_eq!(updated.id, record.id);
}

#[tokio::test]
async fn create_with_missing_binary_is_tool_not_found() {
    let provider =
        NodeAccessProvider::with_kubectl(Kubectl::with_program("/nonexistent/kubectl-stub"));
    let err = provider.create(&inputs()).await.unwrap_err();

    assert!(matches!(err, ResourceError::ToolNotFound(_)));
}

// A second delete of the same id must succeed: the stub reports the server's
// not-found message the way kubectl does once the object is gone.
#[cfg(unix)]
#[tokio::test]
async fn delete_tolerates_missing_configmap() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let stub = dir.path().join("kubectl-stub");
    std::fs::write(
        &stub,
        "#!/bin/sh\n\
         echo 'Error from server (NotFound): configmaps \"aws-auth\" not found' >&2\n\
         exit 1\n",
    )
    .unwrap();
    std::fs::set_permissions(&stub, std::fs::Permissions::from_mode(0o755)).unwrap();

    let provider =
        NodeAccessProvider::with_kubectl(Kubectl::with_program(stub.display().to_string()));
    provider
        .delete("kube-system/aws-auth", &inputs())
        .await
        .unwrap();
}
