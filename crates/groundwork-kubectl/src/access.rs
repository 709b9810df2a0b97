//! Cluster node access managed as a lifecycle resource
//!
//! Models the `aws-auth` ConfigMap — the object that grants EC2 worker
//! nodes membership in a cluster — with full lifecycle semantics. The
//! ConfigMap has no natural diff operation, so update re-applies the whole
//! manifest; the operation is idempotent and infrequent.

use crate::kubectl::Kubectl;
use async_trait::async_trait;
use groundwork_resource::{
    LifecycleRecord, PropertyBag, ResourceProvider, Result, require_str,
};

const ACCESS_NAMESPACE: &str = "kube-system";
const ACCESS_CONFIGMAP: &str = "aws-auth";
const REQUIRED_FIELDS: &[&str] = &["kubeconfig", "instance_role_arn"];

/// Grants worker nodes cluster access by upserting the aws-auth ConfigMap.
pub struct NodeAccessProvider {
    kubectl: Kubectl,
}

impl NodeAccessProvider {
    pub fn new() -> Self {
        Self {
            kubectl: Kubectl::new(),
        }
    }

    /// Use a preconfigured wrapper, e.g. one pointing at a stub binary.
    pub fn with_kubectl(kubectl: Kubectl) -> Self {
        Self { kubectl }
    }

    async fn apply(&self, inputs: &PropertyBag) -> Result<()> {
        let kubeconfig = require_str(inputs, "kubeconfig")?;
        let role_arn = require_str(inputs, "instance_role_arn")?;

        let manifest = access_manifest(role_arn);
        self.kubectl
            .apply_manifest(kubeconfig, &manifest)
            .await
            .map_err(Into::into)
    }
}

impl Default for NodeAccessProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceProvider for NodeAccessProvider {
    fn resource_type(&self) -> &str {
        "kubernetes:NodeAccess"
    }

    fn required_fields(&self) -> &[&str] {
        REQUIRED_FIELDS
    }

    async fn create(&self, inputs: &PropertyBag) -> Result<LifecycleRecord> {
        tracing::info!(
            "Applying node access policy {}/{}",
            ACCESS_NAMESPACE,
            ACCESS_CONFIGMAP
        );
        self.apply(inputs).await?;
        Ok(LifecycleRecord::new(access_id(), inputs.clone()))
    }

    async fn update(
        &self,
        id: &str,
        _previous: &PropertyBag,
        proposed: &PropertyBag,
    ) -> Result<LifecycleRecord> {
        tracing::info!(
            "Reapplying node access policy {}/{}",
            ACCESS_NAMESPACE,
            ACCESS_CONFIGMAP
        );
        self.apply(proposed).await?;
        Ok(LifecycleRecord::new(id, proposed.clone()))
    }

    async fn delete(&self, _id: &str, last_inputs: &PropertyBag) -> Result<()> {
        let kubeconfig = require_str(last_inputs, "kubeconfig")?;

        tracing::info!(
            "Removing node access policy {}/{}",
            ACCESS_NAMESPACE,
            ACCESS_CONFIGMAP
        );
        self.kubectl
            .delete_resource(kubeconfig, ACCESS_NAMESPACE, "configmap", ACCESS_CONFIGMAP)
            .await
            .map_err(Into::into)
    }
}

fn access_id() -> String {
    format!("{}/{}", ACCESS_NAMESPACE, ACCESS_CONFIGMAP)
}

/// Render the aws-auth ConfigMap mapping the instance role onto the node
/// bootstrap groups. The `{{EC2PrivateDNSName}}` placeholder is expanded
/// cluster-side, not here.
fn access_manifest(instance_role_arn: &str) -> String {
    format!(
        r#"apiVersion: v1
kind: ConfigMap
metadata:
  name: {name}
  namespace: {namespace}
data:
  mapRoles: |
    - rolearn: {role}
      username: system:node:{{{{EC2PrivateDNSName}}}}
      groups:
        - system:bootstrappers
        - system:nodes
"#,
        name = ACCESS_CONFIGMAP,
        namespace = ACCESS_NAMESPACE,
        role = instance_role_arn,
    )
}
