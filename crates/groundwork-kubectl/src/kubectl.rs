//! kubectl CLI wrapper
//!
//! Wraps kubectl invocations against a cluster reachable through a
//! caller-supplied kubeconfig. The kubeconfig never touches the user's own
//! configuration: it is written to a temporary file and exported through
//! the KUBECONFIG environment variable for the one invocation.

use crate::error::{KubectlError, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use tempfile::NamedTempFile;
use tokio::process::Command;

/// Longest stderr excerpt carried inside a CommandFailed error.
const STDERR_EXCERPT_LEN: usize = 2048;

/// kubectl CLI wrapper
pub struct Kubectl {
    program: String,
}

impl Kubectl {
    pub fn new() -> Self {
        Self {
            program: "kubectl".to_string(),
        }
    }

    /// Use a different binary, e.g. a stub in tests.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Apply a manifest to the cluster described by `kubeconfig`.
    ///
    /// Both the kubeconfig and the manifest are written to temporary files
    /// that are removed when this call returns, on success and on failure.
    pub async fn apply_manifest(&self, kubeconfig: &str, manifest: &str) -> Result<()> {
        let config_file = write_temp_yaml(kubeconfig)?;
        let manifest_file = write_temp_yaml(manifest)?;

        let manifest_path = manifest_file.path().display().to_string();
        self.run_command(config_file.path(), &["apply", "-f", &manifest_path])
            .await?;
        Ok(())
    }

    /// Delete a namespaced object, treating an already-absent target as
    /// success.
    pub async fn delete_resource(
        &self,
        kubeconfig: &str,
        namespace: &str,
        kind: &str,
        name: &str,
    ) -> Result<()> {
        let config_file = write_temp_yaml(kubeconfig)?;

        let result = self
            .run_command(
                config_file.path(),
                &["delete", kind, "--namespace", namespace, name],
            )
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(KubectlError::CommandFailed { ref stderr, .. }) if is_not_found(stderr) => {
                tracing::debug!(
                    "{} {}/{} not found, nothing to delete",
                    kind,
                    namespace,
                    name
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Run a kubectl command and return stdout.
    async fn run_command(&self, kubeconfig_path: &Path, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        cmd.env(
            "KUBECONFIG",
            kubeconfig_env(std::env::var_os("KUBECONFIG"), kubeconfig_path),
        );
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: {} {}", self.program, args.join(" "));

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                KubectlError::KubectlNotFound(self.program.clone())
            } else {
                KubectlError::Io(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(KubectlError::CommandFailed {
                code: output.status.code().unwrap_or(-1),
                stderr: stderr_excerpt(&stderr),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl Default for Kubectl {
    fn default() -> Self {
        Self::new()
    }
}

/// Write content to a .yaml temp file that is deleted on drop.
fn write_temp_yaml(content: &str) -> Result<NamedTempFile> {
    let file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
    std::fs::write(file.path(), content)?;
    Ok(file)
}

/// Join an inherited KUBECONFIG value with the temporary config path.
///
/// An existing value keeps its entries so lookups of other clusters still
/// resolve; the temporary path is appended.
pub fn kubeconfig_env(existing: Option<OsString>, path: &Path) -> OsString {
    match existing {
        Some(existing) if !existing.is_empty() => {
            let mut joined = existing;
            joined.push(":");
            joined.push(path);
            joined
        }
        _ => path.as_os_str().to_os_string(),
    }
}

/// Classify a kubectl failure as the server reporting a missing object.
pub fn is_not_found(stderr: &str) -> bool {
    stderr.contains("(NotFound)") || stderr.contains("not found")
}

fn stderr_excerpt(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.len() <= STDERR_EXCERPT_LEN {
        return trimmed.to_string();
    }
    let mut end = STDERR_EXCERPT_LEN;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}
