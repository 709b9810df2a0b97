//! Groundwork kubectl adapter
//!
//! Presents a kubectl-driven cluster mutation as a managed resource: the
//! orchestration engine sees check/create/update/delete, while underneath a
//! single synchronous `kubectl` invocation runs against a caller-supplied
//! kubeconfig. The kubeconfig and manifest travel through temporary files
//! that are removed when the invocation returns, success or not.

pub mod access;
pub mod error;
pub mod kubectl;

// Re-exports
pub use access::NodeAccessProvider;
pub use error::{KubectlError, Result};
pub use kubectl::{Kubectl, is_not_found, kubeconfig_env};
