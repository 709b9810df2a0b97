//! kubectl adapter error types

use groundwork_resource::ResourceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KubectlError {
    #[error("kubectl not found: {0}")]
    KubectlNotFound(String),

    #[error("kubectl exited with status {code}: {stderr}")]
    CommandFailed { code: i32, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KubectlError>;

impl From<KubectlError> for ResourceError {
    fn from(err: KubectlError) -> Self {
        match err {
            KubectlError::KubectlNotFound(program) => ResourceError::ToolNotFound(program),
            KubectlError::CommandFailed { code, stderr } => {
                ResourceError::CommandFailed { code, stderr }
            }
            KubectlError::Io(e) => ResourceError::Io(e),
        }
    }
}
