//! Policy registration error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("duplicate policy name: {0}")]
    DuplicateName(String),
}

pub type Result<T> = std::result::Result<T, PolicyError>;
