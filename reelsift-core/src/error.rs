use thiserror::Error;

use crate::api::BackendError;
use crate::batch::BatchError;
use crate::policy::PolicyError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),
}

impl CoreError {
    /// Transient failure; the operator may simply try again.
    pub fn is_retryable(&self) -> bool {
        match self {
            CoreError::Backend(err) => err.is_retryable(),
            CoreError::Batch(err) => err.is_retryable(),
            CoreError::Policy(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
