use thiserror::Error;

use super::plan::BatchAction;
use crate::api::BackendError;

#[derive(Debug, Error)]
pub enum BatchError {
    /// Nothing to operate on; no request was issued.
    #[error("nothing selected to {0}")]
    EmptySelection(BatchAction),

    /// The task list was refreshed after the plan was made.
    #[error("the task list changed since the {0} plan was made; review it again")]
    StalePlan(BatchAction),

    #[error("{action} request failed")]
    Backend {
        action: BatchAction,
        #[source]
        source: BackendError,
    },
}

impl BatchError {
    pub fn is_retryable(&self) -> bool {
        match self {
            BatchError::Backend { source, .. } => source.is_retryable(),
            _ => false,
        }
    }
}
