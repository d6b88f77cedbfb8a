use crate::ids::TaskId;

/// Answer to a scan trigger. The scan itself runs asynchronously on the
/// backend task queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanAck {
    Accepted,
    /// The task queue is already running something.
    Busy { reason: Option<String> },
}

impl ScanAck {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ScanAck::Accepted)
    }
}

/// Request body for execute / ignore / remove.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskIdsRequest {
    pub task_ids: Vec<TaskId>,
}

/// Backend confirmation of a batch operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchOutcome {
    #[cfg_attr(feature = "serde", serde(default))]
    pub message: String,
}
