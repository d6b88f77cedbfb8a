use reelsift_model::{BatchOutcome, LibrarySummary, ScanAck, TaskId};
use tracing::{info, warn};

use super::board::TaskBoard;
use super::error::BatchError;
use super::plan::{BatchAction, BatchPlan, Confirmed, Unconfirmed};
use crate::api::{BackendError, DedupeBackend};
use crate::error::CoreError;
use crate::grouping::{Group, GroupKey};
use crate::policy::PolicyConfig;

/// Result of a submitted batch.
#[derive(Debug)]
pub struct BatchReport {
    pub action: BatchAction,
    pub task_count: usize,
    pub outcome: BatchOutcome,
    /// Set when the backend accepted the batch but the follow-up refetch
    /// failed. The selection is cleared either way.
    pub refresh_error: Option<BackendError>,
}

/// Operator session: a backend plus the task board it feeds.
#[derive(Debug)]
pub struct DedupeSession<B> {
    backend: B,
    board: TaskBoard,
}

impl<B: DedupeBackend> DedupeSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            board: TaskBoard::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn board(&self) -> &TaskBoard {
        &self.board
    }

    pub fn groups(&self) -> &[Group] {
        self.board.groups()
    }

    pub fn select(&mut self, key: impl Into<GroupKey>) -> bool {
        self.board.select(key)
    }

    pub fn deselect(&mut self, key: &GroupKey) -> bool {
        self.board.deselect(key)
    }

    pub fn select_all(&mut self) {
        self.board.select_all();
    }

    pub fn clear_selection(&mut self) {
        self.board.clear_selection();
    }

    /// Fetch the flat task list and rebuild groups. Clears the selection on
    /// success; leaves everything untouched on failure.
    pub async fn refresh(&mut self) -> Result<usize, BackendError> {
        let ticket = self.board.begin_fetch();
        let tasks = self.backend.fetch_tasks().await?;
        self.board.apply_fetch(ticket, tasks);
        Ok(self.board.groups().len())
    }

    /// Fire-and-forget scan request. The task list is not touched; refresh
    /// once the scan has finished.
    pub async fn trigger_scan(&self) -> Result<ScanAck, BackendError> {
        let ack = self.backend.trigger_scan().await?;
        match &ack {
            ScanAck::Accepted => info!("library scan accepted"),
            ScanAck::Busy { reason } => {
                warn!(reason = reason.as_deref().unwrap_or("-"), "scan rejected, task queue busy")
            }
        }
        Ok(ack)
    }

    pub async fn load_policy(&self) -> Result<PolicyConfig, CoreError> {
        let raw = self.backend.fetch_policy().await?;
        Ok(PolicyConfig::load(&raw)?)
    }

    pub async fn save_policy(
        &self,
        policy: &PolicyConfig,
    ) -> Result<(), BackendError> {
        self.backend.save_policy(&policy.serialize()).await?;
        info!(rules = policy.chain().len(), "saved policy");
        Ok(())
    }

    pub async fn libraries(&self) -> Result<Vec<LibrarySummary>, BackendError> {
        self.backend.fetch_libraries().await
    }

    /// Execute the selected groups. Needs [`BatchPlan::confirm`] before it
    /// can be submitted.
    pub fn plan_execute(&self) -> Result<BatchPlan<Unconfirmed>, BatchError> {
        let keys = self.selected_keys(BatchAction::Execute)?;
        let preview = self.board.preview(&keys);
        Ok(BatchPlan::unconfirmed(
            BatchAction::Execute,
            keys,
            self.board.generation(),
            preview,
        ))
    }

    /// Execute every listed task.
    pub fn plan_clear_all(&self) -> Result<BatchPlan<Unconfirmed>, BatchError> {
        if self.board.tasks().is_empty() {
            return Err(BatchError::EmptySelection(BatchAction::ClearAll));
        }
        let keys: Vec<GroupKey> =
            self.board.groups().iter().map(|g| g.key().clone()).collect();
        let preview = self.board.preview(&keys);
        Ok(BatchPlan::unconfirmed(
            BatchAction::ClearAll,
            keys,
            self.board.generation(),
            preview,
        ))
    }

    pub fn plan_ignore(&self) -> Result<BatchPlan<Confirmed>, BatchError> {
        self.plan_confirmed(BatchAction::Ignore)
    }

    pub fn plan_remove(&self) -> Result<BatchPlan<Confirmed>, BatchError> {
        self.plan_confirmed(BatchAction::Remove)
    }

    /// Issue a confirmed plan as one id-set request, then refetch.
    ///
    /// On a backend failure the task list and selection are left as they
    /// were.
    pub async fn submit(
        &mut self,
        plan: BatchPlan<Confirmed>,
    ) -> Result<BatchReport, BatchError> {
        let action = plan.action();
        if plan.generation() != self.board.generation() {
            return Err(BatchError::StalePlan(action));
        }

        let task_ids = match action {
            BatchAction::ClearAll => self.board.all_task_ids(),
            _ => crate::selection::expand(plan.keys(), self.board.groups()),
        };
        if task_ids.is_empty() {
            return Err(BatchError::EmptySelection(action));
        }

        info!(%action, tasks = task_ids.len(), groups = plan.keys().len(), "issuing batch");
        let outcome = self
            .dispatch(action, &task_ids)
            .await
            .map_err(|source| BatchError::Backend { action, source })?;

        let refresh_error = match self.refresh().await {
            Ok(groups) => {
                info!(%action, groups, "refetched task list after batch");
                None
            }
            Err(err) => {
                warn!(%action, error = %err, "batch accepted but refetch failed");
                self.board.clear_selection();
                Some(err)
            }
        };

        Ok(BatchReport {
            action,
            task_count: task_ids.len(),
            outcome,
            refresh_error,
        })
    }

    async fn dispatch(
        &self,
        action: BatchAction,
        task_ids: &[TaskId],
    ) -> Result<BatchOutcome, BackendError> {
        match action {
            BatchAction::Execute | BatchAction::ClearAll => {
                self.backend.execute(task_ids).await
            }
            BatchAction::Ignore => self.backend.ignore(task_ids).await,
            BatchAction::Remove => self.backend.remove(task_ids).await,
        }
    }

    fn plan_confirmed(
        &self,
        action: BatchAction,
    ) -> Result<BatchPlan<Confirmed>, BatchError> {
        let keys = self.selected_keys(action)?;
        let preview = self.board.preview(&keys);
        Ok(BatchPlan::confirmed(
            action,
            keys,
            self.board.generation(),
            preview,
        ))
    }

    /// Selected keys that still name a group, or `EmptySelection`.
    fn selected_keys(
        &self,
        action: BatchAction,
    ) -> Result<Vec<GroupKey>, BatchError> {
        let keys: Vec<GroupKey> = self
            .board
            .selection()
            .keys()
            .filter(|key| self.board.group(key).is_some())
            .cloned()
            .collect();
        if keys.is_empty() {
            return Err(BatchError::EmptySelection(action));
        }
        Ok(keys)
    }
}
