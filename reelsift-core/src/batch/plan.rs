//! Batch plans with a compile-time confirmation gate.
//!
//! Destructive plans start out [`Unconfirmed`] and have to be turned into a
//! [`Confirmed`] plan before a session will submit them. Non-destructive
//! plans are created confirmed.

use std::fmt;
use std::marker::PhantomData;

use crate::grouping::GroupKey;

/// Operation issued against the backend task executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchAction {
    /// Keep each task's best version and delete the rest.
    Execute,
    /// Hide the tasks from future listings.
    Ignore,
    /// Drop the tasks from the current listing only.
    Remove,
    /// Execute every listed task.
    ClearAll,
}

impl BatchAction {
    /// Deletes files on the backend and needs operator confirmation.
    pub fn is_destructive(self) -> bool {
        matches!(self, BatchAction::Execute | BatchAction::ClearAll)
    }

    pub fn verb(self) -> &'static str {
        match self {
            BatchAction::Execute => "execute",
            BatchAction::Ignore => "ignore",
            BatchAction::Remove => "remove",
            BatchAction::ClearAll => "clear all",
        }
    }
}

impl fmt::Display for BatchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Unconfirmed {}
    impl Sealed for super::Confirmed {}
}

/// Marker trait for plan confirmation states.
pub trait PlanState:
    sealed::Sealed + fmt::Debug + Clone + Send + Sync + 'static
{
}

/// Awaiting operator confirmation.
#[derive(Debug, Clone)]
pub struct Unconfirmed;
impl PlanState for Unconfirmed {}

/// Ready to submit.
#[derive(Debug, Clone)]
pub struct Confirmed;
impl PlanState for Confirmed {}

/// What a plan will touch, computed from the snapshot it was made against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanPreview {
    pub groups: usize,
    pub tasks: usize,
    pub versions: usize,
    pub reclaimable_bytes: u64,
}

/// A batch operation bound to the task snapshot it was planned against.
#[derive(Debug, Clone)]
pub struct BatchPlan<S: PlanState> {
    action: BatchAction,
    keys: Vec<GroupKey>,
    generation: u64,
    preview: PlanPreview,
    _state: PhantomData<S>,
}

impl<S: PlanState> BatchPlan<S> {
    fn with_state(
        action: BatchAction,
        keys: Vec<GroupKey>,
        generation: u64,
        preview: PlanPreview,
    ) -> Self {
        Self {
            action,
            keys,
            generation,
            preview,
            _state: PhantomData,
        }
    }

    pub fn action(&self) -> BatchAction {
        self.action
    }

    /// Group keys the plan covers. Task ids are derived at submit time.
    pub fn keys(&self) -> &[GroupKey] {
        &self.keys
    }

    /// Snapshot generation the plan was made against.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn preview(&self) -> PlanPreview {
        self.preview
    }
}

impl BatchPlan<Unconfirmed> {
    pub(crate) fn unconfirmed(
        action: BatchAction,
        keys: Vec<GroupKey>,
        generation: u64,
        preview: PlanPreview,
    ) -> Self {
        Self::with_state(action, keys, generation, preview)
    }

    /// Second step of the two-step confirmation.
    pub fn confirm(self) -> BatchPlan<Confirmed> {
        BatchPlan::with_state(self.action, self.keys, self.generation, self.preview)
    }
}

impl BatchPlan<Confirmed> {
    pub(crate) fn confirmed(
        action: BatchAction,
        keys: Vec<GroupKey>,
        generation: u64,
        preview: PlanPreview,
    ) -> Self {
        Self::with_state(action, keys, generation, preview)
    }
}
