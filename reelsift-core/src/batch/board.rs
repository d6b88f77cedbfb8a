use reelsift_model::{DuplicateTask, TaskId};
use tracing::{debug, warn};

use super::plan::PlanPreview;
use crate::grouping::{Group, GroupKey, group_tasks};
use crate::selection::SelectionState;

/// Stamp handed out when a fetch starts. Only the newest stamp may apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Current flat task list, its groups and the operator's selection.
///
/// The list and the groups are only ever replaced wholesale by
/// [`TaskBoard::apply_fetch`].
#[derive(Debug, Default)]
pub struct TaskBoard {
    tasks: Vec<DuplicateTask>,
    groups: Vec<Group>,
    selection: SelectionState,
    issued: u64,
    applied: u64,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    pub fn is_latest(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Replace the snapshot with a fetch response. Responses to anything but
    /// the most recent fetch are dropped and `false` is returned.
    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        tasks: Vec<DuplicateTask>,
    ) -> bool {
        if !self.is_latest(ticket) {
            warn!(
                ticket = ticket.0,
                latest = self.issued,
                "discarding stale task list response"
            );
            return false;
        }

        self.groups = group_tasks(&tasks);
        self.tasks = tasks;
        self.selection.clear();
        self.applied = ticket.0;
        debug!(
            generation = self.applied,
            tasks = self.tasks.len(),
            groups = self.groups.len(),
            "applied task list"
        );
        true
    }

    /// Generation of the snapshot currently shown. Zero before the first
    /// successful fetch.
    pub fn generation(&self) -> u64 {
        self.applied
    }

    pub fn tasks(&self) -> &[DuplicateTask] {
        &self.tasks
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, key: &GroupKey) -> Option<&Group> {
        self.groups.iter().find(|group| group.key() == key)
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Check a group. Keys with no group in the current snapshot are not
    /// recorded; returns whether the key matched.
    pub fn select(&mut self, key: impl Into<GroupKey>) -> bool {
        let key = key.into();
        if self.group(&key).is_none() {
            debug!(key = %key, "ignoring selection of unknown group");
            return false;
        }
        self.selection.select(key);
        true
    }

    pub fn deselect(&mut self, key: &GroupKey) -> bool {
        self.selection.deselect(key)
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.groups);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selected_task_ids(&self) -> Vec<TaskId> {
        self.selection.expand(&self.groups)
    }

    /// Every listed task id, once each, in listing order.
    pub fn all_task_ids(&self) -> Vec<TaskId> {
        let keys: Vec<&GroupKey> = self.groups.iter().map(Group::key).collect();
        crate::selection::expand(keys, &self.groups)
    }

    pub fn preview<'a>(
        &self,
        keys: impl IntoIterator<Item = &'a GroupKey>,
    ) -> PlanPreview {
        let mut preview = PlanPreview::default();
        for key in keys {
            if let Some(group) = self.group(key) {
                preview.groups += 1;
                preview.tasks += group.tasks().len();
                preview.versions += group.version_count();
                preview.reclaimable_bytes += group.reclaimable_bytes();
            }
        }
        preview
    }
}
