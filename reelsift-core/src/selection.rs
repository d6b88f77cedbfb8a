//! Operator selection over groups.
//!
//! Only group keys are stored. Task ids are derived from the group snapshot
//! at the moment an operation runs, so a selection made before a refresh can
//! never point at tasks that no longer exist.

use std::collections::{BTreeSet, HashSet};

use reelsift_model::TaskId;

use crate::grouping::{Group, GroupKey};

/// Set of checked group keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    keys: BTreeSet<GroupKey>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, key: impl Into<GroupKey>) -> bool {
        self.keys.insert(key.into())
    }

    pub fn deselect(&mut self, key: &GroupKey) -> bool {
        self.keys.remove(key)
    }

    /// Select every group of the snapshot.
    pub fn select_all(&mut self, groups: &[Group]) {
        self.keys
            .extend(groups.iter().map(|group| group.key().clone()));
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn contains(&self, key: &GroupKey) -> bool {
        self.keys.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.keys.iter()
    }

    /// Task ids behind the selected keys in `groups`. See [`expand`].
    pub fn expand(&self, groups: &[Group]) -> Vec<TaskId> {
        expand(&self.keys, groups)
    }
}

/// Flatten the member task ids of every group whose key is selected.
///
/// Ids come out in group order, then task order, without duplicates. Keys
/// with no matching group contribute nothing.
pub fn expand<'a>(
    selected: impl IntoIterator<Item = &'a GroupKey>,
    groups: &[Group],
) -> Vec<TaskId> {
    let wanted: HashSet<&GroupKey> = selected.into_iter().collect();
    let mut seen = HashSet::new();
    groups
        .iter()
        .filter(|group| wanted.contains(group.key()))
        .flat_map(|group| group.task_ids())
        .filter(|id| seen.insert(*id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_tasks;
    use reelsift_model::{DuplicateTask, ItemType, TaskType};

    fn task(id: &str, item_type: &str, name: &str) -> DuplicateTask {
        DuplicateTask {
            id: TaskId::new(id).unwrap(),
            item_name: name.to_string(),
            item_type: ItemType::new(item_type),
            task_type: TaskType::Duplicate,
            versions: Vec::new(),
            best_version_id: None,
        }
    }

    #[test]
    fn expand_follows_group_order_not_selection_order() {
        let groups = group_tasks(&[
            task("1", "Movie", "Dune"),
            task("2", "Episode", "Foo S01E01"),
            task("3", "Episode", "Foo S01E02"),
        ]);
        let mut selection = SelectionState::new();
        selection.select("series-Foo");
        selection.select("movie-Dune");

        let ids: Vec<String> =
            selection.expand(&groups).into_iter().map(String::from).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn stale_keys_expand_to_nothing() {
        let before = group_tasks(&[task("1", "Movie", "Dune")]);
        let mut selection = SelectionState::new();
        selection.select(before[0].key().clone());

        let after = group_tasks(&[task("2", "Movie", "Arrival")]);
        assert!(selection.expand(&after).is_empty());
    }

    #[test]
    fn repeated_task_ids_are_reported_once() {
        let groups = group_tasks(&[
            task("1", "Movie", "Dune"),
            task("1", "Episode", "Foo S01E01"),
        ]);
        let mut selection = SelectionState::new();
        selection.select_all(&groups);
        assert_eq!(selection.expand(&groups).len(), 1);
    }

    #[test]
    fn free_expand_accepts_any_key_collection() {
        let groups = group_tasks(&[task("1", "Movie", "Dune")]);
        let keys = vec![GroupKey::movie("Dune"), GroupKey::movie("Missing")];
        assert_eq!(expand(&keys, &groups).len(), 1);
    }
}
