//! Presentation grouping of the flat duplicate-task list.
//!
//! Movies group under their own name, episodes under the series name found in
//! front of an `SxxEyy` marker. Grouping is a pure function of the input list:
//! group order follows first appearance and task order inside a group follows
//! the input.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use reelsift_model::{DuplicateTask, ItemType, TaskId};
use tracing::debug;

static EPISODE_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"S\d{2}E\d{2}").expect("episode marker regex should compile")
});

/// Item-type substrings that mark movie content. Matched case-insensitively.
const MOVIE_MARKERS: &[&str] = &["movie", "电影"];

const MOVIE_KEY_PREFIX: &str = "movie-";
const SERIES_KEY_PREFIX: &str = "series-";

/// Stable, content-derived group identity (`movie-<name>` / `series-<name>`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey(String);

impl GroupKey {
    pub fn movie(name: &str) -> Self {
        Self(format!("{MOVIE_KEY_PREFIX}{name}"))
    }

    pub fn series(name: &str) -> Self {
        Self(format!("{SERIES_KEY_PREFIX}{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keys typed by an operator are accepted verbatim; unknown keys simply
/// select nothing.
impl From<String> for GroupKey {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for GroupKey {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Presentation aggregate of tasks sharing a movie or series identity.
/// Derived from the task list and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    key: GroupKey,
    display_name: String,
    is_movie: bool,
    tasks: Vec<DuplicateTask>,
}

impl Group {
    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn is_movie(&self) -> bool {
        self.is_movie
    }

    pub fn tasks(&self) -> &[DuplicateTask] {
        &self.tasks
    }

    pub fn task_ids(&self) -> impl Iterator<Item = &TaskId> {
        self.tasks.iter().map(|task| &task.id)
    }

    pub fn version_count(&self) -> usize {
        self.tasks.iter().map(|task| task.versions.len()).sum()
    }

    pub fn reclaimable_bytes(&self) -> u64 {
        self.tasks.iter().map(DuplicateTask::reclaimable_bytes).sum()
    }
}

/// Best-effort movie check on the reported item type.
pub fn is_movie(item_type: &ItemType) -> bool {
    let lowered = item_type.as_str().to_lowercase();
    MOVIE_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Series part of an episode name: everything before the first `SxxEyy`
/// marker. Names without a marker (or with nothing in front of it) are used
/// whole.
pub fn series_name(item_name: &str) -> &str {
    let Some(marker) = EPISODE_MARKER_REGEX.find(item_name) else {
        return item_name;
    };

    let prefix = item_name[..marker.start()].trim_end_matches(|c: char| {
        c.is_whitespace() || matches!(c, '-' | '.' | '_')
    });
    let prefix = prefix.trim_start();
    if prefix.is_empty() { item_name } else { prefix }
}

/// Group key, display name and movie flag for one task.
pub fn classify(task: &DuplicateTask) -> (GroupKey, &str, bool) {
    if is_movie(&task.item_type) {
        (GroupKey::movie(&task.item_name), task.item_name.as_str(), true)
    } else {
        let series = series_name(&task.item_name);
        (GroupKey::series(series), series, false)
    }
}

/// Partition `tasks` into groups. Every task lands in exactly one group.
pub fn group_tasks(tasks: &[DuplicateTask]) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for task in tasks {
        let (key, display_name, movie) = classify(task);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(Group {
                key,
                display_name: display_name.to_string(),
                is_movie: false,
                tasks: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        // Sticky: one movie member marks the whole group.
        group.is_movie |= movie;
        group.tasks.push(task.clone());
    }

    debug!(tasks = tasks.len(), groups = groups.len(), "grouped duplicate tasks");
    groups
}
