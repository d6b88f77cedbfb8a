use std::fmt;

use crate::chrono::{DateTime, Utc};
use crate::ids::{TaskId, VersionId};

/// Kind of duplicate issue the scan reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskType {
    /// Several library items that resolve to the same logical media.
    #[cfg_attr(feature = "serde", serde(alias = "duplicate"))]
    Duplicate,
    /// One library item carrying several stored versions.
    #[cfg_attr(feature = "serde", serde(alias = "multi_version"))]
    MultiVersion,
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskType::Duplicate => write!(f, "Duplicate"),
            TaskType::MultiVersion => write!(f, "Multi-version"),
        }
    }
}

/// Item type marker exactly as the scan collaborator reported it
/// (`"Movie"`, `"Episode"`, a localized label, ...). Interpretation is left
/// to the grouping layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ItemType(pub String);

impl ItemType {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One stored rendition of a media item, as probed by the scan collaborator.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VersionInfo {
    pub id: VersionId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub path: String,

    // Normalized technical attributes
    pub resolution: Option<String>,
    pub quality: Option<String>,
    /// Canonical dynamic-range token (`dovi_p8`, `hdr10+`, `sdr`, ...).
    pub effect: Option<String>,
    pub filesize: Option<u64>,
    pub runtime_seconds: Option<f64>,
    pub bitrate: Option<u64>,
    pub bit_depth: Option<u32>,
    pub frame_rate: Option<f64>,
    pub codec: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub subtitles: Vec<String>,
    pub date_added: Option<DateTime<Utc>>,
}

impl VersionInfo {
    /// A version with no probed attributes.
    pub fn new(id: VersionId, path: impl Into<String>) -> Self {
        Self {
            id,
            path: path.into(),
            resolution: None,
            quality: None,
            effect: None,
            filesize: None,
            runtime_seconds: None,
            bitrate: None,
            bit_depth: None,
            frame_rate: None,
            codec: None,
            subtitles: Vec::new(),
            date_added: None,
        }
    }
}

impl fmt::Debug for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionInfo")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("resolution", &self.resolution)
            .field("quality", &self.quality)
            .field("effect", &self.effect)
            .field("filesize", &self.filesize)
            .field("codec", &self.codec)
            .field("date_added", &self.date_added)
            .finish_non_exhaustive()
    }
}

/// One duplicate/multi-version issue awaiting an execute/ignore/remove
/// decision.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DuplicateTask {
    pub id: TaskId,
    pub item_name: String,
    pub item_type: ItemType,
    pub task_type: TaskType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub versions: Vec<VersionInfo>,
    /// Version the backend evaluator kept under the policy in force at
    /// scan time.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub best_version_id: Option<VersionId>,
}

impl DuplicateTask {
    pub fn best_version(&self) -> Option<&VersionInfo> {
        let best = self.best_version_id.as_ref()?;
        self.versions.iter().find(|version| &version.id == best)
    }

    /// Versions that an execute would discard. Without a computed best
    /// version nothing is considered discardable.
    pub fn discarded_versions(&self) -> impl Iterator<Item = &VersionInfo> {
        let best = self.best_version_id.as_ref();
        self.versions
            .iter()
            .filter(move |version| best.is_some_and(|id| &version.id != id))
    }

    /// Bytes freed if every non-best version is deleted.
    pub fn reclaimable_bytes(&self) -> u64 {
        self.discarded_versions()
            .filter_map(|version| version.filesize)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(id: &str, size: u64) -> VersionInfo {
        VersionInfo {
            filesize: Some(size),
            ..VersionInfo::new(VersionId::new(id).unwrap(), format!("/media/{id}.mkv"))
        }
    }

    #[test]
    fn reclaimable_bytes_skip_best_version() {
        let task = DuplicateTask {
            id: TaskId::new("t1").unwrap(),
            item_name: "Dune".into(),
            item_type: ItemType::new("Movie"),
            task_type: TaskType::MultiVersion,
            versions: vec![version("a", 10), version("b", 25), version("c", 5)],
            best_version_id: Some(VersionId::new("b").unwrap()),
        };

        assert_eq!(task.best_version().map(|v| v.id.as_str()), Some("b"));
        assert_eq!(task.reclaimable_bytes(), 15);
    }

    #[test]
    fn nothing_is_discarded_without_best_version() {
        let task = DuplicateTask {
            id: TaskId::new("t2").unwrap(),
            item_name: "Dune".into(),
            item_type: ItemType::new("Movie"),
            task_type: TaskType::Duplicate,
            versions: vec![version("a", 10), version("b", 25)],
            best_version_id: None,
        };

        assert_eq!(task.discarded_versions().count(), 0);
        assert_eq!(task.reclaimable_bytes(), 0);
    }
}
