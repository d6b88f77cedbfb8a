//! Persisted shape of the version-selection policy.
//!
//! This is the exact payload exchanged with the backend policy endpoint. The
//! editable, validated form lives in `reelsift-core`; these types only carry
//! what was stored, including values the editor would reject.

use crate::ids::LibraryId;

/// `priority` field of a persisted rule.
///
/// Directional rules store a single token (`"asc"` / `"desc"`), categorical
/// rules store an ordered list of canonical tags.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum RawPriority {
    Direction(String),
    Tags(Vec<String>),
}

/// One persisted rule. The fallback rule is stored inline as the last
/// element of the rule array.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawRule {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default = "enabled_by_default"))]
    pub enabled: bool,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub priority: Option<RawPriority>,
}

#[cfg(feature = "serde")]
fn enabled_by_default() -> bool {
    true
}

impl RawRule {
    pub fn new(id: impl Into<String>, enabled: bool) -> Self {
        Self {
            id: id.into(),
            enabled,
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: RawPriority) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Persisted policy unit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawPolicy {
    pub rules: Vec<RawRule>,
    #[cfg_attr(feature = "serde", serde(alias = "keep_one_per_res"))]
    pub keep_one_per_resolution: bool,
    /// Seconds between destructive calls. Signed so that invalid stored
    /// values surface as a load error instead of a decode failure.
    #[cfg_attr(feature = "serde", serde(alias = "delete_delay"))]
    pub delete_delay_seconds: i64,
    #[cfg_attr(feature = "serde", serde(alias = "library_ids"))]
    pub library_scope: Vec<LibraryId>,
}
