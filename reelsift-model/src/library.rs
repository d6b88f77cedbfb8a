use crate::ids::LibraryId;

/// Library identity as listed by the backend, used to scope a policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LibrarySummary {
    pub id: LibraryId,
    #[cfg_attr(feature = "serde", serde(alias = "name"))]
    pub display_name: String,
}

impl std::fmt::Display for LibrarySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.display_name, self.id)
    }
}
