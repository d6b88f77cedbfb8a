//! Core data model definitions shared across reelsift crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod error;
pub mod ids;
pub mod library;
pub mod media;
pub mod policy;
pub mod scan;

// Intentionally curated re-exports for downstream consumers.
pub use error::{ModelError, Result as ModelResult};
pub use ids::{LibraryId, TaskId, VersionId};
pub use library::LibrarySummary;
pub use media::{DuplicateTask, ItemType, TaskType, VersionInfo};
pub use policy::{RawPolicy, RawPriority, RawRule};
pub use scan::{BatchOutcome, ScanAck, TaskIdsRequest};
