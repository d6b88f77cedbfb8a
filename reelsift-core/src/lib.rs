//! # Reelsift Core
//!
//! Decision core for resolving duplicate and multi-version media entries: the
//! operator-editable version-selection policy, grouping of the backend's flat
//! duplicate-task list, selection by group, and the batch lifecycle that
//! turns a selection into execute/ignore/remove requests.
//!
//! ## Architecture
//!
//! - [`tags`]: canonical token / display label mapping for categorical rules
//! - [`policy`]: rule chain, fallback rule, validation and (de)serialization
//! - [`grouping`]: movie/series grouping of duplicate tasks
//! - [`selection`]: group-key selection expanded to task ids on demand
//! - [`batch`]: task board, confirmation-gated plans and submission
//! - [`api`]: backend collaborator contract and its HTTP implementation
//!
//! Media probing, best-version evaluation and file deletion all happen on the
//! backend. This crate only describes what should happen and maps operator
//! selections onto backend task ids.
//!
//! ## Examples
//!
//! ```no_run
//! use reelsift_core::api::{HttpBackend, HttpBackendSettings};
//! use reelsift_core::batch::DedupeSession;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = HttpBackend::new(HttpBackendSettings::default())?;
//! let mut session = DedupeSession::new(backend);
//! session.refresh().await?;
//! session.select("movie-Dune");
//!
//! let plan = session.plan_execute()?.confirm();
//! let report = session.submit(plan).await?;
//! println!("{}", report.outcome.message);
//! # Ok(())
//! # }
//! ```
#![allow(missing_docs)]

pub mod api;
pub mod batch;
pub mod error;
pub mod grouping;
pub mod policy;
pub mod selection;
pub mod tags;

pub use error::{CoreError, Result};
pub use grouping::{Group, GroupKey, group_tasks};
pub use policy::{PolicyConfig, PolicyError, RuleId};
pub use selection::SelectionState;
pub use tags::TagCanonicalizer;
