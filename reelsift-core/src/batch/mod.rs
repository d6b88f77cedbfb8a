//! Batch lifecycle: scan trigger, fetch, and execute/ignore/remove against
//! the backend task executor.
//!
//! A [`DedupeSession`] owns the current [`TaskBoard`]. Operations are planned
//! from the selection, confirmed where they delete files, and submitted as a
//! single id-set request followed by a full refetch.

mod board;
mod error;
mod plan;
mod session;

pub use board::{FetchTicket, TaskBoard};
pub use error::BatchError;
pub use plan::{
    BatchAction, BatchPlan, Confirmed, PlanPreview, PlanState, Unconfirmed,
};
pub use session::{BatchReport, DedupeSession};
