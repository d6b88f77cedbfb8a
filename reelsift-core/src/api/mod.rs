//! Backend collaborator contract (routes, envelope, client).

pub mod backend;
pub mod http;
pub mod routes;
pub mod types;

pub use backend::{BackendError, DedupeBackend};
pub use http::{HttpBackend, HttpBackendSettings};
pub use types::ApiResponse;
