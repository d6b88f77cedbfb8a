pub mod policy;
pub mod tasks;
