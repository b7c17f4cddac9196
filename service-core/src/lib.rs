//! service-core: Shared infrastructure for the task-management services.
pub mod config;
pub mod error;
pub mod observability;
