//! service-core: Shared infrastructure for farm services.
//!
//! Besides configuration, error and tracing plumbing, this crate hosts the
//! collect-then-throw validation core used by every flow and report:
//! [`validation`] accumulates failures, [`security`] evaluates role and
//! row-level ownership predicates, [`flow`] runs a business operation under
//! validate/secure/execute, and [`report`] guards pagination before a row
//! provider is queried.
pub mod config;
pub mod error;
pub mod flow;
pub mod observability;
pub mod report;
pub mod security;
pub mod validation;

pub use async_trait;
pub use axum;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tracing;
pub use validator;
