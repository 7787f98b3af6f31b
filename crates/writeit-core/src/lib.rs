//! # Write-It Core
//!
//! The domain layer of the Write-It backend: posts, users, and the ports
//! that persistence and authentication adapters implement.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::RepoError;

/// Current time as epoch seconds, the unit every stored timestamp uses.
pub fn now_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
