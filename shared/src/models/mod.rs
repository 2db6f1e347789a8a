//! Data models
//!
//! Shared between roster-server and roster-client (via API).
//! All IDs are `i64` allocated from per-entity sequences.

pub mod change;
pub mod company;
pub mod employee;
pub mod role;

// Re-exports
pub use change::*;
pub use company::*;
pub use employee::*;
pub use role::*;
