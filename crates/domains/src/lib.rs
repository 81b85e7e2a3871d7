//! # domains
//!
//! The central domain models and interface definitions for Quadboard: the
//! entities of the campus board (posts, comments, votes), the port traits
//! adapters implement, and the shared error taxonomy.

pub mod error;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use ports::*;
