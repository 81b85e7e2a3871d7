//! # storage-adapters
//!
//! Implementations of the `domains` store ports: an in-memory store for
//! tests and the no-database dev fallback, and a Postgres adapter behind the
//! `db-postgres` feature.

pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use memory::MemoryStore;

#[cfg(feature = "db-postgres")]
pub use postgres::PostgresStore;
