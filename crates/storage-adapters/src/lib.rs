//! Storage adapters implementing the `domains` persistence ports.
//!
//! The dashmap-backed in-memory store is always compiled and backs the test
//! suites; the Postgres store lives behind the `db-postgres` feature.

pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use memory::MemoryStore;

#[cfg(feature = "db-postgres")]
pub use postgres::PgStore;
