//! # library-store
//!
//! SQLite-backed entity store for the library service. Holds the three
//! relational tables (books, members, loans) and enforces the integrity
//! constraints at the storage boundary: foreign keys, unique email/isbn,
//! and transactional rollback on any violation.
//!
//! ## Core Types
//!
//! - **[`LibraryDatabase`]**: Database handle with separate read and write connection pools
//! - **[`StoreConfig`]**: Configuration for connection pool settings
//! - **[`WriteTransaction`]**: RAII transaction over the single write connection
//! - **[`Error`]**: Error type for store operations
//!
//! ## Architecture
//!
//! - **Dual pools**: Read-only pool for concurrent queries, single-connection
//!   write pool so every read-check-write sequence is serialized
//! - **WAL mode**: Write-Ahead Logging enabled at connect time
//! - **Embedded schema**: Tables and indexes are applied on connect
//!
//! Query functions live in per-entity modules ([`books`], [`members`],
//! [`loans`]) and take `&mut SqliteConnection`, so the same function runs
//! against a pooled read connection or inside a [`WriteTransaction`].

mod config;
mod database;
mod error;
mod records;
mod transaction;

pub mod books;
pub mod loans;
pub mod members;

// Re-export public types
pub use config::StoreConfig;
pub use database::LibraryDatabase;
pub use error::{Error, Result};
pub use records::{Book, Loan, LoanStatus, Member};
pub use transaction::WriteTransaction;
