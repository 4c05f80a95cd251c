//! # library-api
//!
//! HTTP record-keeping service for a lending library: books, members, and
//! loan transactions over a JSON API backed by [`library_store`].
//!
//! ## Layers
//!
//! - **[`validate`]**: field-level payload checks producing typed records
//! - **[`services`]**: business rules — uniqueness conflicts, delete guards,
//!   and the borrow/return state machine
//! - **[`api`]**: axum handlers translating service results and [`Error`]
//!   values to HTTP responses
//!
//! Build a router with [`api::router`] and serve it with axum; the binary in
//! `main.rs` wires this up from [`config::Config`].

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod validate;

pub use api::router;
pub use config::Config;
pub use error::{Error, Result};
