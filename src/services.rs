//! Domain services: business rules atop the entity store
//!
//! Each module wraps the store's query functions with the rules the store
//! cannot express on its own: uniqueness conflicts surfaced as domain
//! errors, delete guards, and the borrow/return state machine. Every
//! operation returns `Result<_, Error>`; nothing panics across this
//! boundary.

pub mod books;
pub mod loans;
pub mod members;
