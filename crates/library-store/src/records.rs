//! Record types for the three entity tables

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A book in the catalog.
///
/// `available` is a denormalized cache of "no active loan references this
/// book"; every path that opens or closes a loan must keep the two in sync.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
   pub id: i64,
   pub title: String,
   pub author: String,
   pub isbn: Option<String>,
   pub available: bool,
   #[serde(with = "time::serde::rfc3339")]
   pub created_at: OffsetDateTime,
   #[serde(with = "time::serde::rfc3339")]
   pub updated_at: OffsetDateTime,
}

/// A registered library member.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Member {
   pub id: i64,
   pub name: String,
   pub email: String,
   pub phone: Option<String>,
   #[serde(with = "time::serde::rfc3339")]
   pub created_at: OffsetDateTime,
   #[serde(with = "time::serde::rfc3339")]
   pub updated_at: OffsetDateTime,
}

/// A loan transaction linking a book to a member.
///
/// Created only by a successful borrow; leaves the `Active` state exactly
/// once, via return. `returned_at` is set iff `status` is `Returned`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Loan {
   pub id: i64,
   pub book_id: i64,
   pub member_id: i64,
   #[serde(with = "time::serde::rfc3339")]
   pub borrowed_at: OffsetDateTime,
   #[serde(with = "time::serde::rfc3339::option")]
   pub returned_at: Option<OffsetDateTime>,
   pub status: LoanStatus,
}

/// Loan lifecycle state, stored as lowercase TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum LoanStatus {
   Active,
   Returned,
}

impl Loan {
   pub fn is_active(&self) -> bool {
      self.status == LoanStatus::Active
   }
}
