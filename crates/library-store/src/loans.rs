//! Query functions for the `loans` table

use sqlx::sqlite::SqliteConnection;
use time::OffsetDateTime;

use crate::error::Result;
use crate::records::{Loan, LoanStatus};

/// Insert a new active loan and return the stored row.
///
/// Fails with a foreign key violation when the book or member does not exist.
pub async fn insert(
   conn: &mut SqliteConnection,
   book_id: i64,
   member_id: i64,
   now: OffsetDateTime,
) -> Result<Loan> {
   let result = sqlx::query(
      "INSERT INTO loans (book_id, member_id, borrowed_at, returned_at, status) \
       VALUES ($1, $2, $3, NULL, $4)",
   )
   .bind(book_id)
   .bind(member_id)
   .bind(now)
   .bind(LoanStatus::Active)
   .execute(&mut *conn)
   .await?;

   let id = result.last_insert_rowid();
   let loan = fetch_by_id(conn, id).await?;

   // The row was just inserted on this connection
   Ok(loan.expect("inserted loan row must exist"))
}

/// Fetch all loans, oldest first.
pub async fn fetch_all(conn: &mut SqliteConnection) -> Result<Vec<Loan>> {
   let loans = sqlx::query_as::<_, Loan>("SELECT * FROM loans ORDER BY id")
      .fetch_all(conn)
      .await?;

   Ok(loans)
}

/// Fetch a single loan by primary key.
pub async fn fetch_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Loan>> {
   let loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
      .bind(id)
      .fetch_optional(conn)
      .await?;

   Ok(loan)
}

/// Fetch the active loan for a book, if one exists.
///
/// The schema allows at most one by invariant, not by constraint, so this
/// is the authoritative check the borrow path relies on.
pub async fn fetch_active_by_book(conn: &mut SqliteConnection, book_id: i64) -> Result<Option<Loan>> {
   let loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE book_id = $1 AND status = $2")
      .bind(book_id)
      .bind(LoanStatus::Active)
      .fetch_optional(conn)
      .await?;

   Ok(loan)
}

/// Fetch every loan ever opened against a book, oldest first.
pub async fn fetch_by_book(conn: &mut SqliteConnection, book_id: i64) -> Result<Vec<Loan>> {
   let loans = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE book_id = $1 ORDER BY id")
      .bind(book_id)
      .fetch_all(conn)
      .await?;

   Ok(loans)
}

/// Fetch every loan held by a member, oldest first.
pub async fn fetch_by_member(conn: &mut SqliteConnection, member_id: i64) -> Result<Vec<Loan>> {
   let loans = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE member_id = $1 ORDER BY id")
      .bind(member_id)
      .fetch_all(conn)
      .await?;

   Ok(loans)
}

/// Fetch a member's active loans, oldest first.
pub async fn fetch_active_by_member(
   conn: &mut SqliteConnection,
   member_id: i64,
) -> Result<Vec<Loan>> {
   let loans = sqlx::query_as::<_, Loan>(
      "SELECT * FROM loans WHERE member_id = $1 AND status = $2 ORDER BY id",
   )
   .bind(member_id)
   .bind(LoanStatus::Active)
   .fetch_all(conn)
   .await?;

   Ok(loans)
}

/// Transition a loan to `returned`, stamping `returned_at`.
pub async fn mark_returned(
   conn: &mut SqliteConnection,
   id: i64,
   now: OffsetDateTime,
) -> Result<Loan> {
   sqlx::query("UPDATE loans SET status = $1, returned_at = $2 WHERE id = $3")
      .bind(LoanStatus::Returned)
      .bind(now)
      .bind(id)
      .execute(&mut *conn)
      .await?;

   let loan = fetch_by_id(conn, id).await?;
   Ok(loan.expect("returned loan row must exist"))
}

/// Delete every loan referencing a book.
///
/// Used when a book is deleted; the caller is responsible for verifying no
/// active loan exists first.
pub async fn delete_by_book(conn: &mut SqliteConnection, book_id: i64) -> Result<u64> {
   let result = sqlx::query("DELETE FROM loans WHERE book_id = $1")
      .bind(book_id)
      .execute(conn)
      .await?;

   Ok(result.rows_affected())
}

/// Delete every loan referencing a member.
pub async fn delete_by_member(conn: &mut SqliteConnection, member_id: i64) -> Result<u64> {
   let result = sqlx::query("DELETE FROM loans WHERE member_id = $1")
      .bind(member_id)
      .execute(conn)
      .await?;

   Ok(result.rows_affected())
}
