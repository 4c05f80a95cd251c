//! The borrow/return state machine
//!
//! A loan is created only by a successful borrow and leaves the active state
//! exactly once, via return. Each transition performs two writes (the loan
//! row and the book's availability flag) inside one immediate transaction on
//! the store's single writer connection, so concurrent transitions on the
//! same book serialize and at most one can succeed.

use sqlx::sqlite::SqliteConnection;
use time::OffsetDateTime;
use tracing::{debug, error};

use library_store::{LibraryDatabase, Loan, books, loans, members};

use crate::error::{Error, Result};
use crate::validate::BorrowRequest;

/// List every loan, active and returned.
pub async fn list(db: &LibraryDatabase) -> Result<Vec<Loan>> {
   let mut conn = db.read_conn().await?;
   Ok(loans::fetch_all(&mut conn).await?)
}

/// Borrow a book: open an active loan and mark the book unavailable.
///
/// Guard order matters for the client contract: missing book, missing
/// member, availability flag, then the active-loan double-check. The last
/// guard is defensive; it catches any divergence between the flag and the
/// loan table rather than compounding it.
pub async fn borrow(db: &LibraryDatabase, req: BorrowRequest) -> Result<Loan> {
   let mut tx = db.begin_write().await?;
   let result = borrow_in_tx(tx.conn(), req).await;

   match result {
      Ok(loan) => {
         tx.commit().await?;
         debug!(loan = loan.id, book = loan.book_id, member = loan.member_id, "book borrowed");
         Ok(loan)
      }
      Err(err) => {
         if let Err(rollback_err) = tx.rollback().await {
            error!("rollback failed after borrow error: {rollback_err}");
         }
         Err(err)
      }
   }
}

async fn borrow_in_tx(conn: &mut SqliteConnection, req: BorrowRequest) -> Result<Loan> {
   let book = books::fetch_by_id(conn, req.book_id)
      .await?
      .ok_or(Error::BookNotFound)?;

   members::fetch_by_id(conn, req.member_id)
      .await?
      .ok_or(Error::MemberNotFound)?;

   if !book.available {
      return Err(Error::BookNotAvailable);
   }

   if loans::fetch_active_by_book(conn, req.book_id).await?.is_some() {
      return Err(Error::BookAlreadyBorrowed);
   }

   let now = OffsetDateTime::now_utc();
   let loan = loans::insert(conn, req.book_id, req.member_id, now).await?;
   books::set_available(conn, req.book_id, false, now).await?;

   Ok(loan)
}

/// Return a borrowed book: close the loan and mark the book available again.
pub async fn return_book(db: &LibraryDatabase, loan_id: i64) -> Result<Loan> {
   let mut tx = db.begin_write().await?;
   let result = return_in_tx(tx.conn(), loan_id).await;

   match result {
      Ok(loan) => {
         tx.commit().await?;
         debug!(loan = loan.id, book = loan.book_id, "book returned");
         Ok(loan)
      }
      Err(err) => {
         if let Err(rollback_err) = tx.rollback().await {
            error!("rollback failed after return error: {rollback_err}");
         }
         Err(err)
      }
   }
}

async fn return_in_tx(conn: &mut SqliteConnection, loan_id: i64) -> Result<Loan> {
   let loan = loans::fetch_by_id(conn, loan_id)
      .await?
      .ok_or(Error::LoanNotFound)?;

   if !loan.is_active() {
      return Err(Error::AlreadyReturned);
   }

   let now = OffsetDateTime::now_utc();
   let loan = loans::mark_returned(conn, loan_id, now).await?;
   books::set_available(conn, loan.book_id, true, now).await?;

   Ok(loan)
}
