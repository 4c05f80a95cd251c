//! Book CRUD and the active-loan delete guard

use sqlx::sqlite::SqliteConnection;
use time::OffsetDateTime;
use tracing::{debug, error};

use library_store::books::NewBook;
use library_store::{Book, LibraryDatabase, Loan, books, loans};

use crate::error::{Error, Result};
use crate::validate::BookPatch;

/// List every book in the catalog.
pub async fn list(db: &LibraryDatabase) -> Result<Vec<Book>> {
   let mut conn = db.read_conn().await?;
   Ok(books::fetch_all(&mut conn).await?)
}

/// Fetch one book by id.
pub async fn get(db: &LibraryDatabase, id: i64) -> Result<Book> {
   let mut conn = db.read_conn().await?;
   books::fetch_by_id(&mut conn, id)
      .await?
      .ok_or(Error::BookNotFound)
}

/// Create a book. The unique-isbn constraint is enforced by the store and
/// translated here.
pub async fn create(db: &LibraryDatabase, new: NewBook) -> Result<Book> {
   let mut writer = db.acquire_writer().await?;
   let now = OffsetDateTime::now_utc();

   match books::insert(&mut writer, &new, now).await {
      Ok(book) => {
         debug!(id = book.id, "created book");
         Ok(book)
      }
      Err(err) if err.is_unique_violation_on("books.isbn") => Err(Error::IsbnExists),
      Err(err) => Err(err.into()),
   }
}

/// Apply a partial update to a book.
///
/// The fetch and the write both run on the single writer connection, so two
/// concurrent updates cannot interleave their read-modify-write cycles.
pub async fn update(db: &LibraryDatabase, id: i64, patch: BookPatch) -> Result<Book> {
   let mut writer = db.acquire_writer().await?;
   let now = OffsetDateTime::now_utc();

   let mut book = books::fetch_by_id(&mut writer, id)
      .await?
      .ok_or(Error::BookNotFound)?;

   if let Some(title) = patch.title {
      book.title = title;
   }
   if let Some(author) = patch.author {
      book.author = author;
   }
   if let Some(isbn) = patch.isbn {
      book.isbn = Some(isbn);
   }

   match books::update(&mut writer, &book, now).await {
      Ok(book) => Ok(book),
      Err(err) if err.is_unique_violation_on("books.isbn") => Err(Error::IsbnExists),
      Err(err) => Err(err.into()),
   }
}

/// Delete a book along with its returned-loan history.
///
/// Blocked while an active loan references the book; the check and both
/// deletes commit as one transaction so a concurrent borrow cannot slip in
/// between them.
pub async fn delete(db: &LibraryDatabase, id: i64) -> Result<()> {
   let mut tx = db.begin_write().await?;
   let result = delete_in_tx(tx.conn(), id).await;

   match result {
      Ok(()) => {
         tx.commit().await?;
         debug!(id, "deleted book");
         Ok(())
      }
      Err(err) => {
         if let Err(rollback_err) = tx.rollback().await {
            error!("rollback failed after book delete error: {rollback_err}");
         }
         Err(err)
      }
   }
}

async fn delete_in_tx(conn: &mut SqliteConnection, id: i64) -> Result<()> {
   books::fetch_by_id(conn, id).await?.ok_or(Error::BookNotFound)?;

   if loans::fetch_active_by_book(conn, id).await?.is_some() {
      return Err(Error::BookHasActiveLoans);
   }

   loans::delete_by_book(conn, id).await?;
   books::delete(conn, id).await?;
   Ok(())
}

/// Every loan ever opened against a book, oldest first.
pub async fn loan_history(db: &LibraryDatabase, id: i64) -> Result<Vec<Loan>> {
   let mut conn = db.read_conn().await?;

   books::fetch_by_id(&mut conn, id)
      .await?
      .ok_or(Error::BookNotFound)?;

   Ok(loans::fetch_by_book(&mut conn, id).await?)
}
