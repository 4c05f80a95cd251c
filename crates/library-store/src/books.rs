//! Query functions for the `books` table

use sqlx::sqlite::SqliteConnection;
use time::OffsetDateTime;

use crate::error::Result;
use crate::records::Book;

/// Fields required to insert a new book row.
#[derive(Debug, Clone)]
pub struct NewBook {
   pub title: String,
   pub author: String,
   pub isbn: Option<String>,
}

/// Insert a new book and return the stored row.
///
/// New books are always available; fails with a unique violation when the
/// isbn is already taken.
pub async fn insert(conn: &mut SqliteConnection, new: &NewBook, now: OffsetDateTime) -> Result<Book> {
   let result = sqlx::query(
      "INSERT INTO books (title, author, isbn, available, created_at, updated_at) \
       VALUES ($1, $2, $3, 1, $4, $4)",
   )
   .bind(&new.title)
   .bind(&new.author)
   .bind(&new.isbn)
   .bind(now)
   .execute(&mut *conn)
   .await?;

   let id = result.last_insert_rowid();
   let book = fetch_by_id(conn, id).await?;

   // The row was just inserted on this connection
   Ok(book.expect("inserted book row must exist"))
}

/// Fetch all books, oldest first.
pub async fn fetch_all(conn: &mut SqliteConnection) -> Result<Vec<Book>> {
   let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY id")
      .fetch_all(conn)
      .await?;

   Ok(books)
}

/// Fetch a single book by primary key.
pub async fn fetch_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Book>> {
   let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
      .bind(id)
      .fetch_optional(conn)
      .await?;

   Ok(book)
}

/// Write back the mutable fields of a book and bump `updated_at`.
pub async fn update(conn: &mut SqliteConnection, book: &Book, now: OffsetDateTime) -> Result<Book> {
   sqlx::query("UPDATE books SET title = $1, author = $2, isbn = $3, updated_at = $4 WHERE id = $5")
      .bind(&book.title)
      .bind(&book.author)
      .bind(&book.isbn)
      .bind(now)
      .bind(book.id)
      .execute(&mut *conn)
      .await?;

   let book = fetch_by_id(conn, book.id).await?;
   Ok(book.expect("updated book row must exist"))
}

/// Flip the availability flag, bumping `updated_at`.
pub async fn set_available(
   conn: &mut SqliteConnection,
   id: i64,
   available: bool,
   now: OffsetDateTime,
) -> Result<()> {
   sqlx::query("UPDATE books SET available = $1, updated_at = $2 WHERE id = $3")
      .bind(available)
      .bind(now)
      .bind(id)
      .execute(conn)
      .await?;

   Ok(())
}

/// Delete a book row, returning the number of rows removed.
///
/// Loans referencing the book must be removed first or the foreign key
/// constraint fails the enclosing transaction.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<u64> {
   let result = sqlx::query("DELETE FROM books WHERE id = $1")
      .bind(id)
      .execute(conn)
      .await?;

   Ok(result.rows_affected())
}
