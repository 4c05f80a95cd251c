//! Error types for library-store

use thiserror::Error;

/// Errors that may occur when working with the entity store
#[derive(Error, Debug)]
pub enum Error {
   /// IO error when accessing database files. Standard library IO errors
   /// are converted to this variant.
   #[error("IO error: {0}")]
   Io(#[from] std::io::Error),

   /// Error from the sqlx library. Standard sqlx errors are converted to this variant
   #[error("Sqlx error: {0}")]
   Sqlx(#[from] sqlx::Error),

   /// Database has been closed and cannot be used
   #[error("Database has been closed")]
   DatabaseClosed,
}

/// A type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
   /// True when the error is a UNIQUE constraint violation on the given
   /// qualified column (e.g. `members.email`).
   ///
   /// SQLite reports these as `UNIQUE constraint failed: table.column`, so
   /// callers can classify which uniqueness rule was broken and surface a
   /// domain conflict instead of a raw storage error.
   pub fn is_unique_violation_on(&self, column: &str) -> bool {
      match self {
         Error::Sqlx(sqlx::Error::Database(db_err)) => {
            db_err.is_unique_violation() && db_err.message().contains(column)
         }
         _ => false,
      }
   }

   /// True when the error is a FOREIGN KEY constraint violation.
   pub fn is_foreign_key_violation(&self) -> bool {
      match self {
         Error::Sqlx(sqlx::Error::Database(db_err)) => db_err.is_foreign_key_violation(),
         _ => false,
      }
   }
}
