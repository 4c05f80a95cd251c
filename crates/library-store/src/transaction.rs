//! Transaction management over the single write connection

use sqlx::Sqlite;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::SqliteConnection;
use tracing::debug;

use crate::error::Result;

/// An open `BEGIN IMMEDIATE` transaction on the write connection.
///
/// Holding this struct holds the store's only write connection, so all other
/// writers wait until it is committed, rolled back, or dropped.
#[must_use = "if unused, the transaction is immediately rolled back"]
pub struct WriteTransaction {
   writer: PoolConnection<Sqlite>,
   finalized: bool,
}

impl WriteTransaction {
   /// Begin an immediate transaction on the given writer connection.
   ///
   /// `BEGIN IMMEDIATE` takes the write lock up front, so the checks that
   /// follow inside the transaction see a stable snapshot that no other
   /// writer can invalidate.
   pub(crate) async fn begin(mut writer: PoolConnection<Sqlite>) -> Result<Self> {
      sqlx::query("BEGIN IMMEDIATE").execute(&mut *writer).await?;
      Ok(Self {
         writer,
         finalized: false,
      })
   }

   /// The underlying connection, for running queries inside the transaction.
   pub fn conn(&mut self) -> &mut SqliteConnection {
      &mut self.writer
   }

   /// Commit this transaction.
   pub async fn commit(mut self) -> Result<()> {
      sqlx::query("COMMIT").execute(&mut *self.writer).await?;
      self.finalized = true;
      debug!("Write transaction committed");
      Ok(())
   }

   /// Roll back this transaction.
   pub async fn rollback(mut self) -> Result<()> {
      sqlx::query("ROLLBACK").execute(&mut *self.writer).await?;
      self.finalized = true;
      debug!("Write transaction rolled back");
      Ok(())
   }
}

impl Drop for WriteTransaction {
   fn drop(&mut self) {
      // On drop, the pooled connection is returned to the write pool.
      // SQLite automatically rolls back the open transaction when the
      // connection is reused without an explicit COMMIT.
      if !self.finalized {
         debug!("Dropping uncommitted write transaction (will auto-rollback)");
      }
   }
}
