//! SQLite database with connection pooling and serialized write access

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::transaction::WriteTransaction;

/// Embedded schema, applied on every connect. `IF NOT EXISTS` keeps it
/// idempotent across restarts.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS books (
   id         INTEGER PRIMARY KEY AUTOINCREMENT,
   title      TEXT NOT NULL,
   author     TEXT NOT NULL,
   isbn       TEXT UNIQUE,
   available  INTEGER NOT NULL DEFAULT 1,
   created_at TEXT NOT NULL,
   updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS members (
   id         INTEGER PRIMARY KEY AUTOINCREMENT,
   name       TEXT NOT NULL,
   email      TEXT NOT NULL UNIQUE,
   phone      TEXT,
   created_at TEXT NOT NULL,
   updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS loans (
   id          INTEGER PRIMARY KEY AUTOINCREMENT,
   book_id     INTEGER NOT NULL REFERENCES books(id),
   member_id   INTEGER NOT NULL REFERENCES members(id),
   borrowed_at TEXT NOT NULL,
   returned_at TEXT,
   status      TEXT NOT NULL DEFAULT 'active'
);

CREATE INDEX IF NOT EXISTS idx_loans_book_status ON loans(book_id, status);
CREATE INDEX IF NOT EXISTS idx_loans_member_status ON loans(member_id, status);
"#;

/// SQLite database handle for the library's entity store.
///
/// ## Architecture
///
/// The database maintains two connection pools:
/// - **`read_pool`**: Pool of connections for concurrent reads
/// - **`write_conn`**: Single-connection pool for exclusive write access
///   (enforced by max_connections=1)
///
/// Serializing writes through one connection is what makes the borrow
/// workflow's read-check-write sequence safe under concurrent requests:
/// only one writer can hold the connection at a time, and
/// [`WriteTransaction`] opens `BEGIN IMMEDIATE` on it.
#[derive(Debug)]
pub struct LibraryDatabase {
   /// Pool of connections for concurrent reads
   read_pool: Pool<Sqlite>,

   /// Single read-write connection pool (max_connections=1) for serialized writes
   write_conn: Pool<Sqlite>,

   /// Marks database as closed to prevent further operations
   closed: AtomicBool,

   /// Path to the database file (used for logging and cleanup)
   path: PathBuf,
}

impl LibraryDatabase {
   /// Connect to (or create) the SQLite database at `path` and apply the schema.
   pub async fn connect(path: impl AsRef<Path>, config: Option<StoreConfig>) -> Result<Arc<Self>> {
      let config = config.unwrap_or_default();
      let path = path.as_ref().to_path_buf();

      let options = SqliteConnectOptions::new()
         .filename(&path)
         .create_if_missing(true)
         .foreign_keys(true)
         .journal_mode(SqliteJournalMode::Wal);

      // Write pool first: it creates the file and applies the schema before
      // any reader connects.
      let write_conn = SqlitePoolOptions::new()
         .max_connections(1)
         .idle_timeout(config.idle_timeout)
         .connect_with(options.clone())
         .await?;

      sqlx::raw_sql(SCHEMA).execute(&write_conn).await?;

      let read_pool = SqlitePoolOptions::new()
         .max_connections(config.max_read_connections)
         .idle_timeout(config.idle_timeout)
         .connect_with(options)
         .await?;

      debug!("Connected to library database at {}", path.display());

      Ok(Arc::new(Self {
         read_pool,
         write_conn,
         closed: AtomicBool::new(false),
         path,
      }))
   }

   /// Path of the underlying database file.
   pub fn path(&self) -> &Path {
      &self.path
   }

   /// Access the read pool for queries.
   pub fn read_pool(&self) -> Result<&Pool<Sqlite>> {
      self.ensure_open()?;
      Ok(&self.read_pool)
   }

   /// Acquire a connection from the read pool.
   pub async fn read_conn(&self) -> Result<PoolConnection<Sqlite>> {
      self.ensure_open()?;
      Ok(self.read_pool.acquire().await?)
   }

   /// Acquire the single write connection.
   ///
   /// Because the write pool holds exactly one connection, this call blocks
   /// until any other writer has released it.
   pub async fn acquire_writer(&self) -> Result<PoolConnection<Sqlite>> {
      self.ensure_open()?;
      Ok(self.write_conn.acquire().await?)
   }

   /// Acquire the writer and begin an immediate transaction on it.
   ///
   /// The returned [`WriteTransaction`] rolls back automatically when dropped
   /// without an explicit `commit()`.
   pub async fn begin_write(&self) -> Result<WriteTransaction> {
      let writer = self.acquire_writer().await?;
      WriteTransaction::begin(writer).await
   }

   /// Close both pools. Further operations fail with [`Error::DatabaseClosed`].
   pub async fn close(&self) -> Result<()> {
      if self.closed.swap(true, Ordering::SeqCst) {
         return Err(Error::DatabaseClosed);
      }

      self.read_pool.close().await;
      self.write_conn.close().await;

      debug!("Closed library database at {}", self.path.display());
      Ok(())
   }

   fn ensure_open(&self) -> Result<()> {
      if self.closed.load(Ordering::SeqCst) {
         return Err(Error::DatabaseClosed);
      }
      Ok(())
   }
}
