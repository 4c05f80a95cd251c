//! Configuration for the store's SQLite connection pools

use std::time::Duration;

/// Configuration for LibraryDatabase connection pools
///
/// # Examples
///
/// ```
/// use library_store::StoreConfig;
/// use std::time::Duration;
///
/// // Use defaults
/// let config = StoreConfig::default();
///
/// // Override just one field
/// let config = StoreConfig {
///     max_read_connections: 3,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
   /// Maximum number of concurrent read connections
   ///
   /// This controls the size of the read-only connection pool.
   /// Higher values allow more concurrent read queries but consume more resources.
   ///
   /// Default: 6
   pub max_read_connections: u32,

   /// Idle timeout for both read and write connections
   ///
   /// Connections that remain idle for this duration will be closed automatically.
   ///
   /// Default: 30 seconds
   pub idle_timeout: Duration,
}

impl Default for StoreConfig {
   fn default() -> Self {
      Self {
         max_read_connections: 6,
         idle_timeout: Duration::from_secs(30),
      }
   }
}
