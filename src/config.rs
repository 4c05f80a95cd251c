//! Environment-driven service configuration

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Runtime configuration for the service.
///
/// # Environment
///
/// - `LIBRARY_DB`: path to the SQLite database file (default `library.db`,
///   created on first start)
/// - `LIBRARY_ADDR`: socket address to bind (default `127.0.0.1:5000`)
#[derive(Debug, Clone)]
pub struct Config {
   /// Path to the SQLite database file
   pub database_path: PathBuf,

   /// Address the HTTP listener binds to
   pub bind_addr: SocketAddr,
}

impl Default for Config {
   fn default() -> Self {
      Self {
         database_path: PathBuf::from("library.db"),
         bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
      }
   }
}

impl Config {
   /// Load configuration from the environment, falling back to defaults for
   /// unset or unparseable values.
   pub fn from_env() -> Self {
      let defaults = Self::default();

      let database_path = env::var("LIBRARY_DB")
         .map(PathBuf::from)
         .unwrap_or(defaults.database_path);

      let bind_addr = env::var("LIBRARY_ADDR")
         .ok()
         .and_then(|addr| addr.parse().ok())
         .unwrap_or(defaults.bind_addr);

      Self {
         database_path,
         bind_addr,
      }
   }
}
