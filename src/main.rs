use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use library_api::Config;
use library_store::LibraryDatabase;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
   tracing_subscriber::fmt()
      .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
      .init();

   let config = Config::from_env();

   let db = LibraryDatabase::connect(&config.database_path, None).await?;
   info!("Using library database at {}", db.path().display());

   let listener = TcpListener::bind(config.bind_addr).await?;
   info!("Listening on {}", listener.local_addr()?);

   axum::serve(listener, library_api::router(db)).await?;

   Ok(())
}
