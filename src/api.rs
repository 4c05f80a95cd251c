//! HTTP resource handlers and router assembly

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use library_store::LibraryDatabase;

pub mod books;
pub mod loans;
pub mod members;
pub mod returns;

/// Shared handler state: the entity store handle.
pub type AppState = Arc<LibraryDatabase>;

/// Build the full API router over the given store.
pub fn router(db: AppState) -> Router {
   Router::new()
      .route("/api/v1/books", get(books::list).post(books::create))
      .route(
         "/api/v1/books/{id}",
         get(books::get).put(books::update).delete(books::remove),
      )
      .route("/api/v1/books/{id}/loans", get(books::loan_history))
      .route("/api/v1/members", get(members::list).post(members::create))
      .route(
         "/api/v1/members/{id}",
         get(members::get).put(members::update).delete(members::remove),
      )
      .route("/api/v1/members/{id}/loans", get(members::loans))
      .route("/api/v1/loans", get(loans::list).post(loans::borrow))
      .route("/api/v1/returns", post(returns::return_book))
      .route("/health", get(health))
      .with_state(db)
}

/// Liveness probe.
async fn health() -> Json<Value> {
   Json(json!({
      "status": "healthy",
      "message": "Library API is running",
   }))
}
