//! Handlers for `/api/v1/books`

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

use library_store::{Book, Loan};

use crate::api::AppState;
use crate::error::{Error, Result};
use crate::services;
use crate::validate::BookPayload;

pub async fn list(State(db): State<AppState>) -> Result<Json<Vec<Book>>> {
   Ok(Json(services::books::list(&db).await?))
}

pub async fn create(
   State(db): State<AppState>,
   Json(payload): Json<BookPayload>,
) -> Result<(StatusCode, Json<Book>)> {
   let new = payload.into_create().map_err(Error::Validation)?;
   let book = services::books::create(&db, new).await?;
   Ok((StatusCode::CREATED, Json(book)))
}

pub async fn get(State(db): State<AppState>, Path(id): Path<i64>) -> Result<Json<Book>> {
   Ok(Json(services::books::get(&db, id).await?))
}

pub async fn update(
   State(db): State<AppState>,
   Path(id): Path<i64>,
   Json(payload): Json<BookPayload>,
) -> Result<Json<Book>> {
   let patch = payload.into_patch().map_err(Error::Validation)?;
   Ok(Json(services::books::update(&db, id, patch).await?))
}

pub async fn remove(State(db): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
   services::books::delete(&db, id).await?;
   Ok(Json(json!({ "message": "Book deleted successfully" })))
}

pub async fn loan_history(
   State(db): State<AppState>,
   Path(id): Path<i64>,
) -> Result<Json<Vec<Loan>>> {
   Ok(Json(services::books::loan_history(&db, id).await?))
}
