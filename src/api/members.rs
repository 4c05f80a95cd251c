//! Handlers for `/api/v1/members`

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use library_store::{Loan, Member};

use crate::api::AppState;
use crate::error::{Error, Result};
use crate::services;
use crate::validate::MemberPayload;

pub async fn list(State(db): State<AppState>) -> Result<Json<Vec<Member>>> {
   Ok(Json(services::members::list(&db).await?))
}

pub async fn create(
   State(db): State<AppState>,
   Json(payload): Json<MemberPayload>,
) -> Result<(StatusCode, Json<Member>)> {
   let new = payload.into_create().map_err(Error::Validation)?;
   let member = services::members::create(&db, new).await?;
   Ok((StatusCode::CREATED, Json(member)))
}

pub async fn get(State(db): State<AppState>, Path(id): Path<i64>) -> Result<Json<Member>> {
   Ok(Json(services::members::get(&db, id).await?))
}

pub async fn update(
   State(db): State<AppState>,
   Path(id): Path<i64>,
   Json(payload): Json<MemberPayload>,
) -> Result<Json<Member>> {
   let patch = payload.into_patch().map_err(Error::Validation)?;
   Ok(Json(services::members::update(&db, id, patch).await?))
}

pub async fn remove(State(db): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
   services::members::delete(&db, id).await?;
   Ok(Json(json!({ "message": "Member deleted successfully" })))
}

/// Filter for a member's loan listing; `?status=active` narrows to open loans.
#[derive(Debug, Default, Deserialize)]
pub struct LoanFilter {
   pub status: Option<String>,
}

pub async fn loans(
   State(db): State<AppState>,
   Path(id): Path<i64>,
   Query(filter): Query<LoanFilter>,
) -> Result<Json<Vec<Loan>>> {
   let active_only = filter.status.as_deref() == Some("active");
   Ok(Json(services::members::member_loans(&db, id, active_only).await?))
}
