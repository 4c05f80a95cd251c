//! Handlers for `/api/v1/loans`: listing and the borrow transition

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;
use time::OffsetDateTime;

use library_store::{Loan, LoanStatus};

use crate::api::AppState;
use crate::error::{Error, Result};
use crate::services;
use crate::validate::BorrowPayload;

/// Response body for a successful borrow.
#[derive(Debug, Serialize)]
pub struct BorrowResponse {
   pub loan_id: i64,
   pub book_id: i64,
   pub member_id: i64,
   #[serde(with = "time::serde::rfc3339")]
   pub borrowed_at: OffsetDateTime,
   pub status: LoanStatus,
   pub message: &'static str,
}

impl From<Loan> for BorrowResponse {
   fn from(loan: Loan) -> Self {
      Self {
         loan_id: loan.id,
         book_id: loan.book_id,
         member_id: loan.member_id,
         borrowed_at: loan.borrowed_at,
         status: loan.status,
         message: "Book borrowed successfully",
      }
   }
}

pub async fn list(State(db): State<AppState>) -> Result<Json<Vec<Loan>>> {
   Ok(Json(services::loans::list(&db).await?))
}

pub async fn borrow(
   State(db): State<AppState>,
   Json(payload): Json<BorrowPayload>,
) -> Result<(StatusCode, Json<BorrowResponse>)> {
   let req = payload.into_request().map_err(Error::Validation)?;
   let loan = services::loans::borrow(&db, req).await?;
   Ok((StatusCode::CREATED, Json(loan.into())))
}
