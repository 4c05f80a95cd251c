//! Handler for `/api/v1/returns`: the return transition

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use time::OffsetDateTime;

use library_store::{Loan, LoanStatus};

use crate::api::AppState;
use crate::error::{Error, Result};
use crate::services;
use crate::validate::ReturnPayload;

/// Response body for a successful return.
#[derive(Debug, Serialize)]
pub struct ReturnResponse {
   pub loan_id: i64,
   pub book_id: i64,
   pub member_id: i64,
   #[serde(with = "time::serde::rfc3339")]
   pub borrowed_at: OffsetDateTime,
   #[serde(with = "time::serde::rfc3339::option")]
   pub returned_at: Option<OffsetDateTime>,
   pub status: LoanStatus,
   pub message: &'static str,
}

impl From<Loan> for ReturnResponse {
   fn from(loan: Loan) -> Self {
      Self {
         loan_id: loan.id,
         book_id: loan.book_id,
         member_id: loan.member_id,
         borrowed_at: loan.borrowed_at,
         returned_at: loan.returned_at,
         status: loan.status,
         message: "Book returned successfully",
      }
   }
}

pub async fn return_book(
   State(db): State<AppState>,
   Json(payload): Json<ReturnPayload>,
) -> Result<Json<ReturnResponse>> {
   let loan_id = payload.into_loan_id().map_err(Error::Validation)?;
   let loan = services::loans::return_book(&db, loan_id).await?;
   Ok(Json(loan.into()))
}
