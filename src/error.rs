//! Domain error type and its HTTP mapping

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use crate::validate::FieldErrors;

/// Result type alias for service and handler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the domain services.
///
/// This is the single propagation mechanism for the whole service: storage
/// integrity violations are translated into the matching conflict variant at
/// the service boundary, and the API layer maps each variant to a status
/// code. Display strings double as the client-facing `message` field.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// No book with the requested id.
   #[error("Book not found")]
   BookNotFound,

   /// No member with the requested id.
   #[error("Member not found")]
   MemberNotFound,

   /// No loan with the requested id.
   #[error("Loan not found")]
   LoanNotFound,

   /// The book's availability flag is down.
   #[error("Book is not available for borrowing")]
   BookNotAvailable,

   /// An active loan already references the book.
   #[error("Book is already borrowed")]
   BookAlreadyBorrowed,

   /// The loan has already been closed.
   #[error("Book has already been returned")]
   AlreadyReturned,

   /// Another member is registered with this email.
   #[error("Email already exists")]
   EmailExists,

   /// Another book carries this isbn.
   #[error("ISBN already exists")]
   IsbnExists,

   /// Book deletion blocked by an open loan.
   #[error("Cannot delete book with active loans")]
   BookHasActiveLoans,

   /// Member deletion blocked by an open loan.
   #[error("Cannot delete member with active loans")]
   MemberHasActiveLoans,

   /// Field-level validation failures on the inbound payload.
   #[error("Validation error")]
   Validation(FieldErrors),

   /// Error from the entity store that no domain rule accounts for.
   #[error(transparent)]
   Store(#[from] library_store::Error),
}

impl Error {
   /// Extract a structured error code from the error type.
   ///
   /// This provides machine-readable error codes for error handling.
   pub fn error_code(&self) -> &'static str {
      match self {
         Error::BookNotFound => "BOOK_NOT_FOUND",
         Error::MemberNotFound => "MEMBER_NOT_FOUND",
         Error::LoanNotFound => "LOAN_NOT_FOUND",
         Error::BookNotAvailable => "BOOK_NOT_AVAILABLE",
         Error::BookAlreadyBorrowed => "BOOK_ALREADY_BORROWED",
         Error::AlreadyReturned => "ALREADY_RETURNED",
         Error::EmailExists => "EMAIL_EXISTS",
         Error::IsbnExists => "ISBN_EXISTS",
         Error::BookHasActiveLoans => "BOOK_HAS_ACTIVE_LOANS",
         Error::MemberHasActiveLoans => "MEMBER_HAS_ACTIVE_LOANS",
         Error::Validation(_) => "VALIDATION_ERROR",
         Error::Store(_) => "STORE_ERROR",
      }
   }

   /// The HTTP status this error maps to: not-found 404, conflict and
   /// uniqueness 409, validation 400, anything unexpected 500.
   pub fn status(&self) -> StatusCode {
      match self {
         Error::BookNotFound | Error::MemberNotFound | Error::LoanNotFound => {
            StatusCode::NOT_FOUND
         }
         Error::BookNotAvailable
         | Error::BookAlreadyBorrowed
         | Error::AlreadyReturned
         | Error::EmailExists
         | Error::IsbnExists
         | Error::BookHasActiveLoans
         | Error::MemberHasActiveLoans => StatusCode::CONFLICT,
         Error::Validation(_) => StatusCode::BAD_REQUEST,
         Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
      }
   }
}

impl IntoResponse for Error {
   fn into_response(self) -> Response {
      let status = self.status();

      let body = match &self {
         Error::Validation(errors) => json!({
            "message": "Validation error",
            "errors": errors,
         }),
         Error::Store(err) => {
            // Storage details stay out of responses
            error!("store error: {err}");
            json!({ "message": "An unexpected error occurred" })
         }
         other => json!({ "message": other.to_string() }),
      };

      (status, Json(body)).into_response()
   }
}
