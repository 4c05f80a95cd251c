//! Field-level validation of inbound payloads
//!
//! Payload structs deserialize with every field optional, then `create` /
//! `update` conversions check presence, length, and format and produce the
//! typed records the services consume. Cross-field rules (availability,
//! uniqueness, active-loan checks) live in the services, not here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use library_store::books::NewBook;
use library_store::members::NewMember;

/// Accumulated validation failures, keyed by field name.
///
/// Serializes as `{"field": ["message", ...]}` in error responses.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
   pub fn push(&mut self, field: &str, message: impl Into<String>) {
      self.0.entry(field.to_string()).or_default().push(message.into());
   }

   pub fn is_empty(&self) -> bool {
      self.0.is_empty()
   }

   /// Messages recorded for a field, if any.
   pub fn get(&self, field: &str) -> Option<&[String]> {
      self.0.get(field).map(Vec::as_slice)
   }

   fn finish(self) -> Result<(), FieldErrors> {
      if self.is_empty() { Ok(()) } else { Err(self) }
   }
}

fn require<'a>(
   errors: &mut FieldErrors,
   field: &str,
   value: Option<&'a str>,
) -> Option<&'a str> {
   if value.is_none() {
      errors.push(field, "Missing data for required field.");
   }
   value
}

fn check_length(errors: &mut FieldErrors, field: &str, value: &str, min: usize, max: usize) {
   let len = value.chars().count();
   if len < min || len > max {
      errors.push(field, format!("Length must be between {min} and {max}."));
   }
}

fn check_max_length(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
   if value.chars().count() > max {
      errors.push(field, format!("Longer than maximum length {max}."));
   }
}

fn check_email(errors: &mut FieldErrors, field: &str, value: &str) {
   if !is_valid_email(value) {
      errors.push(field, "Not a valid email address.");
   }
}

/// Syntactic email check: one `@`, non-empty local part, dotted domain,
/// no whitespace. Deliverability is not this service's problem.
fn is_valid_email(value: &str) -> bool {
   if value.chars().any(char::is_whitespace) {
      return false;
   }
   let Some((local, domain)) = value.split_once('@') else {
      return false;
   };
   if local.is_empty() || domain.contains('@') {
      return false;
   }
   match domain.rsplit_once('.') {
      Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
      None => false,
   }
}

/// Partial update for a book; only provided fields are applied.
#[derive(Debug, Default, Clone)]
pub struct BookPatch {
   pub title: Option<String>,
   pub author: Option<String>,
   pub isbn: Option<String>,
}

/// Raw book payload as received from the client.
#[derive(Debug, Default, Deserialize)]
pub struct BookPayload {
   pub title: Option<String>,
   pub author: Option<String>,
   pub isbn: Option<String>,
}

impl BookPayload {
   /// Validate in create mode: title and author required.
   pub fn into_create(self) -> Result<NewBook, FieldErrors> {
      let mut errors = FieldErrors::default();

      if let Some(title) = require(&mut errors, "title", self.title.as_deref()) {
         check_length(&mut errors, "title", title, 1, 200);
      }
      if let Some(author) = require(&mut errors, "author", self.author.as_deref()) {
         check_length(&mut errors, "author", author, 1, 100);
      }
      if let Some(isbn) = self.isbn.as_deref() {
         check_max_length(&mut errors, "isbn", isbn, 20);
      }

      errors.finish()?;
      Ok(NewBook {
         title: self.title.unwrap_or_default(),
         author: self.author.unwrap_or_default(),
         isbn: self.isbn,
      })
   }

   /// Validate in update mode: only provided fields are checked.
   pub fn into_patch(self) -> Result<BookPatch, FieldErrors> {
      let mut errors = FieldErrors::default();

      if let Some(title) = self.title.as_deref() {
         check_length(&mut errors, "title", title, 1, 200);
      }
      if let Some(author) = self.author.as_deref() {
         check_length(&mut errors, "author", author, 1, 100);
      }
      if let Some(isbn) = self.isbn.as_deref() {
         check_max_length(&mut errors, "isbn", isbn, 20);
      }

      errors.finish()?;
      Ok(BookPatch {
         title: self.title,
         author: self.author,
         isbn: self.isbn,
      })
   }
}

/// Partial update for a member; only provided fields are applied.
#[derive(Debug, Default, Clone)]
pub struct MemberPatch {
   pub name: Option<String>,
   pub email: Option<String>,
   pub phone: Option<String>,
}

/// Raw member payload as received from the client.
#[derive(Debug, Default, Deserialize)]
pub struct MemberPayload {
   pub name: Option<String>,
   pub email: Option<String>,
   pub phone: Option<String>,
}

impl MemberPayload {
   /// Validate in create mode: name and email required.
   pub fn into_create(self) -> Result<NewMember, FieldErrors> {
      let mut errors = FieldErrors::default();

      if let Some(name) = require(&mut errors, "name", self.name.as_deref()) {
         check_length(&mut errors, "name", name, 1, 100);
      }
      if let Some(email) = require(&mut errors, "email", self.email.as_deref()) {
         check_email(&mut errors, "email", email);
         check_max_length(&mut errors, "email", email, 120);
      }
      if let Some(phone) = self.phone.as_deref() {
         check_max_length(&mut errors, "phone", phone, 20);
      }

      errors.finish()?;
      Ok(NewMember {
         name: self.name.unwrap_or_default(),
         email: self.email.unwrap_or_default(),
         phone: self.phone,
      })
   }

   /// Validate in update mode: only provided fields are checked.
   pub fn into_patch(self) -> Result<MemberPatch, FieldErrors> {
      let mut errors = FieldErrors::default();

      if let Some(name) = self.name.as_deref() {
         check_length(&mut errors, "name", name, 1, 100);
      }
      if let Some(email) = self.email.as_deref() {
         check_email(&mut errors, "email", email);
         check_max_length(&mut errors, "email", email, 120);
      }
      if let Some(phone) = self.phone.as_deref() {
         check_max_length(&mut errors, "phone", phone, 20);
      }

      errors.finish()?;
      Ok(MemberPatch {
         name: self.name,
         email: self.email,
         phone: self.phone,
      })
   }
}

/// Validated borrow request.
#[derive(Debug, Clone, Copy)]
pub struct BorrowRequest {
   pub book_id: i64,
   pub member_id: i64,
}

/// Raw borrow payload as received from the client.
#[derive(Debug, Default, Deserialize)]
pub struct BorrowPayload {
   pub book_id: Option<i64>,
   pub member_id: Option<i64>,
}

impl BorrowPayload {
   pub fn into_request(self) -> Result<BorrowRequest, FieldErrors> {
      let mut errors = FieldErrors::default();

      if self.book_id.is_none() {
         errors.push("book_id", "Missing data for required field.");
      }
      if self.member_id.is_none() {
         errors.push("member_id", "Missing data for required field.");
      }

      errors.finish()?;
      Ok(BorrowRequest {
         book_id: self.book_id.unwrap_or_default(),
         member_id: self.member_id.unwrap_or_default(),
      })
   }
}

/// Raw return payload as received from the client.
#[derive(Debug, Default, Deserialize)]
pub struct ReturnPayload {
   pub loan_id: Option<i64>,
}

impl ReturnPayload {
   pub fn into_loan_id(self) -> Result<i64, FieldErrors> {
      match self.loan_id {
         Some(id) => Ok(id),
         None => {
            let mut errors = FieldErrors::default();
            errors.push("loan_id", "Missing data for required field.");
            Err(errors)
         }
      }
   }
}
