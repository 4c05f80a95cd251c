//! Member CRUD: email uniqueness and the active-loan delete guard

use sqlx::sqlite::SqliteConnection;
use time::OffsetDateTime;
use tracing::{debug, error};

use library_store::members::NewMember;
use library_store::{LibraryDatabase, Loan, Member, loans, members};

use crate::error::{Error, Result};
use crate::validate::MemberPatch;

/// List every registered member.
pub async fn list(db: &LibraryDatabase) -> Result<Vec<Member>> {
   let mut conn = db.read_conn().await?;
   Ok(members::fetch_all(&mut conn).await?)
}

/// Fetch one member by id.
pub async fn get(db: &LibraryDatabase, id: i64) -> Result<Member> {
   let mut conn = db.read_conn().await?;
   members::fetch_by_id(&mut conn, id)
      .await?
      .ok_or(Error::MemberNotFound)
}

/// Register a member. Email uniqueness is pre-checked on the writer and
/// backed by the store's constraint in case of a race.
pub async fn create(db: &LibraryDatabase, new: NewMember) -> Result<Member> {
   let mut writer = db.acquire_writer().await?;
   let now = OffsetDateTime::now_utc();

   if members::fetch_by_email(&mut writer, &new.email).await?.is_some() {
      return Err(Error::EmailExists);
   }

   match members::insert(&mut writer, &new, now).await {
      Ok(member) => {
         debug!(id = member.id, "registered member");
         Ok(member)
      }
      Err(err) if err.is_unique_violation_on("members.email") => Err(Error::EmailExists),
      Err(err) => Err(err.into()),
   }
}

/// Apply a partial update to a member, re-checking email uniqueness when the
/// email changes.
pub async fn update(db: &LibraryDatabase, id: i64, patch: MemberPatch) -> Result<Member> {
   let mut writer = db.acquire_writer().await?;
   let now = OffsetDateTime::now_utc();

   let mut member = members::fetch_by_id(&mut writer, id)
      .await?
      .ok_or(Error::MemberNotFound)?;

   if let Some(email) = &patch.email
      && email != &member.email
      && members::fetch_by_email(&mut writer, email).await?.is_some()
   {
      return Err(Error::EmailExists);
   }

   if let Some(name) = patch.name {
      member.name = name;
   }
   if let Some(email) = patch.email {
      member.email = email;
   }
   if let Some(phone) = patch.phone {
      member.phone = Some(phone);
   }

   match members::update(&mut writer, &member, now).await {
      Ok(member) => Ok(member),
      Err(err) if err.is_unique_violation_on("members.email") => Err(Error::EmailExists),
      Err(err) => Err(err.into()),
   }
}

/// Delete a member along with their returned-loan history.
///
/// Symmetric with book deletion: blocked while the member holds an active
/// loan, and the guard and deletes commit as one transaction.
pub async fn delete(db: &LibraryDatabase, id: i64) -> Result<()> {
   let mut tx = db.begin_write().await?;
   let result = delete_in_tx(tx.conn(), id).await;

   match result {
      Ok(()) => {
         tx.commit().await?;
         debug!(id, "deleted member");
         Ok(())
      }
      Err(err) => {
         if let Err(rollback_err) = tx.rollback().await {
            error!("rollback failed after member delete error: {rollback_err}");
         }
         Err(err)
      }
   }
}

async fn delete_in_tx(conn: &mut SqliteConnection, id: i64) -> Result<()> {
   members::fetch_by_id(conn, id).await?.ok_or(Error::MemberNotFound)?;

   if !loans::fetch_active_by_member(conn, id).await?.is_empty() {
      return Err(Error::MemberHasActiveLoans);
   }

   loans::delete_by_member(conn, id).await?;
   members::delete(conn, id).await?;
   Ok(())
}

/// A member's loans, optionally narrowed to the active ones.
pub async fn member_loans(db: &LibraryDatabase, id: i64, active_only: bool) -> Result<Vec<Loan>> {
   let mut conn = db.read_conn().await?;

   members::fetch_by_id(&mut conn, id)
      .await?
      .ok_or(Error::MemberNotFound)?;

   let loans = if active_only {
      loans::fetch_active_by_member(&mut conn, id).await?
   } else {
      loans::fetch_by_member(&mut conn, id).await?
   };

   Ok(loans)
}
