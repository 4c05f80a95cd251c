//! Query functions for the `members` table

use sqlx::sqlite::SqliteConnection;
use time::OffsetDateTime;

use crate::error::Result;
use crate::records::Member;

/// Fields required to insert a new member row.
#[derive(Debug, Clone)]
pub struct NewMember {
   pub name: String,
   pub email: String,
   pub phone: Option<String>,
}

/// Insert a new member and return the stored row.
///
/// Fails with a unique violation when the email is already registered.
pub async fn insert(
   conn: &mut SqliteConnection,
   new: &NewMember,
   now: OffsetDateTime,
) -> Result<Member> {
   let result = sqlx::query(
      "INSERT INTO members (name, email, phone, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $4)",
   )
   .bind(&new.name)
   .bind(&new.email)
   .bind(&new.phone)
   .bind(now)
   .execute(&mut *conn)
   .await?;

   let id = result.last_insert_rowid();
   let member = fetch_by_id(conn, id).await?;

   // The row was just inserted on this connection
   Ok(member.expect("inserted member row must exist"))
}

/// Fetch all members, oldest first.
pub async fn fetch_all(conn: &mut SqliteConnection) -> Result<Vec<Member>> {
   let members = sqlx::query_as::<_, Member>("SELECT * FROM members ORDER BY id")
      .fetch_all(conn)
      .await?;

   Ok(members)
}

/// Fetch a single member by primary key.
pub async fn fetch_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Member>> {
   let member = sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = $1")
      .bind(id)
      .fetch_optional(conn)
      .await?;

   Ok(member)
}

/// Fetch a member by their unique email address.
pub async fn fetch_by_email(conn: &mut SqliteConnection, email: &str) -> Result<Option<Member>> {
   let member = sqlx::query_as::<_, Member>("SELECT * FROM members WHERE email = $1")
      .bind(email)
      .fetch_optional(conn)
      .await?;

   Ok(member)
}

/// Write back the mutable fields of a member and bump `updated_at`.
pub async fn update(
   conn: &mut SqliteConnection,
   member: &Member,
   now: OffsetDateTime,
) -> Result<Member> {
   sqlx::query("UPDATE members SET name = $1, email = $2, phone = $3, updated_at = $4 WHERE id = $5")
      .bind(&member.name)
      .bind(&member.email)
      .bind(&member.phone)
      .bind(now)
      .bind(member.id)
      .execute(&mut *conn)
      .await?;

   let member = fetch_by_id(conn, member.id).await?;
   Ok(member.expect("updated member row must exist"))
}

/// Delete a member row, returning the number of rows removed.
///
/// Loans referencing the member must be removed first or the foreign key
/// constraint fails the enclosing transaction.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<u64> {
   let result = sqlx::query("DELETE FROM members WHERE id = $1")
      .bind(id)
      .execute(conn)
      .await?;

   Ok(result.rows_affected())
}
