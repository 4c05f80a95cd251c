//! Integration tests for the entity store: schema constraints, transactional
//! rollback, and the active-loan queries the borrow workflow depends on.

use std::sync::Arc;

use library_store::{Error, LibraryDatabase, LoanStatus, books, loans, members};
use time::OffsetDateTime;

struct TestDb {
   db: Arc<LibraryDatabase>,
   _temp_dir: tempfile::TempDir,
}

async fn setup_test_db() -> TestDb {
   let temp_dir = tempfile::TempDir::new().unwrap();
   let db = LibraryDatabase::connect(temp_dir.path().join("library.db"), None)
      .await
      .unwrap();

   TestDb {
      db,
      _temp_dir: temp_dir,
   }
}

fn sample_book(isbn: Option<&str>) -> books::NewBook {
   books::NewBook {
      title: "Test Book".into(),
      author: "Test Author".into(),
      isbn: isbn.map(Into::into),
   }
}

fn sample_member(email: &str) -> members::NewMember {
   members::NewMember {
      name: "Test Member".into(),
      email: email.into(),
      phone: None,
   }
}

#[tokio::test]
async fn insert_assigns_ids_and_defaults() {
   let t = setup_test_db().await;
   let now = OffsetDateTime::now_utc();

   let mut writer = t.db.acquire_writer().await.unwrap();
   let book = books::insert(&mut writer, &sample_book(Some("1234567890")), now)
      .await
      .unwrap();

   assert_eq!(book.id, 1);
   assert!(book.available);
   assert_eq!(book.isbn.as_deref(), Some("1234567890"));
   assert_eq!(book.created_at, book.updated_at);

   let member = members::insert(&mut writer, &sample_member("a@example.com"), now)
      .await
      .unwrap();

   assert_eq!(member.id, 1);
   assert!(member.phone.is_none());
   drop(writer);

   let mut conn = t.db.read_conn().await.unwrap();
   let all = books::fetch_all(&mut conn).await.unwrap();
   assert_eq!(all.len(), 1);
   assert_eq!(all[0].title, "Test Book");
}

#[tokio::test]
async fn duplicate_email_is_a_unique_violation() {
   let t = setup_test_db().await;
   let now = OffsetDateTime::now_utc();

   let mut writer = t.db.acquire_writer().await.unwrap();
   members::insert(&mut writer, &sample_member("dup@example.com"), now)
      .await
      .unwrap();

   let err = members::insert(&mut writer, &sample_member("dup@example.com"), now)
      .await
      .unwrap_err();

   assert!(err.is_unique_violation_on("members.email"));
   assert!(!err.is_unique_violation_on("books.isbn"));
}

#[tokio::test]
async fn duplicate_isbn_is_a_unique_violation() {
   let t = setup_test_db().await;
   let now = OffsetDateTime::now_utc();

   let mut writer = t.db.acquire_writer().await.unwrap();
   books::insert(&mut writer, &sample_book(Some("999")), now)
      .await
      .unwrap();

   // A missing isbn never collides
   books::insert(&mut writer, &sample_book(None), now)
      .await
      .unwrap();
   books::insert(&mut writer, &sample_book(None), now)
      .await
      .unwrap();

   let err = books::insert(&mut writer, &sample_book(Some("999")), now)
      .await
      .unwrap_err();

   assert!(err.is_unique_violation_on("books.isbn"));
}

#[tokio::test]
async fn loan_requires_existing_book_and_member() {
   let t = setup_test_db().await;
   let now = OffsetDateTime::now_utc();

   let mut writer = t.db.acquire_writer().await.unwrap();
   let err = loans::insert(&mut writer, 41, 42, now).await.unwrap_err();

   assert!(err.is_foreign_key_violation());
}

#[tokio::test]
async fn active_loan_queries_track_status() {
   let t = setup_test_db().await;
   let now = OffsetDateTime::now_utc();

   let mut writer = t.db.acquire_writer().await.unwrap();
   let book = books::insert(&mut writer, &sample_book(None), now)
      .await
      .unwrap();
   let member = members::insert(&mut writer, &sample_member("m@example.com"), now)
      .await
      .unwrap();

   let loan = loans::insert(&mut writer, book.id, member.id, now)
      .await
      .unwrap();

   assert_eq!(loan.status, LoanStatus::Active);
   assert!(loan.returned_at.is_none());

   let active = loans::fetch_active_by_book(&mut writer, book.id)
      .await
      .unwrap();
   assert_eq!(active.map(|l| l.id), Some(loan.id));

   let by_member = loans::fetch_active_by_member(&mut writer, member.id)
      .await
      .unwrap();
   assert_eq!(by_member.len(), 1);

   let returned = loans::mark_returned(&mut writer, loan.id, now).await.unwrap();
   assert_eq!(returned.status, LoanStatus::Returned);
   assert!(returned.returned_at.is_some());

   assert!(
      loans::fetch_active_by_book(&mut writer, book.id)
         .await
         .unwrap()
         .is_none()
   );
   assert!(
      loans::fetch_active_by_member(&mut writer, member.id)
         .await
         .unwrap()
         .is_empty()
   );

   // History keeps the returned loan
   let history = loans::fetch_by_book(&mut writer, book.id).await.unwrap();
   assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn rolled_back_transaction_leaves_no_trace() {
   let t = setup_test_db().await;
   let now = OffsetDateTime::now_utc();

   let mut writer = t.db.acquire_writer().await.unwrap();
   let book = books::insert(&mut writer, &sample_book(None), now)
      .await
      .unwrap();
   let member = members::insert(&mut writer, &sample_member("m@example.com"), now)
      .await
      .unwrap();
   drop(writer);

   // Open a transaction, perform both borrow writes, then roll back
   let mut tx = t.db.begin_write().await.unwrap();
   loans::insert(tx.conn(), book.id, member.id, now).await.unwrap();
   books::set_available(tx.conn(), book.id, false, now)
      .await
      .unwrap();
   tx.rollback().await.unwrap();

   let mut conn = t.db.read_conn().await.unwrap();
   let book = books::fetch_by_id(&mut conn, book.id).await.unwrap().unwrap();
   assert!(book.available);
   assert!(loans::fetch_all(&mut conn).await.unwrap().is_empty());
}

#[tokio::test]
async fn committed_transaction_applies_both_writes() {
   let t = setup_test_db().await;
   let now = OffsetDateTime::now_utc();

   let mut writer = t.db.acquire_writer().await.unwrap();
   let book = books::insert(&mut writer, &sample_book(None), now)
      .await
      .unwrap();
   let member = members::insert(&mut writer, &sample_member("m@example.com"), now)
      .await
      .unwrap();
   drop(writer);

   let mut tx = t.db.begin_write().await.unwrap();
   let loan = loans::insert(tx.conn(), book.id, member.id, now).await.unwrap();
   books::set_available(tx.conn(), book.id, false, now)
      .await
      .unwrap();
   tx.commit().await.unwrap();

   let mut conn = t.db.read_conn().await.unwrap();
   let book = books::fetch_by_id(&mut conn, book.id).await.unwrap().unwrap();
   assert!(!book.available);

   let stored = loans::fetch_by_id(&mut conn, loan.id).await.unwrap().unwrap();
   assert!(stored.is_active());
}

#[tokio::test]
async fn closed_database_rejects_operations() {
   let t = setup_test_db().await;

   t.db.close().await.unwrap();

   let err = t.db.read_conn().await.unwrap_err();
   assert!(matches!(err, Error::DatabaseClosed));

   let err = t.db.acquire_writer().await.unwrap_err();
   assert!(matches!(err, Error::DatabaseClosed));
}
