use chrono::{DateTime, Utc};
use std::sync::Arc;

use rental_ledger::{
    audit::MemoryAuditLog,
    models::{book::CreateBook, Book, Rental, User},
    repository::Repository,
    services::Services,
};

pub struct TestApp {
    pub repository: Repository,
    pub services: Services,
    pub audit: Arc<MemoryAuditLog>,
}

pub async fn setup() -> TestApp {
    let repository = Repository::in_memory().await.expect("in-memory database");
    let audit = Arc::new(MemoryAuditLog::new());
    let services = Services::new(repository.clone(), audit.clone(), Default::default())
        .expect("services");

    TestApp {
        repository,
        services,
        audit,
    }
}

pub async fn add_book(repository: &Repository, isbn: &str, title: &str, authors: &str) -> Book {
    repository
        .books
        .create(&CreateBook {
            id: None,
            isbn: isbn.to_string(),
            title: title.to_string(),
            authors: authors.to_string(),
            publication_year: None,
            language: None,
        })
        .await
        .expect("book")
}

pub async fn add_user(repository: &Repository, username: &str) -> User {
    repository.users.create(username).await.expect("user")
}

/// Insert a rental row directly, bypassing the lifecycle rules
pub async fn seed_rental(
    repository: &Repository,
    book_id: i64,
    user_id: i64,
    rental_date: DateTime<Utc>,
    return_date: Option<DateTime<Utc>>,
) -> Rental {
    let mut conn = repository.pool.acquire().await.expect("connection");
    repository
        .rentals
        .insert(&mut conn, book_id, user_id, rental_date, return_date)
        .await
        .expect("rental")
}

async fn availability_rows(repository: &Repository) -> Vec<(i64, bool, bool)> {
    sqlx::query_as(
        r#"
        SELECT b.id, b.available,
               EXISTS(SELECT 1 FROM rentals r WHERE r.book_id = b.id AND r.return_date IS NULL)
        FROM books b
        "#,
    )
    .fetch_all(&repository.pool)
    .await
    .expect("availability rows")
}

/// A book with an open rental is never marked available.
///
/// Holds for every reachable state, including books withdrawn through the
/// availability override (unavailable with no open rental).
pub async fn assert_open_rentals_unavailable(repository: &Repository) {
    for (book_id, available, open) in availability_rows(repository).await {
        assert!(
            !(open && available),
            "book {} is marked available while rented",
            book_id
        );
    }
}

/// Every book is unavailable exactly when it has an open rental.
///
/// Only valid when no book has been withdrawn with `set_availability(false)`;
/// use [`assert_open_rentals_unavailable`] otherwise.
pub async fn assert_availability_consistent(repository: &Repository) {
    for (book_id, available, open) in availability_rows(repository).await {
        assert_eq!(
            available, !open,
            "book {} has available={} but open rental={}",
            book_id, available, open
        );
    }
}
