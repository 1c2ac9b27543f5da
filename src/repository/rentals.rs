//! Rentals repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::{
    error::{AppError, AppResult},
    models::rental::{Rental, RentalDetails},
};

#[derive(Clone)]
pub struct RentalsRepository {
    pool: Pool<Sqlite>,
}

impl RentalsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get rental by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Rental> {
        sqlx::query_as::<_, Rental>("SELECT * FROM rentals WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Rental not found".to_string()))
    }

    /// Get rental by ID inside an open transaction
    pub async fn fetch(&self, conn: &mut SqliteConnection, id: i64) -> AppResult<Rental> {
        sqlx::query_as::<_, Rental>("SELECT * FROM rentals WHERE id = ?")
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Rental not found".to_string()))
    }

    /// Whether the book currently has a rental with no return date
    pub async fn has_open(&self, conn: &mut SqliteConnection, book_id: i64) -> AppResult<bool> {
        let open: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM rentals WHERE book_id = ? AND return_date IS NULL)",
        )
        .bind(book_id)
        .fetch_one(conn)
        .await?;
        Ok(open)
    }

    /// Insert an open rental
    pub async fn create(
        &self,
        conn: &mut SqliteConnection,
        book_id: i64,
        user_id: i64,
        rental_date: DateTime<Utc>,
    ) -> AppResult<Rental> {
        self.insert(conn, book_id, user_id, rental_date, None).await
    }

    /// Insert a rental row with explicit dates. Used by history imports and tests.
    pub async fn insert(
        &self,
        conn: &mut SqliteConnection,
        book_id: i64,
        user_id: i64,
        rental_date: DateTime<Utc>,
        return_date: Option<DateTime<Utc>>,
    ) -> AppResult<Rental> {
        sqlx::query_as::<_, Rental>(
            r#"
            INSERT INTO rentals (book_id, user_id, rental_date, return_date)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .bind(rental_date)
        .bind(return_date)
        .fetch_one(conn)
        .await
        .map_err(|e| AppError::from_constraint(e, "Book is already rented"))
    }

    /// Set the return date of an open rental. Fails if it was already closed.
    pub async fn close(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
        return_date: DateTime<Utc>,
    ) -> AppResult<Rental> {
        sqlx::query_as::<_, Rental>(
            "UPDATE rentals SET return_date = ? WHERE id = ? AND return_date IS NULL RETURNING *",
        )
        .bind(return_date)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::Conflict("Book already returned".to_string()))
    }

    /// A user's rentals, open ones first, most recent first
    /// Catalogue size and number of open rentals in one round trip
    pub async fn circulation_counts(&self) -> AppResult<(i64, i64)> {
        let counts = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT (SELECT COUNT(*) FROM books),
                   (SELECT COUNT(*) FROM rentals WHERE return_date IS NULL)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<Rental>> {
        let rentals = sqlx::query_as::<_, Rental>(
            r#"
            SELECT * FROM rentals
            WHERE user_id = ?
            ORDER BY return_date IS NOT NULL, rental_date DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rentals)
    }

    /// Every rental with its book title and renter, in id order
    pub async fn list_details(&self) -> AppResult<Vec<RentalDetails>> {
        let rentals = sqlx::query_as::<_, RentalDetails>(
            r#"
            SELECT r.id, r.book_id, r.user_id, b.title, u.username,
                   r.rental_date, r.return_date
            FROM rentals r
            JOIN books b ON b.id = r.book_id
            JOIN users u ON u.id = r.user_id
            ORDER BY r.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rentals)
    }

    pub async fn count_for_user(&self, conn: &mut SqliteConnection, user_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rentals WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(conn)
            .await?;
        Ok(count)
    }

    pub async fn count_for_book(&self, conn: &mut SqliteConnection, book_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rentals WHERE book_id = ?")
            .bind(book_id)
            .fetch_one(conn)
            .await?;
        Ok(count)
    }
}
