//! Wishlist repository for database operations

use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::{
    error::{AppError, AppResult},
    models::{
        user::User,
        wishlist::{WishlistEntry, WishlistItem},
    },
};

#[derive(Clone)]
pub struct WishlistRepository {
    pool: Pool<Sqlite>,
}

impl WishlistRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn add(&self, user_id: i64, book_id: i64) -> AppResult<WishlistEntry> {
        sqlx::query_as::<_, WishlistEntry>(
            "INSERT INTO wishlist (user_id, book_id) VALUES (?, ?) RETURNING *",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_constraint(e, "Book already in wishlist"))
    }

    /// Books on a user's wishlist, oldest entry first
    pub async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<WishlistItem>> {
        let items = sqlx::query_as::<_, WishlistItem>(
            r#"
            SELECT b.id AS book_id, b.title, b.authors
            FROM wishlist w
            JOIN books b ON b.id = w.book_id
            WHERE w.user_id = ?
            ORDER BY w.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn remove(&self, user_id: i64, book_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM wishlist WHERE user_id = ? AND book_id = ?")
            .bind(user_id)
            .bind(book_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Item not in wishlist".to_string()));
        }
        Ok(())
    }

    /// Users waiting for a book
    pub async fn subscribers(&self, book_id: i64) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.username
            FROM wishlist w
            JOIN users u ON u.id = w.user_id
            WHERE w.book_id = ?
            ORDER BY w.id
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    pub async fn count_for_user(&self, conn: &mut SqliteConnection, user_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wishlist WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(conn)
            .await?;
        Ok(count)
    }

    pub async fn count_for_book(&self, conn: &mut SqliteConnection, book_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wishlist WHERE book_id = ?")
            .bind(book_id)
            .fetch_one(conn)
            .await?;
        Ok(count)
    }
}
