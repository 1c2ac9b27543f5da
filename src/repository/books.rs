//! Books repository for database operations

use sqlx::{Pool, QueryBuilder, Sqlite, SqliteConnection};

use super::like_pattern;
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// List every book in id order
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Case-insensitive substring search
    pub async fn search(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM books WHERE 1 = 1");

        if let Some(q) = query.query.as_deref().filter(|q| !q.is_empty()) {
            let pattern = like_pattern(q);
            builder
                .push(r" AND (title LIKE ")
                .push_bind(pattern.clone())
                .push(r" ESCAPE '\' OR authors LIKE ")
                .push_bind(pattern.clone())
                .push(r" ESCAPE '\' OR isbn LIKE ")
                .push_bind(pattern)
                .push(r" ESCAPE '\')");
        } else {
            if let Some(title) = query.title.as_deref().filter(|t| !t.is_empty()) {
                builder
                    .push(" AND title LIKE ")
                    .push_bind(like_pattern(title))
                    .push(r" ESCAPE '\'");
            }
            if let Some(author) = query.author.as_deref().filter(|a| !a.is_empty()) {
                builder
                    .push(" AND authors LIKE ")
                    .push_bind(like_pattern(author))
                    .push(r" ESCAPE '\'");
            }
        }

        builder.push(" ORDER BY id");

        let books = builder.build_query_as::<Book>().fetch_all(&self.pool).await?;
        Ok(books)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    /// Get book by ID inside an open transaction
    pub async fn fetch(&self, conn: &mut SqliteConnection, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    pub async fn exists(&self, id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Write the availability flag. Only the availability coordinator calls this.
    pub async fn set_available(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
        available: bool,
    ) -> AppResult<()> {
        let result = sqlx::query("UPDATE books SET available = ? WHERE id = ?")
            .bind(available)
            .bind(id)
            .execute(conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Book not found".to_string()));
        }
        Ok(())
    }

    /// Insert a new, available book
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (id, isbn, title, authors, publication_year, language, available)
            VALUES (?, ?, ?, ?, ?, ?, 1)
            RETURNING *
            "#,
        )
        .bind(book.id)
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.authors)
        .bind(book.publication_year)
        .bind(&book.language)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_constraint(e, format!("Book {} already exists", book.isbn))
        })
    }

    /// Delete a book inside an open transaction
    pub async fn delete(&self, conn: &mut SqliteConnection, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Book not found".to_string()));
        }
        Ok(())
    }

    /// Books that have not been matched to an external identifier yet
    pub async fn without_external_id(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE amazon_id IS NULL ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    pub async fn set_external_id(&self, id: i64, amazon_id: &str) -> AppResult<()> {
        sqlx::query("UPDATE books SET amazon_id = ? WHERE id = ?")
            .bind(amazon_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
