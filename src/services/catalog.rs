//! Catalog service: book listing, search, creation, import and removal

use serde::Deserialize;
use std::io::Read;
use validator::Validate;

use super::ImportSummary;
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, BookShort, CreateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_books(&self) -> AppResult<Vec<BookShort>> {
        let books = self.repository.books.list().await?;
        Ok(books.into_iter().map(BookShort::from).collect())
    }

    pub async fn search_books(&self, query: &BookQuery) -> AppResult<Vec<BookShort>> {
        let books = self.repository.books.search(query).await?;
        Ok(books.into_iter().map(BookShort::from).collect())
    }

    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()?;
        let created = self.repository.books.create(&book).await?;
        tracing::info!(book_id = created.id, isbn = %created.isbn, "Book created");
        Ok(created)
    }

    /// Delete a book that no rental or wishlist entry refers to
    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        let mut tx = self.repository.pool.begin().await?;

        self.repository.books.fetch(&mut *tx, id).await?;
        let rentals = self.repository.rentals.count_for_book(&mut *tx, id).await?;
        let wishes = self.repository.wishlist.count_for_book(&mut *tx, id).await?;
        if rentals > 0 || wishes > 0 {
            return Err(AppError::Conflict(format!(
                "Book is referenced by {} rental(s) and {} wishlist entr(ies)",
                rentals, wishes
            )));
        }
        self.repository.books.delete(&mut *tx, id).await?;

        tx.commit().await?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    /// Import books, skipping ids that are already in the catalog
    pub async fn import_books(&self, books: Vec<CreateBook>) -> AppResult<ImportSummary> {
        let mut summary = ImportSummary::default();

        for book in books {
            if let Some(id) = book.id {
                if self.repository.books.exists(id).await? {
                    summary.skipped += 1;
                    continue;
                }
            }
            match self.create_book(book).await {
                Ok(_) => summary.imported += 1,
                Err(AppError::Conflict(msg)) | Err(AppError::Validation(msg)) => {
                    tracing::warn!("Skipping book row: {}", msg);
                    summary.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            imported = summary.imported,
            skipped = summary.skipped,
            "Book import finished"
        );
        Ok(summary)
    }
}

/// One row of a book export (`Id,ISBN,Authors,Publication Year,Title,Language`)
#[derive(Debug, Deserialize)]
struct BookRow {
    #[serde(rename = "Id")]
    id: i64,
    #[serde(rename = "ISBN")]
    isbn: String,
    #[serde(rename = "Authors")]
    authors: String,
    #[serde(rename = "Publication Year")]
    publication_year: Option<i32>,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Language")]
    language: Option<String>,
}

impl From<BookRow> for CreateBook {
    fn from(row: BookRow) -> Self {
        Self {
            id: Some(row.id),
            isbn: row.isbn,
            title: row.title,
            authors: row.authors,
            publication_year: row.publication_year,
            language: row.language.filter(|l| !l.is_empty()),
        }
    }
}

/// Parse a comma-separated book export with a header row
pub fn parse_books_csv<R: Read>(reader: R) -> AppResult<Vec<CreateBook>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<BookRow>()
        .map(|row| row.map(CreateBook::from).map_err(AppError::from))
        .collect()
}
