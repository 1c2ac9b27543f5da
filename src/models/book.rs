//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub isbn: String,
    pub title: String,
    pub authors: String,
    pub publication_year: Option<i32>,
    pub language: Option<String>,
    /// False while the book has an open rental. Also false for a book withdrawn
    /// through the availability override, which has no open rental; an open
    /// rental always implies false, but false does not imply an open rental.
    pub available: bool,
    /// External (Amazon/ASIN) identifier, filled in by enrichment
    pub amazon_id: Option<String>,
}

/// Book listing entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct BookShort {
    pub id: i64,
    pub title: String,
    pub authors: String,
    pub available: bool,
}

impl From<Book> for BookShort {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            authors: book.authors,
            available: book.available,
        }
    }
}

/// Book search parameters.
///
/// `query` matches title, authors or ISBN and takes precedence; otherwise
/// `title` and `author` are combined.
#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    pub query: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
}

/// Create book request (catalogue import or admin action)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    /// Explicit id, used by imports that carry their own numbering
    pub id: Option<i64>,
    #[validate(length(min = 1, message = "ISBN must not be empty"))]
    pub isbn: String,
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    pub authors: String,
    pub publication_year: Option<i32>,
    pub language: Option<String>,
}

/// Direct availability override
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct AvailabilityUpdate {
    pub available: bool,
}
