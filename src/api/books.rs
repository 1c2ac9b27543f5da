//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::JsonBody;
use crate::{
    error::{AppResult, SideEffectWarning},
    models::book::{AvailabilityUpdate, Book, BookQuery, BookShort, CreateBook},
    AppState,
};

/// Availability override response
#[derive(Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub message: String,
    pub book: Book,
    /// Side effects that failed after the change was saved
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<SideEffectWarning>,
}

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<BookShort>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<BookShort>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(books))
}

/// Search books by free text, or by title and author
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<BookShort>)
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<BookShort>>> {
    let books = state.services.catalog.search_books(&query).await?;
    Ok(Json(books))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Add a book to the catalog
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 409, description = "ISBN or id already in use"),
        (status = 422, description = "Invalid input")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    JsonBody(book): JsonBody<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let created = state.services.catalog.create_book(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete a book that has no rentals or wishlist entries
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book still referenced")
    )
)]
pub async fn delete_book(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Override a book's availability
#[utoipa::path(
    patch,
    path = "/books/{id}/availability",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = AvailabilityUpdate,
    responses(
        (status = 200, description = "Availability updated", body = AvailabilityResponse),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book has an open rental")
    )
)]
pub async fn update_availability(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(update): JsonBody<AvailabilityUpdate>,
) -> AppResult<Json<AvailabilityResponse>> {
    let outcome = state
        .services
        .availability
        .set_availability(id, update.available)
        .await?;

    Ok(Json(AvailabilityResponse {
        message: format!(
            "Book '{}' availability set to {}",
            outcome.value.title, outcome.value.available
        ),
        book: outcome.value,
        warnings: outcome.warnings,
    }))
}
