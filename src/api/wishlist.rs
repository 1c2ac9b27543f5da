//! Wishlist endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::MessageResponse;
use crate::{error::AppResult, models::wishlist::WishlistItem, AppState};

/// Add a book to a user's wishlist
#[utoipa::path(
    post,
    path = "/wishlist/{user_id}/{book_id}",
    tag = "wishlist",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("book_id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 201, description = "Book added", body = MessageResponse),
        (status = 404, description = "User or book not found"),
        (status = 409, description = "Book already in wishlist")
    )
)]
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    Path((user_id, book_id)): Path<(i64, i64)>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    state.services.wishlist.add(user_id, book_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Book added to wishlist")),
    ))
}

/// Get a user's wishlist
#[utoipa::path(
    get,
    path = "/wishlist/{user_id}",
    tag = "wishlist",
    params(
        ("user_id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Wishlisted books", body = Vec<WishlistItem>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_wishlist(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<WishlistItem>>> {
    let items = state.services.wishlist.list(user_id).await?;
    Ok(Json(items))
}

/// Remove a book from a user's wishlist
#[utoipa::path(
    delete,
    path = "/wishlist/{user_id}/{book_id}",
    tag = "wishlist",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("book_id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book removed", body = MessageResponse),
        (status = 404, description = "Item not in wishlist")
    )
)]
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    Path((user_id, book_id)): Path<(i64, i64)>,
) -> AppResult<Json<MessageResponse>> {
    state.services.wishlist.remove(user_id, book_id).await?;
    Ok(Json(MessageResponse::new("Book removed from wishlist")))
}
