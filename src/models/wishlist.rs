//! Wishlist entries: a user's standing request to hear when a book frees up

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WishlistEntry {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
}

/// Wishlist entry joined with its book, as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WishlistItem {
    pub book_id: i64,
    pub title: String,
    pub authors: String,
}
