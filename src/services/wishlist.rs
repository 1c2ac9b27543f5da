//! Wishlist service

use crate::{
    error::AppResult,
    models::wishlist::{WishlistEntry, WishlistItem},
    repository::Repository,
};

#[derive(Clone)]
pub struct WishlistService {
    repository: Repository,
}

impl WishlistService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn add(&self, user_id: i64, book_id: i64) -> AppResult<WishlistEntry> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository.books.get_by_id(book_id).await?;

        let entry = self.repository.wishlist.add(user_id, book_id).await?;
        tracing::debug!(user_id, book_id, "Book added to wishlist");
        Ok(entry)
    }

    pub async fn list(&self, user_id: i64) -> AppResult<Vec<WishlistItem>> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository.wishlist.list_for_user(user_id).await
    }

    pub async fn remove(&self, user_id: i64, book_id: i64) -> AppResult<()> {
        self.repository.wishlist.remove(user_id, book_id).await?;
        tracing::debug!(user_id, book_id, "Book removed from wishlist");
        Ok(())
    }
}
