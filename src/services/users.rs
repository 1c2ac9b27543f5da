//! User management service

use validator::Validate;

use super::ImportSummary;
use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a user; the username is trimmed and must be unique
    pub async fn create_user(&self, request: CreateUser) -> AppResult<User> {
        let request = CreateUser {
            username: request.username.trim().to_string(),
        };
        request.validate()?;

        let user = self.repository.users.create(&request.username).await?;
        tracing::info!(user_id = user.id, username = %user.username, "User created");
        Ok(user)
    }

    pub async fn get_user(&self, id: i64) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Delete a user that no rental or wishlist entry refers to
    pub async fn delete_user(&self, id: i64) -> AppResult<()> {
        let mut tx = self.repository.pool.begin().await?;

        self.repository.users.fetch(&mut *tx, id).await?;
        let rentals = self.repository.rentals.count_for_user(&mut *tx, id).await?;
        let wishes = self.repository.wishlist.count_for_user(&mut *tx, id).await?;
        if rentals > 0 || wishes > 0 {
            return Err(AppError::Conflict(format!(
                "User is referenced by {} rental(s) and {} wishlist entr(ies)",
                rentals, wishes
            )));
        }
        self.repository.users.delete(&mut *tx, id).await?;

        tx.commit().await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    /// Create users by name, skipping names that already exist
    pub async fn import_users<I, S>(&self, usernames: I) -> AppResult<ImportSummary>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut summary = ImportSummary::default();

        for username in usernames {
            let username: String = username.into();
            if self
                .repository
                .users
                .get_by_username(username.trim())
                .await?
                .is_some()
            {
                summary.skipped += 1;
                continue;
            }
            self.create_user(CreateUser { username }).await?;
            summary.imported += 1;
        }

        Ok(summary)
    }
}
