//! Availability coordinator: the only writer of `books.available`.
//!
//! A write happens in two steps. [`AvailabilityService::apply`] runs inside
//! the caller's transaction, so the flag commits together with any rental row
//! that implies it. [`AvailabilityService::publish`] runs after commit and
//! emits wishlist notifications (on false -> true only) and the audit record
//! (always).

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use std::{fmt, sync::Arc};

use super::CirculationLock;
use crate::{
    audit::{AuditLog, AvailabilityEvent, Notification},
    error::{AppError, AppResult, Outcome, SideEffectWarning},
    models::book::Book,
    repository::Repository,
};

/// Call path that changed a book's availability, recorded in the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSource {
    Override { book_id: i64 },
    Rental,
    Return { rental_id: i64 },
}

impl fmt::Display for ChangeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeSource::Override { book_id } => write!(f, "PATCH /books/{}/availability", book_id),
            ChangeSource::Rental => f.write_str("POST /rentals"),
            ChangeSource::Return { rental_id } => write!(f, "PATCH /rentals/{}/return", rental_id),
        }
    }
}

/// A committed (or about to be committed) availability write
#[derive(Debug, Clone)]
pub struct AvailabilityChange {
    /// Book as it stands after the write
    pub book: Book,
    pub old_value: bool,
    pub source: ChangeSource,
    pub changed_at: DateTime<Utc>,
}

impl AvailabilityChange {
    pub fn became_available(&self) -> bool {
        !self.old_value && self.book.available
    }
}

#[derive(Clone)]
pub struct AvailabilityService {
    repository: Repository,
    audit: Arc<dyn AuditLog>,
    lock: CirculationLock,
}

impl AvailabilityService {
    pub fn new(repository: Repository, audit: Arc<dyn AuditLog>, lock: CirculationLock) -> Self {
        Self {
            repository,
            audit,
            lock,
        }
    }

    /// Direct override of a book's availability.
    ///
    /// Marking a book available while it has an open rental is refused;
    /// marking it unavailable without a rental withdraws it from circulation.
    pub async fn set_availability(&self, book_id: i64, available: bool) -> AppResult<Outcome<Book>> {
        let _guard = self.lock.lock().await;

        let mut tx = self.repository.pool.begin().await?;
        self.repository.books.fetch(&mut *tx, book_id).await?;
        if available && self.repository.rentals.has_open(&mut *tx, book_id).await? {
            return Err(AppError::Conflict("Book is currently rented".to_string()));
        }
        let change = self
            .apply(&mut *tx, book_id, available, ChangeSource::Override { book_id })
            .await?;
        tx.commit().await?;

        tracing::info!(
            book_id,
            old = change.old_value,
            new = available,
            "Book availability overridden"
        );

        let warnings = self.publish(&change).await;
        Ok(Outcome::new(change.book, warnings))
    }

    /// Write the flag inside an open transaction
    pub async fn apply(
        &self,
        conn: &mut SqliteConnection,
        book_id: i64,
        available: bool,
        source: ChangeSource,
    ) -> AppResult<AvailabilityChange> {
        let mut book = self.repository.books.fetch(&mut *conn, book_id).await?;
        let old_value = book.available;

        self.repository.books.set_available(conn, book_id, available).await?;
        book.available = available;

        Ok(AvailabilityChange {
            book,
            old_value,
            source,
            changed_at: Utc::now(),
        })
    }

    /// Notify wishlisting users and append the audit record. Call after commit.
    pub async fn publish(&self, change: &AvailabilityChange) -> Vec<SideEffectWarning> {
        let mut warnings = Vec::new();

        if change.became_available() {
            match self.repository.wishlist.subscribers(change.book.id).await {
                Ok(users) => {
                    for user in users {
                        let notification = Notification {
                            user_id: user.id,
                            username: user.username,
                            book_id: change.book.id,
                            title: change.book.title.clone(),
                            timestamp: change.changed_at,
                        };
                        if let Err(e) = self.audit.record_notification(notification).await {
                            tracing::warn!(book_id = change.book.id, "Failed to write notification: {}", e);
                            warnings.push(SideEffectWarning::new("notifications", e));
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(book_id = change.book.id, "Failed to load wishlist subscribers: {}", e);
                    warnings.push(SideEffectWarning::new("notifications", e));
                }
            }
        }

        let event = AvailabilityEvent {
            book_id: change.book.id,
            title: change.book.title.clone(),
            old_value: change.old_value,
            new_value: change.book.available,
            source: change.source.to_string(),
            timestamp: change.changed_at,
        };
        if let Err(e) = self.audit.record_availability(event).await {
            tracing::warn!(book_id = change.book.id, "Failed to write availability log: {}", e);
            warnings.push(SideEffectWarning::new("availability_log", e));
        }

        warnings
    }
}
