//! Rental lifecycle: opening and closing rentals.
//!
//! A book is Available while it has no open rental and Rented while it has
//! one. Both transitions hold the circulation lock, run the eligibility check
//! and the writes in one transaction, and only emit audit records after the
//! transaction commits.

use chrono::Utc;
use std::sync::Arc;

use super::{
    availability::{AvailabilityService, ChangeSource},
    CirculationLock,
};
use crate::{
    audit::{AuditLog, RentalEvent},
    error::{AppError, AppResult, Outcome, SideEffectWarning},
    models::rental::{Rental, RentalAction, ReturnConfirmation},
    repository::Repository,
};

#[derive(Clone)]
pub struct RentalsService {
    repository: Repository,
    availability: AvailabilityService,
    audit: Arc<dyn AuditLog>,
    lock: CirculationLock,
}

impl RentalsService {
    pub fn new(
        repository: Repository,
        availability: AvailabilityService,
        audit: Arc<dyn AuditLog>,
        lock: CirculationLock,
    ) -> Self {
        Self {
            repository,
            availability,
            audit,
            lock,
        }
    }

    /// Rent an available book to a user
    pub async fn create_rental(&self, book_id: i64, user_id: i64) -> AppResult<Outcome<Rental>> {
        let _guard = self.lock.lock().await;

        let mut tx = self.repository.pool.begin().await?;

        let book = self.repository.books.fetch(&mut *tx, book_id).await?;
        if !book.available {
            return Err(AppError::Conflict("Book is already rented".to_string()));
        }
        let user = self.repository.users.fetch(&mut *tx, user_id).await?;

        let rental = self
            .repository
            .rentals
            .create(&mut *tx, book.id, user.id, Utc::now())
            .await?;
        let change = self
            .availability
            .apply(&mut *tx, book.id, false, ChangeSource::Rental)
            .await?;

        tx.commit().await?;

        tracing::info!(rental_id = rental.id, book_id, user_id, "Book rented");

        let mut warnings = self.availability.publish(&change).await;
        warnings.extend(
            self.record(RentalEvent {
                action: RentalAction::Rented,
                book_id: book.id,
                title: book.title,
                user_id: user.id,
                username: user.username,
                timestamp: rental.rental_date,
            })
            .await,
        );

        Ok(Outcome::new(rental, warnings))
    }

    /// Close an open rental and make its book available again
    pub async fn return_rental(&self, rental_id: i64) -> AppResult<Outcome<ReturnConfirmation>> {
        let _guard = self.lock.lock().await;

        let mut tx = self.repository.pool.begin().await?;

        let rental = self.repository.rentals.fetch(&mut *tx, rental_id).await?;
        if !rental.is_open() {
            return Err(AppError::Conflict("Book already returned".to_string()));
        }
        let user = self.repository.users.fetch(&mut *tx, rental.user_id).await?;

        let closed = self
            .repository
            .rentals
            .close(&mut *tx, rental.id, Utc::now())
            .await?;
        let change = self
            .availability
            .apply(&mut *tx, rental.book_id, true, ChangeSource::Return { rental_id })
            .await?;

        tx.commit().await?;

        let return_date = closed.return_date.unwrap_or(change.changed_at);
        tracing::info!(rental_id, book_id = rental.book_id, "Book returned");

        let mut warnings = self.availability.publish(&change).await;
        warnings.extend(
            self.record(RentalEvent {
                action: RentalAction::Returned,
                book_id: change.book.id,
                title: change.book.title.clone(),
                user_id: user.id,
                username: user.username.clone(),
                timestamp: return_date,
            })
            .await,
        );

        Ok(Outcome::new(
            ReturnConfirmation {
                rental_id,
                book_id: change.book.id,
                title: change.book.title,
                user_id: user.id,
                username: user.username,
                return_date,
            },
            warnings,
        ))
    }

    pub async fn get_rental(&self, rental_id: i64) -> AppResult<Rental> {
        self.repository.rentals.get_by_id(rental_id).await
    }

    /// Rentals of a user, open ones first
    pub async fn list_user_rentals(&self, user_id: i64) -> AppResult<Vec<Rental>> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository.rentals.list_for_user(user_id).await
    }

    async fn record(&self, event: RentalEvent) -> Option<SideEffectWarning> {
        let (book_id, action) = (event.book_id, event.action);
        match self.audit.record_rental(event).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(book_id, %action, "Failed to write rental log: {}", e);
                Some(SideEffectWarning::new("rental_log", e))
            }
        }
    }
}
