//! Rental model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;

/// Rental model from database. Open while `return_date` is unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Rental {
    pub id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub rental_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

impl Rental {
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }
}

/// Rental joined with the book title and renter's username
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RentalDetails {
    pub id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub title: String,
    pub username: String,
    pub rental_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

/// Create rental request
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct CreateRental {
    pub book_id: i64,
    pub user_id: i64,
}

/// Confirmation returned once a rental is closed
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReturnConfirmation {
    pub rental_id: i64,
    pub book_id: i64,
    pub title: String,
    pub user_id: i64,
    pub username: String,
    pub return_date: DateTime<Utc>,
}

impl ReturnConfirmation {
    pub fn message(&self) -> String {
        format!("Book '{}' returned by {}", self.title, self.username)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RentalAction {
    Rented,
    Returned,
}

impl fmt::Display for RentalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RentalAction::Rented => f.write_str("rented"),
            RentalAction::Returned => f.write_str("returned"),
        }
    }
}
