//! Append-only audit sinks.
//!
//! The availability coordinator and rental lifecycle call through [`AuditLog`]
//! after their transaction commits. A failing sink never reverts the change it
//! describes; the caller turns the error into a [`SideEffectWarning`].
//!
//! [`SideEffectWarning`]: crate::error::SideEffectWarning

mod file;
mod memory;

pub use file::FileAuditLog;
pub use memory::MemoryAuditLog;

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};

use crate::{
    error::AppResult,
    models::{rental::RentalAction, report::RentalReport},
};

/// A book was rented or returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalEvent {
    pub action: RentalAction,
    pub book_id: i64,
    pub title: String,
    pub user_id: i64,
    pub username: String,
    pub timestamp: DateTime<Utc>,
}

impl RentalEvent {
    pub fn to_line(&self) -> String {
        format!(
            "\"{} (bookID: {}) {} by {} (userID: {}) on {}.\"\n",
            self.title,
            self.book_id,
            self.action,
            self.username,
            self.user_id,
            minutes(self.timestamp),
        )
    }
}

/// A book's availability flag was written, whether or not it changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityEvent {
    pub book_id: i64,
    pub title: String,
    pub old_value: bool,
    pub new_value: bool,
    /// Call path that made the change, e.g. `POST /rentals`
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

impl AvailabilityEvent {
    pub fn to_line(&self) -> String {
        format!(
            "[{}] Book ID: {}, Title: '{}'\n    Availability changed: {} ➜ {}\n    Changed by: {}\n{}\n",
            self.timestamp.with_timezone(&Local).to_rfc3339(),
            self.book_id,
            self.title,
            self.old_value,
            self.new_value,
            self.source,
            "-".repeat(60),
        )
    }
}

/// Message to a wishlisting user that a book became available
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub user_id: i64,
    pub username: String,
    pub book_id: i64,
    pub title: String,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn to_line(&self) -> String {
        format!(
            "Dear {}, the book '{}' has been recently made available on {}.\n",
            self.username,
            self.title,
            minutes(self.timestamp),
        )
    }
}

fn minutes(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Destination for the rental log, availability log, notifications and report
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record_rental(&self, event: RentalEvent) -> AppResult<()>;

    async fn record_availability(&self, event: AvailabilityEvent) -> AppResult<()>;

    async fn record_notification(&self, notification: Notification) -> AppResult<()>;

    /// Replace the stored report with this one
    async fn write_report(&self, report: RentalReport) -> AppResult<()>;
}
