use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

use super::{AuditLog, AvailabilityEvent, Notification, RentalEvent};
use crate::{error::AppResult, models::report::RentalReport};

#[derive(Debug, Default)]
struct Records {
    rentals: Vec<RentalEvent>,
    availability: Vec<AvailabilityEvent>,
    notifications: Vec<Notification>,
    report: Option<RentalReport>,
}

/// Keeps every record in memory
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    records: Mutex<Records>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Records> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn rentals(&self) -> Vec<RentalEvent> {
        self.lock().rentals.clone()
    }

    pub fn availability(&self) -> Vec<AvailabilityEvent> {
        self.lock().availability.clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().notifications.clone()
    }

    /// Last report written
    pub fn report(&self) -> Option<RentalReport> {
        self.lock().report.clone()
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    async fn record_rental(&self, event: RentalEvent) -> AppResult<()> {
        self.lock().rentals.push(event);
        Ok(())
    }

    async fn record_availability(&self, event: AvailabilityEvent) -> AppResult<()> {
        self.lock().availability.push(event);
        Ok(())
    }

    async fn record_notification(&self, notification: Notification) -> AppResult<()> {
        self.lock().notifications.push(notification);
        Ok(())
    }

    async fn write_report(&self, report: RentalReport) -> AppResult<()> {
        self.lock().report = Some(report);
        Ok(())
    }
}
