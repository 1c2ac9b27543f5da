use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use super::{AuditLog, AvailabilityEvent, Notification, RentalEvent};
use crate::{error::AppResult, models::report::RentalReport};

pub const RENTAL_LOG: &str = "rental_log.txt";
pub const AVAILABILITY_LOG: &str = "availability_log.txt";
pub const NOTIFICATIONS: &str = "notifications.txt";
pub const REPORT: &str = "rental_report.txt";

/// Plain text files in one directory
#[derive(Debug, Clone)]
pub struct FileAuditLog {
    directory: PathBuf,
}

impl FileAuditLog {
    /// Use `directory`, creating it if needed
    pub async fn create(directory: impl Into<PathBuf>) -> AppResult<Self> {
        let directory = directory.into();
        tokio::fs::create_dir_all(&directory).await?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    async fn append(&self, file: &str, text: &str) -> AppResult<()> {
        let mut handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.directory.join(file))
            .await?;
        handle.write_all(text.as_bytes()).await?;
        handle.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl AuditLog for FileAuditLog {
    async fn record_rental(&self, event: RentalEvent) -> AppResult<()> {
        self.append(RENTAL_LOG, &event.to_line()).await
    }

    async fn record_availability(&self, event: AvailabilityEvent) -> AppResult<()> {
        self.append(AVAILABILITY_LOG, &event.to_line()).await
    }

    async fn record_notification(&self, notification: Notification) -> AppResult<()> {
        self.append(NOTIFICATIONS, &notification.to_line()).await
    }

    async fn write_report(&self, report: RentalReport) -> AppResult<()> {
        tokio::fs::write(self.directory.join(REPORT), report.render()).await?;
        Ok(())
    }
}
