//! Rental report aggregation

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::{
    audit::AuditLog,
    error::{AppResult, Outcome, SideEffectWarning},
    models::{rental::RentalDetails, report::RentalReport},
    repository::Repository,
};

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
    audit: Arc<dyn AuditLog>,
}

impl ReportsService {
    pub fn new(repository: Repository, audit: Arc<dyn AuditLog>) -> Self {
        Self { repository, audit }
    }

    /// Build the report from every stored rental and persist it
    pub async fn generate_report(&self) -> AppResult<Outcome<RentalReport>> {
        let rentals = self.repository.rentals.list_details().await?;
        let report = build_report(&rentals, Utc::now());

        tracing::info!(
            open = report.open_count,
            closed = report.closed_count,
            "Rental report generated"
        );

        let mut warnings = Vec::new();
        if let Err(e) = self.audit.write_report(report.clone()).await {
            tracing::warn!("Failed to persist rental report: {}", e);
            warnings.push(SideEffectWarning::new("report", e));
        }

        Ok(Outcome::new(report, warnings))
    }

    /// `(books, open_rentals)`, read by the health endpoint to check storage
    pub async fn circulation_counts(&self) -> AppResult<(i64, i64)> {
        self.repository.rentals.circulation_counts().await
    }
}

/// Summarize rentals as of `now`.
///
/// Durations are whole elapsed days. Only open rentals get a detail line; the
/// average covers closed rentals only and uses integer division.
pub fn build_report(rentals: &[RentalDetails], now: DateTime<Utc>) -> RentalReport {
    let mut report_lines = Vec::new();
    let mut open_count = 0i64;
    let mut closed_count = 0i64;
    let mut closed_days = 0i64;

    for rental in rentals {
        match rental.return_date {
            Some(returned) => {
                closed_count += 1;
                closed_days += (returned - rental.rental_date).num_days();
            }
            None => {
                open_count += 1;
                let days = (now - rental.rental_date).num_days();
                report_lines.push(format!(
                    "'{}' rented by {} for {} day(s).",
                    rental.title, rental.username, days
                ));
            }
        }
    }

    let average_duration_days = if closed_count > 0 {
        closed_days / closed_count
    } else {
        0
    };

    RentalReport {
        generated_at: now,
        report_lines,
        open_count,
        closed_count,
        total_count: open_count + closed_count,
        average_duration_days,
    }
}
