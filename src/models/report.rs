//! Rental report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Summary of all rentals at a point in time.
///
/// `report_lines` only lists open rentals; the counts cover everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RentalReport {
    pub generated_at: DateTime<Utc>,
    pub report_lines: Vec<String>,
    pub open_count: i64,
    pub closed_count: i64,
    pub total_count: i64,
    /// Whole days, averaged over closed rentals only (0 when there are none)
    pub average_duration_days: i64,
}

impl RentalReport {
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("Books Currently Rented: {}", self.open_count),
            format!("Returned Rentals: {}", self.closed_count),
            format!("Total Rentals: {}", self.total_count),
            format!("Average Rental Duration: {} day(s)", self.average_duration_days),
        ]
    }

    /// Plain-text document written to the report file
    pub fn render(&self) -> String {
        let rule = "=".repeat(60);
        let mut out = String::new();
        out.push_str("Rental Report - Currently Rented Books\n");
        out.push_str(&rule);
        out.push('\n');
        for line in &self.report_lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("\nSummary\n");
        out.push_str(&rule);
        out.push('\n');
        for line in self.summary_lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}
