//! Rental report endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppResult, SideEffectWarning},
    models::report::RentalReport,
    AppState,
};

#[derive(Serialize, ToSchema)]
pub struct ReportResponse {
    pub message: String,
    /// One line per open rental
    pub report_lines: Vec<String>,
    pub summary: Vec<String>,
    pub report: RentalReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<SideEffectWarning>,
}

/// Generate and store the rental report
#[utoipa::path(
    get,
    path = "/rental-report",
    tag = "reports",
    responses(
        (status = 200, description = "Rental report", body = ReportResponse)
    )
)]
pub async fn rental_report(State(state): State<AppState>) -> AppResult<Json<ReportResponse>> {
    let outcome = state.services.reports.generate_report().await?;
    let report = outcome.value;

    Ok(Json(ReportResponse {
        message: "Rental report generated".to_string(),
        report_lines: report.report_lines.clone(),
        summary: report.summary_lines(),
        report,
        warnings: outcome.warnings,
    }))
}
