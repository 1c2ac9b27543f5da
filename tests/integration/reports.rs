use chrono::{Duration, Utc};

use crate::common::{add_book, add_user, seed_rental, setup};

#[tokio::test]
async fn empty_database_reports_zeroes() {
    let app = setup().await;

    let outcome = app.services.reports.generate_report().await.unwrap();
    let report = outcome.value;

    assert!(report.report_lines.is_empty());
    assert_eq!(
        report.summary_lines(),
        vec![
            "Books Currently Rented: 0",
            "Returned Rentals: 0",
            "Total Rentals: 0",
            "Average Rental Duration: 0 day(s)",
        ]
    );
    assert_eq!(app.audit.report(), Some(report));
}

#[tokio::test]
async fn open_and_closed_rentals_are_summarized() {
    let app = setup().await;
    let user = add_user(&app.repository, "testuser").await;
    let active = add_book(&app.repository, "888", "Active Rental Book", "Author A").await;
    let returned = add_book(&app.repository, "999", "Returned Book", "Author Z").await;

    let now = Utc::now();
    seed_rental(&app.repository, active.id, user.id, now - Duration::days(3), None).await;
    seed_rental(
        &app.repository,
        returned.id,
        user.id,
        now - Duration::days(5),
        Some(now - Duration::days(1)),
    )
    .await;

    let report = app.services.reports.generate_report().await.unwrap().value;

    assert_eq!(report.open_count, 1);
    assert_eq!(report.closed_count, 1);
    assert_eq!(report.total_count, 2);
    assert_eq!(report.average_duration_days, 4);
    assert_eq!(
        report.report_lines,
        vec!["'Active Rental Book' rented by testuser for 3 day(s).".to_string()]
    );
}

#[tokio::test]
async fn only_returned_rentals_have_no_detail_lines() {
    let app = setup().await;
    let user = add_user(&app.repository, "testuser").await;
    let book = add_book(&app.repository, "999", "Returned Book", "Author Z").await;

    let now = Utc::now();
    seed_rental(
        &app.repository,
        book.id,
        user.id,
        now - Duration::days(5),
        Some(now - Duration::days(1)),
    )
    .await;

    let report = app.services.reports.generate_report().await.unwrap().value;

    assert!(report.report_lines.is_empty());
    assert!(report.summary_lines().contains(&"Returned Rentals: 1".to_string()));
    assert!(report.summary_lines().contains(&"Books Currently Rented: 0".to_string()));
    assert_eq!(report.open_count + report.closed_count, report.total_count);
}
