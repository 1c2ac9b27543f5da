use chrono::{Duration, Utc};

use rental_ledger::{models::rental::RentalAction, AppError};

use crate::common::{add_book, add_user, assert_availability_consistent, seed_rental, setup};

#[tokio::test]
async fn renting_marks_book_unavailable() {
    let app = setup().await;
    let book = add_book(&app.repository, "123", "Test Book", "Author A").await;
    let user = add_user(&app.repository, "testuser").await;

    let outcome = app.services.rentals.create_rental(book.id, user.id).await.unwrap();

    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.value.book_id, book.id);
    assert_eq!(outcome.value.user_id, user.id);
    assert_eq!(outcome.value.return_date, None);
    assert!(!app.repository.books.get_by_id(book.id).await.unwrap().available);
    assert_availability_consistent(&app.repository).await;

    let logged = app.audit.rentals();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].action, RentalAction::Rented);
    assert_eq!(logged[0].username, "testuser");
    assert_eq!(logged[0].title, "Test Book");

    let availability = app.audit.availability();
    assert_eq!(availability.len(), 1);
    assert!(availability[0].old_value);
    assert!(!availability[0].new_value);
    assert_eq!(availability[0].source, "POST /rentals");
}

#[tokio::test]
async fn renting_a_rented_book_conflicts_without_a_new_row() {
    let app = setup().await;
    let book = add_book(&app.repository, "321", "Available Book", "Author B").await;
    let first = add_user(&app.repository, "u1").await;
    let second = add_user(&app.repository, "u2").await;

    app.services.rentals.create_rental(book.id, first.id).await.unwrap();
    let err = app
        .services
        .rentals
        .create_rental(book.id, second.id)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Book is already rented"));
    assert!(app.repository.rentals.list_for_user(second.id).await.unwrap().is_empty());
    assert_eq!(app.audit.rentals().len(), 1);
    assert_availability_consistent(&app.repository).await;
}

#[tokio::test]
async fn missing_book_or_user_is_not_found() {
    let app = setup().await;
    let book = add_book(&app.repository, "4567", "Test Book", "Author A").await;
    let user = add_user(&app.repository, "testuser").await;

    let err = app.services.rentals.create_rental(9999, user.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Book not found"));

    let err = app.services.rentals.create_rental(book.id, 99999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref msg) if msg == "User not found"));

    let err = app.services.rentals.create_rental(99999, 99999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Nothing was written by the failed attempts
    assert!(app.repository.books.get_by_id(book.id).await.unwrap().available);
    assert!(app.audit.availability().is_empty());
}

#[tokio::test]
async fn returning_frees_the_book_for_the_next_renter() {
    let app = setup().await;
    let book = add_book(&app.repository, "777", "Book to Rent Again", "Author Y").await;
    let first = add_user(&app.repository, "u1").await;
    let second = add_user(&app.repository, "u2").await;

    let rental = app.services.rentals.create_rental(book.id, first.id).await.unwrap().value;
    let returned = app.services.rentals.return_rental(rental.id).await.unwrap();

    assert_eq!(returned.value.username, "u1");
    assert_eq!(returned.value.title, "Book to Rent Again");
    assert_eq!(returned.value.message(), "Book 'Book to Rent Again' returned by u1");
    assert!(app.repository.books.get_by_id(book.id).await.unwrap().available);
    assert_availability_consistent(&app.repository).await;

    let again = app.services.rentals.create_rental(book.id, second.id).await.unwrap().value;
    assert_ne!(again.id, rental.id);
    assert!(again.is_open());

    let closed = app.repository.rentals.get_by_id(rental.id).await.unwrap();
    assert!(closed.return_date.is_some());
    assert_availability_consistent(&app.repository).await;

    let actions: Vec<_> = app.audit.rentals().iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![RentalAction::Rented, RentalAction::Returned, RentalAction::Rented]
    );
}

#[tokio::test]
async fn returning_twice_conflicts_and_keeps_the_first_date() {
    let app = setup().await;
    let book = add_book(&app.repository, "555", "To Be Returned", "Author D").await;
    let user = add_user(&app.repository, "testuser").await;

    let rental = app.services.rentals.create_rental(book.id, user.id).await.unwrap().value;
    let first = app.services.rentals.return_rental(rental.id).await.unwrap().value;

    let err = app.services.rentals.return_rental(rental.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Book already returned"));

    let stored = app.repository.rentals.get_by_id(rental.id).await.unwrap();
    assert_eq!(stored.return_date, Some(first.return_date));
    assert_eq!(app.audit.rentals().len(), 2);
}

#[tokio::test]
async fn returning_an_unknown_rental_is_not_found() {
    let app = setup().await;
    let err = app.services.rentals.return_rental(9999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Rental not found"));
}

#[tokio::test]
async fn concurrent_rentals_of_one_book_admit_one_winner() {
    let app = setup().await;
    let book = add_book(&app.repository, "999", "Contested", "Author X").await;
    let first = add_user(&app.repository, "u1").await;
    let second = add_user(&app.repository, "u2").await;

    let (book_id, first_id, second_id) = (book.id, first.id, second.id);
    let a = app.services.clone();
    let b = app.services.clone();
    let (left, right) = tokio::join!(
        tokio::spawn(async move { a.rentals.create_rental(book_id, first_id).await }),
        tokio::spawn(async move { b.rentals.create_rental(book_id, second_id).await }),
    );
    let results = [left.unwrap(), right.unwrap()];

    let winners = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::Conflict(_))))
        .count();
    assert_eq!((winners, conflicts), (1, 1));
    assert_availability_consistent(&app.repository).await;
}

#[tokio::test]
async fn user_rentals_list_open_first() {
    let app = setup().await;
    let old = add_book(&app.repository, "1", "Old", "A").await;
    let current = add_book(&app.repository, "2", "Current", "B").await;
    let user = add_user(&app.repository, "reader").await;

    let now = Utc::now();
    seed_rental(
        &app.repository,
        old.id,
        user.id,
        now - Duration::days(9),
        Some(now - Duration::days(2)),
    )
    .await;
    let open = app.services.rentals.create_rental(current.id, user.id).await.unwrap().value;

    let rentals = app.services.rentals.list_user_rentals(user.id).await.unwrap();
    assert_eq!(rentals.len(), 2);
    assert_eq!(rentals[0].id, open.id);
    assert!(!rentals[1].is_open());

    let err = app.services.rentals.list_user_rentals(4242).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
