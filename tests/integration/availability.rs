use rental_ledger::AppError;

use crate::common::{
    add_book, add_user, assert_availability_consistent, assert_open_rentals_unavailable, setup,
};

#[tokio::test]
async fn override_unknown_book_is_not_found() {
    let app = setup().await;
    let err = app
        .services
        .availability
        .set_availability(9999, false)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(app.audit.availability().is_empty());
}

#[tokio::test]
async fn becoming_available_notifies_each_wishlisting_user_once() {
    let app = setup().await;
    let book = add_book(&app.repository, "B1", "Wanted Book", "Author W").await;
    let waiting = add_user(&app.repository, "u2").await;
    add_user(&app.repository, "bystander").await;

    app.services.availability.set_availability(book.id, false).await.unwrap();
    app.services.wishlist.add(waiting.id, book.id).await.unwrap();

    let outcome = app
        .services
        .availability
        .set_availability(book.id, true)
        .await
        .unwrap();
    assert!(outcome.value.available);
    assert!(outcome.warnings.is_empty());

    let notifications = app.audit.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].username, "u2");
    assert_eq!(notifications[0].title, "Wanted Book");

    // true -> true: no notification, but still audited
    app.services.availability.set_availability(book.id, true).await.unwrap();
    assert_eq!(app.audit.notifications().len(), 1);

    let audit = app.audit.availability();
    assert_eq!(audit.len(), 3);
    let last = audit.last().unwrap();
    assert!(last.old_value && last.new_value);
    assert_eq!(last.source, format!("PATCH /books/{}/availability", book.id));
}

#[tokio::test]
async fn returning_a_book_notifies_through_the_same_path() {
    let app = setup().await;
    let book = add_book(&app.repository, "B2", "Popular", "Author P").await;
    let renter = add_user(&app.repository, "renter").await;
    let waiting = add_user(&app.repository, "waiting").await;

    let rental = app.services.rentals.create_rental(book.id, renter.id).await.unwrap().value;
    app.services.wishlist.add(waiting.id, book.id).await.unwrap();
    assert!(app.audit.notifications().is_empty());

    app.services.rentals.return_rental(rental.id).await.unwrap();

    let notifications = app.audit.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].user_id, waiting.id);

    let last = app.audit.availability().pop().unwrap();
    assert_eq!(last.source, format!("PATCH /rentals/{}/return", rental.id));
    assert!(!last.old_value && last.new_value);
}

#[tokio::test]
async fn override_cannot_free_a_rented_book() {
    let app = setup().await;
    let book = add_book(&app.repository, "B3", "Out", "Author O").await;
    let user = add_user(&app.repository, "renter").await;
    app.services.rentals.create_rental(book.id, user.id).await.unwrap();

    let err = app
        .services
        .availability
        .set_availability(book.id, true)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert!(!app.repository.books.get_by_id(book.id).await.unwrap().available);
    assert_availability_consistent(&app.repository).await;
}

#[tokio::test]
async fn withdrawn_book_cannot_be_rented() {
    let app = setup().await;
    let book = add_book(&app.repository, "456", "Unavailable Book", "Author C").await;
    let user = add_user(&app.repository, "testuser").await;

    let outcome = app
        .services
        .availability
        .set_availability(book.id, false)
        .await
        .unwrap();
    assert!(!outcome.value.available);

    let err = app.services.rentals.create_rental(book.id, user.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Book is already rented"));
    assert!(app.repository.rentals.list_for_user(user.id).await.unwrap().is_empty());
    assert_open_rentals_unavailable(&app.repository).await;

    app.services.availability.set_availability(book.id, true).await.unwrap();
    assert_availability_consistent(&app.repository).await;
}
