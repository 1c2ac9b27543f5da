use rental_ledger::{
    models::{book::BookQuery, user::CreateUser},
    services::{catalog::parse_books_csv, ImportSummary},
    AppError,
};

use crate::common::{add_book, add_user, setup};

fn query(q: Option<&str>, title: Option<&str>, author: Option<&str>) -> BookQuery {
    BookQuery {
        query: q.map(str::to_string),
        title: title.map(str::to_string),
        author: author.map(str::to_string),
    }
}

#[tokio::test]
async fn search_matches_case_insensitive_substrings() {
    let app = setup().await;
    add_book(&app.repository, "9780441013593", "Dune", "Frank Herbert").await;
    add_book(&app.repository, "9780553293357", "Foundation", "Isaac Asimov").await;
    add_book(&app.repository, "9780345391803", "The Hitchhiker's Guide", "Douglas Adams").await;

    let titles = |books: Vec<rental_ledger::models::BookShort>| {
        books.into_iter().map(|b| b.title).collect::<Vec<_>>()
    };
    let catalog = &app.services.catalog;

    assert_eq!(titles(catalog.search_books(&query(Some("HERB"), None, None)).await.unwrap()), vec!["Dune"]);
    assert_eq!(titles(catalog.search_books(&query(Some("0553"), None, None)).await.unwrap()), vec!["Foundation"]);
    assert_eq!(
        titles(catalog.search_books(&query(None, Some("guide"), Some("adams"))).await.unwrap()),
        vec!["The Hitchhiker's Guide"]
    );
    assert!(catalog
        .search_books(&query(None, Some("guide"), Some("asimov")))
        .await
        .unwrap()
        .is_empty());
    // A free-text query wins over the separate filters
    assert_eq!(
        titles(catalog.search_books(&query(Some("dune"), Some("foundation"), None)).await.unwrap()),
        vec!["Dune"]
    );
    // LIKE wildcards are literal
    assert!(catalog.search_books(&query(Some("%"), None, None)).await.unwrap().is_empty());
    assert_eq!(catalog.search_books(&BookQuery::default()).await.unwrap().len(), 3);
    assert_eq!(catalog.list_books().await.unwrap().len(), 3);
}

#[tokio::test]
async fn usernames_are_unique_and_validated() {
    let app = setup().await;
    let users = &app.services.users;

    let created = users
        .create_user(CreateUser {
            username: "  alice ".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(created.username, "alice");

    let err = users
        .create_user(CreateUser {
            username: "alice".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Username already exists"));

    let err = users
        .create_user(CreateUser {
            username: "   ".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn duplicate_isbn_conflicts() {
    let app = setup().await;
    add_book(&app.repository, "123", "First", "A").await;
    let err = app
        .repository
        .books
        .create(&rental_ledger::models::book::CreateBook {
            id: None,
            isbn: "123".to_string(),
            title: "Second".to_string(),
            authors: "B".to_string(),
            publication_year: None,
            language: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn wishlist_add_list_remove() {
    let app = setup().await;
    let book = add_book(&app.repository, "1", "Dune", "Frank Herbert").await;
    let user = add_user(&app.repository, "alice").await;
    let wishlist = &app.services.wishlist;

    wishlist.add(user.id, book.id).await.unwrap();
    let err = wishlist.add(user.id, book.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Book already in wishlist"));

    let items = wishlist.list(user.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].book_id, book.id);
    assert_eq!(items[0].title, "Dune");

    wishlist.remove(user.id, book.id).await.unwrap();
    assert!(wishlist.list(user.id).await.unwrap().is_empty());

    let err = wishlist.remove(user.id, book.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Item not in wishlist"));

    assert!(matches!(wishlist.add(user.id, 999).await, Err(AppError::NotFound(_))));
    assert!(matches!(wishlist.add(999, book.id).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn referenced_records_cannot_be_deleted() {
    let app = setup().await;
    let book = add_book(&app.repository, "DEL456", "BookToDeleteRented", "Author E").await;
    let user = add_user(&app.repository, "user_to_delete").await;
    let rental = app.services.rentals.create_rental(book.id, user.id).await.unwrap().value;

    let err = app.services.catalog.delete_book(book.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    let err = app.services.users.delete_user(user.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Closing the rental keeps it as history, so the restriction still holds
    app.services.rentals.return_rental(rental.id).await.unwrap();
    assert!(matches!(
        app.services.users.delete_user(user.id).await,
        Err(AppError::Conflict(_))
    ));
    assert!(app.repository.rentals.get_by_id(rental.id).await.is_ok());

    let spare = add_user(&app.repository, "spare").await;
    app.services.users.delete_user(spare.id).await.unwrap();
    assert!(matches!(
        app.services.users.get_user(spare.id).await,
        Err(AppError::NotFound(_))
    ));

    let loose = add_book(&app.repository, "LOOSE", "Unreferenced", "Nobody").await;
    app.services.catalog.delete_book(loose.id).await.unwrap();
    assert!(matches!(
        app.services.catalog.delete_book(loose.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn csv_import_skips_known_ids() {
    let app = setup().await;
    let data = "\
Id,ISBN,Authors,Publication Year,Title,Language
1,9780441013593,Frank Herbert,1965,Dune,eng
2,9780553293357,Isaac Asimov,1951,Foundation,eng
";

    let books = parse_books_csv(data.as_bytes()).unwrap();
    let first = app.services.catalog.import_books(books).await.unwrap();
    assert_eq!(first, ImportSummary { imported: 2, skipped: 0 });

    let books = parse_books_csv(data.as_bytes()).unwrap();
    let second = app.services.catalog.import_books(books).await.unwrap();
    assert_eq!(second, ImportSummary { imported: 0, skipped: 2 });

    let dune = app.services.catalog.get_book(1).await.unwrap();
    assert_eq!(dune.title, "Dune");
    assert_eq!(dune.publication_year, Some(1965));
    assert!(dune.available);
}

#[tokio::test]
async fn user_import_skips_existing_names() {
    let app = setup().await;
    add_user(&app.repository, "alice").await;

    let summary = app
        .services
        .users
        .import_users(["alice", "bob"])
        .await
        .unwrap();

    assert_eq!(summary, ImportSummary { imported: 1, skipped: 1 });
    assert_eq!(app.services.users.list_users().await.unwrap().len(), 2);
}
