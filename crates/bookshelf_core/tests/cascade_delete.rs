use bookshelf_core::{
    AuthorRepository, AuthorService, BookService, Catalog, DeleteReport, EntityKind, FieldMap,
    RepoError, ReviewService, SqliteCatalogRepository, Status, StatusError,
};
use serde_json::{json, Value};

fn fields(value: Value) -> FieldMap {
    value.as_object().cloned().unwrap()
}

struct Graph {
    author: i64,
    books: Vec<i64>,
    reviews: Vec<i64>,
}

fn build_graph(catalog: &Catalog, name: &str) -> Graph {
    let author = AuthorService::new(catalog)
        .create(&fields(json!({"name": name})))
        .unwrap()
        .id;
    let mut books = Vec::new();
    let mut reviews = Vec::new();
    for title in ["B1", "B2"] {
        let book = BookService::new(catalog)
            .create(&fields(json!({"title": format!("{name} {title}"), "author_id": author})))
            .unwrap()
            .id;
        for rating in [2, 5] {
            let review = ReviewService::new(catalog)
                .create(&fields(json!({
                    "rating": rating,
                    "reviewer_name": "reader",
                    "book_id": book
                })))
                .unwrap()
                .id;
            reviews.push(review);
        }
        books.push(book);
    }
    Graph {
        author,
        books,
        reviews,
    }
}

#[test]
fn deleting_author_removes_books_and_reviews() {
    let catalog = Catalog::open_in_memory().unwrap();
    let doomed = build_graph(&catalog, "Doomed");
    let kept = build_graph(&catalog, "Kept");

    let deleted = AuthorService::new(&catalog).delete(doomed.author).unwrap();
    assert_eq!(deleted.message, format!("author {} deleted", doomed.author));

    assert_eq!(
        AuthorService::new(&catalog).get(doomed.author).unwrap_err().status(),
        Status::NotFound
    );
    for book in &doomed.books {
        assert_eq!(
            BookService::new(&catalog).get(*book).unwrap_err().status(),
            Status::NotFound
        );
    }
    for review in &doomed.reviews {
        assert_eq!(
            ReviewService::new(&catalog).get(*review).unwrap_err().status(),
            Status::NotFound
        );
    }

    assert_eq!(BookService::new(&catalog).list_by_author(kept.author).unwrap().len(), 2);
    assert_eq!(ReviewService::new(&catalog).list().unwrap().len(), kept.reviews.len());
}

#[test]
fn deleting_book_removes_only_its_reviews() {
    let catalog = Catalog::open_in_memory().unwrap();
    let graph = build_graph(&catalog, "Solo");

    BookService::new(&catalog).delete(graph.books[0]).unwrap();

    let remaining = ReviewService::new(&catalog).list().unwrap();
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().all(|review| review.book_id == graph.books[1]));
    assert!(AuthorService::new(&catalog).get(graph.author).is_ok());
}

#[test]
fn repository_reports_cascade_counts() {
    let catalog = Catalog::open_in_memory().unwrap();
    let graph = build_graph(&catalog, "Counted");

    let report = catalog
        .write("test_delete", |repo: &SqliteCatalogRepository<'_>| {
            repo.delete_author(graph.author)
        })
        .unwrap();
    assert_eq!(
        report,
        DeleteReport {
            authors: 1,
            books: 2,
            reviews: 4
        }
    );

    let conn = catalog.connection().unwrap();
    let repo = SqliteCatalogRepository::new(&conn);
    assert_eq!(repo.count(EntityKind::Review).unwrap(), 0);
    assert_eq!(repo.count(EntityKind::Book).unwrap(), 0);
}

#[test]
fn deleting_missing_author_is_not_found() {
    let catalog = Catalog::open_in_memory().unwrap();
    let err = AuthorService::new(&catalog).delete(404).unwrap_err();
    assert_eq!(err.status(), Status::NotFound);
}

#[test]
fn failed_author_delete_leaves_the_whole_graph() {
    let catalog = Catalog::open_in_memory().unwrap();
    let graph = build_graph(&catalog, "Survivor");

    let result: Result<DeleteReport, RepoError> = catalog.write("test_delete", |repo| {
        let report = repo.delete_author(graph.author)?;
        assert_eq!(report.reviews, 4);
        Err(RepoError::Unavailable("abort after cascade".to_string()))
    });
    assert!(matches!(result, Err(RepoError::Unavailable(_))));

    assert!(AuthorService::new(&catalog).get(graph.author).is_ok());
    for book in &graph.books {
        assert_eq!(BookService::new(&catalog).get(*book).unwrap().author_id, graph.author);
    }
    for review in &graph.reviews {
        assert!(ReviewService::new(&catalog).get(*review).is_ok());
    }
}
