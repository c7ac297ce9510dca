//! Demo seed data for an empty catalog.
//!
//! Seeding is best-effort: it only checks whether `authors` is empty and
//! inserts everything in one unit of work.

use crate::model::author::NewAuthor;
use crate::model::book::NewBook;
use crate::model::review::NewReview;
use crate::repo::catalog_repo::{
    AuthorRepository, BookRepository, EntityKind, RepoResult, ReviewRepository,
};
use crate::repo::unit_of_work::{AccessMode, UnitOfWork};
use log::info;
use rusqlite::Connection;

const SEED_AUTHORS: &[(&str, &str)] = &[
    ("Роберт Мартин", "Специалист по программной инженерии"),
    ("Эрик Маттес", "Школьный учитель математики и информатики"),
    ("Лучано Рамальо", "Python разработчик и тренер"),
    (
        "Эрих Гамма",
        "Специалист по информатике, соавтор книги \"Приемы объектно-ориентированного проектирования\"",
    ),
];

// (author index, title, isbn, description, price)
const SEED_BOOKS: &[(usize, &str, &str, &str, f64)] = &[
    (
        0,
        "Чистый код",
        "9780132350884",
        "Руководство по гибкой разработке программного обеспечения",
        3500.0,
    ),
    (
        1,
        "Python Crash Course",
        "9781593276034",
        "Практический проектно-ориентированный курс по программированию",
        2900.0,
    ),
    (
        2,
        "Fluent Python",
        "9781491946008",
        "Ясное, лаконичное и эффективное программирование",
        3900.0,
    ),
    (
        3,
        "Design Patterns",
        "9780201633610",
        "Элементы многократно используемого объектно-ориентированного программного обеспечения",
        4500.0,
    ),
];

// (book index, rating, comment, reviewer)
const SEED_REVIEWS: &[(usize, i64, &str, &str)] = &[
    (0, 5, "Отличная книга для изучения чистого кода", "Иван Иванов"),
    (1, 4, "Хорошее введение в Python", "Мария Сидорова"),
    (
        2,
        5,
        "Подробная книга по Python для разработчиков среднего уровня",
        "Сергей Петров",
    ),
];

/// Inserts the demo authors, books and reviews when `authors` is empty.
///
/// Returns `true` when data was inserted.
pub fn seed_if_empty(conn: &mut Connection) -> RepoResult<bool> {
    let uow = UnitOfWork::begin(conn, "seed", AccessMode::Write)?;
    let repo = uow.repo();
    if repo.count(EntityKind::Author)? > 0 {
        uow.rollback()?;
        return Ok(false);
    }

    let mut author_ids = Vec::with_capacity(SEED_AUTHORS.len());
    for (name, bio) in SEED_AUTHORS {
        let mut draft = NewAuthor::new(*name);
        draft.bio = Some((*bio).to_string());
        author_ids.push(repo.insert_author(&draft)?.id);
    }

    let mut book_ids = Vec::with_capacity(SEED_BOOKS.len());
    for (author_index, title, isbn, description, price) in SEED_BOOKS {
        let mut draft = NewBook::new(*title, author_ids[*author_index]);
        draft.isbn = Some((*isbn).to_string());
        draft.description = Some((*description).to_string());
        draft.price = Some(*price);
        book_ids.push(repo.insert_book(&draft)?.id);
    }

    for (book_index, rating, comment, reviewer) in SEED_REVIEWS {
        repo.insert_review(&NewReview {
            rating: *rating,
            comment: Some((*comment).to_string()),
            reviewer_name: (*reviewer).to_string(),
            book_id: book_ids[*book_index],
        })?;
    }

    uow.commit()?;
    info!(
        "event=db_seed module=db status=ok authors={} books={} reviews={}",
        SEED_AUTHORS.len(),
        SEED_BOOKS.len(),
        SEED_REVIEWS.len()
    );
    Ok(true)
}
