use bookshelf_core::{
    FieldMap, MemoryError, MemorySection, MemoryStore, Status, StatusError, RECENT_SEARCH_CAPACITY,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::thread;

fn fields(value: Value) -> FieldMap {
    value.as_object().cloned().unwrap()
}

#[test]
fn starts_with_seeded_sections() {
    let store = MemoryStore::seeded();
    let snapshot = store.get_all().unwrap();

    assert!(snapshot.recent_searches.is_empty());
    assert_eq!(snapshot.popular_books.len(), 5);
    assert_eq!(snapshot.popular_books[0].title, "Python для начинающих");
    assert_eq!(snapshot.site_metrics.visitors, 12345);
    assert_eq!(snapshot.site_metrics.page_views, 54321);
    assert_eq!(snapshot.site_metrics.unique_users, 7890);
}

#[test]
fn keeps_the_last_ten_searches_oldest_first() {
    let store = MemoryStore::seeded();
    for idx in 0..15 {
        store.add_search(format!("q{idx}")).unwrap();
    }

    let MemorySection::RecentSearches(searches) = store.get("recent_searches").unwrap() else {
        panic!("expected recent_searches section");
    };
    let queries: Vec<&str> = searches.iter().map(|entry| entry.query.as_str()).collect();
    let expected: Vec<String> = (5..15).map(|idx| format!("q{idx}")).collect();
    assert_eq!(queries, expected.iter().map(String::as_str).collect::<Vec<_>>());
    assert!(searches.iter().all(|entry| entry.timestamp.ends_with('Z')));
}

#[test]
fn empty_query_is_recorded() {
    let store = MemoryStore::seeded();
    let recorded = store.add_search("").unwrap();
    assert_eq!(recorded.message, "search query recorded");
    assert_eq!(store.get_all().unwrap().recent_searches[0].query, "");
}

#[test]
fn partial_metric_update_keeps_other_counters() {
    let store = MemoryStore::seeded();
    let updated = store
        .update_metrics(&fields(json!({"visitors": 500, "referrer": "ignored"})))
        .unwrap();

    assert_eq!(updated.metrics.visitors, 500);
    assert_eq!(updated.metrics.page_views, 54321);
    assert_eq!(updated.metrics.unique_users, 7890);
    assert_eq!(store.get_all().unwrap().site_metrics, updated.metrics);
}

#[test]
fn negative_metric_is_stored_as_given() {
    let store = MemoryStore::seeded();
    let updated = store
        .update_metrics(&fields(json!({"unique_users": -5})))
        .unwrap();
    assert_eq!(updated.metrics.unique_users, -5);
    assert_eq!(store.get_all().unwrap().site_metrics.unique_users, -5);
}

#[test]
fn fractional_metric_is_bad_request_and_applies_nothing() {
    let store = MemoryStore::seeded();
    let err = store
        .update_metrics(&fields(json!({"visitors": 1, "page_views": 2.5})))
        .unwrap_err();
    assert!(matches!(err, MemoryError::InvalidMetric(_)));
    assert_eq!(err.status(), Status::BadRequest);
    assert_eq!(store.get_all().unwrap().site_metrics.visitors, 12345);
}

#[test]
fn section_json_is_keyed_by_name() {
    let store = MemoryStore::seeded();
    let value = serde_json::to_value(store.get("popular_books").unwrap()).unwrap();
    assert_eq!(value["popular_books"][1]["title"], "Чистый код");

    let err = store.get("nope").unwrap_err();
    assert_eq!(err.status(), Status::NotFound);
    assert_eq!(err.to_string(), "key `nope` not found in memory store");
}

#[test]
fn concurrent_writers_keep_history_bounded() {
    let store = Arc::new(MemoryStore::seeded());

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for idx in 0..200 {
                    store.add_search(format!("w{worker}-q{idx}")).unwrap();
                    store
                        .update_metrics(&fields(json!({"visitors": worker * 1000 + idx})))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = store.get_all().unwrap();
    assert_eq!(snapshot.recent_searches.len(), RECENT_SEARCH_CAPACITY);
    for entry in &snapshot.recent_searches {
        let (worker, idx) = entry.query.split_once("-q").unwrap();
        assert!(worker.starts_with('w'));
        assert!(idx.parse::<u32>().unwrap() < 200);
        assert!(chrono::DateTime::parse_from_rfc3339(&entry.timestamp).is_ok());
    }
    assert_eq!(snapshot.site_metrics.visitors % 1000, 199);
}
