use launchsearch_core::providers::{HistoryStore, SqliteHistoryStore};

#[test]
fn recent_returns_most_recent_first_and_caps() {
    let store = SqliteHistoryStore::open_memory().unwrap();
    for i in 1..=8 {
        store.record(&format!("query {i}"), i).unwrap();
    }

    let recent = store.recent(5).unwrap();
    let keywords: Vec<&str> = recent.iter().map(|k| k.keyword.as_str()).collect();

    assert_eq!(
        keywords,
        vec!["query 8", "query 7", "query 6", "query 5", "query 4"]
    );
}

#[test]
fn recording_again_moves_keyword_to_front() {
    let store = SqliteHistoryStore::open_memory().unwrap();
    store.record("maps", 10).unwrap();
    store.record("mail", 20).unwrap();
    store.record("maps", 30).unwrap();

    let recent = store.recent(10).unwrap();

    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].keyword, "maps");
    assert_eq!(recent[0].last_used_epoch_secs, 30);
}

#[test]
fn blank_keywords_are_not_stored() {
    let store = SqliteHistoryStore::open_memory().unwrap();
    store.record("   ", 1).unwrap();
    assert!(store.recent(5).unwrap().is_empty());
}

#[test]
fn file_store_persists_between_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("history.sqlite3");

    SqliteHistoryStore::open_file(&path)
        .unwrap()
        .record("weather", 5)
        .unwrap();
    let reopened = SqliteHistoryStore::open_file(&path).unwrap();

    assert_eq!(reopened.recent(5).unwrap()[0].keyword, "weather");
}
