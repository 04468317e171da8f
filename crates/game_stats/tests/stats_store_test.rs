//! Tests for the stats store.

use chrono::NaiveDate;
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use tempfile::{NamedTempFile, TempDir};

use game_stats::{NewStatRecord, StatsStore, StoreErrorKind};

/// Creates a temporary database file with the schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready store.
fn setup_test_db() -> (NamedTempFile, StatsStore) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let store = StatsStore::open(db_path).expect("Failed to open store");
    (db_file, store)
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("Invalid date")
}

fn record(game: &str, played: &str, score: i32) -> NewStatRecord {
    NewStatRecord::without_comments(game.to_string(), date(played), score)
}

#[test]
fn test_ensure_schema_is_idempotent() {
    let (_db, store) = setup_test_db();
    let id = store
        .add_record(&record("Chess", "2024-01-15", 10))
        .expect("Add failed");

    for _ in 0..3 {
        store.ensure_schema().expect("Re-initialization failed");
    }

    let records = store.list_records().expect("List failed");
    assert_eq!(records.len(), 1);
    assert_eq!(*records[0].id(), id);

    store
        .add_record(&record("Go", "2024-01-16", 4))
        .expect("Add after re-init failed");
    assert_eq!(store.list_records().expect("List failed").len(), 2);
}

#[test]
fn test_add_record_round_trip() {
    let (_db, store) = setup_test_db();
    let id = store
        .add_record(&NewStatRecord::new(
            "Chess".to_string(),
            date("2024-01-15"),
            10,
            "first game".to_string(),
        ))
        .expect("Add failed");

    let records = store.list_records().expect("List failed");
    let found = records
        .iter()
        .find(|r| *r.id() == id)
        .expect("Record missing");
    assert_eq!(found.game_name(), "Chess");
    assert_eq!(*found.date_played(), date("2024-01-15"));
    assert_eq!(*found.score(), 10);
    assert_eq!(found.comments_text(), "first game");
}

#[test]
fn test_add_record_without_comments_stores_empty_text() {
    let (_db, store) = setup_test_db();
    store
        .add_record(&record("Chess", "2024-01-15", 10))
        .expect("Add failed");

    let records = store.list_records().expect("List failed");
    assert_eq!(records[0].comments().as_deref(), Some(""));
}

#[test]
fn test_list_records_most_recent_first() {
    let (_db, store) = setup_test_db();
    for played in ["2024-01-01", "2024-03-01", "2024-02-01"] {
        store
            .add_record(&record("Chess", played, 1))
            .expect("Add failed");
    }

    let dates: Vec<NaiveDate> = store
        .list_records()
        .expect("List failed")
        .iter()
        .map(|r| *r.date_played())
        .collect();
    assert_eq!(
        dates,
        [date("2024-03-01"), date("2024-02-01"), date("2024-01-01")]
    );
}

#[test]
fn test_list_for_chart_oldest_first() {
    let (_db, store) = setup_test_db();
    for (played, score) in [("2024-01-01", 5), ("2024-03-01", 9), ("2024-02-01", 7)] {
        store
            .add_record(&record("Chess", played, score))
            .expect("Add failed");
    }

    let series = store.list_for_chart().expect("Chart failed");
    assert_eq!(
        series.dates(),
        &[date("2024-01-01"), date("2024-02-01"), date("2024-03-01")]
    );
    assert_eq!(series.scores(), &[5, 7, 9]);
    assert_eq!(series.games(), &["Chess", "Chess", "Chess"]);
}

#[test]
fn test_same_date_ties_break_by_id() {
    let (_db, store) = setup_test_db();
    let first = store
        .add_record(&record("Alpha", "2024-05-05", 1))
        .expect("Add failed");
    let second = store
        .add_record(&record("Beta", "2024-05-05", 2))
        .expect("Add failed");

    let ids: Vec<i32> = store
        .list_records()
        .expect("List failed")
        .iter()
        .map(|r| *r.id())
        .collect();
    assert_eq!(ids, [second, first]);

    let games = store.list_for_chart().expect("Chart failed");
    assert_eq!(games.games(), &["Alpha", "Beta"]);
}

#[test]
fn test_update_existing_record() {
    let (_db, store) = setup_test_db();
    let id = store
        .add_record(&NewStatRecord::new(
            "Chess".to_string(),
            date("2024-01-15"),
            10,
            "first game".to_string(),
        ))
        .expect("Add failed");

    let updated = store
        .update_record(id, &record("Chess", "2024-01-16", 15))
        .expect("Update failed");
    assert!(updated);

    let records = store.list_records().expect("List failed");
    assert_eq!(records.len(), 1);
    assert_eq!(*records[0].id(), id);
    assert_eq!(*records[0].date_played(), date("2024-01-16"));
    assert_eq!(*records[0].score(), 15);
    assert_eq!(records[0].comments_text(), "");
}

#[test]
fn test_update_missing_record_returns_false() {
    let (_db, store) = setup_test_db();
    store
        .add_record(&record("Chess", "2024-01-15", 10))
        .expect("Add failed");

    let updated = store
        .update_record(9999, &record("Chess", "2024-01-16", 15))
        .expect("Update of missing id should not error");
    assert!(!updated);

    let records = store.list_records().expect("List failed");
    assert_eq!(records.len(), 1);
    assert_eq!(*records[0].score(), 10);
}

#[test]
fn test_delete_record_twice() {
    let (_db, store) = setup_test_db();
    let id = store
        .add_record(&record("Chess", "2024-01-15", 10))
        .expect("Add failed");

    assert!(store.delete_record(id).expect("Delete failed"));
    assert!(store.list_records().expect("List failed").is_empty());
    assert!(!store.delete_record(id).expect("Second delete failed"));
}

#[test]
fn test_empty_store_returns_empty_results() {
    let (_db, store) = setup_test_db();
    assert!(store.list_records().expect("List failed").is_empty());
    let series = store.list_for_chart().expect("Chart failed");
    assert!(series.is_empty());
    assert_eq!(series.len(), 0);
}

#[test]
fn test_ids_strictly_increase_and_are_never_reused() {
    let (_db, store) = setup_test_db();
    let ids: Vec<i32> = (0..3)
        .map(|i| {
            store
                .add_record(&record("Chess", "2024-01-15", i))
                .expect("Add failed")
        })
        .collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));

    assert!(store.delete_record(ids[0]).expect("Delete failed"));
    let after_lowest = store
        .add_record(&record("Chess", "2024-01-15", 3))
        .expect("Add failed");
    assert!(after_lowest > ids[2]);

    assert!(store.delete_record(after_lowest).expect("Delete failed"));
    let after_highest = store
        .add_record(&record("Chess", "2024-01-15", 4))
        .expect("Add failed");
    assert!(after_highest > after_lowest);
}

#[test]
fn test_validation_rejects_before_writing() {
    let (_db, store) = setup_test_db();

    let err = store
        .add_record(&record("  ", "2024-01-15", 10))
        .expect_err("Blank name accepted");
    assert_eq!(err.kind, StoreErrorKind::Validation);

    let err = store
        .add_record(&record("Chess", "2024-01-15", -1))
        .expect_err("Negative score accepted");
    assert_eq!(err.kind, StoreErrorKind::Validation);

    assert!(store.list_records().expect("List failed").is_empty());

    let id = store
        .add_record(&record("Chess", "2024-01-15", 10))
        .expect("Add failed");
    let err = store
        .update_record(id, &record("Chess", "2024-01-15", -3))
        .expect_err("Negative score accepted on update");
    assert!(err.is_validation());
    assert_eq!(*store.list_records().expect("List failed")[0].score(), 10);
}

#[test]
fn test_reset_all_wipes_data_and_store_stays_usable() {
    let (_db, store) = setup_test_db();
    for i in 0..3 {
        store
            .add_record(&record("Chess", "2024-01-15", i))
            .expect("Add failed");
    }

    store.reset_all().expect("Reset failed");
    assert!(store.list_records().expect("List failed").is_empty());

    store
        .add_record(&record("Go", "2024-02-01", 7))
        .expect("Add after reset failed");
    assert_eq!(store.list_records().expect("List failed").len(), 1);

    store.ensure_schema().expect("Init after reset failed");
    assert_eq!(store.list_records().expect("List failed").len(), 1);
}

#[test]
fn test_failed_reset_keeps_data() {
    let (db, store) = setup_test_db();
    store
        .add_record(&record("Chess", "2024-01-15", 10))
        .expect("Add failed");

    let db_path = db.path().to_str().expect("Invalid path");
    let mut blocker = SqliteConnection::establish(db_path).expect("Failed to connect");
    diesel::sql_query("BEGIN IMMEDIATE")
        .execute(&mut blocker)
        .expect("Lock failed");

    let err = store.reset_all().expect_err("Reset succeeded while locked");
    assert_eq!(err.kind, StoreErrorKind::Storage);

    diesel::sql_query("ROLLBACK")
        .execute(&mut blocker)
        .expect("Unlock failed");
    drop(blocker);

    let records = store.list_records().expect("List failed");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].game_name(), "Chess");
}

#[test]
fn test_reset_all_drops_table_created_outside_migrations() {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    create_legacy_table(&db_path);

    let store = StatsStore::new(&db_path);
    store.reset_all().expect("Reset failed");
    assert!(store.list_records().expect("List failed").is_empty());
}

#[test]
fn test_ensure_schema_keeps_legacy_rows() {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    create_legacy_table(&db_path);

    let store = StatsStore::open(&db_path).expect("Open failed");
    let records = store.list_records().expect("List failed");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].game_name(), "Tetris");
    assert_eq!(*records[0].comments(), None);
    assert_eq!(records[0].comments_text(), "");

    let id = store
        .add_record(&record("Chess", "2023-01-01", 1))
        .expect("Add failed");
    assert!(id > *records[0].id());
}

/// Writes a table the way an older tracker did, without migration bookkeeping.
fn create_legacy_table(db_path: &str) {
    let mut conn = SqliteConnection::establish(db_path).expect("Failed to connect");
    diesel::sql_query(
        "CREATE TABLE stats (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            game_name TEXT NOT NULL,
            date_played TEXT NOT NULL,
            score INTEGER NOT NULL,
            comments TEXT
        )",
    )
    .execute(&mut conn)
    .expect("Create failed");
    diesel::sql_query(
        "INSERT INTO stats (game_name, date_played, score, comments)
         VALUES ('Tetris', '2022-06-01', 4200, NULL)",
    )
    .execute(&mut conn)
    .expect("Insert failed");
}

#[test]
fn test_unopenable_path_is_storage_unavailable() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("missing").join("stats.db");

    let err = StatsStore::open(db_path.to_str().expect("Invalid path"))
        .expect_err("Open of missing directory succeeded");
    assert_eq!(err.kind, StoreErrorKind::StorageUnavailable);

    let store = StatsStore::new(db_path.to_str().expect("Invalid path"));
    let err = store.list_records().expect_err("List succeeded");
    assert_eq!(err.kind, StoreErrorKind::StorageUnavailable);
}

#[test]
fn test_missing_table_is_storage_error() {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let store = StatsStore::new(db_file.path().to_str().expect("Invalid path"));

    let err = store.list_records().expect_err("List without table succeeded");
    assert_eq!(err.kind, StoreErrorKind::Storage);
    assert!(
        err.file.ends_with("repository.rs"),
        "error located at {}:{}",
        err.file,
        err.line
    );

    store.ensure_schema().expect("Init failed");
    assert!(store.list_records().expect("List failed").is_empty());
}
