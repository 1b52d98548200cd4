use geofence_core::db::migrations::latest_version;
use geofence_core::db::open_db_in_memory;
use geofence_core::{RepoError, SlotRepository, SqliteSlotRepository};
use rusqlite::Connection;

#[test]
fn missing_slot_reads_as_none() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let repo = SqliteSlotRepository::try_new(&conn).expect("slot repo");

    assert_eq!(repo.read_slot("geoRemindersApp").expect("read slot"), None);
}

#[test]
fn write_slot_overwrites_previous_value() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let repo = SqliteSlotRepository::try_new(&conn).expect("slot repo");

    repo.write_slot("geoRemindersApp", "[1]").expect("write slot");
    repo.write_slot("geoRemindersApp", "[2]").expect("write slot");

    assert_eq!(
        repo.read_slot("geoRemindersApp").expect("read slot").as_deref(),
        Some("[2]")
    );
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_slots;", [], |row| row.get(0))
        .expect("count slots");
    assert_eq!(rows, 1);
}

#[test]
fn slots_are_isolated_by_key() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let repo = SqliteSlotRepository::try_new(&conn).expect("slot repo");

    repo.write_slot("a", "first").expect("write slot");
    repo.write_slot("b", "second").expect("write slot");

    assert_eq!(repo.read_slot("a").expect("read slot").as_deref(), Some("first"));
    assert_eq!(repo.read_slot("b").expect("read slot").as_deref(), Some("second"));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().expect("raw in-memory connection");

    let result = SqliteSlotRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_slot_table() {
    let conn = Connection::open_in_memory().expect("raw in-memory connection");
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .expect("set user_version");

    let result = SqliteSlotRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("kv_slots"))
    ));
}
