use super::ActionLogRepository;
use crate::domain::action_log::{ActionLog, ActionType};
use chrono::{Duration, Utc};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

fn setup_test_db() -> Arc<Mutex<Connection>> {
    let conn = Connection::open_in_memory().unwrap();
    crate::db::configure_sqlite_connection(&conn).unwrap();
    crate::db::init_schema(&conn).unwrap();
    Arc::new(Mutex::new(conn))
}

fn make_test_log(sheet_id: Option<&str>, actor: &str, offset_secs: i64) -> ActionLog {
    let mut log = ActionLog::new(
        ActionType::UpdateCostSheet,
        sheet_id,
        actor,
        Some(serde_json::json!({"markup_rate": 0.8})),
        Some("Test log".to_string()),
    );
    log.action_ts = Utc::now().naive_utc() + Duration::seconds(offset_secs);
    log
}

#[test]
fn test_insert_and_find_by_id() {
    let repo = ActionLogRepository::new(setup_test_db());

    let log = make_test_log(Some("cs-1"), "dana", 0);
    let id = repo.insert(&log).unwrap();
    assert_eq!(id, log.action_id);

    let found = repo.find_by_id(&id).unwrap().unwrap();
    assert_eq!(found.cost_sheet_id.as_deref(), Some("cs-1"));
    assert_eq!(found.actor, "dana");
    assert_eq!(found.action_type, "UpdateCostSheet");
    assert_eq!(found.payload_json, log.payload_json);
    assert_eq!(found.action_ts, log.action_ts);
}

#[test]
fn test_find_by_id_missing() {
    let repo = ActionLogRepository::new(setup_test_db());
    assert!(repo.find_by_id("nope").unwrap().is_none());
}

#[test]
fn test_find_by_cost_sheet_newest_first() {
    let repo = ActionLogRepository::new(setup_test_db());

    repo.insert(&make_test_log(Some("cs-1"), "dana", 0)).unwrap();
    repo.insert(&make_test_log(Some("cs-1"), "lee", 10)).unwrap();
    repo.insert(&make_test_log(Some("cs-2"), "dana", 5)).unwrap();
    repo.insert(&make_test_log(None, "admin", 20)).unwrap();

    let logs = repo.find_by_cost_sheet("cs-1").unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].actor, "lee");

    let recent = repo.recent(2).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].actor, "admin");
    assert!(recent[0].cost_sheet_id.is_none());
}
