// ==========================================
// CostSheetRepository 集成测试
// ==========================================
// 测试目标: SQLite 写入/读取、回收站过滤、永久删除、操作日志
// ==========================================

mod test_helpers;

use awning_estimator::domain::action_log::{ActionLog, ActionType};
use awning_estimator::domain::types::{Outcome, RecordState};
use awning_estimator::engine::CostRollupEngine;
use awning_estimator::repository::{
    ActionLogRepository, CostSheetRepository, CostSheetStore, RepositoryError,
};
use std::sync::{Arc, Mutex};
use test_helpers::{assert_close, create_test_db, open_test_connection, record_with_prices, sample_input};

fn setup() -> (tempfile::NamedTempFile, CostSheetRepository, ActionLogRepository) {
    let (temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = Arc::new(Mutex::new(
        open_test_connection(&db_path).expect("Failed to open connection"),
    ));
    (
        temp_file,
        CostSheetRepository::new(conn.clone()),
        ActionLogRepository::new(conn),
    )
}

#[test]
fn test_insert_and_find_preserves_record() {
    let (_tmp, repo, _) = setup();

    let mut record = record_with_prices("cs-1", "Canopy", Outcome::Won, Some(14.3), None);
    record.input = sample_input("Canopy", "Acme");
    record.rollup = CostRollupEngine::new().compute(&record.input);
    repo.insert(&record).unwrap();

    let loaded = repo.find_by_id("cs-1").unwrap().expect("record should exist");
    assert_eq!(loaded.id, "cs-1");
    assert_eq!(loaded.outcome, Outcome::Won);
    assert_eq!(loaded.state, RecordState::Active);
    assert_eq!(loaded.input.header, record.input.header);
    assert_eq!(loaded.input.lines.len(), 2);
    assert_eq!(loaded.created_at, record.created_at);
    assert_close(loaded.rollup.final_client_price, record.rollup.final_client_price);
    assert_eq!(
        loaded.rollup.price_per_lin_ft_pre_delivery.is_some(),
        record.rollup.price_per_lin_ft_pre_delivery.is_some()
    );

    assert!(repo.find_by_id("missing").unwrap().is_none());
}

#[test]
fn test_duplicate_insert_rejected() {
    let (_tmp, repo, _) = setup();
    let record = record_with_prices("dup", "Canopy", Outcome::Unknown, None, None);
    repo.insert(&record).unwrap();

    let err = repo.insert(&record).unwrap_err();
    assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
}

#[test]
fn test_update_missing_record_is_not_found() {
    let (_tmp, repo, _) = setup();
    let record = record_with_prices("ghost", "Canopy", Outcome::Unknown, None, None);

    let err = repo.update(&record).unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[test]
fn test_list_filters_trashed_and_counts_states() {
    let (_tmp, repo, _) = setup();

    let active = record_with_prices("a", "Canopy", Outcome::Won, Some(10.0), None);
    let mut trashed = record_with_prices("t", "Canopy", Outcome::Lost, Some(12.0), None);
    repo.insert(&active).unwrap();
    repo.insert(&trashed).unwrap();

    trashed.state = RecordState::Trashed;
    trashed.deleted_at = Some(trashed.updated_at);
    trashed.deleted_by = Some("erin".to_string());
    repo.update(&trashed).unwrap();

    let visible = repo.list(false).unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, "a");

    let all = repo.list(true).unwrap();
    assert_eq!(all.len(), 2);

    let reloaded = repo.find_by_id("t").unwrap().unwrap();
    assert_eq!(reloaded.deleted_by.as_deref(), Some("erin"));
    assert!(reloaded.deleted_at.is_some());

    assert_eq!(repo.count_by_state(RecordState::Active).unwrap(), 1);
    assert_eq!(repo.count_by_state(RecordState::Trashed).unwrap(), 1);
}

#[test]
fn test_delete_permanently() {
    let (_tmp, repo, _) = setup();
    repo.insert(&record_with_prices("gone", "Canopy", Outcome::Unknown, None, None))
        .unwrap();

    assert!(repo.delete_permanently("gone").unwrap());
    assert!(!repo.delete_permanently("gone").unwrap());
    assert!(repo.find_by_id("gone").unwrap().is_none());
}

#[test]
fn test_upsert_inserts_then_updates() {
    let (_tmp, repo, _) = setup();
    let mut record = record_with_prices("u", "Canopy", Outcome::Unknown, None, None);
    repo.upsert(&record).unwrap();

    record.outcome = Outcome::Lost;
    repo.upsert(&record).unwrap();

    let loaded = repo.find_by_id("u").unwrap().unwrap();
    assert_eq!(loaded.outcome, Outcome::Lost);
    assert_eq!(repo.list(true).unwrap().len(), 1);
}

#[test]
fn test_action_log_round_trip_and_ordering() {
    let (_tmp, _, logs) = setup();

    let first = ActionLog::new(
        ActionType::CreateCostSheet,
        Some("cs-9"),
        "erin",
        Some(serde_json::json!({"final_client_price": 1430.1})),
        Some("Canopy / Acme".to_string()),
    );
    let second = ActionLog::new(ActionType::Trash, Some("cs-9"), "erin", None, None);
    let unrelated = ActionLog::new(ActionType::UpdateSettings, None, "alex", None, None);

    let first_id = logs.insert(&first).unwrap();
    logs.insert(&second).unwrap();
    logs.insert(&unrelated).unwrap();

    let loaded = logs.find_by_id(&first_id).unwrap().unwrap();
    assert_eq!(loaded.action_type, "CreateCostSheet");
    assert_eq!(
        loaded.payload_json,
        Some(serde_json::json!({"final_client_price": 1430.1}))
    );

    let history = logs.find_by_cost_sheet("cs-9").unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].action_ts >= history[1].action_ts);

    assert_eq!(logs.recent(2).unwrap().len(), 2);
    assert_eq!(logs.recent(10).unwrap().len(), 3);
}
