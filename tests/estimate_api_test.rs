// ==========================================
// EstimateApi 集成测试
// ==========================================
// 测试目标: 草稿默认值、保存/修改/标记结果、权限、操作日志、护栏预览
// ==========================================

mod test_helpers;

use awning_estimator::api::ApiError;
use awning_estimator::config::LaborRatePreset;
use awning_estimator::domain::line_item::LineItem;
use awning_estimator::domain::types::{
    GuardrailStatus, LaborPhase, Outcome, RecordState, SqFtFormula,
};
use test_helpers::{admin, assert_close, create_test_state, estimator, sample_input, viewer};

#[test]
fn test_new_draft_uses_config_defaults() {
    let (_tmp, state) = create_test_state();

    let draft = state.estimate_api.new_draft(&estimator());
    assert_eq!(draft.markup_rate, 0.8);
    assert_eq!(draft.sales_tax_rate, 0.0975);
    assert_eq!(draft.sq_ft_formula, SqFtFormula::WidthXProjectionPlusFace);
    assert_eq!(draft.header.estimator.as_deref(), Some("erin"));
    assert!(draft.header.estimate_date.is_some());
    assert!(draft.lines.is_empty());
}

#[test]
fn test_line_templates_use_configured_rates() {
    let (_tmp, state) = create_test_state();

    let mut cfg = state.admin_api.load_settings(&admin()).unwrap();
    cfg.labor_rates.push(LaborRatePreset {
        name: "Welding".to_string(),
        hourly_rate: 55.0,
    });
    cfg.defaults.hotel_rate = 180.0;
    cfg.defaults.drive_rate = 42.5;
    cfg.defaults.mileage_rate = 0.71;
    state.admin_api.save_settings(&cfg, &admin()).unwrap();

    match state
        .estimate_api
        .labor_line(LaborPhase::Installation, Some("Welding"))
    {
        LineItem::Labor(line) => {
            assert_eq!(line.phase, LaborPhase::Installation);
            assert_eq!(line.hourly_rate, 55.0);
        }
        other => panic!("unexpected line kind: {}", other.kind()),
    }
    match state.estimate_api.labor_line(LaborPhase::Fabrication, None) {
        LineItem::Labor(line) => assert_eq!(line.hourly_rate, 35.0),
        other => panic!("unexpected line kind: {}", other.kind()),
    }
    match state.estimate_api.hotel_line() {
        LineItem::Hotel(line) => assert_eq!(line.rate_per_night, 180.0),
        other => panic!("unexpected line kind: {}", other.kind()),
    }
    match state.estimate_api.drive_time_line() {
        LineItem::DriveTime(line) => {
            assert_eq!(line.hourly_rate, 42.5);
            assert_eq!(line.trips, 0.0);
        }
        other => panic!("unexpected line kind: {}", other.kind()),
    }
    match state.estimate_api.mileage_line() {
        LineItem::Mileage(line) => assert_eq!(line.rate_per_mile, 0.71),
        other => panic!("unexpected line kind: {}", other.kind()),
    }
}

#[test]
fn test_unconfigured_category_is_flagged_but_saved() {
    let (_tmp, state) = create_test_state();
    let api = &state.estimate_api;

    assert!(api.preview(&sample_input("canopy", "Acme")).unwrap().category_known);

    let gazebo = sample_input("Gazebo", "Acme");
    assert!(!api.preview(&gazebo).unwrap().category_known);
    let saved = api.save(gazebo, &estimator()).unwrap();
    assert_eq!(saved.category(), "Gazebo");
}

#[test]
fn test_viewer_cannot_save() {
    let (_tmp, state) = create_test_state();

    let err = state
        .estimate_api
        .save(sample_input("Canopy", "Acme"), &viewer())
        .unwrap_err();
    assert!(matches!(err, ApiError::PermissionDenied { .. }));
    assert!(state.store.list(true).unwrap().is_empty());
}

#[test]
fn test_save_computes_and_logs() {
    let (_tmp, state) = create_test_state();

    let record = state
        .estimate_api
        .save(sample_input("Canopy", "Acme"), &estimator())
        .unwrap();

    assert_eq!(record.state, RecordState::Active);
    assert_eq!(record.outcome, Outcome::Unknown);
    assert_eq!(record.created_by, "erin");
    assert_close(record.rollup.subtotal_before_markup, 794.5);

    let loaded = state.estimate_api.get(&record.id).unwrap();
    assert_close(loaded.rollup.final_client_price, record.rollup.final_client_price);

    let history = state.estimate_api.history(&record.id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action_type, "CreateCostSheet");
    assert_eq!(history[0].actor, "erin");
}

#[test]
fn test_update_recomputes_and_set_outcome() {
    let (_tmp, state) = create_test_state();
    let api = &state.estimate_api;

    let record = api.save(sample_input("Canopy", "Acme"), &estimator()).unwrap();

    let mut input = record.input.clone();
    input.markup_rate = 1.0;
    let updated = api.update(&record.id, input, &admin()).unwrap();
    assert_close(updated.rollup.total_with_markup, 1589.0);
    assert_eq!(updated.updated_by, "alex");
    assert_eq!(updated.created_by, "erin");

    let won = api.set_outcome(&record.id, Outcome::Won, &estimator()).unwrap();
    assert_eq!(won.outcome, Outcome::Won);
    assert_eq!(api.get(&record.id).unwrap().outcome, Outcome::Won);

    let history = api.history(&record.id).unwrap();
    let kinds: Vec<&str> = history.iter().map(|l| l.action_type.as_str()).collect();
    assert_eq!(kinds.len(), 3);
    assert!(kinds.contains(&"UpdateCostSheet"));
    assert!(kinds.contains(&"SetOutcome"));
}

#[test]
fn test_viewer_cannot_set_outcome() {
    let (_tmp, state) = create_test_state();
    let record = state
        .estimate_api
        .save(sample_input("Canopy", "Acme"), &estimator())
        .unwrap();

    let err = state
        .estimate_api
        .set_outcome(&record.id, Outcome::Lost, &viewer())
        .unwrap_err();
    assert!(matches!(err, ApiError::PermissionDenied { .. }));
}

#[test]
fn test_trashed_record_cannot_be_edited() {
    let (_tmp, state) = create_test_state();
    let record = state
        .estimate_api
        .save(sample_input("Canopy", "Acme"), &estimator())
        .unwrap();
    state.admin_api.trash(&record.id, &estimator()).unwrap();

    let err = state
        .estimate_api
        .update(&record.id, sample_input("Canopy", "Acme"), &estimator())
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::InvalidStateTransition {
            from: RecordState::Trashed,
            ..
        }
    ));
}

#[test]
fn test_get_missing_is_not_found() {
    let (_tmp, state) = create_test_state();
    let err = state.estimate_api.get("no-such-id").unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn test_preview_against_history() {
    let (_tmp, state) = create_test_state();
    let api = &state.estimate_api;

    // 无历史
    let first = api.preview(&sample_input("Canopy", "Acme")).unwrap();
    assert_eq!(first.guardrail.per_sq_ft.status, GuardrailStatus::NoData);
    assert!(state.store.list(true).unwrap().is_empty());

    let saved = api.save(sample_input("Canopy", "Acme"), &estimator()).unwrap();
    api.set_outcome(&saved.id, Outcome::Won, &estimator()).unwrap();

    // 同样的输入对比自身价格 -> GOOD
    let again = api.preview(&sample_input("Canopy", "Beta")).unwrap();
    assert_eq!(again.guardrail.category, "Canopy");
    assert_eq!(again.guardrail.per_sq_ft.status, GuardrailStatus::Good);
    assert_close(again.guardrail.per_sq_ft.deviation.unwrap(), 0.0);

    // 加价翻倍 -> HIGH
    let mut pricey = sample_input("Canopy", "Gamma");
    pricey.markup_rate = 3.0;
    let high = api.preview(&pricey).unwrap();
    assert_eq!(high.guardrail.per_sq_ft.status, GuardrailStatus::High);

    // 其他品类无历史
    let other = api.preview(&sample_input("Cabana", "Delta")).unwrap();
    assert_eq!(other.guardrail.per_sq_ft.status, GuardrailStatus::NoData);

    // 修改已有记录时排除自身
    let own = api.preview_update(&saved.id, &saved.input).unwrap();
    assert_eq!(own.guardrail.per_sq_ft.status, GuardrailStatus::NoData);
}
