// ==========================================
// DashboardApi 集成测试
// ==========================================
// 测试目标: 检索、统计、快速预算、CSV 导出、最近操作
// ==========================================

mod test_helpers;

use awning_estimator::domain::types::Outcome;
use awning_estimator::engine::{BudgetRequest, CostSheetFilter};
use awning_estimator::app::AppState;
use test_helpers::{assert_close, create_test_state, estimator, record_with_prices, sample_input};

/// 三张 Canopy (一中一落一未定) + 一张 Cabana
fn seed(state: &AppState) -> Vec<String> {
    let api = &state.estimate_api;
    let mut ids = Vec::new();
    for (category, customer, outcome) in [
        ("Canopy", "Acme", Some(Outcome::Won)),
        ("Canopy", "Beta", Some(Outcome::Lost)),
        ("Canopy", "Gamma", None),
        ("Cabana", "Delta", Some(Outcome::Won)),
    ] {
        let record = api.save(sample_input(category, customer), &estimator()).unwrap();
        if let Some(outcome) = outcome {
            api.set_outcome(&record.id, outcome, &estimator()).unwrap();
        }
        ids.push(record.id);
    }
    ids
}

#[test]
fn test_search_and_win_loss() {
    let (_tmp, state) = create_test_state();
    seed(&state);
    let dashboard = &state.dashboard_api;

    assert_eq!(dashboard.search(&CostSheetFilter::default()).unwrap().len(), 4);

    let filter = CostSheetFilter {
        query: Some("acme".to_string()),
        ..Default::default()
    };
    let found = dashboard.search(&filter).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].input.header.customer, "Acme");

    let summary = dashboard.win_loss(&CostSheetFilter::default()).unwrap();
    assert_eq!(summary.total, 4);
    assert_eq!(summary.won, 2);
    assert_eq!(summary.lost, 1);
    assert_close(summary.win_rate, 2.0 / 3.0);

    let reps = dashboard
        .sales_rep_performance(&CostSheetFilter::default())
        .unwrap();
    assert_eq!(reps.len(), 1);
    assert_eq!(reps[0].sales_rep, "Dana");
    assert_eq!(reps[0].count, 4);

    let months = dashboard.monthly_trend(&CostSheetFilter::default()).unwrap();
    assert_eq!(months.len(), 1);
    assert_eq!(months[0].month, "2026-03");
}

#[test]
fn test_trashed_records_leave_statistics() {
    let (_tmp, state) = create_test_state();
    let ids = seed(&state);
    state.admin_api.trash(&ids[3], &estimator()).unwrap();

    let stats = state.dashboard_api.pricing_stats().unwrap();
    let names: Vec<&str> = stats.iter().map(|s| s.category.as_str()).collect();
    assert_eq!(names, vec!["Canopy"]);
    assert_eq!(stats[0].count, 3);

    let categories = state
        .dashboard_api
        .category_performance(&CostSheetFilter::default())
        .unwrap();
    assert_eq!(categories.len(), 1);
    assert!(state.dashboard_api.category_baseline("Cabana").unwrap().is_none());
}

#[test]
fn test_quick_budget_from_history() {
    let (_tmp, state) = create_test_state();
    seed(&state);

    let baseline = state
        .dashboard_api
        .category_baseline("Canopy")
        .unwrap()
        .expect("Canopy baseline");
    // 三张单价相同,加权后仍为同一单价
    let per_sq_ft = baseline.weighted_avg_price_per_sq_ft;
    assert!(per_sq_ft > 0.0);

    let budget = state
        .dashboard_api
        .quick_budget(&BudgetRequest {
            category: "Canopy".to_string(),
            sq_ft: Some(200.0),
            lin_ft: None,
        })
        .unwrap();
    assert_eq!(budget.sample_count, 3);
    let by_sq_ft = budget.by_sq_ft.expect("sq ft range");
    assert_close(by_sq_ft.estimate, 200.0 * per_sq_ft);
    assert_close(by_sq_ft.low, by_sq_ft.estimate * 0.85);
    assert_close(by_sq_ft.high, by_sq_ft.estimate * 1.15);
    assert!(budget.by_lin_ft.is_none());

    let unknown = state
        .dashboard_api
        .quick_budget(&BudgetRequest {
            category: "Pergola".to_string(),
            sq_ft: Some(200.0),
            lin_ft: Some(40.0),
        })
        .unwrap();
    assert_eq!(unknown.sample_count, 0);
    assert!(unknown.by_sq_ft.is_none());
}

#[test]
fn test_quick_cost_plus_uses_default_markup() {
    let (_tmp, state) = create_test_state();
    let dashboard = &state.dashboard_api;

    assert_close(dashboard.quick_cost_plus(100.0, 50.0, 50.0, None), 360.0);
    assert_close(dashboard.quick_cost_plus(100.0, 50.0, 50.0, Some(0.5)), 300.0);
}

#[test]
fn test_export_csv_writes_header_and_rows() {
    let (_tmp, state) = create_test_state();
    seed(&state);

    let mut buffer: Vec<u8> = Vec::new();
    let rows = state
        .dashboard_api
        .export_csv(&CostSheetFilter::default(), &mut buffer)
        .unwrap();
    assert_eq!(rows, 4);

    let mut reader = csv::Reader::from_reader(buffer.as_slice());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.len(), 19);
    assert_eq!(&headers[0], "id");
    assert_eq!(&headers[18], "price_per_lin_ft_pre_delivery");

    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| &r[2] == "Canopy" || &r[2] == "Cabana"));
    assert!(records.iter().any(|r| &r[7] == "WON"));
}

#[test]
fn test_export_rounds_amounts_to_cents() {
    let (_tmp, state) = create_test_state();
    let record = record_with_prices("r1", "Canopy", Outcome::Won, Some(18.666_667), Some(56.004_9));
    state.store.insert(&record).unwrap();

    let mut buffer: Vec<u8> = Vec::new();
    state
        .dashboard_api
        .export_csv(&CostSheetFilter::default(), &mut buffer)
        .unwrap();

    let mut reader = csv::Reader::from_reader(buffer.as_slice());
    let row = reader.records().next().unwrap().unwrap();
    assert_eq!(row[14].parse::<f64>().unwrap(), 1000.0);
    assert_eq!(row[17].parse::<f64>().unwrap(), 18.67);
    assert_eq!(row[18].parse::<f64>().unwrap(), 56.0);
}

#[test]
fn test_export_empty_result_still_has_header() {
    let (_tmp, state) = create_test_state();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.csv");
    let rows = state
        .dashboard_api
        .export_csv_to_path(&CostSheetFilter::default(), &path)
        .unwrap();
    assert_eq!(rows, 0);

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert!(content.starts_with("id,estimate_date,category"));
}

#[test]
fn test_recent_actions() {
    let (_tmp, state) = create_test_state();
    seed(&state);

    // 4 次新建 + 3 次标记结果
    assert_eq!(state.dashboard_api.recent_actions(100).unwrap().len(), 7);
    assert_eq!(state.dashboard_api.recent_actions(5).unwrap().len(), 5);
}
