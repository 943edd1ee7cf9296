// ==========================================
// 历史价格汇总 + 护栏集成测试
// ==========================================
// 测试目标: 中标加权均价、回退规则、护栏边界与单调性
// ==========================================

mod test_helpers;

use awning_estimator::domain::types::{GuardrailStatus, Outcome, RecordState};
use awning_estimator::engine::{CostRollupEngine, GuardrailClassifier, HistoricalAggregator};
use test_helpers::{assert_close, record_with_prices, sample_input};

#[test]
fn test_won_weighted_average_scenario() {
    let records = vec![
        record_with_prices("a", "Canopy", Outcome::Won, Some(10.0), None),
        record_with_prices("b", "Canopy", Outcome::Lost, Some(20.0), None),
    ];
    let stats = HistoricalAggregator::default().compute(&records);

    assert_eq!(stats.len(), 1);
    let canopy = &stats[0];
    assert_eq!(canopy.count, 2);
    assert_eq!(canopy.won_count, 1);
    assert_eq!(canopy.lost_count, 1);
    assert_close(canopy.win_rate, 0.5);
    assert_close(canopy.weighted_avg_price_per_sq_ft, 12.5);
    assert_close(canopy.avg_price_per_sq_ft, 15.0);
    // 无单价样本报告 0
    assert_eq!(canopy.weighted_avg_price_per_lin_ft, 0.0);
}

#[test]
fn test_all_won_equals_plain_average() {
    let records = vec![
        record_with_prices("a", "Cabana", Outcome::Won, Some(10.0), Some(40.0)),
        record_with_prices("b", "Cabana", Outcome::Won, Some(14.0), Some(50.0)),
        record_with_prices("c", "Cabana", Outcome::Won, Some(18.0), None),
    ];
    let stats = HistoricalAggregator::default()
        .compute_for("Cabana", &records)
        .unwrap();

    assert_close(stats.weighted_avg_price_per_sq_ft, stats.avg_price_per_sq_ft);
    assert_close(stats.weighted_avg_price_per_sq_ft, 14.0);
    assert_close(stats.weighted_avg_price_per_lin_ft, 45.0);
    assert_eq!(stats.count, 3);
}

#[test]
fn test_no_won_falls_back_to_plain_average() {
    let records = vec![
        record_with_prices("a", "Recover", Outcome::Lost, Some(8.0), None),
        record_with_prices("b", "Recover", Outcome::Unknown, Some(12.0), None),
    ];
    let stats = HistoricalAggregator::default()
        .compute_for("Recover", &records)
        .unwrap();
    assert_close(stats.weighted_avg_price_per_sq_ft, 10.0);
    assert_eq!(stats.win_rate, 0.0);
}

#[test]
fn test_trashed_records_excluded_and_categories_sorted() {
    let mut trashed = record_with_prices("t", "Awning", Outcome::Won, Some(999.0), None);
    trashed.state = RecordState::Trashed;
    let records = vec![
        record_with_prices("z", "Shade Sail", Outcome::Won, Some(9.0), None),
        record_with_prices("y", "  ", Outcome::Lost, Some(7.0), None),
        record_with_prices("x", "Canopy", Outcome::Won, Some(11.0), None),
        trashed,
    ];
    let stats = HistoricalAggregator::default().compute(&records);

    let names: Vec<&str> = stats.iter().map(|s| s.category.as_str()).collect();
    assert_eq!(names, vec!["Canopy", "Shade Sail", "Uncategorized"]);
}

#[test]
fn test_guardrail_boundary_scenario() {
    let classifier = GuardrailClassifier::default();
    assert_eq!(classifier.classify(Some(115.0), 100.0), GuardrailStatus::Good);
    assert_eq!(classifier.classify(Some(85.0), 100.0), GuardrailStatus::Good);
    assert_eq!(classifier.classify(None, 100.0), GuardrailStatus::NoData);
    assert_eq!(classifier.classify(Some(50.0), 0.0), GuardrailStatus::NoData);
}

#[test]
fn test_guardrail_monotonic() {
    let classifier = GuardrailClassifier::default();
    let rank = |s: GuardrailStatus| match s {
        GuardrailStatus::Low => 0,
        GuardrailStatus::Good => 1,
        GuardrailStatus::High => 2,
        GuardrailStatus::NoData => panic!("unexpected NO_DATA"),
    };

    let mut previous = 0;
    for step in 0..=200 {
        let current = step as f64;
        let r = rank(classifier.classify(Some(current), 100.0));
        assert!(r >= previous, "classification went backwards at {}", current);
        previous = r;
    }
    assert_eq!(previous, 2);
}

#[test]
fn test_report_against_history() {
    let rollup = CostRollupEngine::new().compute(&sample_input("Canopy", "Acme"));
    let per_sq_ft = rollup.price_per_sq_ft_pre_delivery.unwrap();

    // 历史均价远低于当前 -> HIGH;线性英尺无历史 -> NO_DATA
    let records = vec![record_with_prices(
        "h",
        "Canopy",
        Outcome::Won,
        Some(per_sq_ft / 2.0),
        None,
    )];
    let stats = HistoricalAggregator::default().compute_for("Canopy", &records);
    let report = GuardrailClassifier::default().report("Canopy", &rollup, stats.as_ref());

    assert_eq!(report.per_sq_ft.status, GuardrailStatus::High);
    assert_close(report.per_sq_ft.deviation.unwrap(), 1.0);
    assert_eq!(report.per_lin_ft.status, GuardrailStatus::NoData);
}
