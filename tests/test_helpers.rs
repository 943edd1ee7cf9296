// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use awning_estimator::app::AppState;
use awning_estimator::db::{init_schema, open_sqlite_connection};
use awning_estimator::domain::cost_sheet::{
    CostRollup, CostSheetHeader, CostSheetInput, CostSheetRecord, ProductDimensions,
};
use awning_estimator::domain::line_item::{LaborLine, LineItem, MaterialLine};
use awning_estimator::domain::types::{Actor, LaborPhase, Outcome, RecordState, Role};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::Connection;
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件(需要保持存活)
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().ok_or("非 UTF-8 路径")?.to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(open_sqlite_connection(db_path)?)
}

/// 创建临时数据库上的 AppState
pub fn create_test_state() -> (NamedTempFile, AppState) {
    awning_estimator::logging::init_test();
    let (temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = AppState::new(db_path).expect("Failed to create AppState");
    (temp_file, state)
}

pub fn viewer() -> Actor {
    Actor::new("val", Role::Viewer)
}

pub fn estimator() -> Actor {
    Actor::new("erin", Role::Estimator)
}

pub fn admin() -> Actor {
    Actor::new("alex", Role::Admin)
}

/// 典型成本单输入
///
/// - 材料: 10 × 20,税率 0.0975,运费 15 -> 234.5
/// - 制作人工: 8h × 2人 × 35 -> 560
/// - 加价率 0.8 -> 加价后合计 1430.1
/// - 尺寸: 宽 10 出挑 8 高 2 -> 100 sqft / 26 linft
pub fn sample_input(category: &str, customer: &str) -> CostSheetInput {
    CostSheetInput {
        header: CostSheetHeader {
            category: category.to_string(),
            customer: customer.to_string(),
            project: format!("{} patio", customer),
            estimate_date: NaiveDate::from_ymd_opt(2026, 3, 14),
            sales_rep: Some("Dana".to_string()),
            estimator: Some("erin".to_string()),
            ..Default::default()
        },
        lines: vec![
            LineItem::Material(MaterialLine {
                description: "Aluminum frame".to_string(),
                quantity: 10.0,
                unit_price: 20.0,
                freight: 15.0,
            }),
            LineItem::Labor(LaborLine {
                phase: LaborPhase::Fabrication,
                labor_type: Some("Welding".to_string()),
                hours: 8.0,
                people: 2.0,
                hourly_rate: 35.0,
            }),
        ],
        products: vec![ProductDimensions {
            label: "Front".to_string(),
            width_ft: 10.0,
            projection_ft: 8.0,
            height_ft: 2.0,
        }],
        markup_rate: 0.8,
        sales_tax_rate: 0.0975,
        ..Default::default()
    }
}

/// 只关心单价的历史记录 (直接填入汇总字段)
pub fn record_with_prices(
    id: &str,
    category: &str,
    outcome: Outcome,
    per_sq_ft: Option<f64>,
    per_lin_ft: Option<f64>,
) -> CostSheetRecord {
    let now: NaiveDateTime = Utc::now().naive_utc();
    CostSheetRecord {
        id: id.to_string(),
        input: CostSheetInput {
            header: CostSheetHeader {
                category: category.to_string(),
                customer: format!("Customer {}", id),
                project: format!("Project {}", id),
                estimate_date: NaiveDate::from_ymd_opt(2026, 1, 10),
                ..Default::default()
            },
            ..Default::default()
        },
        rollup: CostRollup {
            final_client_price: 1000.0,
            price_per_sq_ft_pre_delivery: per_sq_ft,
            price_per_lin_ft_pre_delivery: per_lin_ft,
            ..Default::default()
        },
        outcome,
        state: RecordState::Active,
        deleted_at: None,
        deleted_by: None,
        created_at: now,
        created_by: "seed".to_string(),
        updated_at: now,
        updated_by: "seed".to_string(),
    }
}

/// 浮点近似相等
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
