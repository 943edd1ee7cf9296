// ==========================================
// 遮阳篷成本核算系统 - 成本单数据仓储 (SQLite)
// ==========================================
// 对齐: cost_sheet 表
// 红线: Repository 不含业务逻辑
// 存储: 汇总字段冗余成列 (便于报表),输入与汇总全文存 JSON
// ==========================================

use crate::domain::cost_sheet::{CostRollup, CostSheetInput, CostSheetRecord};
use crate::domain::types::{Outcome, RecordState};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::store::CostSheetStore;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

/// 时间戳存储格式
const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const SELECT_COLUMNS: &str = r#"
    SELECT id, input_json, rollup_json, outcome, state, deleted_at, deleted_by,
           created_at, created_by, updated_at, updated_by
    FROM cost_sheet
"#;

// ==========================================
// CostSheetRepository - 成本单仓储
// ==========================================
pub struct CostSheetRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CostSheetRepository {
    /// 创建新的 CostSheetRepository 实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 统计记录数 (按状态)
    pub fn count_by_state(&self, state: RecordState) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM cost_sheet WHERE state = ?1",
            params![state.to_db_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl CostSheetStore for CostSheetRepository {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn insert(&self, record: &CostSheetRecord) -> RepositoryResult<()> {
        let input_json = serde_json::to_string(&record.input)?;
        let rollup_json = serde_json::to_string(&record.rollup)?;
        let header = &record.input.header;
        let rollup = &record.rollup;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO cost_sheet (
                id, category, customer, project, estimate_date, sales_rep, estimator,
                input_json, rollup_json,
                subtotal_before_markup, markup_amount, total_with_markup,
                other_requirements_total, grand_total, final_client_price,
                price_per_sq_ft_pre_delivery, price_per_lin_ft_pre_delivery,
                outcome, state, deleted_at, deleted_by,
                created_at, created_by, updated_at, updated_by
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                record.id,
                header.category,
                header.customer,
                header.project,
                header.estimate_date.map(|d| d.format("%Y-%m-%d").to_string()),
                header.sales_rep,
                header.estimator,
                input_json,
                rollup_json,
                rollup.subtotal_before_markup,
                rollup.markup_amount,
                rollup.total_with_markup,
                rollup.other_requirements_total,
                rollup.grand_total,
                rollup.final_client_price,
                rollup.price_per_sq_ft_pre_delivery,
                rollup.price_per_lin_ft_pre_delivery,
                record.outcome.to_db_str(),
                record.state.to_db_str(),
                record.deleted_at.map(|t| t.format(TS_FORMAT).to_string()),
                record.deleted_by,
                record.created_at.format(TS_FORMAT).to_string(),
                record.created_by,
                record.updated_at.format(TS_FORMAT).to_string(),
                record.updated_by,
            ],
        )?;

        Ok(())
    }

    fn update(&self, record: &CostSheetRecord) -> RepositoryResult<()> {
        let input_json = serde_json::to_string(&record.input)?;
        let rollup_json = serde_json::to_string(&record.rollup)?;
        let header = &record.input.header;
        let rollup = &record.rollup;

        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE cost_sheet SET
                category = ?, customer = ?, project = ?, estimate_date = ?,
                sales_rep = ?, estimator = ?, input_json = ?, rollup_json = ?,
                subtotal_before_markup = ?, markup_amount = ?, total_with_markup = ?,
                other_requirements_total = ?, grand_total = ?, final_client_price = ?,
                price_per_sq_ft_pre_delivery = ?, price_per_lin_ft_pre_delivery = ?,
                outcome = ?, state = ?, deleted_at = ?, deleted_by = ?,
                updated_at = ?, updated_by = ?
            WHERE id = ?
            "#,
            params![
                header.category,
                header.customer,
                header.project,
                header.estimate_date.map(|d| d.format("%Y-%m-%d").to_string()),
                header.sales_rep,
                header.estimator,
                input_json,
                rollup_json,
                rollup.subtotal_before_markup,
                rollup.markup_amount,
                rollup.total_with_markup,
                rollup.other_requirements_total,
                rollup.grand_total,
                rollup.final_client_price,
                rollup.price_per_sq_ft_pre_delivery,
                rollup.price_per_lin_ft_pre_delivery,
                record.outcome.to_db_str(),
                record.state.to_db_str(),
                record.deleted_at.map(|t| t.format(TS_FORMAT).to_string()),
                record.deleted_by,
                record.updated_at.format(TS_FORMAT).to_string(),
                record.updated_by,
                record.id,
            ],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "CostSheet".to_string(),
                id: record.id.clone(),
            });
        }
        Ok(())
    }

    fn find_by_id(&self, id: &str) -> RepositoryResult<Option<CostSheetRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE id = ?", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;

        match stmt.query_row(params![id], map_row) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, include_trashed: bool) -> RepositoryResult<Vec<CostSheetRecord>> {
        let conn = self.get_conn()?;
        let sql = if include_trashed {
            format!("{} ORDER BY created_at DESC", SELECT_COLUMNS)
        } else {
            format!("{} WHERE state = 'ACTIVE' ORDER BY created_at DESC", SELECT_COLUMNS)
        };
        let mut stmt = conn.prepare(&sql)?;

        let records = stmt
            .query_map([], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    fn delete_permanently(&self, id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let rows = conn.execute("DELETE FROM cost_sheet WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn parse_ts(idx: usize, raw: &str) -> SqliteResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TS_FORMAT).map_err(|e| conversion_error(idx, e))
}

fn map_row(row: &Row) -> SqliteResult<CostSheetRecord> {
    let input_str: String = row.get(1)?;
    let rollup_str: String = row.get(2)?;
    let input: CostSheetInput =
        serde_json::from_str(&input_str).map_err(|e| conversion_error(1, e))?;
    let rollup: CostRollup =
        serde_json::from_str(&rollup_str).map_err(|e| conversion_error(2, e))?;

    let outcome: String = row.get(3)?;
    let state: String = row.get(4)?;
    let deleted_at = match row.get::<_, Option<String>>(5)? {
        Some(s) => Some(parse_ts(5, &s)?),
        None => None,
    };
    let created_at: String = row.get(7)?;
    let updated_at: String = row.get(9)?;

    Ok(CostSheetRecord {
        id: row.get(0)?,
        input,
        rollup,
        outcome: Outcome::from_str(&outcome),
        state: RecordState::from_str(&state),
        deleted_at,
        deleted_by: row.get(6)?,
        created_at: parse_ts(7, &created_at)?,
        created_by: row.get(8)?,
        updated_at: parse_ts(9, &updated_at)?,
        updated_by: row.get(10)?,
    })
}
