// ==========================================
// 遮阳篷成本核算系统 - 驾驶舱 API
// ==========================================
// 职责: 成本单检索、统计报表、护栏基线、快速预算、CSV 导出
// 红线: 只读,不修改成本单
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::handle::ConfigHandle;
use crate::domain::action_log::ActionLog;
use crate::domain::cost_sheet::CostSheetRecord;
use crate::domain::stats::CategoryPricingStats;
use crate::engine::analytics::{
    self, CategoryPerformance, CostSheetFilter, MonthlyPoint, SalesRepPerformance, WinLossSummary,
};
use crate::engine::budget::{BudgetEstimate, BudgetRequest, QuickBudget};
use crate::engine::historical::HistoricalAggregator;
use crate::engine::valuation::round_currency;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::store::CostSheetStore;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// 导出表头 (与 ExportRow 字段顺序一致)
const EXPORT_HEADERS: [&str; 19] = [
    "id",
    "estimate_date",
    "category",
    "customer",
    "project",
    "sales_rep",
    "estimator",
    "outcome",
    "subtotal_before_markup",
    "markup_rate",
    "markup_amount",
    "total_with_markup",
    "other_requirements_total",
    "grand_total",
    "final_client_price",
    "total_sq_ft",
    "total_lin_ft",
    "price_per_sq_ft_pre_delivery",
    "price_per_lin_ft_pre_delivery",
];

/// 导出行 (CSV 一行一张成本单,金额按分取整)
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    estimate_date: String,
    category: &'a str,
    customer: &'a str,
    project: &'a str,
    sales_rep: &'a str,
    estimator: &'a str,
    outcome: &'static str,
    subtotal_before_markup: f64,
    markup_rate: f64,
    markup_amount: f64,
    total_with_markup: f64,
    other_requirements_total: f64,
    grand_total: f64,
    final_client_price: f64,
    total_sq_ft: f64,
    total_lin_ft: f64,
    price_per_sq_ft_pre_delivery: Option<f64>,
    price_per_lin_ft_pre_delivery: Option<f64>,
}

impl<'a> From<&'a CostSheetRecord> for ExportRow<'a> {
    fn from(r: &'a CostSheetRecord) -> Self {
        let h = &r.input.header;
        Self {
            id: &r.id,
            estimate_date: r.reporting_date().format("%Y-%m-%d").to_string(),
            category: &h.category,
            customer: &h.customer,
            project: &h.project,
            sales_rep: h.sales_rep.as_deref().unwrap_or(""),
            estimator: h.estimator.as_deref().unwrap_or(""),
            outcome: r.outcome.to_db_str(),
            subtotal_before_markup: round_currency(r.rollup.subtotal_before_markup),
            markup_rate: r.rollup.markup_rate,
            markup_amount: round_currency(r.rollup.markup_amount),
            total_with_markup: round_currency(r.rollup.total_with_markup),
            other_requirements_total: round_currency(r.rollup.other_requirements_total),
            grand_total: round_currency(r.rollup.grand_total),
            final_client_price: round_currency(r.rollup.final_client_price),
            total_sq_ft: r.rollup.total_sq_ft,
            total_lin_ft: r.rollup.total_lin_ft,
            price_per_sq_ft_pre_delivery: r.rollup.price_per_sq_ft_pre_delivery.map(round_currency),
            price_per_lin_ft_pre_delivery: r.rollup.price_per_lin_ft_pre_delivery.map(round_currency),
        }
    }
}

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi {
    store: Arc<dyn CostSheetStore>,
    action_log_repo: Arc<ActionLogRepository>,
    config: Arc<ConfigHandle>,
}

impl DashboardApi {
    pub fn new(
        store: Arc<dyn CostSheetStore>,
        action_log_repo: Arc<ActionLogRepository>,
        config: Arc<ConfigHandle>,
    ) -> Self {
        Self {
            store,
            action_log_repo,
            config,
        }
    }

    fn active_records(&self) -> ApiResult<Vec<CostSheetRecord>> {
        Ok(self.store.list(false)?)
    }

    fn aggregator(&self) -> HistoricalAggregator {
        HistoricalAggregator::new(self.config.current().defaults.won_weight)
    }

    // ==========================================
    // 检索
    // ==========================================

    /// 按条件检索 (日期倒序)
    pub fn search(&self, filter: &CostSheetFilter) -> ApiResult<Vec<CostSheetRecord>> {
        let records = self.active_records()?;
        Ok(analytics::filter_records(&records, filter)
            .into_iter()
            .cloned()
            .collect())
    }

    // ==========================================
    // 统计
    // ==========================================

    pub fn win_loss(&self, filter: &CostSheetFilter) -> ApiResult<WinLossSummary> {
        let records = self.active_records()?;
        Ok(analytics::win_loss_summary(analytics::filter_records(
            &records, filter,
        )))
    }

    pub fn sales_rep_performance(
        &self,
        filter: &CostSheetFilter,
    ) -> ApiResult<Vec<SalesRepPerformance>> {
        let records = self.search(filter)?;
        Ok(analytics::sales_rep_performance(&records))
    }

    pub fn category_performance(
        &self,
        filter: &CostSheetFilter,
    ) -> ApiResult<Vec<CategoryPerformance>> {
        let records = self.search(filter)?;
        Ok(analytics::category_performance(&records, &self.aggregator()))
    }

    pub fn monthly_trend(&self, filter: &CostSheetFilter) -> ApiResult<Vec<MonthlyPoint>> {
        let records = self.search(filter)?;
        Ok(analytics::monthly_trend(&records))
    }

    /// 全部品类的历史价格统计
    pub fn pricing_stats(&self) -> ApiResult<Vec<CategoryPricingStats>> {
        let records = self.active_records()?;
        Ok(self.aggregator().compute(&records))
    }

    /// 单品类护栏基线 (无历史记录返回 None)
    pub fn category_baseline(&self, category: &str) -> ApiResult<Option<CategoryPricingStats>> {
        let records = self.active_records()?;
        Ok(self.aggregator().compute_for(category, &records))
    }

    // ==========================================
    // 快速预算
    // ==========================================

    pub fn quick_budget(&self, request: &BudgetRequest) -> ApiResult<BudgetEstimate> {
        let baseline = self.category_baseline(&request.category)?;
        let tolerance = self.config.current().defaults.guardrail_tolerance;
        Ok(QuickBudget::from_history(
            request,
            baseline.as_ref(),
            tolerance,
        ))
    }

    /// 成本加成速算,加价率缺省取配置默认值
    pub fn quick_cost_plus(
        &self,
        materials: f64,
        fabric: f64,
        labor: f64,
        markup_rate: Option<f64>,
    ) -> f64 {
        let markup = markup_rate.unwrap_or(self.config.current().defaults.markup_rate);
        QuickBudget::cost_plus(materials, fabric, labor, markup)
    }

    // ==========================================
    // 导出
    // ==========================================

    /// 导出 CSV 到任意 writer,返回导出行数
    pub fn export_csv<W: Write>(&self, filter: &CostSheetFilter, writer: W) -> ApiResult<usize> {
        let records = self.search(filter)?;
        // 表头单独写,空结果也输出表头
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(EXPORT_HEADERS)?;
        for r in &records {
            wtr.serialize(ExportRow::from(r))?;
        }
        wtr.flush()
            .map_err(|e| ApiError::ExportError(e.to_string()))?;

        tracing::info!(rows = records.len(), "成本单已导出");
        Ok(records.len())
    }

    pub fn export_csv_to_path(&self, filter: &CostSheetFilter, path: &Path) -> ApiResult<usize> {
        let file = File::create(path)
            .map_err(|e| ApiError::ExportError(e.to_string()))?;
        self.export_csv(filter, file)
    }

    // ==========================================
    // 操作日志
    // ==========================================

    pub fn recent_actions(&self, limit: i32) -> ApiResult<Vec<ActionLog>> {
        Ok(self.action_log_repo.recent(limit)?)
    }
}
