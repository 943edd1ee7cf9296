// ==========================================
// 遮阳篷成本核算系统 - 驾驶舱统计
// ==========================================
// 职责: 成本单检索过滤、中标/落标汇总、销售业绩、品类表现、月度趋势
// 输入: 成本单记录 (只统计 ACTIVE)
// 输出: 报表 DTO (供前端图表使用)
// ==========================================

use crate::domain::cost_sheet::CostSheetRecord;
use crate::domain::stats::CategoryPricingStats;
use crate::domain::types::Outcome;
use crate::engine::historical::{category_key, HistoricalAggregator};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 未指定销售员的归类名
pub const UNASSIGNED_REP: &str = "Unassigned";

// ==========================================
// CostSheetFilter - 检索条件
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostSheetFilter {
    /// 自由文本: 匹配客户/项目/品类/销售员 (不区分大小写)
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub outcome: Option<Outcome>,
    #[serde(default)]
    pub sales_rep: Option<String>,
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
}

impl CostSheetFilter {
    pub fn matches(&self, record: &CostSheetRecord) -> bool {
        let header = &record.input.header;

        if let Some(q) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let needle = q.to_lowercase();
            let haystacks = [
                header.customer.as_str(),
                header.project.as_str(),
                header.category.as_str(),
                header.sales_rep.as_deref().unwrap_or(""),
            ];
            if !haystacks.iter().any(|h| h.to_lowercase().contains(&needle)) {
                return false;
            }
        }

        if let Some(category) = self.category.as_deref() {
            if category_key(category) != category_key(&header.category) {
                return false;
            }
        }

        if let Some(outcome) = self.outcome {
            if record.outcome != outcome {
                return false;
            }
        }

        if let Some(rep) = self.sales_rep.as_deref() {
            let actual = header.sales_rep.as_deref().unwrap_or("");
            if !actual.trim().eq_ignore_ascii_case(rep.trim()) {
                return false;
            }
        }

        let date = record.reporting_date();
        if self.date_from.is_some_and(|from| date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| date > to) {
            return false;
        }

        true
    }
}

/// 过滤并按日期倒序排列 (仅 ACTIVE 记录)
pub fn filter_records<'a>(
    records: &'a [CostSheetRecord],
    filter: &CostSheetFilter,
) -> Vec<&'a CostSheetRecord> {
    let mut matched: Vec<&CostSheetRecord> = records
        .iter()
        .filter(|r| r.is_active() && filter.matches(r))
        .collect();
    matched.sort_by(|a, b| {
        b.reporting_date()
            .cmp(&a.reporting_date())
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    matched
}

// ==========================================
// 中标/落标汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WinLossSummary {
    pub total: usize,
    pub won: usize,
    pub lost: usize,
    pub unknown: usize,
    /// 中标 / (中标 + 落标)
    pub win_rate: f64,
    pub quoted_value: f64,
    pub won_value: f64,
    pub lost_value: f64,
    pub open_value: f64,
}

pub fn win_loss_summary<'a, I>(records: I) -> WinLossSummary
where
    I: IntoIterator<Item = &'a CostSheetRecord>,
{
    let mut s = WinLossSummary::default();
    for r in records.into_iter().filter(|r| r.is_active()) {
        let value = r.rollup.final_client_price;
        s.total += 1;
        s.quoted_value += value;
        match r.outcome {
            Outcome::Won => {
                s.won += 1;
                s.won_value += value;
            }
            Outcome::Lost => {
                s.lost += 1;
                s.lost_value += value;
            }
            Outcome::Unknown => {
                s.unknown += 1;
                s.open_value += value;
            }
        }
    }
    s.win_rate = ratio(s.won, s.won + s.lost);
    s
}

// ==========================================
// 销售员业绩
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesRepPerformance {
    pub sales_rep: String,
    pub count: usize,
    pub won: usize,
    pub lost: usize,
    pub win_rate: f64,
    pub quoted_value: f64,
    pub won_value: f64,
    pub avg_won_value: f64,
}

/// 销售员业绩 (按中标金额降序)
pub fn sales_rep_performance(records: &[CostSheetRecord]) -> Vec<SalesRepPerformance> {
    let mut by_rep: BTreeMap<String, Vec<&CostSheetRecord>> = BTreeMap::new();
    for r in records.iter().filter(|r| r.is_active()) {
        let rep = r
            .input
            .header
            .sales_rep
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNASSIGNED_REP)
            .to_string();
        by_rep.entry(rep).or_default().push(r);
    }

    let mut rows: Vec<SalesRepPerformance> = by_rep
        .into_iter()
        .map(|(sales_rep, list)| {
            let s = win_loss_summary(list);
            SalesRepPerformance {
                sales_rep,
                count: s.total,
                won: s.won,
                lost: s.lost,
                win_rate: s.win_rate,
                quoted_value: s.quoted_value,
                won_value: s.won_value,
                avg_won_value: if s.won > 0 {
                    s.won_value / s.won as f64
                } else {
                    0.0
                },
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.won_value
            .total_cmp(&a.won_value)
            .then_with(|| a.sales_rep.cmp(&b.sales_rep))
    });
    rows
}

// ==========================================
// 品类表现
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryPerformance {
    #[serde(flatten)]
    pub stats: CategoryPricingStats,
    pub quoted_value: f64,
    pub won_value: f64,
}

pub fn category_performance(
    records: &[CostSheetRecord],
    aggregator: &HistoricalAggregator,
) -> Vec<CategoryPerformance> {
    aggregator
        .compute(records)
        .into_iter()
        .map(|stats| {
            let s = win_loss_summary(
                records
                    .iter()
                    .filter(|r| category_key(r.category()) == stats.category),
            );
            CategoryPerformance {
                stats,
                quoted_value: s.quoted_value,
                won_value: s.won_value,
            }
        })
        .collect()
}

// ==========================================
// 月度趋势 (图表)
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    /// YYYY-MM
    pub month: String,
    pub count: usize,
    pub won: usize,
    pub quoted_value: f64,
    pub won_value: f64,
}

/// 按月统计 (月份升序)
pub fn monthly_trend(records: &[CostSheetRecord]) -> Vec<MonthlyPoint> {
    let mut months: BTreeMap<(i32, u32), MonthlyPoint> = BTreeMap::new();
    for r in records.iter().filter(|r| r.is_active()) {
        let date = r.reporting_date();
        let point = months
            .entry((date.year(), date.month()))
            .or_insert_with(|| MonthlyPoint {
                month: format!("{:04}-{:02}", date.year(), date.month()),
                ..Default::default()
            });
        point.count += 1;
        point.quoted_value += r.rollup.final_client_price;
        if r.outcome == Outcome::Won {
            point.won += 1;
            point.won_value += r.rollup.final_client_price;
        }
    }
    months.into_values().collect()
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
