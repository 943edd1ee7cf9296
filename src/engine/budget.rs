// ==========================================
// 遮阳篷成本核算系统 - 快速预算
// ==========================================
// 职责: 未做完整成本单前,按品类历史加权单价给出预算区间
// 规则: 估算 = 数量 × 加权单价,区间 = 估算 × (1 ± 容差)
// ==========================================

use crate::domain::lenient::sanitize;
use crate::domain::stats::CategoryPricingStats;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetRequest {
    pub category: String,
    #[serde(default)]
    pub sq_ft: Option<f64>,
    #[serde(default)]
    pub lin_ft: Option<f64>,
}

/// 单一口径的预算区间
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub units: f64,
    pub unit_price: f64,
    pub estimate: f64,
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetEstimate {
    pub category: String,
    pub sample_count: usize,
    pub by_sq_ft: Option<BudgetRange>,
    pub by_lin_ft: Option<BudgetRange>,
}

pub struct QuickBudget;

impl QuickBudget {
    /// 按历史单价估算
    ///
    /// 数量缺失/非正,或该品类无历史单价 (均价为 0) 时,对应口径为 None
    pub fn from_history(
        request: &BudgetRequest,
        stats: Option<&CategoryPricingStats>,
        tolerance: f64,
    ) -> BudgetEstimate {
        let tolerance = sanitize(tolerance).max(0.0);
        let (sq_ft_price, lin_ft_price, sample_count) = stats
            .map(|s| {
                (
                    s.weighted_avg_price_per_sq_ft,
                    s.weighted_avg_price_per_lin_ft,
                    s.count,
                )
            })
            .unwrap_or((0.0, 0.0, 0));

        BudgetEstimate {
            category: request.category.clone(),
            sample_count,
            by_sq_ft: range(request.sq_ft, sq_ft_price, tolerance),
            by_lin_ft: range(request.lin_ft, lin_ft_price, tolerance),
        }
    }

    /// 成本加成速算 = (材料 + 面料 + 人工) × (1 + 加价率)
    pub fn cost_plus(materials: f64, fabric: f64, labor: f64, markup_rate: f64) -> f64 {
        (sanitize(materials) + sanitize(fabric) + sanitize(labor)) * (1.0 + sanitize(markup_rate))
    }
}

fn range(units: Option<f64>, unit_price: f64, tolerance: f64) -> Option<BudgetRange> {
    let units = units.map(sanitize).filter(|u| *u > 0.0)?;
    if !(unit_price.is_finite() && unit_price > 0.0) {
        return None;
    }
    let estimate = units * unit_price;
    Some(BudgetRange {
        units,
        unit_price,
        estimate,
        low: estimate * (1.0 - tolerance),
        high: estimate * (1.0 + tolerance),
    })
}
