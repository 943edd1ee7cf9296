// ==========================================
// 遮阳篷成本核算系统 - 加价引擎
// ==========================================
// 职责: 加价前小计 -> 加价金额 -> 加价后合计 -> 最终报价
// 红线: 其他现场费用不参与加价
// ==========================================

use crate::domain::lenient::sanitize;
use crate::engine::aggregator::CategoryTotals;
use serde::{Deserialize, Serialize};

/// 加价明细
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkupBreakdown {
    pub subtotal_before_markup: f64,
    pub markup_rate: f64,
    pub markup_amount: f64,
    pub total_with_markup: f64,
    pub grand_total: f64,
    pub final_client_price: f64,
    pub final_price_overridden: bool,
}

/// 加价引擎 (无状态)
pub struct MarkupEngine;

impl MarkupEngine {
    /// 计算加价明细
    ///
    /// # 参数
    /// - `totals`: 分类合计
    /// - `markup_rate`: 加价率 (小数)
    /// - `manual_final_price`: 人工最终报价 (存在时替代 grand_total)
    pub fn apply(
        totals: &CategoryTotals,
        markup_rate: f64,
        manual_final_price: Option<f64>,
    ) -> MarkupBreakdown {
        let markup_rate = sanitize(markup_rate);
        let subtotal_before_markup = totals.materials + totals.fabric + totals.labor;
        let markup_amount = subtotal_before_markup * markup_rate;
        let total_with_markup = subtotal_before_markup + markup_amount;
        let grand_total = total_with_markup + totals.other_requirements;

        // Some(0.0) 也算覆盖,只有 None 回落到 grand_total
        let manual = manual_final_price.filter(|v| v.is_finite());
        let final_client_price = manual.unwrap_or(grand_total);

        MarkupBreakdown {
            subtotal_before_markup,
            markup_rate,
            markup_amount,
            total_with_markup,
            grand_total,
            final_client_price,
            final_price_overridden: manual.is_some(),
        }
    }
}
