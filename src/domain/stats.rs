// ==========================================
// 遮阳篷成本核算系统 - 统计与护栏结果
// ==========================================
// 派生数据: 每次请求重算,不持久化
// ==========================================

use crate::domain::types::GuardrailStatus;
use serde::{Deserialize, Serialize};

// ==========================================
// CategoryPricingStats - 品类历史价格统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryPricingStats {
    pub category: String,
    pub count: usize,
    pub won_count: usize,
    pub lost_count: usize,
    /// 中标率 = 中标 / (中标 + 落标),无已决记录时为 0
    pub win_rate: f64,

    // ===== 简单平均 =====
    pub avg_price_per_sq_ft: f64,
    pub avg_price_per_lin_ft: f64,

    // ===== 中标加权平均 (护栏基线) =====
    pub weighted_avg_price_per_sq_ft: f64,
    pub weighted_avg_price_per_lin_ft: f64,
}

// ==========================================
// GuardrailCheck - 单项护栏判定
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailCheck {
    pub current: Option<f64>,
    pub average: f64,
    /// 相对偏差 (current - avg) / avg,无数据时为 None
    pub deviation: Option<f64>,
    pub status: GuardrailStatus,
}

// ==========================================
// GuardrailReport - 成本单护栏报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailReport {
    pub category: String,
    pub per_sq_ft: GuardrailCheck,
    pub per_lin_ft: GuardrailCheck,
}
