// ==========================================
// 遮阳篷成本核算系统 - 价格护栏
// ==========================================
// 职责: 当前单价与品类历史加权均价比较,给出 GOOD/HIGH/LOW/NO_DATA
// 规则: diff = (current - avg) / avg
//       diff > tol -> HIGH; diff < -tol -> LOW; 其余 GOOD (边界含在 GOOD 内)
//       avg <= 0 或 current 缺失 -> NO_DATA
// 红线: 只用于着色提示,不阻断提交
// ==========================================

use crate::domain::cost_sheet::CostRollup;
use crate::domain::stats::{CategoryPricingStats, GuardrailCheck, GuardrailReport};
use crate::domain::types::GuardrailStatus;

/// 默认容差 15%
pub const DEFAULT_TOLERANCE: f64 = 0.15;

// ==========================================
// GuardrailClassifier - 价格护栏判定器
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct GuardrailClassifier {
    tolerance: f64,
}

impl GuardrailClassifier {
    pub fn new(tolerance: f64) -> Self {
        let tolerance = if tolerance.is_finite() && tolerance >= 0.0 {
            tolerance
        } else {
            tracing::warn!(tolerance, "护栏容差非法,回落为默认值");
            DEFAULT_TOLERANCE
        };
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// 单项判定
    pub fn check(&self, current: Option<f64>, average: f64) -> GuardrailCheck {
        let current = current.filter(|v| v.is_finite());
        let (deviation, status) = match current {
            Some(value) if average.is_finite() && average > 0.0 => {
                let diff = (value - average) / average;
                let status = if diff > self.tolerance {
                    GuardrailStatus::High
                } else if diff < -self.tolerance {
                    GuardrailStatus::Low
                } else {
                    GuardrailStatus::Good
                };
                (Some(diff), status)
            }
            _ => (None, GuardrailStatus::NoData),
        };

        GuardrailCheck {
            current,
            average,
            deviation,
            status,
        }
    }

    /// 只要等级
    pub fn classify(&self, current: Option<f64>, average: f64) -> GuardrailStatus {
        self.check(current, average).status
    }

    /// 对一张成本单的两种交付前单价做护栏判定
    ///
    /// `stats` 为 None 表示该品类无历史记录
    pub fn report(
        &self,
        category: &str,
        rollup: &CostRollup,
        stats: Option<&CategoryPricingStats>,
    ) -> GuardrailReport {
        let (avg_sq_ft, avg_lin_ft) = stats
            .map(|s| (s.weighted_avg_price_per_sq_ft, s.weighted_avg_price_per_lin_ft))
            .unwrap_or((0.0, 0.0));

        GuardrailReport {
            category: category.to_string(),
            per_sq_ft: self.check(rollup.price_per_sq_ft_pre_delivery, avg_sq_ft),
            per_lin_ft: self.check(rollup.price_per_lin_ft_pre_delivery, avg_lin_ft),
        }
    }
}

impl Default for GuardrailClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}
