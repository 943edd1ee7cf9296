// ==========================================
// 遮阳篷成本核算系统 - 历史价格汇总
// ==========================================
// 职责: 按品类统计记录数、中标数、中标率、交付前单价均值
// 规则: 加权平均中每条中标记录按 won_weight 倍计入分子与分母
//       品类无中标记录时退化为简单平均;无任何单价样本时报告 0
// 红线: 只读历史记录,回收站中的记录不参与
// ==========================================

use crate::domain::cost_sheet::CostSheetRecord;
use crate::domain::stats::CategoryPricingStats;
use crate::domain::types::Outcome;
use std::collections::BTreeMap;

/// 中标记录默认权重
pub const DEFAULT_WON_WEIGHT: f64 = 3.0;

/// 无品类记录的归类名
pub const UNCATEGORIZED: &str = "Uncategorized";

/// 归一化品类名
pub fn category_key(category: &str) -> String {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Default)]
struct Bucket {
    count: usize,
    won_count: usize,
    lost_count: usize,
    sq_ft_samples: Vec<(Outcome, f64)>,
    lin_ft_samples: Vec<(Outcome, f64)>,
}

// ==========================================
// HistoricalAggregator - 历史价格汇总器
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct HistoricalAggregator {
    won_weight: f64,
}

impl HistoricalAggregator {
    pub fn new(won_weight: f64) -> Self {
        let won_weight = if won_weight.is_finite() && won_weight > 0.0 {
            won_weight
        } else {
            tracing::warn!(won_weight, "中标权重非法,回落为默认值");
            DEFAULT_WON_WEIGHT
        };
        Self { won_weight }
    }

    pub fn won_weight(&self) -> f64 {
        self.won_weight
    }

    /// 计算全部品类统计 (按品类名排序)
    pub fn compute(&self, records: &[CostSheetRecord]) -> Vec<CategoryPricingStats> {
        let mut buckets: BTreeMap<String, Bucket> = BTreeMap::new();

        for record in records.iter().filter(|r| r.is_active()) {
            let bucket = buckets.entry(category_key(record.category())).or_default();
            bucket.count += 1;
            match record.outcome {
                Outcome::Won => bucket.won_count += 1,
                Outcome::Lost => bucket.lost_count += 1,
                Outcome::Unknown => {}
            }
            if let Some(p) = record.rollup.price_per_sq_ft_pre_delivery.filter(|v| v.is_finite()) {
                bucket.sq_ft_samples.push((record.outcome, p));
            }
            if let Some(p) = record.rollup.price_per_lin_ft_pre_delivery.filter(|v| v.is_finite()) {
                bucket.lin_ft_samples.push((record.outcome, p));
            }
        }

        buckets
            .into_iter()
            .map(|(category, b)| {
                let decided = b.won_count + b.lost_count;
                CategoryPricingStats {
                    category,
                    count: b.count,
                    won_count: b.won_count,
                    lost_count: b.lost_count,
                    win_rate: if decided > 0 {
                        b.won_count as f64 / decided as f64
                    } else {
                        0.0
                    },
                    avg_price_per_sq_ft: plain_average(&b.sq_ft_samples),
                    avg_price_per_lin_ft: plain_average(&b.lin_ft_samples),
                    weighted_avg_price_per_sq_ft: self.weighted_average(&b.sq_ft_samples),
                    weighted_avg_price_per_lin_ft: self.weighted_average(&b.lin_ft_samples),
                }
            })
            .collect()
    }

    /// 计算单个品类统计;无记录时返回 None
    pub fn compute_for(
        &self,
        category: &str,
        records: &[CostSheetRecord],
    ) -> Option<CategoryPricingStats> {
        let key = category_key(category);
        self.compute(records).into_iter().find(|s| s.category == key)
    }

    /// 中标加权平均
    pub fn weighted_average(&self, samples: &[(Outcome, f64)]) -> f64 {
        if !samples.iter().any(|(o, _)| *o == Outcome::Won) {
            return plain_average(samples);
        }

        let (sum, weight) = samples.iter().fold((0.0, 0.0), |(sum, weight), (o, p)| {
            let w = if *o == Outcome::Won { self.won_weight } else { 1.0 };
            (sum + p * w, weight + w)
        });

        if weight > 0.0 {
            sum / weight
        } else {
            0.0
        }
    }
}

impl Default for HistoricalAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_WON_WEIGHT)
    }
}

/// 简单平均,无样本为 0
fn plain_average(samples: &[(Outcome, f64)]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|(_, p)| p).sum::<f64>() / samples.len() as f64
}
