// ==========================================
// 遮阳篷成本核算系统 - 成本汇总引擎
// ==========================================
// 职责: 明细计价 -> 分类汇总 -> 加价 -> 最终报价 -> 交付前单价
// 输入: CostSheetInput
// 输出: CostRollup (含输入提示)
// 红线: 不做 I/O,不报错;异常输入降级为 0 或 None
// ==========================================

use crate::domain::cost_sheet::{CostRollup, CostSheetInput, InputWarning};
use crate::engine::aggregator::CategoryAggregator;
use crate::engine::markup::MarkupEngine;
use crate::engine::unit_price;

/// 加价率提示上限 (500%)
pub const MARKUP_WARNING_CEILING: f64 = 5.0;

// ==========================================
// CostRollupEngine - 成本汇总引擎
// ==========================================
pub struct CostRollupEngine {
    // 无状态引擎
}

impl CostRollupEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算完整汇总
    pub fn compute(&self, input: &CostSheetInput) -> CostRollup {
        let totals =
            CategoryAggregator::aggregate(&input.lines, input.sales_tax_rate, &input.other);
        let markup = MarkupEngine::apply(&totals, input.markup_rate, input.manual_final_price);
        let dims = unit_price::total_dimensions(&input.products, input.sq_ft_formula);

        // 交付前单价只用加价后合计,排除现场费用
        let price_per_sq_ft = unit_price::per_unit(markup.total_with_markup, dims.sq_ft);
        let price_per_lin_ft = unit_price::per_unit(markup.total_with_markup, dims.lin_ft);

        let warnings = self.collect_warnings(input);
        if !warnings.is_empty() {
            tracing::debug!(
                category = %input.header.category,
                warning_count = warnings.len(),
                "成本单存在异常输入(不阻断计算)"
            );
        }

        CostRollup {
            materials_total: totals.materials,
            fabric_total: totals.fabric,
            fabrication_labor_total: totals.fabrication_labor,
            installation_labor_total: totals.installation_labor,
            labor_total: totals.labor,
            other_requirements_total: totals.other_requirements,
            subtotal_before_markup: markup.subtotal_before_markup,
            markup_rate: markup.markup_rate,
            markup_amount: markup.markup_amount,
            total_with_markup: markup.total_with_markup,
            grand_total: markup.grand_total,
            final_client_price: markup.final_client_price,
            final_price_overridden: markup.final_price_overridden,
            total_sq_ft: dims.sq_ft,
            total_lin_ft: dims.lin_ft,
            sq_ft_formula: input.sq_ft_formula,
            price_per_sq_ft_pre_delivery: price_per_sq_ft,
            price_per_lin_ft_pre_delivery: price_per_lin_ft,
            warnings,
        }
    }

    /// 收集输入提示
    ///
    /// 负数与离谱加价率是否属于错误尚无定论,这里只提示不修正
    fn collect_warnings(&self, input: &CostSheetInput) -> Vec<InputWarning> {
        let mut warnings = Vec::new();

        for (idx, line) in input.lines.iter().enumerate() {
            for (field, value) in line.numeric_fields() {
                if value < 0.0 {
                    warnings.push(InputWarning {
                        field: format!("lines[{}].{}", idx, field),
                        value,
                        reason: format!("{} 行出现负数", line.kind()),
                    });
                }
            }
        }

        for (idx, p) in input.products.iter().enumerate() {
            for (field, value) in [
                ("width_ft", p.width_ft),
                ("projection_ft", p.projection_ft),
                ("height_ft", p.height_ft),
            ] {
                if value < 0.0 {
                    warnings.push(InputWarning {
                        field: format!("products[{}].{}", idx, field),
                        value,
                        reason: "尺寸为负数".to_string(),
                    });
                }
            }
        }

        if input.markup_rate < 0.0 || input.markup_rate > MARKUP_WARNING_CEILING {
            warnings.push(InputWarning {
                field: "markup_rate".to_string(),
                value: input.markup_rate,
                reason: format!("加价率超出 [0, {}] 区间", MARKUP_WARNING_CEILING),
            });
        }

        if input.sales_tax_rate < 0.0 {
            warnings.push(InputWarning {
                field: "sales_tax_rate".to_string(),
                value: input.sales_tax_rate,
                reason: "税率为负数".to_string(),
            });
        }

        let other = &input.other;
        for (field, value) in [
            ("permit", other.permit),
            ("engineering", other.engineering),
            ("equipment", other.equipment),
            ("food", other.food),
        ] {
            if value < 0.0 {
                warnings.push(InputWarning {
                    field: format!("other.{}", field),
                    value,
                    reason: "其他费用为负数".to_string(),
                });
            }
        }

        // 人工报价 0 仍视为覆盖,只提示
        if let Some(price) = input.manual_final_price.filter(|v| v.is_finite()) {
            if price <= 0.0 {
                warnings.push(InputWarning {
                    field: "manual_final_price".to_string(),
                    value: price,
                    reason: "人工最终报价不大于 0".to_string(),
                });
            }
        }

        warnings
    }
}

impl Default for CostRollupEngine {
    fn default() -> Self {
        Self::new()
    }
}
