// ==========================================
// 遮阳篷成本核算系统 - 单价归一化
// ==========================================
// 职责: 汇总尺寸,计算每平方英尺/每延米英尺单价
// 红线: 分母为 0 时返回 None (界面显示 N/A),不得除零
// ==========================================

use crate::domain::cost_sheet::ProductDimensions;
use crate::domain::lenient::sanitize;
use crate::domain::types::SqFtFormula;

/// 尺寸汇总
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DimensionTotals {
    pub sq_ft: f64,
    pub lin_ft: f64,
}

/// 单个产品的面积
pub fn product_sq_ft(product: &ProductDimensions, formula: SqFtFormula) -> f64 {
    let width = sanitize(product.width_ft);
    let projection = sanitize(product.projection_ft);
    match formula {
        SqFtFormula::WidthXProjection => width * projection,
        SqFtFormula::WidthXProjectionPlusFace => {
            width * projection + width * sanitize(product.height_ft)
        }
    }
}

/// 单个产品的延米 = 宽 + 出挑 × 2
pub fn product_lin_ft(product: &ProductDimensions) -> f64 {
    sanitize(product.width_ft) + sanitize(product.projection_ft) * 2.0
}

/// 汇总多个产品的面积与延米
pub fn total_dimensions(products: &[ProductDimensions], formula: SqFtFormula) -> DimensionTotals {
    products
        .iter()
        .fold(DimensionTotals::default(), |acc, p| DimensionTotals {
            sq_ft: acc.sq_ft + product_sq_ft(p, formula),
            lin_ft: acc.lin_ft + product_lin_ft(p),
        })
}

/// 单价 = 金额 / 数量,数量 <= 0 或结果非有限时返回 None
pub fn per_unit(total: f64, units: f64) -> Option<f64> {
    if units > 0.0 {
        Some(total / units).filter(|v| v.is_finite())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(width: f64, projection: f64, height: f64) -> ProductDimensions {
        ProductDimensions {
            label: "P".to_string(),
            width_ft: width,
            projection_ft: projection,
            height_ft: height,
        }
    }

    #[test]
    fn test_sq_ft_formulas() {
        let p = product(20.0, 4.0, 2.0);
        assert_eq!(product_sq_ft(&p, SqFtFormula::WidthXProjection), 80.0);
        assert_eq!(product_sq_ft(&p, SqFtFormula::WidthXProjectionPlusFace), 120.0);
    }

    #[test]
    fn test_lin_ft() {
        assert_eq!(product_lin_ft(&product(20.0, 4.0, 2.0)), 28.0);
    }

    #[test]
    fn test_totals_across_products() {
        let products = vec![product(10.0, 3.0, 1.0), product(12.0, 5.0, 0.0)];
        let totals = total_dimensions(&products, SqFtFormula::WidthXProjectionPlusFace);
        assert_eq!(totals.sq_ft, 30.0 + 10.0 + 60.0);
        assert_eq!(totals.lin_ft, 16.0 + 22.0);
    }

    #[test]
    fn test_per_unit_guards_zero() {
        assert_eq!(per_unit(1800.0, 0.0), None);
        assert_eq!(per_unit(1800.0, -5.0), None);
        assert_eq!(per_unit(1800.0, 120.0), Some(15.0));
    }
}
