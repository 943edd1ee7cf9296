// ==========================================
// 遮阳篷成本核算系统 - 分类汇总
// ==========================================
// 职责: 按类别汇总明细行金额
// 输入: 明细行 + 税率 + 其他现场费用
// 输出: CategoryTotals
// ==========================================

use crate::domain::cost_sheet::OtherRequirements;
use crate::domain::lenient::sanitize;
use crate::domain::line_item::LineItem;
use crate::domain::types::LaborPhase;
use crate::engine::valuation;
use serde::{Deserialize, Serialize};

/// 分类合计
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub materials: f64,
    pub fabric: f64,
    pub fabrication_labor: f64,
    pub installation_labor: f64,
    pub labor: f64,
    pub drive_time: f64,
    pub mileage: f64,
    pub hotel: f64,
    /// 许可 + 工程 + 设备 + 餐费
    pub fixed_other: f64,
    pub other_requirements: f64,
}

/// 分类汇总器 (无状态)
pub struct CategoryAggregator;

impl CategoryAggregator {
    /// 汇总全部明细行
    ///
    /// - 材料合计 = 材料行 + 杂项行
    /// - 人工合计 = 制作人工 + 安装人工
    /// - 其他要求合计 = 许可 + 工程 + 设备 + 餐费 + 行程 + 里程 + 住宿
    pub fn aggregate(
        lines: &[LineItem],
        tax_rate: f64,
        other: &OtherRequirements,
    ) -> CategoryTotals {
        let mut totals = CategoryTotals::default();

        for line in lines {
            let amount = valuation::line_total(line, tax_rate);
            match line {
                LineItem::Material(_) | LineItem::Misc(_) => totals.materials += amount,
                LineItem::Fabric(_) => totals.fabric += amount,
                LineItem::Labor(l) => match l.phase {
                    LaborPhase::Fabrication => totals.fabrication_labor += amount,
                    LaborPhase::Installation => totals.installation_labor += amount,
                },
                LineItem::DriveTime(_) => totals.drive_time += amount,
                LineItem::Mileage(_) => totals.mileage += amount,
                LineItem::Hotel(_) => totals.hotel += amount,
            }
        }

        totals.labor = totals.fabrication_labor + totals.installation_labor;
        totals.fixed_other = sanitize(other.permit)
            + sanitize(other.engineering)
            + sanitize(other.equipment)
            + sanitize(other.food);
        totals.other_requirements =
            totals.fixed_other + totals.drive_time + totals.mileage + totals.hotel;

        totals
    }
}
