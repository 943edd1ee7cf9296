// ==========================================
// 遮阳篷成本核算系统 - 成本单领域模型
// ==========================================
// 职责: 成本单表头、表单输入、汇总结果、持久化记录
// 红线: 汇总字段可由明细 + 加价率重算,但记录中冗余保存
//       (后续调整全局费率不得改变历史分析结果)
// ==========================================

use crate::domain::lenient;
use crate::domain::line_item::LineItem;
use crate::domain::types::{Outcome, RecordState, SqFtFormula};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// ProductDimensions - 产品尺寸 (英尺)
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDimensions {
    #[serde(default)]
    pub label: String,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub width_ft: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub projection_ft: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub height_ft: f64,
}

// ==========================================
// OtherRequirements - 其他现场费用 (固定金额)
// ==========================================
// 不参与加价,也不计入交付前单价
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtherRequirements {
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub permit: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub engineering: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub equipment: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub food: f64,
}

// ==========================================
// CostSheetHeader - 表头
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostSheetHeader {
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub customer: String,
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub project: String,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub estimate_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub sales_rep: Option<String>,
    #[serde(default)]
    pub estimator: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

// ==========================================
// CostSheetInput - 表单输入 (编辑中的状态)
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostSheetInput {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub header: CostSheetHeader,
    #[serde(default, deserialize_with = "lenient::vec_or_empty")]
    pub lines: Vec<LineItem>,
    #[serde(default, deserialize_with = "lenient::vec_or_empty")]
    pub products: Vec<ProductDimensions>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub other: OtherRequirements,
    /// 加价率 (小数, 0.8 = 80%)
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub markup_rate: f64,
    /// 销售税率 (小数, 0.0975 = 9.75%)
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub sales_tax_rate: f64,
    /// 人工指定最终报价 (替代 grand_total 用于开票)
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub manual_final_price: Option<f64>,
    #[serde(default)]
    pub sq_ft_formula: SqFtFormula,
}

// ==========================================
// InputWarning - 输入提示 (不阻断计算)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputWarning {
    pub field: String,
    pub value: f64,
    pub reason: String,
}

// ==========================================
// CostRollup - 汇总结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostRollup {
    // ===== 分类合计 =====
    pub materials_total: f64,
    pub fabric_total: f64,
    pub fabrication_labor_total: f64,
    pub installation_labor_total: f64,
    pub labor_total: f64,
    pub other_requirements_total: f64,

    // ===== 加价 =====
    pub subtotal_before_markup: f64,
    pub markup_rate: f64,
    pub markup_amount: f64,
    pub total_with_markup: f64,

    // ===== 最终报价 =====
    pub grand_total: f64,
    pub final_client_price: f64,
    pub final_price_overridden: bool,

    // ===== 尺寸与单价 (交付前) =====
    pub total_sq_ft: f64,
    pub total_lin_ft: f64,
    pub sq_ft_formula: SqFtFormula,
    pub price_per_sq_ft_pre_delivery: Option<f64>,
    pub price_per_lin_ft_pre_delivery: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<InputWarning>,
}

// ==========================================
// CostSheetRecord - 已保存的成本单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSheetRecord {
    pub id: String,
    pub input: CostSheetInput,
    pub rollup: CostRollup,
    pub outcome: Outcome,

    // ===== 生命周期 =====
    pub state: RecordState,
    pub deleted_at: Option<NaiveDateTime>,
    pub deleted_by: Option<String>,

    // ===== 审计字段 =====
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub updated_at: NaiveDateTime,
    pub updated_by: String,
}

impl CostSheetRecord {
    pub fn category(&self) -> &str {
        &self.input.header.category
    }

    pub fn is_active(&self) -> bool {
        self.state == RecordState::Active
    }

    /// 统计用日期: 估价日期优先,否则取创建日期
    pub fn reporting_date(&self) -> NaiveDate {
        self.input
            .header
            .estimate_date
            .unwrap_or_else(|| self.created_at.date())
    }
}
