// ==========================================
// 遮阳篷成本核算系统 - 明细行领域模型
// ==========================================
// 职责: 材料/面料/人工/行程/里程/住宿/杂项 明细行
// 红线: 明细行只承载数据,金额计算在 engine::valuation
// ==========================================

use crate::domain::lenient;
use crate::domain::types::LaborPhase;
use serde::{Deserialize, Serialize};

// ==========================================
// LineItem - 明细行 (按类型多态)
// ==========================================
// 序列化: {"kind": "MATERIAL", ...字段}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineItem {
    Material(MaterialLine),
    Fabric(FabricLine),
    Labor(LaborLine),
    DriveTime(DriveTimeLine),
    Mileage(MileageLine),
    Hotel(HotelLine),
    Misc(MiscLine),
}

impl LineItem {
    /// 明细行类型标识
    pub fn kind(&self) -> &'static str {
        match self {
            LineItem::Material(_) => "MATERIAL",
            LineItem::Fabric(_) => "FABRIC",
            LineItem::Labor(_) => "LABOR",
            LineItem::DriveTime(_) => "DRIVE_TIME",
            LineItem::Mileage(_) => "MILEAGE",
            LineItem::Hotel(_) => "HOTEL",
            LineItem::Misc(_) => "MISC",
        }
    }

    /// 参与乘积的数值字段 (字段名, 值),用于输入检查
    pub fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        match self {
            LineItem::Material(l) => vec![
                ("quantity", l.quantity),
                ("unit_price", l.unit_price),
                ("freight", l.freight),
            ],
            LineItem::Fabric(l) => vec![
                ("yards", l.yards),
                ("price_per_yard", l.price_per_yard),
                ("freight", l.freight),
            ],
            LineItem::Labor(l) => vec![
                ("hours", l.hours),
                ("people", l.people),
                ("hourly_rate", l.hourly_rate),
            ],
            LineItem::DriveTime(l) => vec![
                ("trips", l.trips),
                ("hours_per_trip", l.hours_per_trip),
                ("people", l.people),
                ("hourly_rate", l.hourly_rate),
            ],
            LineItem::Mileage(l) => vec![
                ("roundtrip_miles", l.roundtrip_miles),
                ("trips", l.trips),
                ("rate_per_mile", l.rate_per_mile),
            ],
            LineItem::Hotel(l) => vec![
                ("nights", l.nights),
                ("people", l.people),
                ("rate_per_night", l.rate_per_night),
            ],
            LineItem::Misc(l) => vec![("quantity", l.quantity), ("unit_price", l.unit_price)],
        }
    }
}

/// 材料行: 数量 × 单价 × (1 + 税率) + 运费
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub unit_price: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub freight: f64,
}

/// 面料行: 码数 × 每码单价 × (1 + 税率) + 运费
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FabricLine {
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub yards: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub price_per_yard: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub freight: f64,
}

/// 人工行: 工时 × 人数 × 时薪
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaborLine {
    #[serde(default, deserialize_with = "lenient::labor_phase")]
    pub phase: LaborPhase,
    #[serde(default)]
    pub labor_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub hours: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub people: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub hourly_rate: f64,
}

/// 行程工时行: 趟数 × 单趟小时 × 人数 × 时薪
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveTimeLine {
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub trips: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub hours_per_trip: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub people: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub hourly_rate: f64,
}

/// 里程行: 往返里程 × 趟数 × 每英里费率
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MileageLine {
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub roundtrip_miles: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub trips: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub rate_per_mile: f64,
}

/// 住宿行: 晚数 × 人数 × 每晚房价
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HotelLine {
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub nights: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub people: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub rate_per_night: f64,
}

/// 杂项行: 数量 × 单价 × (1 + 税率),计入材料合计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MiscLine {
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub unit_price: f64,
}
