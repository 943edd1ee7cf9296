// ==========================================
// 遮阳篷成本核算系统 - 明细行计价
// ==========================================
// 职责: 计算单条明细行金额
// 红线: 纯函数,缺失/非数值输入按 0 计,负数不拦截
// ==========================================

use crate::domain::lenient::sanitize;
use crate::domain::line_item::{
    DriveTimeLine, FabricLine, HotelLine, LaborLine, LineItem, MaterialLine, MileageLine,
    MiscLine,
};

/// 含税货值: 数量 × 单价 × (1 + 税率)
fn taxed(quantity: f64, unit_price: f64, tax_rate: f64) -> f64 {
    let base = sanitize(quantity) * sanitize(unit_price);
    base + base * sanitize(tax_rate)
}

/// 材料行金额 = 数量 × 单价 × (1 + 税率) + 运费
pub fn material_total(line: &MaterialLine, tax_rate: f64) -> f64 {
    taxed(line.quantity, line.unit_price, tax_rate) + sanitize(line.freight)
}

/// 面料行金额 = 码数 × 每码单价 × (1 + 税率) + 运费
pub fn fabric_total(line: &FabricLine, tax_rate: f64) -> f64 {
    taxed(line.yards, line.price_per_yard, tax_rate) + sanitize(line.freight)
}

/// 杂项行金额 = 数量 × 单价 × (1 + 税率)
pub fn misc_total(line: &MiscLine, tax_rate: f64) -> f64 {
    taxed(line.quantity, line.unit_price, tax_rate)
}

/// 人工行金额 = 工时 × 人数 × 时薪
pub fn labor_total(line: &LaborLine) -> f64 {
    sanitize(line.hours) * sanitize(line.people) * sanitize(line.hourly_rate)
}

/// 行程工时金额 = 趟数 × 单趟小时 × 人数 × 时薪
pub fn drive_time_total(line: &DriveTimeLine) -> f64 {
    sanitize(line.trips)
        * sanitize(line.hours_per_trip)
        * sanitize(line.people)
        * sanitize(line.hourly_rate)
}

/// 里程金额 = 往返里程 × 趟数 × 每英里费率
pub fn mileage_total(line: &MileageLine) -> f64 {
    sanitize(line.roundtrip_miles) * sanitize(line.trips) * sanitize(line.rate_per_mile)
}

/// 住宿金额 = 晚数 × 人数 × 每晚房价
pub fn hotel_total(line: &HotelLine) -> f64 {
    sanitize(line.nights) * sanitize(line.people) * sanitize(line.rate_per_night)
}

/// 任意明细行金额 (税率只作用于材料/面料/杂项)
pub fn line_total(line: &LineItem, tax_rate: f64) -> f64 {
    match line {
        LineItem::Material(l) => material_total(l, tax_rate),
        LineItem::Fabric(l) => fabric_total(l, tax_rate),
        LineItem::Labor(l) => labor_total(l),
        LineItem::DriveTime(l) => drive_time_total(l),
        LineItem::Mileage(l) => mileage_total(l),
        LineItem::Hotel(l) => hotel_total(l),
        LineItem::Misc(l) => misc_total(l, tax_rate),
    }
}

/// 金额按分四舍五入 (仅用于展示/导出)
pub fn round_currency(value: f64) -> f64 {
    (sanitize(value) * 100.0).round() / 100.0
}
