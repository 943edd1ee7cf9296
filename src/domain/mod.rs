// ==========================================
// 遮阳篷成本核算系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含计算逻辑
// ==========================================

pub mod action_log;
pub mod cost_sheet;
pub mod lenient;
pub mod line_item;
pub mod stats;
pub mod types;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use cost_sheet::{
    CostRollup, CostSheetHeader, CostSheetInput, CostSheetRecord, InputWarning,
    OtherRequirements, ProductDimensions,
};
pub use line_item::{
    DriveTimeLine, FabricLine, HotelLine, LaborLine, LineItem, MaterialLine, MileageLine,
    MiscLine,
};
pub use stats::{CategoryPricingStats, GuardrailCheck, GuardrailReport};
pub use types::{
    Actor, GuardrailStatus, LaborPhase, Outcome, RecordState, Role, SqFtFormula,
};
