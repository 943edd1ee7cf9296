// ==========================================
// 遮阳篷成本核算系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 报价辅助 (成本汇总 + 历史价格护栏),最终报价由人工决定
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 计算规则
pub mod engine;

// 配置层 - 管理员配置
pub mod config;

// 数据库基础设施(连接初始化/PRAGMA 统一/建表)
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 用例接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Actor, GuardrailStatus, LaborPhase, Outcome, RecordState, Role, SqFtFormula};

// 领域实体
pub use domain::{
    ActionLog, ActionType, CategoryPricingStats, CostRollup, CostSheetInput, CostSheetRecord,
    GuardrailReport, LineItem,
};

// 引擎
pub use engine::{CostRollupEngine, GuardrailClassifier, HistoricalAggregator, RecordLifecycle};

// 配置
pub use config::{AdminConfig, ConfigHandle, ConfigManager};

// API
pub use api::{AdminApi, ApiError, DashboardApi, EstimateApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "遮阳篷成本核算系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
