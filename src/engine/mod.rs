// ==========================================
// 遮阳篷成本核算系统 - 引擎层
// ==========================================
// 职责: 成本计算与统计规则,纯函数
// 红线: Engine 不拼 SQL,不做 I/O
// ==========================================

pub mod aggregator;
pub mod analytics;
pub mod budget;
pub mod guardrail;
pub mod historical;
pub mod lifecycle;
pub mod markup;
pub mod rollup;
pub mod unit_price;
pub mod valuation;

// 重导出核心引擎
pub use aggregator::{CategoryAggregator, CategoryTotals};
pub use analytics::{
    CategoryPerformance, CostSheetFilter, MonthlyPoint, SalesRepPerformance, WinLossSummary,
};
pub use budget::{BudgetEstimate, BudgetRange, BudgetRequest, QuickBudget};
pub use guardrail::GuardrailClassifier;
pub use historical::HistoricalAggregator;
pub use lifecycle::{LifecycleAction, LifecycleError, RecordLifecycle, Transition};
pub use markup::{MarkupBreakdown, MarkupEngine};
pub use rollup::CostRollupEngine;
