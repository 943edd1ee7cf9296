// ==========================================
// 遮阳篷成本核算系统 - API 层
// ==========================================
// 职责: 用例编排 (引擎 + 仓储 + 配置),权限校验,审计日志
// 红线: API 层不拼 SQL,计算规则只在 engine
// ==========================================

pub mod admin_api;
pub mod dashboard_api;
pub mod error;
pub mod estimate_api;

pub use admin_api::AdminApi;
pub use dashboard_api::DashboardApi;
pub use error::{ApiError, ApiResult};
pub use estimate_api::{EstimateApi, EstimatePreview};
