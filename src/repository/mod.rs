// ==========================================
// 遮阳篷成本核算系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod action_log_repo;
pub mod cost_sheet_repo;
pub mod error;
pub mod fallback_store;
pub mod json_file_store;
pub mod store;

// 重导出核心仓储
pub use action_log_repo::ActionLogRepository;
pub use cost_sheet_repo::CostSheetRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use fallback_store::FallbackStore;
pub use json_file_store::JsonFileStore;
pub use store::CostSheetStore;
