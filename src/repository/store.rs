// ==========================================
// 遮阳篷成本核算系统 - 成本单存储接口
// ==========================================
// 职责: 定义成本单持久化边界 (SQLite / 本地 JSON / 降级组合)
// 红线: 存储层只做映射,状态校验在 engine::lifecycle
// ==========================================

use crate::domain::cost_sheet::CostSheetRecord;
use crate::repository::error::RepositoryResult;

pub trait CostSheetStore: Send + Sync {
    /// 存储后端名称 (用于日志)
    fn backend_name(&self) -> &'static str;

    /// 新增成本单
    fn insert(&self, record: &CostSheetRecord) -> RepositoryResult<()>;

    /// 整单覆盖 (按 id),不存在返回 NotFound
    fn update(&self, record: &CostSheetRecord) -> RepositoryResult<()>;

    fn find_by_id(&self, id: &str) -> RepositoryResult<Option<CostSheetRecord>>;

    /// 列出成本单
    ///
    /// # 参数
    /// - include_trashed: false 时只返回 ACTIVE 记录
    fn list(&self, include_trashed: bool) -> RepositoryResult<Vec<CostSheetRecord>>;

    /// 永久删除,返回是否删除了记录
    fn delete_permanently(&self, id: &str) -> RepositoryResult<bool>;

    /// 存在则覆盖,不存在则新增
    fn upsert(&self, record: &CostSheetRecord) -> RepositoryResult<()> {
        if self.find_by_id(&record.id)?.is_some() {
            self.update(record)
        } else {
            self.insert(record)
        }
    }
}
