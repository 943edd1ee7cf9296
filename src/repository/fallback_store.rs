// ==========================================
// 遮阳篷成本核算系统 - 降级存储
// ==========================================
// 职责: 主存储失败时切换到备用存储,可选写镜像
// 红线: 降级只在存储边界决定,上层调用方不感知后端
// ==========================================

use crate::domain::cost_sheet::CostSheetRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::store::CostSheetStore;
use std::sync::Arc;

pub struct FallbackStore {
    primary: Arc<dyn CostSheetStore>,
    secondary: Arc<dyn CostSheetStore>,
    mirror_writes: bool,
}

impl FallbackStore {
    pub fn new(primary: Arc<dyn CostSheetStore>, secondary: Arc<dyn CostSheetStore>) -> Self {
        Self {
            primary,
            secondary,
            mirror_writes: false,
        }
    }

    /// 主存储写入成功后,同步写一份到备用存储
    pub fn with_mirror_writes(mut self, enabled: bool) -> Self {
        self.mirror_writes = enabled;
        self
    }

    fn mirror(&self, op: &str, result: RepositoryResult<()>) {
        if let Err(e) = result {
            tracing::warn!(
                op,
                backend = self.secondary.backend_name(),
                error = %e,
                "镜像写入失败,主存储已成功"
            );
        }
    }

    fn fall_back<T>(
        &self,
        op: &str,
        primary: RepositoryResult<T>,
        secondary: impl FnOnce() -> RepositoryResult<T>,
    ) -> RepositoryResult<T> {
        match primary {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(
                    op,
                    primary = self.primary.backend_name(),
                    secondary = self.secondary.backend_name(),
                    error = %e,
                    "主存储失败,切换备用存储"
                );
                secondary()
            }
        }
    }
}

impl CostSheetStore for FallbackStore {
    fn backend_name(&self) -> &'static str {
        "fallback"
    }

    fn insert(&self, record: &CostSheetRecord) -> RepositoryResult<()> {
        match self.primary.insert(record) {
            Ok(()) => {
                if self.mirror_writes {
                    self.mirror("insert", self.secondary.upsert(record));
                }
                Ok(())
            }
            Err(e) => self.fall_back("insert", Err(e), || self.secondary.upsert(record)),
        }
    }

    fn update(&self, record: &CostSheetRecord) -> RepositoryResult<()> {
        match self.primary.update(record) {
            Ok(()) => {
                if self.mirror_writes {
                    self.mirror("update", self.secondary.upsert(record));
                }
                Ok(())
            }
            // 记录不存在不是后端故障,不降级
            Err(e @ RepositoryError::NotFound { .. }) => Err(e),
            Err(e) => self.fall_back("update", Err(e), || self.secondary.upsert(record)),
        }
    }

    fn find_by_id(&self, id: &str) -> RepositoryResult<Option<CostSheetRecord>> {
        self.fall_back("find_by_id", self.primary.find_by_id(id), || {
            self.secondary.find_by_id(id)
        })
    }

    fn list(&self, include_trashed: bool) -> RepositoryResult<Vec<CostSheetRecord>> {
        self.fall_back("list", self.primary.list(include_trashed), || {
            self.secondary.list(include_trashed)
        })
    }

    fn delete_permanently(&self, id: &str) -> RepositoryResult<bool> {
        match self.primary.delete_permanently(id) {
            Ok(deleted) => {
                if self.mirror_writes {
                    self.mirror(
                        "delete_permanently",
                        self.secondary.delete_permanently(id).map(|_| ()),
                    );
                }
                Ok(deleted)
            }
            Err(e) => self.fall_back("delete_permanently", Err(e), || {
                self.secondary.delete_permanently(id)
            }),
        }
    }
}
