// ==========================================
// 遮阳篷成本核算系统 - 配置句柄
// ==========================================
// 职责: 进程内共享的配置快照,管理员保存后显式 reload
// 红线: 读者拿到的是 Arc 快照,reload 不影响已在计算中的成本单
// ==========================================

use crate::config::admin_config::AdminConfig;
use crate::config::config_manager::ConfigManager;
use crate::repository::error::RepositoryResult;
use std::sync::{Arc, RwLock};

pub struct ConfigHandle {
    manager: Arc<ConfigManager>,
    current: RwLock<Arc<AdminConfig>>,
}

impl ConfigHandle {
    /// 从存储加载一次配置并构造句柄
    pub fn load(manager: Arc<ConfigManager>) -> RepositoryResult<Self> {
        let config = manager.load_admin_config()?;
        Ok(Self {
            manager,
            current: RwLock::new(Arc::new(config)),
        })
    }

    /// 当前配置快照
    pub fn current(&self) -> Arc<AdminConfig> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// 重新从存储读取配置
    pub fn reload(&self) -> RepositoryResult<Arc<AdminConfig>> {
        let fresh = Arc::new(self.manager.load_admin_config()?);
        self.swap(Arc::clone(&fresh));
        tracing::info!(
            categories = fresh.categories.len(),
            sales_reps = fresh.sales_reps.len(),
            "配置已重新加载"
        );
        Ok(fresh)
    }

    /// 持久化并刷新快照
    pub fn save(&self, config: &AdminConfig) -> RepositoryResult<Arc<AdminConfig>> {
        self.manager.save_admin_config(config)?;
        self.reload()
    }

    pub fn manager(&self) -> &Arc<ConfigManager> {
        &self.manager
    }

    fn swap(&self, next: Arc<AdminConfig>) {
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }
}
