// ==========================================
// 遮阳篷成本核算系统 - 配置读取 Trait
// ==========================================
// 职责: 定义 API 层所需的配置读取接口(不包含实现)
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::admin_config::{AdminConfig, RateDefaults};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// SettingsReader Trait
// ==========================================
// 实现者: ConfigManager(从 config_kv 表读取)
#[async_trait]
pub trait SettingsReader: Send + Sync {
    /// 获取默认费率
    ///
    /// # 默认值
    /// - 税率 0.0975,加价率 0.8
    async fn get_rate_defaults(&self) -> RepositoryResult<RateDefaults>;

    /// 获取品类列表
    async fn get_categories(&self) -> RepositoryResult<Vec<String>>;

    /// 获取销售员列表
    async fn get_sales_reps(&self) -> RepositoryResult<Vec<String>>;

    /// 获取完整管理配置
    async fn get_admin_config(&self) -> RepositoryResult<AdminConfig>;
}
