// ==========================================
// 遮阳篷成本核算系统 - 应用状态
// ==========================================
// 职责: 打开数据库、构建配置句柄/仓储/API 实例
// ==========================================

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::api::{AdminApi, DashboardApi, EstimateApi};
use crate::config::config_manager::ConfigManager;
use crate::config::handle::ConfigHandle;
use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::{
    ActionLogRepository, CostSheetRepository, CostSheetStore, FallbackStore, JsonFileStore,
};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置句柄 (管理员保存后 reload)
    pub config: Arc<ConfigHandle>,

    /// 成本单存储 (SQLite,或带本地镜像的降级存储)
    pub store: Arc<dyn CostSheetStore>,

    /// 操作日志仓储
    pub action_log_repo: Arc<ActionLogRepository>,

    pub estimate_api: Arc<EstimateApi>,
    pub dashboard_api: Arc<DashboardApi>,
    pub admin_api: Arc<AdminApi>,
}

impl AppState {
    /// 创建新的AppState实例 (仅 SQLite)
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        Self::build(db_path, None)
    }

    /// 创建带本地 JSON 镜像的AppState
    ///
    /// 数据库读写失败时自动切换到镜像文件,成功写入也会同步到镜像
    pub fn with_local_mirror(db_path: String, mirror_path: PathBuf) -> Result<Self, String> {
        Self::build(db_path, Some(mirror_path))
    }

    fn build(db_path: String, mirror_path: Option<PathBuf>) -> Result<Self, String> {
        tracing::info!("初始化AppState,数据库路径: {}", db_path);

        // 创建数据库连接(共享连接)
        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("无法初始化数据库表结构: {}", e))?;
        let conn: Arc<Mutex<Connection>> = Arc::new(Mutex::new(conn));

        // ==========================================
        // 配置
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let config = Arc::new(
            ConfigHandle::load(config_manager).map_err(|e| format!("无法加载配置: {}", e))?,
        );

        // ==========================================
        // Repository
        // ==========================================
        let sqlite_store: Arc<dyn CostSheetStore> = Arc::new(CostSheetRepository::new(conn.clone()));
        let store: Arc<dyn CostSheetStore> = match mirror_path {
            Some(path) => {
                tracing::info!("启用本地镜像: {}", path.display());
                let mirror: Arc<dyn CostSheetStore> = Arc::new(JsonFileStore::new(path));
                Arc::new(FallbackStore::new(sqlite_store, mirror).with_mirror_writes(true))
            }
            None => sqlite_store,
        };
        let action_log_repo = Arc::new(ActionLogRepository::new(conn));

        // ==========================================
        // API
        // ==========================================
        let estimate_api = Arc::new(EstimateApi::new(
            store.clone(),
            action_log_repo.clone(),
            config.clone(),
        ));
        let dashboard_api = Arc::new(DashboardApi::new(
            store.clone(),
            action_log_repo.clone(),
            config.clone(),
        ));
        let admin_api = Arc::new(AdminApi::new(
            store.clone(),
            action_log_repo.clone(),
            config.clone(),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            config,
            store,
            action_log_repo,
            estimate_api,
            dashboard_api,
            admin_api,
        })
    }
}

/// 默认数据库路径
///
/// 优先级: 环境变量 AWNING_ESTIMATOR_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    // 允许通过环境变量显式指定 DB 路径(便于调试/测试/CI)
    if let Ok(path) = std::env::var("AWNING_ESTIMATOR_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./awning_estimator.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录,避免污染生产数据
        #[cfg(debug_assertions)]
        let dir = data_dir.join("awning-estimator-dev");

        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("awning-estimator");

        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("awning_estimator.db");
        }
    }

    path.to_string_lossy().to_string()
}

/// 与数据库同目录的本地镜像文件路径
pub fn mirror_path_for(db_path: &str) -> PathBuf {
    Path::new(db_path).with_extension("mirror.json")
}
