// ==========================================
// 遮阳篷成本核算系统 - 配置管理器
// ==========================================
// 职责: 管理配置加载、保存、快照
// 存储: config_kv 表 (key-value, scope_id='global'),每个分区存一段 JSON
// ==========================================

use crate::config::admin_config::{
    default_categories, default_labor_types, AdminConfig, AiProviderSettings, FabricPreset,
    LaborRatePreset, MaterialPreset, RateDefaults,
};
use crate::config::settings_reader::SettingsReader;
use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const CATEGORIES: &str = "categories";
    pub const LABOR_TYPES: &str = "labor_types";
    pub const LABOR_RATES: &str = "labor_rates";
    pub const MATERIAL_PRESETS: &str = "material_presets";
    pub const FABRIC_PRESETS: &str = "fabric_presets";
    pub const SALES_REPS: &str = "sales_reps";
    pub const RATE_DEFAULTS: &str = "rate_defaults";
    /// 凭据分区,不进入快照
    pub const AI_PROVIDER: &str = "ai_provider";
}

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        crate::db::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明:为保证连接行为一致,会对传入连接再次应用统一 PRAGMA(幂等)。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    pub fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 写入 global scope 的配置值 (UPSERT)
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at) VALUES (?1, ?2, ?3, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// 读取 JSON 分区;缺失返回默认值,格式错误记录告警后返回默认值
    fn get_section<T, F>(&self, key: &str, default: F) -> RepositoryResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default()),
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    error = %e,
                    "配置格式错误,使用默认值"
                );
                Ok(default())
            }
        }
    }

    /// 加载完整管理配置
    pub fn load_admin_config(&self) -> RepositoryResult<AdminConfig> {
        Ok(AdminConfig {
            categories: self.get_section(config_keys::CATEGORIES, default_categories)?,
            labor_types: self.get_section(config_keys::LABOR_TYPES, default_labor_types)?,
            labor_rates: self.get_section::<Vec<LaborRatePreset>, _>(
                config_keys::LABOR_RATES,
                Vec::new,
            )?,
            material_presets: self.get_section::<Vec<MaterialPreset>, _>(
                config_keys::MATERIAL_PRESETS,
                Vec::new,
            )?,
            fabric_presets: self.get_section::<Vec<FabricPreset>, _>(
                config_keys::FABRIC_PRESETS,
                Vec::new,
            )?,
            sales_reps: self.get_section::<Vec<String>, _>(config_keys::SALES_REPS, Vec::new)?,
            defaults: self.get_section(config_keys::RATE_DEFAULTS, RateDefaults::default)?,
            ai_provider: self.get_section::<Option<AiProviderSettings>, _>(
                config_keys::AI_PROVIDER,
                || None,
            )?,
        })
    }

    /// 保存完整管理配置 (单事务)
    pub fn save_admin_config(&self, config: &AdminConfig) -> RepositoryResult<usize> {
        let entries: Vec<(&str, String)> = vec![
            (config_keys::CATEGORIES, to_json(&config.categories)?),
            (config_keys::LABOR_TYPES, to_json(&config.labor_types)?),
            (config_keys::LABOR_RATES, to_json(&config.labor_rates)?),
            (config_keys::MATERIAL_PRESETS, to_json(&config.material_presets)?),
            (config_keys::FABRIC_PRESETS, to_json(&config.fabric_presets)?),
            (config_keys::SALES_REPS, to_json(&config.sales_reps)?),
            (config_keys::RATE_DEFAULTS, to_json(&config.defaults)?),
            (config_keys::AI_PROVIDER, to_json(&config.ai_provider)?),
        ];

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let mut count = 0;
        for (key, value) in &entries {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value, updated_at) VALUES (?1, ?2, ?3, datetime('now'))
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
                params![GLOBAL_SCOPE, key, value],
            )?;
        }
        tx.commit()?;

        tracing::info!(keys = count, "管理配置已保存");
        Ok(count)
    }

    /// 获取配置快照 (JSON),凭据分区不进入快照
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = ?1 AND key != ?2 ORDER BY key",
        )?;

        let rows = stmt.query_map(params![GLOBAL_SCOPE, config_keys::AI_PROVIDER], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&config_map)?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 注意
    /// - 覆盖现有 global 配置,凭据分区保持不变
    /// - `__meta_` 前缀的键为快照元信息,不回写
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> RepositoryResult<usize> {
        let config_map: HashMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            if key.starts_with("__meta_") || key == config_keys::AI_PROVIDER {
                continue;
            }
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value, updated_at) VALUES (?1, ?2, ?3, datetime('now'))
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
                params![GLOBAL_SCOPE, key, value],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }
}

fn to_json<T: Serialize>(value: &T) -> RepositoryResult<String> {
    Ok(serde_json::to_string(value)?)
}

// ==========================================
// SettingsReader Trait 实现
// ==========================================
#[async_trait]
impl SettingsReader for ConfigManager {
    async fn get_rate_defaults(&self) -> RepositoryResult<RateDefaults> {
        self.get_section(config_keys::RATE_DEFAULTS, RateDefaults::default)
    }

    async fn get_categories(&self) -> RepositoryResult<Vec<String>> {
        self.get_section(config_keys::CATEGORIES, default_categories)
    }

    async fn get_sales_reps(&self) -> RepositoryResult<Vec<String>> {
        self.get_section::<Vec<String>, _>(config_keys::SALES_REPS, Vec::new)
    }

    async fn get_admin_config(&self) -> RepositoryResult<AdminConfig> {
        self.load_admin_config()
    }
}
