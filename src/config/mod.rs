// ==========================================
// 遮阳篷成本核算系统 - 配置层
// ==========================================
// 职责: 管理员配置(品类、费率、预设)的存取与进程内共享
// 存储: config_kv 表
// ==========================================

pub mod admin_config;
pub mod config_manager;
pub mod handle;
pub mod settings_reader;

pub use admin_config::{
    AdminConfig, AiProviderSettings, FabricPreset, LaborRatePreset, MaterialPreset, RateDefaults,
};
pub use config_manager::{config_keys, ConfigManager};
pub use handle::ConfigHandle;
pub use settings_reader::SettingsReader;
