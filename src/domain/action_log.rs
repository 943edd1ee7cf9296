// ==========================================
// 遮阳篷成本核算系统 - 操作日志领域模型
// ==========================================
// 红线: 成本单与配置的所有写入必须记录
// 用途: 审计追踪 (谁在何时删除/恢复/改价)
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ==========================================
// ActionLog - 操作日志
// ==========================================
// 对齐: action_log 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,             // 日志ID
    pub cost_sheet_id: Option<String>, // 关联成本单 (配置变更为 None)
    pub action_type: String,           // 操作类型 (存储为字符串)
    pub action_ts: NaiveDateTime,      // 操作时间
    pub actor: String,                 // 操作人

    pub payload_json: Option<JsonValue>, // 操作参数 (JSON)
    pub detail: Option<String>,          // 详细描述
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    CreateCostSheet,  // 新建成本单
    UpdateCostSheet,  // 整单修改
    SetOutcome,       // 标记中标/落标
    Trash,            // 移入回收站
    Restore,          // 从回收站恢复
    Purge,            // 永久删除
    UpdateSettings,   // 修改管理配置
    RestoreSettings,  // 从快照恢复配置
}

impl ActionType {
    /// 转换为字符串 (用于数据库存储)
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::CreateCostSheet => "CreateCostSheet",
            ActionType::UpdateCostSheet => "UpdateCostSheet",
            ActionType::SetOutcome => "SetOutcome",
            ActionType::Trash => "Trash",
            ActionType::Restore => "Restore",
            ActionType::Purge => "Purge",
            ActionType::UpdateSettings => "UpdateSettings",
            ActionType::RestoreSettings => "RestoreSettings",
        }
    }
}

impl ActionLog {
    /// 构造一条当前时间的日志
    pub fn new(
        action_type: ActionType,
        cost_sheet_id: Option<&str>,
        actor: &str,
        payload_json: Option<JsonValue>,
        detail: Option<String>,
    ) -> Self {
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            cost_sheet_id: cost_sheet_id.map(|s| s.to_string()),
            action_type: action_type.as_str().to_string(),
            action_ts: chrono::Utc::now().naive_utc(),
            actor: actor.to_string(),
            payload_json,
            detail,
        }
    }
}
