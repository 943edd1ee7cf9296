// ==========================================
// 遮阳篷成本核算系统 - 领域类型定义
// ==========================================
// 职责: 结果状态、记录生命周期、角色、护栏等级等枚举
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 报价结果 (Outcome)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    #[default]
    Unknown, // 未定
    Won,  // 中标
    Lost, // 落标
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl Outcome {
    /// 从字符串解析 (未知值回落为 Unknown)
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "WON" => Outcome::Won,
            "LOST" => Outcome::Lost,
            _ => Outcome::Unknown,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Outcome::Unknown => "UNKNOWN",
            Outcome::Won => "WON",
            Outcome::Lost => "LOST",
        }
    }

    /// i18n 键
    pub fn label_key(&self) -> &'static str {
        match self {
            Outcome::Unknown => "outcome.unknown",
            Outcome::Won => "outcome.won",
            Outcome::Lost => "outcome.lost",
        }
    }
}

// ==========================================
// 记录状态 (Record State)
// ==========================================
// 生命周期: Active -> Trashed -> (Active | 永久删除)
// 永久删除不是状态,记录直接从存储中移除
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordState {
    #[default]
    Active,  // 正常
    Trashed, // 回收站
}

impl fmt::Display for RecordState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl RecordState {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "TRASHED" => RecordState::Trashed,
            _ => RecordState::Active,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            RecordState::Active => "ACTIVE",
            RecordState::Trashed => "TRASHED",
        }
    }
}

// ==========================================
// 用户角色 (Role)
// ==========================================
// 顺序: Viewer < Estimator < Admin
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Viewer,    // 只读
    Estimator, // 估价员
    Admin,     // 管理员
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Viewer => write!(f, "VIEWER"),
            Role::Estimator => write!(f, "ESTIMATOR"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

impl Role {
    /// 是否至少具备指定角色的权限
    pub fn at_least(&self, required: Role) -> bool {
        *self >= required
    }
}

/// 操作人
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

// ==========================================
// 人工阶段 (Labor Phase)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LaborPhase {
    #[default]
    Fabrication,  // 车间制作
    Installation, // 现场安装
}

impl fmt::Display for LaborPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaborPhase::Fabrication => write!(f, "FABRICATION"),
            LaborPhase::Installation => write!(f, "INSTALLATION"),
        }
    }
}

// ==========================================
// 价格护栏等级 (Guardrail Status)
// ==========================================
// 仅用于界面着色,不阻断提交
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuardrailStatus {
    Good,   // 与历史均价偏差在容差内
    High,   // 高于历史均价
    Low,    // 低于历史均价
    NoData, // 无可比数据
}

impl fmt::Display for GuardrailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardrailStatus::Good => write!(f, "GOOD"),
            GuardrailStatus::High => write!(f, "HIGH"),
            GuardrailStatus::Low => write!(f, "LOW"),
            GuardrailStatus::NoData => write!(f, "NO_DATA"),
        }
    }
}

impl GuardrailStatus {
    pub fn label_key(&self) -> &'static str {
        match self {
            GuardrailStatus::Good => "guardrail.good",
            GuardrailStatus::High => "guardrail.high",
            GuardrailStatus::Low => "guardrail.low",
            GuardrailStatus::NoData => "guardrail.no_data",
        }
    }
}

// ==========================================
// 面积公式 (Square Footage Formula)
// ==========================================
// 早期表单: 宽 × 出挑
// 后期表单: 宽 × 出挑 + 宽 × 高 (含前挡面)
// 两版并存,权威口径待业务确认,默认采用后期版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SqFtFormula {
    WidthXProjection,
    #[default]
    WidthXProjectionPlusFace,
}

impl fmt::Display for SqFtFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqFtFormula::WidthXProjection => write!(f, "WIDTH_X_PROJECTION"),
            SqFtFormula::WidthXProjectionPlusFace => write!(f, "WIDTH_X_PROJECTION_PLUS_FACE"),
        }
    }
}
