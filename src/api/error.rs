// ==========================================
// 遮阳篷成本核算系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,转换Repository/生命周期错误为用户可读的错误消息
// ==========================================

use crate::domain::types::{Actor, RecordState, Role};
use crate::engine::lifecycle::LifecycleError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("权限不足: actor={actor}, role={role}, required={required}, action={action}")]
    PermissionDenied {
        actor: String,
        role: Role,
        required: Role,
        action: String,
    },

    #[error("无效的状态转换: action={action}, from={from}")]
    InvalidStateTransition { action: String, from: RecordState },

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("存储错误: {0}")]
    StorageError(String),

    // ==========================================
    // 导出错误
    // ==========================================
    #[error("导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::StorageIo(msg) => ApiError::StorageError(msg),
            RepositoryError::SerializationError(msg) => ApiError::StorageError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 LifecycleError 转换
// ==========================================
impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::PermissionDenied {
                actor,
                role,
                action,
                required,
            } => ApiError::PermissionDenied {
                actor,
                role,
                required,
                action: action.to_string(),
            },
            LifecycleError::InvalidTransition { action, from } => {
                ApiError::InvalidStateTransition {
                    action: action.to_string(),
                    from,
                }
            }
        }
    }
}

impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

/// 角色校验 (非生命周期动作,如保存配置、新建成本单)
pub fn require_role(actor: &Actor, required: Role, action: &str) -> ApiResult<()> {
    if actor.role.at_least(required) {
        Ok(())
    } else {
        Err(ApiError::PermissionDenied {
            actor: actor.name.clone(),
            role: actor.role,
            required,
            action: action.to_string(),
        })
    }
}
