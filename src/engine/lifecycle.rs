// ==========================================
// 遮阳篷成本核算系统 - 成本单生命周期
// ==========================================
// 状态机:
//   ACTIVE --Trash(ESTIMATOR+)--> TRASHED
//   TRASHED --Restore(ADMIN)--> ACTIVE
//   TRASHED --Purge(ADMIN)--> (永久删除)
//   ACTIVE --Edit/SetOutcome(ESTIMATOR+)--> ACTIVE
// 红线: 非法转换与越权操作一律返回错误,不做静默处理
// ==========================================

use crate::domain::cost_sheet::CostSheetRecord;
use crate::domain::types::{Actor, RecordState, Role};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 生命周期动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleAction {
    Edit,
    SetOutcome,
    Trash,
    Restore,
    Purge,
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleAction::Edit => write!(f, "EDIT"),
            LifecycleAction::SetOutcome => write!(f, "SET_OUTCOME"),
            LifecycleAction::Trash => write!(f, "TRASH"),
            LifecycleAction::Restore => write!(f, "RESTORE"),
            LifecycleAction::Purge => write!(f, "PURGE"),
        }
    }
}

/// 转换结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// 进入 (或保持) 指定状态
    To(RecordState),
    /// 记录需从存储中永久移除
    Purged,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("权限不足: actor={actor}, role={role}, action={action}, required={required}")]
    PermissionDenied {
        actor: String,
        role: Role,
        action: LifecycleAction,
        required: Role,
    },

    #[error("无效的状态转换: action={action}, from={from}")]
    InvalidTransition {
        action: LifecycleAction,
        from: RecordState,
    },
}

// ==========================================
// RecordLifecycle - 生命周期守卫
// ==========================================
pub struct RecordLifecycle;

impl RecordLifecycle {
    /// 动作所需最低角色
    pub fn required_role(action: LifecycleAction) -> Role {
        match action {
            LifecycleAction::Edit | LifecycleAction::SetOutcome | LifecycleAction::Trash => {
                Role::Estimator
            }
            LifecycleAction::Restore | LifecycleAction::Purge => Role::Admin,
        }
    }

    /// 校验并返回目标状态 (不修改记录)
    pub fn check(
        state: RecordState,
        action: LifecycleAction,
        actor: &Actor,
    ) -> Result<Transition, LifecycleError> {
        let required = Self::required_role(action);
        if !actor.role.at_least(required) {
            return Err(LifecycleError::PermissionDenied {
                actor: actor.name.clone(),
                role: actor.role,
                action,
                required,
            });
        }

        match (state, action) {
            (RecordState::Active, LifecycleAction::Edit)
            | (RecordState::Active, LifecycleAction::SetOutcome) => {
                Ok(Transition::To(RecordState::Active))
            }
            (RecordState::Active, LifecycleAction::Trash) => Ok(Transition::To(RecordState::Trashed)),
            (RecordState::Trashed, LifecycleAction::Restore) => {
                Ok(Transition::To(RecordState::Active))
            }
            (RecordState::Trashed, LifecycleAction::Purge) => Ok(Transition::Purged),
            (from, action) => Err(LifecycleError::InvalidTransition { action, from }),
        }
    }

    /// 校验并应用到记录 (更新状态、删除人、删除时间、修改人)
    pub fn apply(
        record: &mut CostSheetRecord,
        action: LifecycleAction,
        actor: &Actor,
        now: NaiveDateTime,
    ) -> Result<Transition, LifecycleError> {
        let transition = Self::check(record.state, action, actor)?;

        match (action, transition) {
            (LifecycleAction::Trash, Transition::To(state)) => {
                record.state = state;
                record.deleted_at = Some(now);
                record.deleted_by = Some(actor.name.clone());
            }
            (LifecycleAction::Restore, Transition::To(state)) => {
                record.state = state;
                record.deleted_at = None;
                record.deleted_by = None;
            }
            _ => {}
        }

        if transition != Transition::Purged {
            record.updated_at = now;
            record.updated_by = actor.name.clone();
        }

        tracing::info!(
            cost_sheet_id = %record.id,
            action = %action,
            actor = %actor.name,
            state = %record.state,
            "成本单生命周期转换"
        );

        Ok(transition)
    }
}
