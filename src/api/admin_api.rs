// ==========================================
// 遮阳篷成本核算系统 - 管理 API
// ==========================================
// 职责: 管理配置读写、配置快照、回收站 (移入/恢复/列表/永久删除)
// 红线: 配置写入与恢复/永久删除仅限 ADMIN,所有写入记录 ActionLog
// ==========================================

use crate::api::error::{require_role, ApiError, ApiResult};
use crate::config::admin_config::AdminConfig;
use crate::config::handle::ConfigHandle;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::cost_sheet::CostSheetRecord;
use crate::domain::types::{Actor, Role};
use crate::engine::lifecycle::{LifecycleAction, RecordLifecycle, Transition};
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::store::CostSheetStore;
use chrono::Utc;
use std::sync::Arc;

// ==========================================
// AdminApi - 管理 API
// ==========================================
pub struct AdminApi {
    store: Arc<dyn CostSheetStore>,
    action_log_repo: Arc<ActionLogRepository>,
    config: Arc<ConfigHandle>,
}

impl AdminApi {
    pub fn new(
        store: Arc<dyn CostSheetStore>,
        action_log_repo: Arc<ActionLogRepository>,
        config: Arc<ConfigHandle>,
    ) -> Self {
        Self {
            store,
            action_log_repo,
            config,
        }
    }

    // ==========================================
    // 配置
    // ==========================================

    /// 读取当前配置
    pub fn load_settings(&self, actor: &Actor) -> ApiResult<AdminConfig> {
        require_role(actor, Role::Admin, "LOAD_SETTINGS")?;
        Ok((*self.config.current()).clone())
    }

    /// 保存配置并刷新进程内快照
    pub fn save_settings(&self, config: &AdminConfig, actor: &Actor) -> ApiResult<AdminConfig> {
        require_role(actor, Role::Admin, "SAVE_SETTINGS")?;

        if config.categories.iter().all(|c| c.trim().is_empty()) {
            return Err(ApiError::InvalidInput("至少需要一个品类".to_string()));
        }
        let rates = [
            ("sales_tax_rate", config.defaults.sales_tax_rate),
            ("markup_rate", config.defaults.markup_rate),
            ("labor_rate", config.defaults.labor_rate),
            ("drive_rate", config.defaults.drive_rate),
            ("mileage_rate", config.defaults.mileage_rate),
            ("hotel_rate", config.defaults.hotel_rate),
            ("guardrail_tolerance", config.defaults.guardrail_tolerance),
            ("won_weight", config.defaults.won_weight),
        ];
        if let Some((name, value)) = rates.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(ApiError::InvalidInput(format!(
                "默认费率非法: {}={}",
                name, value
            )));
        }

        let saved = self.config.save(config)?;

        // 凭据不写入日志
        self.log_action(
            ActionType::UpdateSettings,
            None,
            actor,
            Some(serde_json::json!({
                "categories": saved.categories.len(),
                "sales_reps": saved.sales_reps.len(),
                "defaults": saved.defaults,
            })),
        );

        Ok((*saved).clone())
    }

    /// 配置快照 (不含凭据)
    pub fn settings_snapshot(&self, actor: &Actor) -> ApiResult<String> {
        require_role(actor, Role::Admin, "SNAPSHOT_SETTINGS")?;
        Ok(self.config.manager().get_config_snapshot()?)
    }

    /// 从快照恢复配置
    pub fn restore_settings(&self, snapshot_json: &str, actor: &Actor) -> ApiResult<usize> {
        require_role(actor, Role::Admin, "RESTORE_SETTINGS")?;

        let count = self
            .config
            .manager()
            .restore_config_from_snapshot(snapshot_json)?;
        self.config.reload()?;

        self.log_action(
            ActionType::RestoreSettings,
            None,
            actor,
            Some(serde_json::json!({ "keys": count })),
        );
        Ok(count)
    }

    // ==========================================
    // 回收站
    // ==========================================

    /// 移入回收站 (ESTIMATOR+)
    pub fn trash(&self, id: &str, actor: &Actor) -> ApiResult<CostSheetRecord> {
        let mut record = self.find(id)?;
        RecordLifecycle::apply(&mut record, LifecycleAction::Trash, actor, Utc::now().naive_utc())?;
        self.store.update(&record)?;

        self.log_action(ActionType::Trash, Some(&record.id), actor, None);
        Ok(record)
    }

    /// 从回收站恢复 (ADMIN)
    pub fn restore(&self, id: &str, actor: &Actor) -> ApiResult<CostSheetRecord> {
        let mut record = self.find(id)?;
        RecordLifecycle::apply(
            &mut record,
            LifecycleAction::Restore,
            actor,
            Utc::now().naive_utc(),
        )?;
        self.store.update(&record)?;

        self.log_action(ActionType::Restore, Some(&record.id), actor, None);
        Ok(record)
    }

    /// 回收站列表 (删除时间倒序)
    pub fn list_trashed(&self, actor: &Actor) -> ApiResult<Vec<CostSheetRecord>> {
        require_role(actor, Role::Estimator, "LIST_TRASHED")?;
        let mut trashed: Vec<CostSheetRecord> = self
            .store
            .list(true)?
            .into_iter()
            .filter(|r| !r.is_active())
            .collect();
        trashed.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
        Ok(trashed)
    }

    /// 永久删除 (ADMIN,仅回收站中的记录)
    pub fn purge(&self, id: &str, actor: &Actor) -> ApiResult<()> {
        let mut record = self.find(id)?;
        let transition = RecordLifecycle::apply(
            &mut record,
            LifecycleAction::Purge,
            actor,
            Utc::now().naive_utc(),
        )?;
        debug_assert_eq!(transition, Transition::Purged);

        if !self.store.delete_permanently(id)? {
            return Err(ApiError::NotFound(format!("CostSheet(id={})不存在", id)));
        }

        // 日志保留客户/项目,记录本体已不存在
        self.log_action(
            ActionType::Purge,
            Some(id),
            actor,
            Some(serde_json::json!({
                "category": record.category(),
                "customer": record.input.header.customer,
                "project": record.input.header.project,
                "final_client_price": record.rollup.final_client_price,
            })),
        );
        Ok(())
    }

    fn find(&self, id: &str) -> ApiResult<CostSheetRecord> {
        self.store
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("CostSheet(id={})不存在", id)))
    }

    fn log_action(
        &self,
        action_type: ActionType,
        cost_sheet_id: Option<&str>,
        actor: &Actor,
        payload: Option<serde_json::Value>,
    ) {
        let log = ActionLog::new(action_type, cost_sheet_id, &actor.name, payload, None);
        if let Err(e) = self.action_log_repo.insert(&log) {
            tracing::warn!("记录操作日志失败: {}", e);
        }
    }
}
