// ==========================================
// 遮阳篷成本核算系统 - 成本单 API
// ==========================================
// 职责: 新建草稿、预览 (含护栏)、保存、修改、标记中标/落标
// 红线: 所有写入必须记录 ActionLog
// 红线: 新草稿取当前配置默认值,已保存记录不随配置变化
// ==========================================

use crate::api::error::{require_role, ApiError, ApiResult};
use crate::config::handle::ConfigHandle;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::cost_sheet::{CostRollup, CostSheetHeader, CostSheetInput, CostSheetRecord};
use crate::domain::line_item::{DriveTimeLine, HotelLine, LaborLine, LineItem, MileageLine};
use crate::domain::stats::GuardrailReport;
use crate::domain::types::{Actor, LaborPhase, Outcome, RecordState, Role};
use crate::engine::guardrail::GuardrailClassifier;
use crate::engine::historical::{category_key, HistoricalAggregator};
use crate::engine::lifecycle::{LifecycleAction, RecordLifecycle};
use crate::engine::rollup::CostRollupEngine;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::store::CostSheetStore;
use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 预览结果: 汇总 + 对比历史的护栏
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatePreview {
    pub rollup: CostRollup,
    pub guardrail: GuardrailReport,
    /// 品类是否在管理配置的品类列表中
    pub category_known: bool,
}

// ==========================================
// EstimateApi - 成本单 API
// ==========================================
pub struct EstimateApi {
    store: Arc<dyn CostSheetStore>,
    action_log_repo: Arc<ActionLogRepository>,
    config: Arc<ConfigHandle>,
    engine: CostRollupEngine,
}

impl EstimateApi {
    pub fn new(
        store: Arc<dyn CostSheetStore>,
        action_log_repo: Arc<ActionLogRepository>,
        config: Arc<ConfigHandle>,
    ) -> Self {
        Self {
            store,
            action_log_repo,
            config,
            engine: CostRollupEngine::new(),
        }
    }

    // ==========================================
    // 草稿
    // ==========================================

    /// 新建草稿,费率取当前配置默认值
    pub fn new_draft(&self, actor: &Actor) -> CostSheetInput {
        let cfg = self.config.current();
        CostSheetInput {
            header: CostSheetHeader {
                estimate_date: Some(Local::now().date_naive()),
                estimator: Some(actor.name.clone()),
                ..Default::default()
            },
            markup_rate: cfg.defaults.markup_rate,
            sales_tax_rate: cfg.defaults.sales_tax_rate,
            sq_ft_formula: cfg.defaults.sq_ft_formula,
            ..Default::default()
        }
    }

    /// 人工行模板 (时薪按工种预设)
    pub fn labor_line(&self, phase: LaborPhase, labor_type: Option<&str>) -> LineItem {
        let cfg = self.config.current();
        LineItem::Labor(LaborLine {
            phase,
            labor_type: labor_type.map(|s| s.to_string()),
            hourly_rate: cfg.labor_rate_for(labor_type),
            ..Default::default()
        })
    }

    pub fn drive_time_line(&self) -> LineItem {
        LineItem::DriveTime(DriveTimeLine {
            hourly_rate: self.config.current().defaults.drive_rate,
            ..Default::default()
        })
    }

    pub fn mileage_line(&self) -> LineItem {
        LineItem::Mileage(MileageLine {
            rate_per_mile: self.config.current().defaults.mileage_rate,
            ..Default::default()
        })
    }

    pub fn hotel_line(&self) -> LineItem {
        LineItem::Hotel(HotelLine {
            rate_per_night: self.config.current().defaults.hotel_rate,
            ..Default::default()
        })
    }

    // ==========================================
    // 计算
    // ==========================================

    /// 只计算不保存
    pub fn compute(&self, input: &CostSheetInput) -> CostRollup {
        self.engine.compute(input)
    }

    /// 计算并与同品类历史对比
    pub fn preview(&self, input: &CostSheetInput) -> ApiResult<EstimatePreview> {
        let rollup = self.engine.compute(input);
        let guardrail = self.guardrail_for(input, &rollup, None)?;
        Ok(EstimatePreview {
            rollup,
            guardrail,
            category_known: self.category_known(input),
        })
    }

    /// 品类未配置时只告警,仍允许保存 (历史统计按原文品类归组)
    fn category_known(&self, input: &CostSheetInput) -> bool {
        let category = &input.header.category;
        let known = self.config.current().has_category(category);
        if !known {
            tracing::warn!(category = %category, "品类不在配置列表中");
        }
        known
    }

    /// 护栏判定,`exclude_id` 用于修改已有记录时排除自身
    fn guardrail_for(
        &self,
        input: &CostSheetInput,
        rollup: &CostRollup,
        exclude_id: Option<&str>,
    ) -> ApiResult<GuardrailReport> {
        let cfg = self.config.current();
        let history: Vec<CostSheetRecord> = self
            .store
            .list(false)?
            .into_iter()
            .filter(|r| Some(r.id.as_str()) != exclude_id)
            .collect();

        let category = category_key(&input.header.category);
        let stats = HistoricalAggregator::new(cfg.defaults.won_weight).compute_for(&category, &history);
        let classifier = GuardrailClassifier::new(cfg.defaults.guardrail_tolerance);
        Ok(classifier.report(&category, rollup, stats.as_ref()))
    }

    // ==========================================
    // 写入
    // ==========================================

    /// 保存新成本单
    pub fn save(&self, input: CostSheetInput, actor: &Actor) -> ApiResult<CostSheetRecord> {
        require_role(actor, Role::Estimator, "CREATE")?;

        self.category_known(&input);
        let rollup = self.engine.compute(&input);
        let now = Utc::now().naive_utc();
        let record = CostSheetRecord {
            id: uuid::Uuid::new_v4().to_string(),
            input,
            rollup,
            outcome: Outcome::Unknown,
            state: RecordState::Active,
            deleted_at: None,
            deleted_by: None,
            created_at: now,
            created_by: actor.name.clone(),
            updated_at: now,
            updated_by: actor.name.clone(),
        };

        self.store.insert(&record)?;

        tracing::info!(
            cost_sheet_id = %record.id,
            category = %record.category(),
            final_client_price = record.rollup.final_client_price,
            actor = %actor.name,
            "成本单已保存"
        );

        self.log_action(
            ActionType::CreateCostSheet,
            &record,
            actor,
            serde_json::json!({
                "category": record.category(),
                "final_client_price": record.rollup.final_client_price,
            }),
        );

        Ok(record)
    }

    /// 整单修改并重算
    pub fn update(
        &self,
        id: &str,
        input: CostSheetInput,
        actor: &Actor,
    ) -> ApiResult<CostSheetRecord> {
        let mut record = self.get(id)?;
        let previous_price = record.rollup.final_client_price;

        RecordLifecycle::apply(&mut record, LifecycleAction::Edit, actor, Utc::now().naive_utc())?;
        self.category_known(&input);
        record.rollup = self.engine.compute(&input);
        record.input = input;

        self.store.update(&record)?;

        self.log_action(
            ActionType::UpdateCostSheet,
            &record,
            actor,
            serde_json::json!({
                "previous_final_client_price": previous_price,
                "final_client_price": record.rollup.final_client_price,
            }),
        );

        Ok(record)
    }

    /// 预览已有记录的修改 (护栏排除自身)
    pub fn preview_update(&self, id: &str, input: &CostSheetInput) -> ApiResult<EstimatePreview> {
        let rollup = self.engine.compute(input);
        let guardrail = self.guardrail_for(input, &rollup, Some(id))?;
        Ok(EstimatePreview {
            rollup,
            guardrail,
            category_known: self.category_known(input),
        })
    }

    /// 标记中标/落标
    pub fn set_outcome(
        &self,
        id: &str,
        outcome: Outcome,
        actor: &Actor,
    ) -> ApiResult<CostSheetRecord> {
        let mut record = self.get(id)?;
        let previous = record.outcome;

        RecordLifecycle::apply(
            &mut record,
            LifecycleAction::SetOutcome,
            actor,
            Utc::now().naive_utc(),
        )?;
        record.outcome = outcome;

        self.store.update(&record)?;

        self.log_action(
            ActionType::SetOutcome,
            &record,
            actor,
            serde_json::json!({
                "from": previous.to_db_str(),
                "to": outcome.to_db_str(),
            }),
        );

        Ok(record)
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn get(&self, id: &str) -> ApiResult<CostSheetRecord> {
        self.store
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("CostSheet(id={})不存在", id)))
    }

    /// 成本单操作历史
    pub fn history(&self, id: &str) -> ApiResult<Vec<ActionLog>> {
        Ok(self.action_log_repo.find_by_cost_sheet(id)?)
    }

    fn log_action(
        &self,
        action_type: ActionType,
        record: &CostSheetRecord,
        actor: &Actor,
        payload: serde_json::Value,
    ) {
        let log = ActionLog::new(
            action_type,
            Some(&record.id),
            &actor.name,
            Some(payload),
            Some(format!(
                "{} / {} / {}",
                record.category(),
                record.input.header.customer,
                record.input.header.project
            )),
        );

        if let Err(e) = self.action_log_repo.insert(&log) {
            tracing::warn!("记录操作日志失败: {}", e);
        }
    }
}
