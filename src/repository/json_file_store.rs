// ==========================================
// 遮阳篷成本核算系统 - 本地 JSON 文件存储
// ==========================================
// 职责: 数据库不可用时的本地镜像 (整文件读写)
// 约束: 写入先落临时文件再 rename,避免写坏原文件
// ==========================================

use crate::domain::cost_sheet::CostSheetRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::store::CostSheetStore;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

pub struct JsonFileStore {
    path: PathBuf,
    // 串行化同一进程内的读-改-写
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取全部记录,文件不存在视为空
    fn read_all(&self) -> RepositoryResult<Vec<CostSheetRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_all(&self, records: &[CostSheetRecord]) -> RepositoryResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let body = serde_json::to_string_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl CostSheetStore for JsonFileStore {
    fn backend_name(&self) -> &'static str {
        "json_file"
    }

    fn insert(&self, record: &CostSheetRecord) -> RepositoryResult<()> {
        let _guard = self.lock()?;
        let mut records = self.read_all()?;
        if records.iter().any(|r| r.id == record.id) {
            return Err(RepositoryError::UniqueConstraintViolation(format!(
                "cost_sheet.id={}",
                record.id
            )));
        }
        records.push(record.clone());
        self.write_all(&records)
    }

    fn update(&self, record: &CostSheetRecord) -> RepositoryResult<()> {
        let _guard = self.lock()?;
        let mut records = self.read_all()?;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => *slot = record.clone(),
            None => {
                return Err(RepositoryError::NotFound {
                    entity: "CostSheet".to_string(),
                    id: record.id.clone(),
                })
            }
        }
        self.write_all(&records)
    }

    fn find_by_id(&self, id: &str) -> RepositoryResult<Option<CostSheetRecord>> {
        let _guard = self.lock()?;
        Ok(self.read_all()?.into_iter().find(|r| r.id == id))
    }

    fn list(&self, include_trashed: bool) -> RepositoryResult<Vec<CostSheetRecord>> {
        let _guard = self.lock()?;
        let mut records: Vec<CostSheetRecord> = self
            .read_all()?
            .into_iter()
            .filter(|r| include_trashed || r.is_active())
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    fn delete_permanently(&self, id: &str) -> RepositoryResult<bool> {
        let _guard = self.lock()?;
        let mut records = self.read_all()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.write_all(&records)?;
        Ok(true)
    }
}
