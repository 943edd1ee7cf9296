// ==========================================
// 遮阳篷成本核算系统 - 操作日志数据仓储
// ==========================================
// 对齐: action_log 表
// 红线: 所有写入必须记录
// ==========================================

mod core;
mod queries;

#[cfg(test)]
mod tests;

pub use core::ActionLogRepository;

/// action_ts 存储格式 (保留小数秒,保证同一秒内的先后顺序)
pub(crate) const ACTION_TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
