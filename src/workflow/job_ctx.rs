//! 职位处理上下文
//!
//! 封装"我正在处理批次中的第几个职位"这一信息

use std::fmt::Display;

/// 职位处理上下文
#[derive(Debug, Clone)]
pub struct JobCtx {
    /// 在批次中的序号（从1开始，仅用于日志显示）
    pub index: usize,

    /// 批次总数
    pub total: usize,

    /// 目标页面
    pub url: String,

    /// 与结果日志中 job_id 列一致
    pub job_id: String,
}

impl JobCtx {
    pub fn new(index: usize, total: usize, url: impl Into<String>, job_id: impl Into<String>) -> Self {
        Self {
            index,
            total,
            url: url.into(),
            job_id: job_id.into(),
        }
    }
}

impl Display for JobCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[职位 {}/{} #{}]", self.index, self.total, self.job_id)
    }
}
