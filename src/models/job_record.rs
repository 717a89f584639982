use std::fmt;
use std::path::Path;

use chrono::{DateTime, Local, SecondsFormat};
use sha2::{Digest, Sha256};

/// 单个 URL 的处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    /// 表单已填写，等待人工（瞬时状态，记录前会被覆盖）
    Filled,
    /// 人工审核后关闭了标签页
    Submitted,
    /// 自动点击了提交按钮
    Clicked,
    /// 没有可点击的提交按钮，或自动提交关闭
    Skipped,
    /// 处理过程中出现未处理的错误
    Error,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Filled => "filled",
            JobStatus::Submitted => "submitted",
            JobStatus::Clicked => "clicked",
            JobStatus::Skipped => "skipped",
            JobStatus::Error => "error",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一个 URL 的处理记录
///
/// 开始处理时以 `error` 创建，处理中原地更新，结束时写入一次后丢弃。
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub url: String,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    pub status: JobStatus,
    pub company: String,
    pub job_title: String,
    pub source: String,
    pub resume_used: String,
    pub notes: String,
    pub job_id: String,
}

impl JobRecord {
    pub fn start(url: &str, resume: &Path) -> Self {
        Self::start_at(url, resume, Local::now())
    }

    pub fn start_at(url: &str, resume: &Path, started_at: DateTime<Local>) -> Self {
        Self {
            url: url.to_string(),
            job_id: job_id(url, &started_at),
            started_at,
            finished_at: None,
            status: JobStatus::Error,
            company: String::new(),
            job_title: String::new(),
            source: String::new(),
            resume_used: resume.display().to_string(),
            notes: String::new(),
        }
    }

    /// 记录失败原因
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = JobStatus::Error;
        self.notes = message.into();
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Local::now());
    }

    /// 耗时（毫秒），未结束时为 0
    pub fn elapsed_ms(&self) -> i64 {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds())
            .unwrap_or(0)
    }

    /// CSV 行的各列，顺序与表头一致
    pub fn to_row(&self) -> Vec<String> {
        vec![
            crate::services::outcome_recorder::FORMAT_VERSION.to_string(),
            timestamp(&self.started_at),
            self.finished_at.as_ref().map(timestamp).unwrap_or_default(),
            self.status.to_string(),
            self.company.clone(),
            self.job_title.clone(),
            self.source.clone(),
            self.url.clone(),
            self.resume_used.clone(),
            self.notes.clone(),
            self.job_id.clone(),
        ]
    }
}

fn timestamp(t: &DateTime<Local>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, false)
}

/// URL + 开始时间的短指纹，仅用于和控制台日志对照
pub fn job_id(url: &str, started_at: &DateTime<Local>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hasher.update(b"|");
    hasher.update(started_at.timestamp_millis().to_be_bytes());
    hasher
        .finalize()
        .iter()
        .take(5)
        .map(|b| format!("{:02x}", b))
        .collect()
}
