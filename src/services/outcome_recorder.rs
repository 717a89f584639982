//! 结果日志 - 业务能力层
//!
//! 每个 URL 结束时向 CSV 追加一行。文件在每次写入时打开、写完即关闭，
//! 进程中途退出也不会丢失已经写入的行。

use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::RecordError;
use crate::models::JobRecord;
use crate::utils::csv::{format_row, parse_rows};

/// 日志格式版本（第一列）
pub const FORMAT_VERSION: &str = "1";

/// 表头
pub const HEADER: [&str; 11] = [
    "version",
    "timestamp_start",
    "timestamp_end",
    "status",
    "company",
    "job_title",
    "source",
    "url",
    "resume_used",
    "notes",
    "job_id",
];

/// 结果日志写入器
#[derive(Debug, Clone)]
pub struct OutcomeRecorder {
    path: PathBuf,
}

impl OutcomeRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 文件不存在或为空时写入表头；已有内容时什么都不做
    pub async fn ensure_header(&self) -> Result<(), RecordError> {
        let has_content = match fs::metadata(&self.path).await {
            Ok(meta) => meta.len() > 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(RecordError::write_failed(&self.path, e)),
        };
        if has_content {
            debug!("结果日志已存在: {}", self.path.display());
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| RecordError::write_failed(&self.path, e))?;
        }
        self.append_line(&format_row(&HEADER)).await?;
        info!("📝 已创建结果日志: {}", self.path.display());
        Ok(())
    }

    /// 追加一条记录
    pub async fn append(&self, record: &JobRecord) -> Result<(), RecordError> {
        self.ensure_header().await?;
        self.append_line(&format_row(&record.to_row())).await?;
        debug!("已记录 {} → {}", record.job_id, record.status);
        Ok(())
    }

    /// 读回全部数据行（不含表头）
    pub async fn read_all(&self) -> Result<Vec<Vec<String>>, RecordError> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(RecordError::ReadFailed {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        let mut rows = parse_rows(&text);
        if rows.first().is_some_and(|first| first.first().map(String::as_str) == Some(HEADER[0])) {
            rows.remove(0);
        }
        Ok(rows)
    }

    async fn append_line(&self, line: &str) -> Result<(), RecordError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| RecordError::write_failed(&self.path, e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| RecordError::write_failed(&self.path, e))?;
        file.flush()
            .await
            .map_err(|e| RecordError::write_failed(&self.path, e))
    }
}
