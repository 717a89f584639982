use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;
use url::Url;

use crate::error::ConfigError;

/// 从文本文件读取 URL 列表（每行一个，忽略空行和 # 注释）
pub async fn load_urls_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取 URL 列表: {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// 批次开始前校验：非空，且每个 URL 都是绝对的 http(s) 地址
pub fn validate_urls(urls: &[String]) -> Result<(), ConfigError> {
    if urls.is_empty() {
        return Err(ConfigError::EmptyBatch);
    }
    for raw in urls {
        let parsed = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: raw.clone(),
                reason: format!("不支持的协议 {}", parsed.scheme()),
            });
        }
    }
    Ok(())
}
