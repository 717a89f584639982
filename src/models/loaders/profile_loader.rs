use std::path::Path;

use tokio::fs;
use tracing::info;

use crate::error::ConfigError;
use crate::models::profile::{Profile, RawProfile};

/// 读取并校验个人资料
///
/// 按扩展名选择格式：`.json` 用 JSON，其余按 TOML 解析。
/// 缺少必填字段是致命错误，必须在处理任何 URL 之前抛出。
pub async fn load_profile(path: &Path, base_dir: &Path) -> Result<Profile, ConfigError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::ProfileReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

    let raw = parse_profile(&content, path)?;
    let profile = Profile::validate(raw, path, base_dir)?;

    info!(
        "✓ 已加载个人资料: {} (简历: {})",
        profile.full_name(),
        profile.resume_path.display()
    );
    Ok(profile)
}

/// 解析资料文本
pub fn parse_profile(content: &str, path: &Path) -> Result<RawProfile, ConfigError> {
    let is_json = path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let parsed = if is_json {
        serde_json::from_str(content).map_err(|e| e.to_string())
    } else {
        toml::from_str(content).map_err(|e| e.to_string())
    };

    parsed.map_err(|message| ConfigError::ProfileParseFailed {
        path: path.to_path_buf(),
        message,
    })
}
