use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// 个人资料文件的原始形态（所有字段都可能缺失）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub resume_file_path: Option<String>,
    pub phone: Option<String>,
    pub personal_url: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    pub gender: Option<String>,
    pub location: Option<String>,
    pub tax_residence: Option<String>,
    pub notice_period: Option<String>,
    pub salary: Option<String>,
    pub referred_by: Option<String>,
}

/// 操作者的个人资料
///
/// 批次开始时加载一次，整个批次内只读。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// 已解析为绝对路径且文件存在
    pub resume_path: PathBuf,
    pub phone: Option<String>,
    pub personal_url: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    pub gender: Option<String>,
    pub location: Option<String>,
    pub tax_residence: Option<String>,
    pub notice_period: Option<String>,
    pub salary: Option<String>,
    pub referred_by: Option<String>,
}

impl Profile {
    /// 校验必填字段并解析简历路径
    ///
    /// # 参数
    /// - `raw`: 原始资料
    /// - `source`: 资料文件路径（仅用于错误信息）
    /// - `base_dir`: 简历相对路径的基准目录
    pub fn validate(raw: RawProfile, source: &Path, base_dir: &Path) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let first_name = required(raw.first_name, "firstName", &mut missing);
        let last_name = required(raw.last_name, "lastName", &mut missing);
        let email = required(raw.email, "email", &mut missing);
        let resume = required(raw.resume_file_path, "resumeFilePath", &mut missing);

        if !missing.is_empty() {
            return Err(ConfigError::MissingProfileKeys {
                path: source.to_path_buf(),
                keys: missing,
            });
        }

        let resume_path = resolve_resume(&resume, base_dir)?;

        Ok(Self {
            first_name,
            last_name,
            email,
            resume_path,
            phone: optional(raw.phone),
            personal_url: optional(raw.personal_url),
            linkedin: optional(raw.linkedin),
            github: optional(raw.github),
            website: optional(raw.website),
            gender: optional(raw.gender),
            location: optional(raw.location),
            tax_residence: optional(raw.tax_residence),
            notice_period: optional(raw.notice_period),
            salary: optional(raw.salary),
            referred_by: optional(raw.referred_by),
        })
    }

    /// "名 姓"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// 个人主页：优先 personalUrl，其次 website
    pub fn homepage(&self) -> Option<&str> {
        self.personal_url.as_deref().or(self.website.as_deref())
    }
}

fn required(value: Option<String>, key: &'static str, missing: &mut Vec<&'static str>) -> String {
    match optional(value) {
        Some(v) => v,
        None => {
            missing.push(key);
            String::new()
        }
    }
}

/// 空白字符串视为缺失
fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn resolve_resume(resume: &str, base_dir: &Path) -> Result<PathBuf, ConfigError> {
    let candidate = Path::new(resume);
    let joined = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base_dir.join(candidate)
    };
    joined
        .canonicalize()
        .ok()
        .filter(|p| p.is_file())
        .ok_or(ConfigError::ResumeNotFound { path: joined })
}
