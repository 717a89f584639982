//! 页面元数据提取 - 业务能力层
//!
//! 从页面标记中推断职位名称、公司和招聘平台，只用于日志和审计。

use serde_json::Value as JsonValue;
use tracing::{debug, warn};
use url::Url;

use crate::infrastructure::driver::{FormPage, PageSnapshot};

/// 标题最多保留的字符数
pub const MAX_TITLE_CHARS: usize = 160;

/// 平台识别表：主机名包含左侧子串即归为右侧平台，第一个命中的生效
const SOURCE_TABLE: &[(&str, &str)] = &[
    ("greenhouse.io", "Greenhouse"),
    ("lever.co", "Lever"),
    ("myworkdayjobs", "Workday"),
    ("personio", "Personio"),
    ("join.com", "Personio"),
    ("smartrecruiters", "SmartRecruiters"),
    ("linkedin.com", "LinkedIn"),
];

/// 平台未知时的标记
pub const OTHER_SOURCE: &str = "Other";

/// 页面元数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub company: String,
    pub title: String,
    pub source: String,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            company: String::new(),
            title: String::new(),
            source: OTHER_SOURCE.to_string(),
        }
    }
}

/// 提取页面元数据，任何失败都返回默认值
pub async fn extract_meta<P: FormPage>(page: &P) -> PageMeta {
    match page.snapshot().await {
        Ok(snapshot) => {
            let meta = meta_from_snapshot(&snapshot);
            debug!(
                "元数据: 公司='{}' 职位='{}' 平台={}",
                meta.company, meta.title, meta.source
            );
            meta
        }
        Err(e) => {
            warn!("读取页面元数据失败: {:#}", e);
            PageMeta::default()
        }
    }
}

/// 从页面快照推断元数据
pub fn meta_from_snapshot(snapshot: &PageSnapshot) -> PageMeta {
    let host = Url::parse(&snapshot.url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_default();

    let title = [
        &snapshot.og_title,
        &snapshot.twitter_title,
        &snapshot.first_heading,
        &snapshot.document_title,
    ]
    .into_iter()
    .flatten()
    .map(|t| clean_text(t))
    .find(|t| !t.is_empty())
    .map(|t| truncate_chars(&t, MAX_TITLE_CHARS))
    .unwrap_or_default();

    let company = snapshot
        .ld_json
        .iter()
        .find_map(|raw| hiring_organization(raw))
        .or_else(|| {
            snapshot
                .og_site_name
                .as_deref()
                .map(clean_text)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_else(|| host.strip_prefix("www.").unwrap_or(&host).to_string());

    PageMeta {
        company,
        title,
        source: classify_source(&host).to_string(),
    }
}

/// 按主机名识别招聘平台
pub fn classify_source(host: &str) -> &'static str {
    let host = host.to_lowercase();
    SOURCE_TABLE
        .iter()
        .find(|(needle, _)| host.contains(needle))
        .map(|(_, name)| *name)
        .unwrap_or(OTHER_SOURCE)
}

/// 从 JSON-LD 中读取 JobPosting 的招聘方名称
fn hiring_organization(raw: &str) -> Option<String> {
    let value: JsonValue = serde_json::from_str(raw.trim()).ok()?;
    find_job_posting(&value)
        .and_then(|posting| posting.get("hiringOrganization"))
        .and_then(|org| match org {
            JsonValue::String(name) => Some(name.as_str()),
            other => other.get("name").and_then(JsonValue::as_str),
        })
        .map(clean_text)
        .filter(|name| !name.is_empty())
}

/// 在顶层对象、数组或 @graph 中查找 JobPosting
fn find_job_posting(value: &JsonValue) -> Option<&JsonValue> {
    match value {
        JsonValue::Array(items) => items.iter().find_map(find_job_posting),
        JsonValue::Object(map) => {
            if is_job_posting(map.get("@type")) {
                return Some(value);
            }
            map.get("@graph").and_then(find_job_posting)
        }
        _ => None,
    }
}

fn is_job_posting(kind: Option<&JsonValue>) -> bool {
    match kind {
        Some(JsonValue::String(s)) => s == "JobPosting",
        Some(JsonValue::Array(kinds)) => kinds.iter().any(|k| k.as_str() == Some("JobPosting")),
        _ => false,
    }
}

/// 合并空白
fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
