//! 自动化驱动边界 - 基础设施层
//!
//! 核心逻辑只通过 `FormPage` 与浏览器交互：
//! - 用声明式 `Query` 查找零个或多个元素
//! - 读取可见性与控件类型
//! - 写入值 / 选项 / 勾选状态 / 文件
//! - 等待标签页关闭
//!
//! chromiumoxide 的实现见 `cdp_page`，测试中使用内存实现。

use std::fmt;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// 页面上一个元素的不透明句柄
///
/// 句柄只在同一次页面加载内有效。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(pub String);

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 无障碍角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Textbox,
    Combobox,
    Radio,
    Group,
    Button,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Textbox => "textbox",
            Role::Combobox => "combobox",
            Role::Radio => "radio",
            Role::Group => "group",
            Role::Button => "button",
        }
    }
}

/// 属性匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrMatch {
    /// 子串（不区分大小写）
    Contains,
    /// 全等（不区分大小写）
    Equals,
}

/// 结构化模式：在 name / id / placeholder / autocomplete 等属性上做匹配
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrPattern {
    pub attr: &'static str,
    pub needle: &'static str,
    pub op: AttrMatch,
}

impl AttrPattern {
    pub const fn contains(attr: &'static str, needle: &'static str) -> Self {
        Self {
            attr,
            needle,
            op: AttrMatch::Contains,
        }
    }

    pub const fn equals(attr: &'static str, needle: &'static str) -> Self {
        Self {
            attr,
            needle,
            op: AttrMatch::Equals,
        }
    }

    /// 判断属性值是否匹配（不区分大小写）
    pub fn matches(&self, value: &str) -> bool {
        let value = value.to_lowercase();
        let needle = self.needle.to_lowercase();
        match self.op {
            AttrMatch::Contains => value.contains(&needle),
            AttrMatch::Equals => value == needle,
        }
    }
}

/// 控件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    /// 普通文本输入 / textarea
    Text,
    /// 原生 `<select>`
    Select,
    /// 自定义下拉（role=combobox 的输入框等）
    Combobox,
    Radio,
    Checkbox,
    File,
    /// `input[type=submit]`
    Submit,
    Button,
    Other,
}

impl ControlKind {
    /// 像下拉框一样的控件，只能逐字输入
    pub fn is_dropdown(self) -> bool {
        matches!(self, ControlKind::Select | ControlKind::Combobox)
    }

    /// 可以写入文本或选项的控件
    pub fn accepts_text(self) -> bool {
        matches!(self, ControlKind::Text | ControlKind::Select | ControlKind::Combobox)
    }
}

/// 声明式查询
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// 结构化属性匹配
    Attr(AttrPattern),
    /// 可访问标签 / `<label>` 文本
    Label { text: String, exact: bool },
    /// 可访问角色 + 名称
    Role { role: Role, name: String, exact: bool },
    /// 包含指定文本的容器内的输入控件
    NearText(String),
    /// 指定类型的全部控件
    Kind(ControlKind),
}

impl Query {
    pub fn label(text: impl Into<String>) -> Self {
        Query::Label {
            text: text.into(),
            exact: false,
        }
    }

    pub fn role(role: Role, name: impl Into<String>) -> Self {
        Query::Role {
            role,
            name: name.into(),
            exact: false,
        }
    }

    pub fn exact_role(role: Role, name: impl Into<String>) -> Self {
        Query::Role {
            role,
            name: name.into(),
            exact: true,
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Attr(p) => write!(f, "attr[{} {:?} '{}']", p.attr, p.op, p.needle),
            Query::Label { text, exact } => write!(f, "label('{}', exact={})", text, exact),
            Query::Role { role, name, exact } => {
                write!(f, "role({}, '{}', exact={})", role.as_str(), name, exact)
            }
            Query::NearText(text) => write!(f, "near_text('{}')", text),
            Query::Kind(kind) => write!(f, "kind({:?})", kind),
        }
    }
}

/// 元数据提取所需的页面原始信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageSnapshot {
    pub url: String,
    pub og_title: Option<String>,
    pub twitter_title: Option<String>,
    pub first_heading: Option<String>,
    pub document_title: Option<String>,
    pub og_site_name: Option<String>,
    /// 所有 `<script type="application/ld+json">` 的原文
    pub ld_json: Vec<String>,
}

/// 自动化驱动能力
///
/// 每个方法都是一个挂起点；调用方保证同一时间只有一个操作在进行。
/// “没找到”通过空 Vec / false 表达，`Err` 只用于驱动本身的异常。
#[allow(async_fn_in_trait)]
pub trait FormPage {
    /// 确保存在一个可用的标签页（人工关闭后重新打开）
    async fn ensure_open(&self) -> Result<()>;

    /// 导航到 URL，等待 DOMContentLoaded
    async fn navigate(&self, url: &str) -> Result<()>;

    /// 在整个页面中查找
    async fn query(&self, query: &Query) -> Result<Vec<ElementHandle>>;

    /// 在某个元素内部查找
    async fn query_within(&self, scope: &ElementHandle, query: &Query) -> Result<Vec<ElementHandle>>;

    async fn is_visible(&self, element: &ElementHandle) -> Result<bool>;

    async fn control_kind(&self, element: &ElementHandle) -> Result<ControlKind>;

    /// 直接赋值并派发 input / change 事件
    async fn set_value(&self, element: &ElementHandle, value: &str) -> Result<()>;

    /// 聚焦后逐字输入
    async fn type_text(&self, element: &ElementHandle, text: &str) -> Result<()>;

    /// 按可见文本选择选项，返回是否找到该选项
    async fn select_by_label(&self, element: &ElementHandle, label: &str) -> Result<bool>;

    /// 按 value 选择选项，返回是否找到该选项
    async fn select_by_value(&self, element: &ElementHandle, value: &str) -> Result<bool>;

    async fn set_checked(&self, element: &ElementHandle) -> Result<()>;

    async fn set_files(&self, element: &ElementHandle, path: &Path) -> Result<()>;

    async fn click(&self, element: &ElementHandle) -> Result<()>;

    /// input / select / textarea 的数量
    async fn control_count(&self) -> Result<usize>;

    async fn snapshot(&self) -> Result<PageSnapshot>;

    /// 在页面上显示给操作者的提示
    async fn show_notice(&self, message: &str) -> Result<()>;

    /// 等待标签页被关闭；`None` 表示不设超时。超时返回 `Ok(false)`
    async fn wait_for_close(&self, timeout: Option<Duration>) -> Result<bool>;
}
