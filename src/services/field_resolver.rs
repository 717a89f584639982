//! 字段解析服务 - 业务能力层
//!
//! 给定一个语义字段和一个值，在未知结构的页面上找到对应控件并写入。
//!
//! 查找是一串按顺序尝试的策略，第一个成功写入的策略胜出：
//! 1. 结构化属性（name / id / placeholder / autocomplete）
//! 2. 可访问标签 / `<label>` 文本
//! 3. 可访问角色名称（textbox / combobox）
//! 4. 附近文本（只用于通用字段）
//!
//! 单选和文件字段有各自的查找方式，见 `resolve_choice` / `resolve_file`。
//! 所有探测失败都被收敛为 `None` / `false`，不会向上抛出。

use std::fmt;
use std::path::Path;

use anyhow::Result;
use tracing::{debug, info, trace};

use crate::infrastructure::driver::{ControlKind, ElementHandle, FormPage, Query, Role};
use crate::services::registry::{labels_of, structural_patterns_of, FieldKind, SemanticField};

/// 查找策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Structural,
    Label,
    RoleName,
    NearbyText,
}

impl Strategy {
    /// 通用级联顺序
    pub const CASCADE: [Strategy; 4] = [
        Strategy::Structural,
        Strategy::Label,
        Strategy::RoleName,
        Strategy::NearbyText,
    ];

    /// 该策略为字段生成的有序查询；不适用时为空
    pub fn queries(self, field: SemanticField) -> Vec<Query> {
        let strict = field.is_strict();
        match self {
            Strategy::Structural => structural_patterns_of(field)
                .iter()
                .copied()
                .map(Query::Attr)
                .collect(),
            Strategy::Label => labels_of(field)
                .iter()
                .map(|label| Query::Label {
                    text: label.to_string(),
                    exact: strict,
                })
                .collect(),
            Strategy::RoleName => {
                let roles: &[Role] = match field.kind() {
                    FieldKind::Text => &[Role::Textbox, Role::Combobox],
                    FieldKind::Select => &[Role::Combobox, Role::Textbox],
                    FieldKind::Choice | FieldKind::File => &[],
                };
                labels_of(field)
                    .iter()
                    .flat_map(|label| {
                        roles.iter().map(move |role| Query::Role {
                            role: *role,
                            name: label.to_string(),
                            exact: strict,
                        })
                    })
                    .collect()
            }
            Strategy::NearbyText => {
                if field.allows_nearby_text() {
                    vec![Query::NearText(field.nearby_text())]
                } else {
                    Vec::new()
                }
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Structural => "结构化属性",
            Strategy::Label => "标签",
            Strategy::RoleName => "角色名称",
            Strategy::NearbyText => "附近文本",
        };
        f.write_str(name)
    }
}

/// 字段解析器
///
/// 无状态，可在整个批次内复用。
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldResolver;

impl FieldResolver {
    pub fn new() -> Self {
        Self
    }

    /// 查找并写入字段
    ///
    /// # 返回
    /// 是否成功写入；值为空时直接返回 false，不触碰页面
    pub async fn resolve<P: FormPage>(&self, page: &P, field: SemanticField, value: Option<&str>) -> bool {
        let Some(value) = non_empty(value) else {
            trace!("[{}] 没有可填写的值，跳过", field.id());
            return false;
        };

        let filled = match field.kind() {
            FieldKind::Text | FieldKind::Select => self.resolve_cascade(page, field, value).await,
            FieldKind::Choice => self.resolve_choice(page, field, value).await,
            FieldKind::File => self.resolve_file(page, field, Path::new(value)).await,
        };

        if filled {
            info!("  ✓ {} 已填写", field.id());
        } else {
            debug!("  · {} 未找到可填写的控件", field.id());
        }
        filled
    }

    /// 只查找、不写入：按级联顺序返回第一个可见的文本类候选
    pub async fn locate<P: FormPage>(&self, page: &P, field: SemanticField) -> Option<ElementHandle> {
        for strategy in [Strategy::Structural, Strategy::Label, Strategy::RoleName] {
            for query in strategy.queries(field) {
                if let Some(el) = try_match_writable(page, &query).await {
                    debug!("[{}] 定位: {} {} → {}", field.id(), strategy, query, el);
                    return Some(el);
                }
            }
        }
        None
    }

    /// 向已定位的控件写入
    pub async fn write_located<P: FormPage>(
        &self,
        page: &P,
        field: SemanticField,
        element: &ElementHandle,
        value: &str,
    ) -> bool {
        match self.write(page, field, element, value).await {
            Ok(()) => true,
            Err(e) => {
                debug!("[{}] 写入 {} 失败: {:#}", field.id(), element, e);
                false
            }
        }
    }

    async fn resolve_cascade<P: FormPage>(&self, page: &P, field: SemanticField, value: &str) -> bool {
        for strategy in Strategy::CASCADE {
            let queries = strategy.queries(field);
            if queries.is_empty() {
                continue;
            }
            debug!("[{}] 尝试策略: {}", field.id(), strategy);

            for query in queries {
                let Some(el) = try_match_writable(page, &query).await else {
                    trace!("[{}]   {} 未命中", field.id(), query);
                    continue;
                };
                debug!("[{}]   {} 命中 {}", field.id(), query, el);
                if self.write_located(page, field, &el, value).await {
                    return true;
                }
            }
        }
        false
    }

    /// 单选：先找带标签的单选组，组内找选项；找不到组时在全页搜索同名选项
    async fn resolve_choice<P: FormPage>(&self, page: &P, field: SemanticField, option: &str) -> bool {
        for label in labels_of(field) {
            let group_query = Query::role(Role::Group, *label);
            let Some(group) = try_match(page, &group_query, None).await else {
                trace!("[{}]   单选组 '{}' 未命中", field.id(), label);
                continue;
            };
            debug!("[{}]   单选组 '{}' 命中 {}", field.id(), label, group);

            let option_query = Query::exact_role(Role::Radio, option);
            if let Some(radio) = try_match_any(page, &option_query, Some(&group)).await {
                return self.write_located(page, field, &radio, option).await;
            }
            debug!("[{}]   组 {} 内没有选项 '{}'", field.id(), group, option);
        }

        // 全局兜底：可能选中另一个问题里同名的选项
        debug!("[{}] 未找到单选组，全页搜索选项 '{}'", field.id(), option);
        match try_match_any(page, &Query::exact_role(Role::Radio, option), None).await {
            Some(radio) => self.write_located(page, field, &radio, option).await,
            None => false,
        }
    }

    /// 文件：先按标签找文件输入框，否则取页面上第一个文件输入框
    ///
    /// 文件输入框常被隐藏在自定义按钮后面，所以这里不要求可见。
    async fn resolve_file<P: FormPage>(&self, page: &P, field: SemanticField, path: &Path) -> bool {
        let value = path.to_string_lossy();

        for label in labels_of(field) {
            let candidates = match page.query(&Query::label(*label)).await {
                Ok(found) => found,
                Err(e) => {
                    debug!("[{}]   查询 '{}' 出错: {:#}", field.id(), label, e);
                    continue;
                }
            };
            for el in candidates {
                if matches!(page.control_kind(&el).await, Ok(ControlKind::File)) {
                    debug!("[{}]   标签 '{}' 命中文件输入 {}", field.id(), label, el);
                    if self.write_located(page, field, &el, &value).await {
                        return true;
                    }
                }
            }
        }

        debug!("[{}] 使用页面上第一个文件输入框", field.id());
        match try_match_any(page, &Query::Kind(ControlKind::File), None).await {
            Some(el) => self.write_located(page, field, &el, &value).await,
            None => false,
        }
    }

    async fn write<P: FormPage>(&self, page: &P, field: SemanticField, el: &ElementHandle, value: &str) -> Result<()> {
        match field.kind() {
            FieldKind::Text => write_text(page, el, value).await,
            FieldKind::Select => write_select(page, el, value).await,
            FieldKind::Choice => page.set_checked(el).await,
            FieldKind::File => page.set_files(el, Path::new(value)).await,
        }
    }
}

/// 文本：直接赋值；实际是下拉框时改为逐字输入
async fn write_text<P: FormPage>(page: &P, el: &ElementHandle, value: &str) -> Result<()> {
    if page.control_kind(el).await?.is_dropdown() {
        trace!("  {} 是下拉控件，改为逐字输入", el);
        page.type_text(el, value).await
    } else {
        page.set_value(el, value).await
    }
}

/// 下拉：按可见文本 → 按 value → 逐字输入
async fn write_select<P: FormPage>(page: &P, el: &ElementHandle, value: &str) -> Result<()> {
    if page.control_kind(el).await? == ControlKind::Select {
        if page.select_by_label(el, value).await? {
            trace!("  {} 按可见文本选择 '{}'", el, value);
            return Ok(());
        }
        if page.select_by_value(el, value).await? {
            trace!("  {} 按 value 选择 '{}'", el, value);
            return Ok(());
        }
    }
    trace!("  {} 逐字输入 '{}'", el, value);
    page.type_text(el, value).await
}

/// 查询并返回第一个可见的匹配元素；驱动异常视为未命中
pub async fn try_match<P: FormPage>(page: &P, query: &Query, scope: Option<&ElementHandle>) -> Option<ElementHandle> {
    let candidates = candidates(page, query, scope).await?;
    for el in candidates {
        if visible(page, &el).await {
            return Some(el);
        }
    }
    None
}

/// 和 `try_match` 相同，但只接受能写入文本的控件
///
/// 标签查询会同时命中复选框、单选框等，例如 "Send me job alerts by email"。
async fn try_match_writable<P: FormPage>(page: &P, query: &Query) -> Option<ElementHandle> {
    let candidates = candidates(page, query, None).await?;
    for el in candidates {
        match page.control_kind(&el).await {
            Ok(kind) if kind.accepts_text() => {}
            Ok(kind) => {
                trace!("  {} 是 {:?}，不能写入文本", el, kind);
                continue;
            }
            Err(e) => {
                debug!("  读取 {} 类型出错: {:#}", el, e);
                continue;
            }
        }
        if visible(page, &el).await {
            return Some(el);
        }
    }
    None
}

async fn candidates<P: FormPage>(page: &P, query: &Query, scope: Option<&ElementHandle>) -> Option<Vec<ElementHandle>> {
    let found = match scope {
        Some(scope) => page.query_within(scope, query).await,
        None => page.query(query).await,
    };
    match found {
        Ok(found) => Some(found),
        Err(e) => {
            debug!("  查询 {} 出错: {:#}", query, e);
            None
        }
    }
}

async fn visible<P: FormPage>(page: &P, el: &ElementHandle) -> bool {
    match page.is_visible(el).await {
        Ok(true) => true,
        Ok(false) => {
            trace!("  {} 不可见", el);
            false
        }
        Err(e) => {
            debug!("  读取 {} 可见性出错: {:#}", el, e);
            false
        }
    }
}

/// 优先返回可见的匹配，没有可见的就返回第一个匹配
///
/// 单选框和文件框经常被自定义样式隐藏，但仍然可以操作。
async fn try_match_any<P: FormPage>(page: &P, query: &Query, scope: Option<&ElementHandle>) -> Option<ElementHandle> {
    if let Some(el) = try_match(page, query, scope).await {
        return Some(el);
    }
    candidates(page, query, scope).await.and_then(|v| v.into_iter().next())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
