//! 测试用的内存页面
//!
//! 用一组扁平的元素描述表单，按和 CdpPage 相同的规则响应 `Query`，
//! 并记录所有写入，方便断言。

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};

use apply_autofill::infrastructure::{ControlKind, ElementHandle, FormPage, PageSnapshot, Query, Role};
use apply_autofill::models::Profile;

#[derive(Debug, Clone)]
pub struct FakeElement {
    pub id: String,
    pub kind: ControlKind,
    pub role: Option<Role>,
    pub label: Option<String>,
    pub attrs: Vec<(String, String)>,
    pub near_text: Option<String>,
    pub parent: Option<String>,
    pub visible: bool,
    /// (可见文本, value)
    pub options: Vec<(String, String)>,
    pub value: String,
    pub checked: bool,
    pub files: Option<PathBuf>,
    pub clicks: usize,
}

impl FakeElement {
    pub fn new(id: &str, kind: ControlKind) -> Self {
        let role = match kind {
            ControlKind::Text => Some(Role::Textbox),
            ControlKind::Select | ControlKind::Combobox => Some(Role::Combobox),
            ControlKind::Radio => Some(Role::Radio),
            ControlKind::Submit | ControlKind::Button => Some(Role::Button),
            ControlKind::Checkbox | ControlKind::File | ControlKind::Other => None,
        };
        Self {
            id: id.to_string(),
            kind,
            role,
            label: None,
            attrs: Vec::new(),
            near_text: None,
            parent: None,
            visible: true,
            options: Vec::new(),
            value: String::new(),
            checked: false,
            files: None,
            clicks: 0,
        }
    }

    pub fn text(id: &str) -> Self {
        Self::new(id, ControlKind::Text)
    }

    pub fn select(id: &str, options: &[(&str, &str)]) -> Self {
        let mut el = Self::new(id, ControlKind::Select);
        el.options = options.iter().map(|(l, v)| (l.to_string(), v.to_string())).collect();
        el
    }

    pub fn combobox(id: &str) -> Self {
        Self::new(id, ControlKind::Combobox)
    }

    pub fn file(id: &str) -> Self {
        Self::new(id, ControlKind::File)
    }

    pub fn radio(id: &str, name: &str) -> Self {
        Self::new(id, ControlKind::Radio).label(name)
    }

    pub fn group(id: &str, name: &str) -> Self {
        let mut el = Self::new(id, ControlKind::Other).label(name);
        el.role = Some(Role::Group);
        el
    }

    pub fn button(id: &str, name: &str) -> Self {
        Self::new(id, ControlKind::Button).label(name)
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn near(mut self, text: &str) -> Self {
        self.near_text = Some(text.to_string());
        self
    }

    pub fn within(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    fn is_text_like(&self) -> bool {
        matches!(self.kind, ControlKind::Text | ControlKind::Combobox)
    }

    fn is_control(&self) -> bool {
        !matches!(self.role, Some(Role::Group) | Some(Role::Button))
            && !matches!(self.kind, ControlKind::Other | ControlKind::Submit | ControlKind::Button)
    }

    fn matches(&self, query: &Query) -> bool {
        match query {
            Query::Attr(pattern) => {
                self.is_text_like()
                    && self
                        .attrs
                        .iter()
                        .any(|(name, value)| name == pattern.attr && pattern.matches(value))
            }
            Query::Label { text, exact } => self.is_control() && name_matches(self.label.as_deref(), text, *exact),
            Query::Role { role, name, exact } => {
                self.role == Some(*role) && name_matches(self.label.as_deref(), name, *exact)
            }
            Query::NearText(text) => {
                self.is_text_like()
                    && self
                        .near_text
                        .as_deref()
                        .is_some_and(|near| near.to_lowercase().contains(&text.to_lowercase()))
            }
            Query::Kind(kind) => self.kind == *kind,
        }
    }
}

fn name_matches(name: Option<&str>, wanted: &str, exact: bool) -> bool {
    let Some(name) = name else {
        return false;
    };
    let name = name.trim().to_lowercase();
    let wanted = wanted.trim().to_lowercase();
    if exact {
        name == wanted
    } else {
        name.contains(&wanted)
    }
}

#[derive(Debug, Default)]
struct State {
    elements: Vec<FakeElement>,
    navigations: Vec<String>,
    notices: Vec<String>,
    closes: usize,
    reopened: usize,
    counts: VecDeque<usize>,
}

/// 内存页面
#[derive(Debug, Default)]
pub struct FakePage {
    state: Mutex<State>,
    failing_urls: HashSet<String>,
    snapshot: PageSnapshot,
}

impl FakePage {
    pub fn new(elements: Vec<FakeElement>) -> Self {
        Self {
            state: Mutex::new(State {
                elements,
                ..State::default()
            }),
            ..Self::default()
        }
    }

    pub fn failing_on(mut self, url: &str) -> Self {
        self.failing_urls.insert(url.to_string());
        self
    }

    pub fn with_snapshot(mut self, snapshot: PageSnapshot) -> Self {
        self.snapshot = snapshot;
        self
    }

    /// 依次返回这些控件数量，用完后一直返回最后一个
    pub fn with_counts(self, counts: &[usize]) -> Self {
        self.state.lock().unwrap().counts = counts.iter().copied().collect();
        self
    }

    pub fn element(&self, id: &str) -> FakeElement {
        self.state
            .lock()
            .unwrap()
            .elements
            .iter()
            .find(|el| el.id == id)
            .cloned()
            .unwrap_or_else(|| panic!("没有元素 {}", id))
    }

    pub fn value(&self, id: &str) -> String {
        self.element(id).value
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigations.clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.state.lock().unwrap().notices.clone()
    }

    pub fn closes(&self) -> usize {
        self.state.lock().unwrap().closes
    }

    /// 任何元素被写入过
    pub fn touched(&self) -> bool {
        self.state.lock().unwrap().elements.iter().any(|el| {
            !el.value.is_empty() || el.checked || el.files.is_some() || el.clicks > 0
        })
    }

    fn with_element<T>(&self, handle: &ElementHandle, f: impl FnOnce(&mut FakeElement) -> T) -> Result<T> {
        let mut state = self.state.lock().unwrap();
        let el = state
            .elements
            .iter_mut()
            .find(|el| el.id == handle.0)
            .ok_or_else(|| anyhow!("元素已失效: {}", handle))?;
        Ok(f(el))
    }

    fn find(&self, scope: Option<&ElementHandle>, query: &Query) -> Vec<ElementHandle> {
        self.state
            .lock()
            .unwrap()
            .elements
            .iter()
            .filter(|el| scope.map_or(true, |s| el.parent.as_deref() == Some(s.0.as_str())))
            .filter(|el| el.matches(query))
            .map(|el| ElementHandle(el.id.clone()))
            .collect()
    }
}

impl FormPage for FakePage {
    async fn ensure_open(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.closes > state.reopened {
            state.reopened += 1;
        }
        Ok(())
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        self.state.lock().unwrap().navigations.push(url.to_string());
        if self.failing_urls.contains(url) {
            bail!("net::ERR_NAME_NOT_RESOLVED at {}", url);
        }
        Ok(())
    }

    async fn query(&self, query: &Query) -> Result<Vec<ElementHandle>> {
        Ok(self.find(None, query))
    }

    async fn query_within(&self, scope: &ElementHandle, query: &Query) -> Result<Vec<ElementHandle>> {
        Ok(self.find(Some(scope), query))
    }

    async fn is_visible(&self, element: &ElementHandle) -> Result<bool> {
        self.with_element(element, |el| el.visible)
    }

    async fn control_kind(&self, element: &ElementHandle) -> Result<ControlKind> {
        self.with_element(element, |el| el.kind)
    }

    async fn set_value(&self, element: &ElementHandle, value: &str) -> Result<()> {
        self.with_element(element, |el| el.value = value.to_string())
    }

    async fn type_text(&self, element: &ElementHandle, text: &str) -> Result<()> {
        self.with_element(element, |el| el.value = text.to_string())
    }

    async fn select_by_label(&self, element: &ElementHandle, label: &str) -> Result<bool> {
        self.with_element(element, |el| {
            let found = el
                .options
                .iter()
                .find(|(l, _)| l.eq_ignore_ascii_case(label))
                .map(|(_, v)| v.clone());
            match found {
                Some(v) => {
                    el.value = v;
                    true
                }
                None => false,
            }
        })
    }

    async fn select_by_value(&self, element: &ElementHandle, value: &str) -> Result<bool> {
        self.with_element(element, |el| {
            if el.options.iter().any(|(_, v)| v == value) {
                el.value = value.to_string();
                true
            } else {
                false
            }
        })
    }

    async fn set_checked(&self, element: &ElementHandle) -> Result<()> {
        self.with_element(element, |el| el.checked = true)
    }

    async fn set_files(&self, element: &ElementHandle, path: &Path) -> Result<()> {
        self.with_element(element, |el| el.files = Some(path.to_path_buf()))
    }

    async fn click(&self, element: &ElementHandle) -> Result<()> {
        self.with_element(element, |el| el.clicks += 1)
    }

    async fn control_count(&self) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        if state.counts.len() > 1 {
            return Ok(state.counts.pop_front().unwrap_or_default());
        }
        if let Some(last) = state.counts.front() {
            return Ok(*last);
        }
        Ok(state.elements.iter().filter(|el| el.is_control()).count())
    }

    async fn snapshot(&self) -> Result<PageSnapshot> {
        let url = self.state.lock().unwrap().navigations.last().cloned().unwrap_or_default();
        Ok(PageSnapshot {
            url,
            ..self.snapshot.clone()
        })
    }

    async fn show_notice(&self, message: &str) -> Result<()> {
        self.state.lock().unwrap().notices.push(message.to_string());
        Ok(())
    }

    async fn wait_for_close(&self, _timeout: Option<Duration>) -> Result<bool> {
        self.state.lock().unwrap().closes += 1;
        Ok(true)
    }
}

/// 测试用个人资料（简历路径不需要存在）
pub fn profile() -> Profile {
    Profile {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: "a@b.com".into(),
        resume_path: PathBuf::from("/tmp/ada-cv.pdf"),
        phone: Some("+44 20 7946 0000".into()),
        personal_url: None,
        linkedin: Some("https://www.linkedin.com/in/ada".into()),
        github: None,
        website: None,
        gender: Some("Female".into()),
        location: Some("United Kingdom".into()),
        tax_residence: None,
        notice_period: None,
        salary: Some("90000".into()),
        referred_by: None,
    }
}

/// 不等待的时间配置
pub fn fast_config(log_file: &Path) -> apply_autofill::Config {
    apply_autofill::Config {
        output_log_file: log_file.to_path_buf(),
        settle_delay_ms: 0,
        stability_poll_ms: 1,
        stability_max_wait_ms: 20,
        post_click_wait_ms: 0,
        ..apply_autofill::Config::default()
    }
}
