//! chromiumoxide 实现的 `FormPage`
//!
//! 所有 DOM 探测都在页面里用一段共享的 JS 完成：
//! 匹配到的元素会被打上 `data-af-handle` 属性，Rust 侧只拿到这个编号。
//! 需要真实输入的操作（逐字输入、点击、上传文件）再通过该属性找回元素，
//! 交给 chromiumoxide 的 Element / CDP 命令执行。

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::cdp::browser_protocol::target::TargetId;
use chromiumoxide::{Browser, Page};
use serde_json::{json, Value as JsonValue};
use tokio::sync::RwLock;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::error::BrowserError;
use crate::infrastructure::driver::{
    AttrMatch, ControlKind, ElementHandle, FormPage, PageSnapshot, Query,
};
use crate::infrastructure::JsExecutor;

/// 检查标签页是否还在的间隔
const CLOSE_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// 注入到每段脚本前面的辅助函数
const PRELUDE: &str = r#"
const AF = (() => {
  const ATTR = 'data-af-handle';
  const norm = (s) => (s || '').replace(/\s+/g, ' ').trim().toLowerCase();
  const textMatch = (hay, needle, exact) => {
    const h = norm(hay), n = norm(needle);
    if (!n) return false;
    return exact ? h === n : h.includes(n);
  };
  const CONTROLS = 'input, select, textarea, [role=textbox], [role=combobox], [role=radio]';
  const tag = (el) => {
    let id = el.getAttribute(ATTR);
    if (!id) {
      window.__afSeq = (window.__afSeq || 0) + 1;
      id = 'af' + window.__afSeq;
      el.setAttribute(ATTR, id);
    }
    return id;
  };
  const byHandle = (id) => document.querySelector('[' + ATTR + '="' + id + '"]');
  const inputType = (el) => (el.getAttribute('type') || 'text').toLowerCase();
  const kind = (el) => {
    const t = el.tagName.toLowerCase();
    const r = (el.getAttribute('role') || '').toLowerCase();
    if (t === 'select') return 'select';
    if (r === 'combobox' || r === 'listbox') return 'combobox';
    if (t === 'textarea') return 'text';
    if (t === 'button') return 'button';
    if (t === 'input') {
      const ty = inputType(el);
      if (ty === 'radio') return 'radio';
      if (ty === 'checkbox') return 'checkbox';
      if (ty === 'file') return 'file';
      if (ty === 'submit' || ty === 'image') return 'submit';
      if (ty === 'button' || ty === 'reset') return 'button';
      if (el.getAttribute('list')) return 'combobox';
      return 'text';
    }
    if (r === 'textbox' || el.isContentEditable) return 'text';
    if (r === 'radio') return 'radio';
    if (r === 'button') return 'button';
    return 'other';
  };
  const role = (el) => {
    const explicit = (el.getAttribute('role') || '').toLowerCase();
    if (explicit === 'radiogroup') return 'group';
    if (explicit) return explicit;
    const t = el.tagName.toLowerCase();
    if (t === 'fieldset') return 'group';
    const k = kind(el);
    if (k === 'text') return 'textbox';
    if (k === 'select') return 'combobox';
    if (k === 'submit') return 'button';
    return k;
  };
  const labelTexts = (el) => {
    const parts = [];
    const aria = el.getAttribute('aria-label');
    if (aria) parts.push(aria);
    const ids = el.getAttribute('aria-labelledby');
    if (ids) ids.split(/\s+/).forEach((id) => {
      const n = document.getElementById(id);
      if (n) parts.push(n.textContent);
    });
    if (el.labels) Array.from(el.labels).forEach((l) => parts.push(l.textContent));
    return parts.filter((p) => norm(p));
  };
  const accessibleName = (el) => {
    const labels = labelTexts(el);
    if (labels.length) return labels.join(' ');
    const t = el.tagName.toLowerCase();
    if (t === 'fieldset') {
      const legend = el.querySelector('legend');
      if (legend) return legend.textContent;
    }
    const k = kind(el);
    if (k === 'button') return el.textContent || el.value || '';
    if (k === 'submit') return el.value || 'Submit';
    return el.getAttribute('title') || el.getAttribute('placeholder') || '';
  };
  const find = (root, q) => {
    const all = (sel) => Array.from(root.querySelectorAll(sel));
    switch (q.type) {
      case 'attr': {
        const cand = all('input, textarea').filter((el) => {
          const k = kind(el);
          return (k === 'text' || k === 'combobox') && inputType(el) !== 'hidden';
        });
        return cand.filter((el) => {
          const v = (el.getAttribute(q.attr) || '').toLowerCase();
          const n = q.needle.toLowerCase();
          return q.op === 'equals' ? v === n : v.includes(n);
        });
      }
      case 'label':
        return all(CONTROLS).filter((el) => labelTexts(el).some((s) => textMatch(s, q.text, q.exact)));
      case 'role': {
        const sel = q.role === 'group'
          ? 'fieldset, [role=group], [role=radiogroup]'
          : q.role === 'button'
            ? 'button, input[type=submit], input[type=button], input[type=image], [role=button]'
            : CONTROLS;
        return all(sel).filter((el) => role(el) === q.role && textMatch(accessibleName(el), q.name, q.exact));
      }
      case 'near_text': {
        const out = [];
        const walker = document.createTreeWalker(root === document ? document.body : root, NodeFilter.SHOW_TEXT);
        while (walker.nextNode()) {
          const node = walker.currentNode;
          const parent = node.parentElement;
          if (!parent || ['SCRIPT', 'STYLE', 'NOSCRIPT'].includes(parent.tagName)) continue;
          if (!norm(node.textContent).includes(norm(q.text))) continue;
          let box = parent;
          for (let depth = 0; depth < 3 && box; depth++) {
            const c = Array.from(box.querySelectorAll('input, textarea, select'))
              .find((el) => inputType(el) !== 'hidden' && ['text', 'select', 'combobox'].includes(kind(el)));
            if (c) { if (!out.includes(c)) out.push(c); break; }
            box = box.parentElement;
          }
        }
        return out;
      }
      case 'kind':
        return all('input, select, textarea, button, [role]').filter((el) => kind(el) === q.kind);
      default:
        return [];
    }
  };
  const visible = (el) => {
    if (!el || !el.isConnected) return false;
    if (el.tagName.toLowerCase() === 'input' && inputType(el) === 'hidden') return false;
    const st = window.getComputedStyle(el);
    if (st.display === 'none' || st.visibility === 'hidden') return false;
    return el.getClientRects().length > 0;
  };
  const setNative = (el, value) => {
    if (!['INPUT', 'TEXTAREA', 'SELECT'].includes(el.tagName)) {
      el.textContent = value;
      el.dispatchEvent(new Event('input', { bubbles: true }));
      return;
    }
    const proto = el.tagName === 'TEXTAREA'
      ? HTMLTextAreaElement.prototype
      : el.tagName === 'SELECT' ? HTMLSelectElement.prototype : HTMLInputElement.prototype;
    const desc = Object.getOwnPropertyDescriptor(proto, 'value');
    if (desc && desc.set) desc.set.call(el, value); else el.value = value;
    el.dispatchEvent(new Event('input', { bubbles: true }));
    el.dispatchEvent(new Event('change', { bubbles: true }));
  };
  const selectWhere = (el, pred) => {
    if (el.tagName !== 'SELECT') return false;
    const opt = Array.from(el.options).find(pred);
    if (!opt) return false;
    setNative(el, opt.value);
    return true;
  };
  return { tag, byHandle, kind, find, visible, setNative, selectWhere, norm };
})();
"#;

/// chromiumoxide 后端
pub struct CdpPage {
    browser: Browser,
    executor: RwLock<JsExecutor>,
}

impl CdpPage {
    pub fn new(browser: Browser, page: Page) -> Self {
        Self {
            browser,
            executor: RwLock::new(JsExecutor::new(page)),
        }
    }

    /// 关闭浏览器会话
    pub async fn shutdown(mut self) -> Result<()> {
        self.browser.close().await.context("关闭浏览器失败")?;
        let _ = self.browser.wait().await;
        Ok(())
    }

    async fn executor(&self) -> JsExecutor {
        self.executor.read().await.clone()
    }

    async fn is_alive(&self, target: &TargetId) -> Result<bool> {
        let pages = self.browser.pages().await?;
        Ok(pages.iter().any(|p| p.target_id() == target))
    }

    /// 执行一段使用 PRELUDE 的脚本
    async fn run<T: serde::de::DeserializeOwned>(&self, body: &str) -> Result<T> {
        let js = format!("(() => {{ {prelude}\n{body} }})()", prelude = PRELUDE);
        self.executor()
            .await
            .eval_as(js)
            .await
            .map_err(|e| BrowserError::ScriptExecutionFailed(format!("{e:#}")).into())
    }

    /// 在元素上执行脚本，元素不存在时报 StaleElement
    async fn on_element(&self, element: &ElementHandle, body: &str) -> Result<JsonValue> {
        let id = serde_json::to_string(&element.0)?;
        let script = format!(
            "const el = AF.byHandle({id});\nif (!el) return {{ missing: true }};\nreturn {{ missing: false, result: (() => {{ {body} }})() }};"
        );
        let value: JsonValue = self.run(&script).await?;
        if value.get("missing").and_then(JsonValue::as_bool).unwrap_or(true) {
            return Err(BrowserError::StaleElement {
                handle: element.0.clone(),
            }
            .into());
        }
        Ok(value.get("result").cloned().unwrap_or(JsonValue::Null))
    }

    async fn find_element(&self, element: &ElementHandle) -> Result<chromiumoxide::element::Element> {
        let selector = format!("[data-af-handle=\"{}\"]", element.0);
        self.executor()
            .await
            .page()
            .find_element(selector)
            .await
            .map_err(|_| {
                BrowserError::StaleElement {
                    handle: element.0.clone(),
                }
                .into()
            })
    }

    async fn find(&self, scope: Option<&ElementHandle>, query: &Query) -> Result<Vec<ElementHandle>> {
        let q = query_json(query);
        let root = match scope {
            Some(handle) => format!("AF.byHandle({})", serde_json::to_string(&handle.0)?),
            None => "document".to_string(),
        };
        let body = format!(
            "const root = {root};\nif (!root) return [];\nreturn AF.find(root, {q}).map(AF.tag);"
        );
        let ids: Vec<String> = self.run(&body).await?;
        Ok(ids.into_iter().map(ElementHandle).collect())
    }
}

/// 把查询序列化成页面脚本能理解的 JSON
fn query_json(query: &Query) -> JsonValue {
    match query {
        Query::Attr(p) => json!({
            "type": "attr",
            "attr": p.attr,
            "needle": p.needle,
            "op": match p.op { AttrMatch::Contains => "contains", AttrMatch::Equals => "equals" },
        }),
        Query::Label { text, exact } => json!({ "type": "label", "text": text, "exact": exact }),
        Query::Role { role, name, exact } => {
            json!({ "type": "role", "role": role.as_str(), "name": name, "exact": exact })
        }
        Query::NearText(text) => json!({ "type": "near_text", "text": text }),
        Query::Kind(kind) => json!({ "type": "kind", "kind": kind }),
    }
}

impl FormPage for CdpPage {
    async fn ensure_open(&self) -> Result<()> {
        let target = self.executor().await.page().target_id().clone();
        if self.is_alive(&target).await? {
            return Ok(());
        }
        info!("🗂️ 标签页已关闭，重新打开一个空白页");
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|source| BrowserError::PageCreationFailed { source })?;
        *self.executor.write().await = JsExecutor::new(page);
        Ok(())
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        debug!("导航到: {}", url);
        let executor = self.executor().await;
        executor
            .page()
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn query(&self, query: &Query) -> Result<Vec<ElementHandle>> {
        self.find(None, query).await
    }

    async fn query_within(&self, scope: &ElementHandle, query: &Query) -> Result<Vec<ElementHandle>> {
        self.find(Some(scope), query).await
    }

    async fn is_visible(&self, element: &ElementHandle) -> Result<bool> {
        let id = serde_json::to_string(&element.0)?;
        self.run(&format!("return AF.visible(AF.byHandle({id}));")).await
    }

    async fn control_kind(&self, element: &ElementHandle) -> Result<ControlKind> {
        let value = self.on_element(element, "return AF.kind(el);").await?;
        Ok(serde_json::from_value(value).unwrap_or(ControlKind::Other))
    }

    async fn set_value(&self, element: &ElementHandle, value: &str) -> Result<()> {
        let value = serde_json::to_string(value)?;
        self.on_element(
            element,
            &format!("el.focus(); AF.setNative(el, {value}); el.blur(); return true;"),
        )
        .await?;
        Ok(())
    }

    async fn type_text(&self, element: &ElementHandle, text: &str) -> Result<()> {
        // 先清空，再通过键盘事件逐字输入
        self.on_element(element, "if ('value' in el && el.tagName !== 'SELECT') { AF.setNative(el, ''); } return true;")
            .await?;
        let el = self.find_element(element).await?;
        el.focus().await?;
        el.type_str(text).await?;
        Ok(())
    }

    async fn select_by_label(&self, element: &ElementHandle, label: &str) -> Result<bool> {
        let label = serde_json::to_string(label)?;
        let value = self
            .on_element(
                element,
                &format!(
                    "const want = AF.norm({label});\n\
                     return AF.selectWhere(el, (o) => AF.norm(o.textContent) === want) \
                         || AF.selectWhere(el, (o) => AF.norm(o.textContent).includes(want));"
                ),
            )
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn select_by_value(&self, element: &ElementHandle, value: &str) -> Result<bool> {
        let value = serde_json::to_string(value)?;
        let result = self
            .on_element(
                element,
                &format!(
                    "const want = AF.norm({value});\nreturn AF.selectWhere(el, (o) => AF.norm(o.value) === want);"
                ),
            )
            .await?;
        Ok(result.as_bool().unwrap_or(false))
    }

    async fn set_checked(&self, element: &ElementHandle) -> Result<()> {
        let checked = self
            .on_element(
                element,
                "if (el.getAttribute('role') === 'radio') { el.click(); return el.getAttribute('aria-checked') === 'true'; }\n\
                 if (!el.checked) el.click();\n\
                 if (!el.checked) { el.checked = true; el.dispatchEvent(new Event('change', { bubbles: true })); }\n\
                 return el.checked;",
            )
            .await?;
        if !checked.as_bool().unwrap_or(false) {
            warn!("元素 {} 勾选后状态未改变", element);
        }
        Ok(())
    }

    async fn set_files(&self, element: &ElementHandle, path: &Path) -> Result<()> {
        let el = self.find_element(element).await?;
        let mut params = SetFileInputFilesParams::new(vec![path.to_string_lossy().to_string()]);
        params.node_id = Some(el.node_id);
        self.executor()
            .await
            .page()
            .execute(params)
            .await
            .context("通过 CDP 设置文件失败")?;
        self.on_element(
            element,
            "el.dispatchEvent(new Event('input', { bubbles: true }));\n\
             el.dispatchEvent(new Event('change', { bubbles: true }));\n\
             return el.files ? el.files.length : 0;",
        )
        .await?;
        Ok(())
    }

    async fn click(&self, element: &ElementHandle) -> Result<()> {
        let el = self.find_element(element).await?;
        el.scroll_into_view().await?;
        el.click().await?;
        Ok(())
    }

    async fn control_count(&self) -> Result<usize> {
        self.run("return document.querySelectorAll('input, select, textarea').length;")
            .await
    }

    async fn snapshot(&self) -> Result<PageSnapshot> {
        self.run(
            r#"
            const meta = (sel) => {
              const el = document.querySelector(sel);
              const v = el && el.getAttribute('content');
              return v && v.trim() ? v.trim() : null;
            };
            const h1 = document.querySelector('h1');
            return {
              url: window.location.href,
              ogTitle: meta('meta[property="og:title"]'),
              twitterTitle: meta('meta[name="twitter:title"]') || meta('meta[property="twitter:title"]'),
              firstHeading: h1 && h1.textContent.trim() ? h1.textContent.trim() : null,
              documentTitle: document.title && document.title.trim() ? document.title.trim() : null,
              ogSiteName: meta('meta[property="og:site_name"]'),
              ldJson: Array.from(document.querySelectorAll('script[type="application/ld+json"]')).map((s) => s.textContent || ''),
            };
            "#,
        )
        .await
    }

    async fn show_notice(&self, message: &str) -> Result<()> {
        let message = serde_json::to_string(message)?;
        let _: JsonValue = self
            .run(&format!(
                r#"
                let box = document.getElementById('af-review-notice');
                if (!box) {{
                  box = document.createElement('div');
                  box.id = 'af-review-notice';
                  box.style.cssText = 'position:fixed;top:0;left:0;right:0;z-index:2147483647;padding:12px 16px;' +
                    'background:#1f6feb;color:#fff;font:600 15px/1.4 system-ui,sans-serif;text-align:center;' +
                    'box-shadow:0 2px 8px rgba(0,0,0,.3);';
                  document.body.appendChild(box);
                }}
                box.textContent = {message};
                return true;
                "#
            ))
            .await?;
        Ok(())
    }

    async fn wait_for_close(&self, timeout: Option<Duration>) -> Result<bool> {
        let target = self.executor().await.page().target_id().clone();
        let deadline = timeout.map(|t| Instant::now() + t);
        loop {
            if !self.is_alive(&target).await? {
                debug!("标签页 {:?} 已关闭", target);
                return Ok(true);
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Ok(false);
            }
            sleep(CLOSE_POLL_INTERVAL).await;
        }
    }
}
