//! 人工审核 / 自动提交 - 流程层
//!
//! 表单填写之后的交接环节。每次部署只启用一种方式：
//! - 人工审核：页面上显示提示，无限期等待操作者关闭标签页
//! - 自动提交：查找提交按钮，开关打开时点击

use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::ReviewMode;
use crate::infrastructure::{ControlKind, ElementHandle, FormPage, Query, Role};
use crate::models::JobStatus;
use crate::services::field_resolver::try_match;
use crate::services::registry::SUBMIT_LABELS;
use crate::workflow::job_ctx::JobCtx;

/// 人工审核时页面上显示的提示
pub const REVIEW_NOTICE: &str = "表单已自动填写。请检查并提交，完成后关闭此标签页继续下一个职位。";

/// 自动提交关闭时写入 notes 的说明
pub const NOTE_AUTO_SUBMIT_OFF: &str = "auto-submit off: submit control found, not clicked";

/// 找不到提交按钮时写入 notes 的说明
pub const NOTE_NO_SUBMIT: &str = "no submit control found";

/// 审核环节的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldOutcome {
    pub status: JobStatus,
    pub notes: String,
}

impl HoldOutcome {
    fn new(status: JobStatus, notes: &str) -> Self {
        Self {
            status,
            notes: notes.to_string(),
        }
    }
}

/// 审核环节
#[derive(Debug, Clone, Copy)]
pub struct ReviewStep {
    mode: ReviewMode,
    auto_submit: bool,
    post_click_wait: Duration,
}

impl ReviewStep {
    pub fn new(mode: ReviewMode, auto_submit: bool, post_click_wait: Duration) -> Self {
        Self {
            mode,
            auto_submit,
            post_click_wait,
        }
    }

    pub async fn hold<P: FormPage>(&self, page: &P, ctx: &JobCtx) -> Result<HoldOutcome> {
        match self.mode {
            ReviewMode::Manual => self.wait_for_operator(page, ctx).await,
            ReviewMode::AutoSubmit => self.auto_submit(page, ctx).await,
        }
    }

    /// 显示提示并等待标签页关闭，没有超时
    async fn wait_for_operator<P: FormPage>(&self, page: &P, ctx: &JobCtx) -> Result<HoldOutcome> {
        if let Err(e) = page.show_notice(REVIEW_NOTICE).await {
            // 提示只是辅助，显示失败照样等待
            warn!("{} 显示审核提示失败: {:#}", ctx, e);
        }
        info!("{} 👀 等待人工审核，关闭标签页后继续...", ctx);

        let closed = page
            .wait_for_close(None)
            .await
            .context("等待标签页关闭失败")?;
        if !closed {
            bail!("等待标签页关闭时意外返回");
        }
        info!("{} ✅ 标签页已关闭，视为已提交", ctx);
        Ok(HoldOutcome::new(JobStatus::Submitted, ""))
    }

    async fn auto_submit<P: FormPage>(&self, page: &P, ctx: &JobCtx) -> Result<HoldOutcome> {
        let Some(button) = find_submit(page).await else {
            warn!("{} ⚠️ 没有找到提交按钮", ctx);
            return Ok(HoldOutcome::new(JobStatus::Skipped, NOTE_NO_SUBMIT));
        };

        if !self.auto_submit {
            info!("{} 找到提交按钮 {}，自动提交未开启，不点击", ctx, button);
            return Ok(HoldOutcome::new(JobStatus::Skipped, NOTE_AUTO_SUBMIT_OFF));
        }

        page.click(&button).await.context("点击提交按钮失败")?;
        info!("{} 🖱️ 已点击提交按钮 {}", ctx, button);
        // 给提交请求留出发出的时间再离开页面
        sleep(self.post_click_wait).await;
        Ok(HoldOutcome::new(JobStatus::Clicked, ""))
    }
}

/// 查找提交类控件：先按按钮名称，再找 submit 类型的输入
pub async fn find_submit<P: FormPage>(page: &P) -> Option<ElementHandle> {
    for label in SUBMIT_LABELS {
        if let Some(el) = try_match(page, &Query::role(Role::Button, *label), None).await {
            return Some(el);
        }
    }
    try_match(page, &Query::Kind(ControlKind::Submit), None).await
}
