//! 单个职位处理器 - 编排层
//!
//! ## 职责
//!
//! 对一个 URL 走完整个状态机：
//!
//! ```text
//! NAVIGATE → STABILIZE → EXTRACT_META → FILL → HOLD_FOR_REVIEW → RECORD
//! ```
//!
//! 前面任何一步出错都会跳到 RECORD，状态为 `error`，错误信息写入 notes。
//! RECORD 一定会执行；只有写日志本身失败才会向上返回错误。

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::error::RecordError;
use crate::infrastructure::FormPage;
use crate::models::{JobRecord, JobStatus, Profile};
use crate::services::{extract_meta, wait_for_stability, OutcomeRecorder, StabilityOptions};
use crate::workflow::{FillFlow, JobCtx, ReviewStep};

/// 单个职位处理器
///
/// 不持有页面，只借用批次的资源。
pub struct JobProcessor<'a, P: FormPage> {
    page: &'a P,
    profile: &'a Profile,
    recorder: &'a OutcomeRecorder,
    fill: FillFlow,
    review: ReviewStep,
    settle_delay: Duration,
    stability: StabilityOptions,
}

impl<'a, P: FormPage> JobProcessor<'a, P> {
    pub fn new(
        page: &'a P,
        profile: &'a Profile,
        recorder: &'a OutcomeRecorder,
        review: ReviewStep,
        settle_delay: Duration,
        stability: StabilityOptions,
    ) -> Self {
        Self {
            page,
            profile,
            recorder,
            fill: FillFlow::new(),
            review,
            settle_delay,
            stability,
        }
    }

    /// 处理一个 URL 并写入一行结果
    ///
    /// # 返回
    /// 已写入日志的记录；写日志失败时返回错误，批次应当中止
    pub async fn process(&self, url: &str, index: usize, total: usize) -> Result<JobRecord, RecordError> {
        let mut record = JobRecord::start(url, &self.profile.resume_path);
        let ctx = JobCtx::new(index, total, url, record.job_id.clone());

        if let Err(e) = self.run_steps(&ctx, &mut record).await {
            error!("{} ❌ 处理失败: {:#}", ctx, e);
            record.fail(format!("{:#}", e));
        }

        // RECORD
        record.finish();
        self.recorder.append(&record).await?;
        info!(
            "{} 📝 状态: {}，耗时 {:.1}s",
            ctx,
            record.status,
            record.elapsed_ms() as f64 / 1000.0
        );
        Ok(record)
    }

    async fn run_steps(&self, ctx: &JobCtx, record: &mut JobRecord) -> Result<()> {
        // NAVIGATE
        self.page.ensure_open().await.context("无法获取可用的标签页")?;
        self.page
            .navigate(&ctx.url)
            .await
            .with_context(|| format!("打开页面失败: {}", ctx.url))?;
        sleep(self.settle_delay).await;

        // STABILIZE（仅作参考）
        if !wait_for_stability(self.page, self.stability).await {
            warn!("{} ⚠️ 表单在 {:?} 内未稳定，继续填写", ctx, self.stability.max_wait);
        }

        // EXTRACT_META
        let meta = extract_meta(self.page).await;
        info!("{} 🏢 {} | {} ({})", ctx, meta.company, meta.title, meta.source);
        record.company = meta.company;
        record.job_title = meta.title;
        record.source = meta.source;

        // FILL
        let summary = self.fill.run(self.page, self.profile, ctx).await;
        record.status = JobStatus::Filled;
        debug!("{} 已填写: {}", ctx, summary.filled.join(", "));

        // HOLD_FOR_REVIEW
        let outcome = self.review.hold(self.page, ctx).await?;
        record.status = outcome.status;
        record.notes = outcome.notes;
        Ok(())
    }
}
