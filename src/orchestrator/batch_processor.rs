//! 批量职位处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批次的调度和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：加载个人资料、连接或启动浏览器、创建 CdpPage
//! 2. **批次校验**：URL 列表不能为空，且必须是绝对 http(s) 地址
//! 3. **顺序处理**：一个标签页，逐个 URL 处理，上一个记录完成才开始下一个
//! 4. **资源管理**：持有浏览器会话，批次结束时释放
//! 5. **全局统计**：汇总各状态的数量
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个职位的细节，委托 job_processor
//! - **资源所有者**：唯一持有页面的模块
//! - **故障隔离**：单个 URL 的失败只影响它自己的记录

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::browser;
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{CdpPage, FormPage};
use crate::models::{load_profile, validate_urls, JobStatus, Profile};
use crate::orchestrator::gate::BatchGuard;
use crate::orchestrator::job_processor::JobProcessor;
use crate::services::OutcomeRecorder;
use crate::utils::logging::{log_batch_start, log_startup, log_url_start, print_final_stats};
use crate::workflow::ReviewStep;

/// 批次请求
#[derive(Debug, Clone, Default)]
pub struct BatchRequest {
    pub urls: Vec<String>,
    /// 覆盖配置中的自动提交开关
    pub auto_submit: Option<bool>,
}

impl BatchRequest {
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            urls,
            auto_submit: None,
        }
    }
}

/// 批次统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub submitted: usize,
    pub clicked: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn count(&mut self, status: JobStatus) {
        self.total += 1;
        match status {
            JobStatus::Submitted => self.submitted += 1,
            JobStatus::Clicked => self.clicked += 1,
            JobStatus::Skipped => self.skipped += 1,
            // filled 不会留到记录阶段，按失败计
            JobStatus::Error | JobStatus::Filled => self.failed += 1,
        }
    }

    pub fn as_pairs(&self) -> [(&'static str, usize); 4] {
        [
            (JobStatus::Submitted.as_str(), self.submitted),
            (JobStatus::Clicked.as_str(), self.clicked),
            (JobStatus::Skipped.as_str(), self.skipped),
            (JobStatus::Error.as_str(), self.failed),
        ]
    }
}

/// 批次执行器
///
/// 对驱动是泛型的：生产环境用 `CdpPage`，测试里用内存页面。
pub struct BatchRunner<P: FormPage> {
    page: P,
    profile: Profile,
    recorder: OutcomeRecorder,
    config: Config,
}

impl<P: FormPage> BatchRunner<P> {
    pub fn new(page: P, profile: Profile, config: Config) -> Self {
        Self {
            page,
            profile,
            recorder: OutcomeRecorder::new(&config.output_log_file),
            config,
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn recorder(&self) -> &OutcomeRecorder {
        &self.recorder
    }

    pub fn into_page(self) -> P {
        self.page
    }

    /// 顺序处理整个批次
    ///
    /// 单个 URL 的失败只写入它自己的记录；写结果日志失败会中止批次。
    pub async fn run(&self, request: &BatchRequest) -> AppResult<BatchSummary> {
        validate_urls(&request.urls)?;

        let auto_submit = request.auto_submit.unwrap_or(self.config.auto_submit);
        let review = ReviewStep::new(self.config.review_mode, auto_submit, self.config.post_click_wait());
        let processor = JobProcessor::new(
            &self.page,
            &self.profile,
            &self.recorder,
            review,
            self.config.settle_delay(),
            self.config.stability_options(),
        );

        self.recorder.ensure_header().await?;

        let total = request.urls.len();
        log_batch_start(total, auto_submit);

        let mut summary = BatchSummary::default();
        for (index, url) in request.urls.iter().enumerate() {
            log_url_start(index + 1, total, url);
            let record = processor.process(url, index + 1, total).await?;
            summary.count(record.status);
        }

        print_final_stats(
            &summary.as_pairs(),
            summary.total,
            &self.recorder.path().display().to_string(),
        );
        Ok(summary)
    }
}

/// 应用主结构
pub struct App {
    runner: BatchRunner<CdpPage>,
    launched: bool,
}

impl App {
    /// 初始化应用
    ///
    /// 个人资料缺少必填项时直接失败，不会打开任何页面。
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let profile = load_profile(&config.profile_path, &config.profile_base_dir).await?;

        let (browser, page) = if config.browser_launch {
            browser::launch_browser(config.browser_headless, config.chrome_executable.as_deref())
                .await
                .context("启动浏览器失败")?
        } else {
            browser::connect_to_browser_and_page(config.browser_debug_port)
                .await
                .context("连接浏览器失败")?
        };

        let launched = config.browser_launch;
        Ok(Self {
            runner: BatchRunner::new(CdpPage::new(browser, page), profile, config),
            launched,
        })
    }

    /// 运行一个批次，结束后释放浏览器会话
    ///
    /// 调用方需要先通过 `BatchGate` 占用批次标记。
    pub async fn run(self, request: BatchRequest, _guard: &BatchGuard) -> Result<BatchSummary> {
        let result = self.runner.run(&request).await;

        // END
        let page = self.runner.into_page();
        if self.launched {
            if let Err(e) = page.shutdown().await {
                warn!("关闭浏览器失败: {:#}", e);
            }
        } else {
            info!("🔌 断开与浏览器的连接（浏览器保持打开）");
            drop(page);
        }

        Ok(result?)
    }
}
