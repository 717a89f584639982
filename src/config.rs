use std::path::PathBuf;
use std::time::Duration;

use crate::services::stability::StabilityOptions;

/// 人工审核环节的工作方式（每次部署只启用一种）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewMode {
    /// 显示提示并无限期等待操作者关闭标签页
    Manual,
    /// 查找提交按钮，按 auto_submit 开关决定是否点击
    AutoSubmit,
}

impl ReviewMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "manual" | "review" => Some(ReviewMode::Manual),
            "auto" | "auto_submit" | "auto-submit" => Some(ReviewMode::AutoSubmit),
            _ => None,
        }
    }
}

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 是否自行启动浏览器（否则连接已运行的浏览器）
    pub browser_launch: bool,
    /// 启动浏览器时是否无头
    pub browser_headless: bool,
    /// 浏览器可执行文件路径
    pub chrome_executable: Option<PathBuf>,
    /// 个人资料文件
    pub profile_path: PathBuf,
    /// 简历路径的相对基准目录
    pub profile_base_dir: PathBuf,
    /// URL 列表文件（命令行未给出 URL 时使用）
    pub urls_file: Option<PathBuf>,
    /// 结果日志（CSV）
    pub output_log_file: PathBuf,
    /// 审核模式
    pub review_mode: ReviewMode,
    /// 自动提交开关（仅在 AutoSubmit 模式下有意义）
    pub auto_submit: bool,
    /// 导航后的固定等待（毫秒）
    pub settle_delay_ms: u64,
    /// 表单稳定检测轮询间隔（毫秒）
    pub stability_poll_ms: u64,
    /// 表单稳定检测最长等待（毫秒）
    pub stability_max_wait_ms: u64,
    /// 点击提交后的等待（毫秒）
    pub post_click_wait_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: 9222,
            browser_launch: false,
            browser_headless: false,
            chrome_executable: None,
            profile_path: PathBuf::from("profile.toml"),
            profile_base_dir: PathBuf::from("."),
            urls_file: None,
            output_log_file: PathBuf::from("applications.csv"),
            review_mode: ReviewMode::Manual,
            auto_submit: false,
            settle_delay_ms: 1200,
            stability_poll_ms: 500,
            stability_max_wait_ms: 5000,
            post_click_wait_ms: 1500,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            browser_debug_port: env_parse("BROWSER_DEBUG_PORT").unwrap_or(default.browser_debug_port),
            browser_launch: env_parse("BROWSER_LAUNCH").unwrap_or(default.browser_launch),
            browser_headless: env_parse("BROWSER_HEADLESS").unwrap_or(default.browser_headless),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().map(PathBuf::from).or(default.chrome_executable),
            profile_path: std::env::var("PROFILE_PATH").map(PathBuf::from).unwrap_or(default.profile_path),
            profile_base_dir: std::env::var("PROFILE_BASE_DIR").map(PathBuf::from).unwrap_or(default.profile_base_dir),
            urls_file: std::env::var("URLS_FILE").ok().map(PathBuf::from).or(default.urls_file),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").map(PathBuf::from).unwrap_or(default.output_log_file),
            review_mode: std::env::var("REVIEW_MODE").ok().and_then(|v| ReviewMode::parse(&v)).unwrap_or(default.review_mode),
            auto_submit: env_parse("AUTO_SUBMIT").unwrap_or(default.auto_submit),
            settle_delay_ms: env_parse("SETTLE_DELAY_MS").unwrap_or(default.settle_delay_ms),
            stability_poll_ms: env_parse("STABILITY_POLL_MS").unwrap_or(default.stability_poll_ms),
            stability_max_wait_ms: env_parse("STABILITY_MAX_WAIT_MS").unwrap_or(default.stability_max_wait_ms),
            post_click_wait_ms: env_parse("POST_CLICK_WAIT_MS").unwrap_or(default.post_click_wait_ms),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
        }
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn post_click_wait(&self) -> Duration {
        Duration::from_millis(self.post_click_wait_ms)
    }

    /// 表单稳定检测参数
    pub fn stability_options(&self) -> StabilityOptions {
        StabilityOptions {
            interval: Duration::from_millis(self.stability_poll_ms),
            max_wait: Duration::from_millis(self.stability_max_wait_ms),
            ..StabilityOptions::default()
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
