use std::path::PathBuf;

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 配置错误（致命，批次开始前抛出）
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 结果日志写入错误（会中止整个批次）
    #[error("记录错误: {0}")]
    Record(#[from] RecordError),
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 启动浏览器失败
    #[error("启动浏览器失败: {0}")]
    LaunchFailed(String),
    /// 创建页面失败
    #[error("创建页面失败: {source}")]
    PageCreationFailed {
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 导航失败
    #[error("导航到 {url} 失败: {message}")]
    NavigationFailed { url: String, message: String },
    /// 元素句柄已失效
    #[error("元素 {handle} 已不在页面上")]
    StaleElement { handle: String },
    /// 执行脚本失败
    #[error("执行脚本失败: {0}")]
    ScriptExecutionFailed(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 个人资料缺少必填字段
    #[error("个人资料 {path} 缺少必填字段: {}", keys.join(", "))]
    MissingProfileKeys { path: PathBuf, keys: Vec<&'static str> },
    /// 读取个人资料失败
    #[error("读取个人资料失败 ({path}): {source}")]
    ProfileReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 个人资料格式错误
    #[error("个人资料解析失败 ({path}): {message}")]
    ProfileParseFailed { path: PathBuf, message: String },
    /// 简历文件不存在
    #[error("简历文件不存在: {path}")]
    ResumeNotFound { path: PathBuf },
    /// URL 列表为空
    #[error("URL 列表为空，拒绝启动批次")]
    EmptyBatch,
    /// URL 不是绝对的 http(s) 地址
    #[error("无效的 URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    /// 已有批次在运行
    #[error("已有批次正在运行")]
    BatchAlreadyRunning,
}

/// 结果日志错误
#[derive(Debug, Error)]
pub enum RecordError {
    /// 写入日志失败
    #[error("写入结果日志失败 ({path}): {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 读取日志失败
    #[error("读取结果日志失败 ({path}): {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器连接错误
    pub fn browser_connection_failed(port: u16, source: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::ConnectionFailed { port, source })
    }
}

impl RecordError {
    /// 创建写入失败错误
    pub fn write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RecordError::WriteFailed {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
