/// 日志工具模块
///
/// 初始化 tracing，并提供控制台横幅输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, ReviewMode};

/// 初始化日志
///
/// 设置了 `RUST_LOG` 时以它为准；否则默认 info，`verbose` 时本 crate 输出 debug。
/// 重复调用不会报错（测试里会多次初始化）。
pub fn init(verbose: bool) {
    let default_directive = if verbose {
        "info,apply_autofill=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 职位申请表单自动填写");
    info!("👤 个人资料: {}", config.profile_path.display());
    info!("📝 结果日志: {}", config.output_log_file.display());
    match config.review_mode {
        ReviewMode::Manual => info!("🔍 审核模式: 人工审核（关闭标签页视为已提交）"),
        ReviewMode::AutoSubmit => info!(
            "🤖 审核模式: 自动提交（{}）",
            if config.auto_submit { "已开启" } else { "未开启，只记录" }
        ),
    }
    info!("{}", "=".repeat(60));
}

/// 记录批次开始信息
///
/// # 参数
/// - `total`: URL 总数
/// - `auto_submit`: 本批次是否允许自动点击提交
pub fn log_batch_start(total: usize, auto_submit: bool) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理批次，共 {} 个职位", total);
    if auto_submit {
        info!("⚡ 本批次允许自动点击提交按钮");
    }
    info!("{}", "=".repeat(60));
}

/// 记录单个 URL 开始
pub fn log_url_start(index: usize, total: usize, url: &str) {
    info!("\n{}", "─".repeat(60));
    info!("🌐 [{}/{}] {}", index, total, truncate_text(url, 100));
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `counts`: 各状态及数量
/// - `total`: 总数
/// - `log_file_path`: 结果日志路径
pub fn print_final_stats(counts: &[(&str, usize)], total: usize, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    for (status, count) in counts {
        info!("  {:<10} {}/{}", status, count, total);
    }
    info!("{}", "=".repeat(60));
    info!("\n结果已追加至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("职位申请表单", 2), "职位...");
    }

    #[test]
    fn test_init_is_idempotent() {
        init(false);
        init(true);
    }
}
