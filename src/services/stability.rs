//! 表单稳定检测 - 业务能力层
//!
//! 动态渲染的表单会陆续加入字段。轮询控件数量，直到连续几次不变。

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, trace};

use crate::infrastructure::driver::FormPage;

/// 稳定检测参数
#[derive(Debug, Clone, Copy)]
pub struct StabilityOptions {
    /// 轮询间隔
    pub interval: Duration,
    /// 需要连续读到相同数量的次数
    pub required_polls: u32,
    /// 最长等待
    pub max_wait: Duration,
}

impl Default for StabilityOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            required_polls: 3,
            max_wait: Duration::from_millis(5000),
        }
    }
}

/// 等待表单稳定
///
/// # 返回
/// 稳定返回 true；超时返回 false（仅作参考，调用方照常继续）
pub async fn wait_for_stability<P: FormPage>(page: &P, options: StabilityOptions) -> bool {
    let deadline = Instant::now() + options.max_wait;
    let mut last: Option<usize> = None;
    let mut streak = 0u32;

    loop {
        match page.control_count().await {
            Ok(count) => {
                streak = if last == Some(count) { streak + 1 } else { 1 };
                trace!("控件数量: {} (连续 {} 次)", count, streak);
                last = Some(count);
                if streak >= options.required_polls {
                    debug!("表单已稳定，共 {} 个控件", count);
                    return true;
                }
            }
            Err(e) => {
                // 页面可能正在重新渲染，重新计数
                debug!("读取控件数量失败: {:#}", e);
                last = None;
                streak = 0;
            }
        }

        if Instant::now() + options.interval > deadline {
            debug!("等待表单稳定超时 ({:?})", options.max_wait);
            return false;
        }
        sleep(options.interval).await;
    }
}
