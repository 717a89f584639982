//! 批次互斥
//!
//! 进程内同一时间只允许一个批次运行。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::error::ConfigError;

/// 批次运行标记
#[derive(Debug, Clone, Default)]
pub struct BatchGate {
    running: Arc<AtomicBool>,
}

impl BatchGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// 尝试开始一个批次；已有批次在运行时返回错误
    pub fn try_begin(&self) -> Result<BatchGuard, ConfigError> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ConfigError::BatchAlreadyRunning)?;
        debug!("批次标记已占用");
        Ok(BatchGuard {
            running: Arc::clone(&self.running),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// 批次运行期间持有，释放时清除标记
#[derive(Debug)]
pub struct BatchGuard {
    running: Arc<AtomicBool>,
}

impl Drop for BatchGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        debug!("批次标记已释放");
    }
}
