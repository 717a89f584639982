//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批次调度和单个职位的状态机，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量职位处理器
//! - 管理应用生命周期（初始化、运行、释放浏览器）
//! - 校验 URL 列表
//! - 顺序处理每个 URL，输出全局统计
//!
//! ### `job_processor` - 单个职位处理器
//! - 导航 → 稳定检测 → 元数据 → 填写 → 审核 → 记录
//! - 把单个 URL 的错误收敛为一条 `error` 记录
//!
//! ### `gate` - 批次互斥
//! - 同一进程内拒绝第二个并发批次
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<Url>)
//!     ↓
//! job_processor (处理单个 Url)
//!     ↓
//! workflow::{FillFlow, ReviewStep}
//!     ↓
//! services (能力层：registry / resolver / stability / meta / recorder)
//!     ↓
//! infrastructure (基础设施：FormPage / CdpPage / JsExecutor)
//! ```

pub mod batch_processor;
pub mod gate;
pub mod job_processor;

// 重新导出主要类型
pub use batch_processor::{App, BatchRequest, BatchRunner, BatchSummary};
pub use gate::{BatchGate, BatchGuard};
pub use job_processor::JobProcessor;
