//! # Apply Autofill
//!
//! 自动填写职位申请表单的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（浏览器标签页），只暴露能力
//! - `FormPage` - 驱动边界，核心逻辑只依赖这个 trait
//! - `CdpPage` / `JsExecutor` - 基于 chromiumoxide 的实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个字段或单个页面
//! - `registry` - 字段标签和结构化模式
//! - `FieldResolver` - 级联查找并写入字段
//! - `stability` / `page_meta` - 表单稳定检测、页面元数据
//! - `OutcomeRecorder` - 写 CSV 结果日志
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个职位页面"上的操作流程
//! - `JobCtx` - 上下文封装（序号 + job_id）
//! - `FillFlow` - 固定顺序填写（含姓名特例）
//! - `ReviewStep` - 人工审核 / 自动提交
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批次处理器，管理资源
//! - `orchestrator/job_processor` - 单个 URL 的状态机
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, ReviewMode};
pub use error::{AppError, AppResult};
pub use infrastructure::{CdpPage, FormPage, JsExecutor};
pub use models::{JobRecord, JobStatus, Profile};
pub use orchestrator::{App, BatchGate, BatchRequest, BatchRunner, BatchSummary};
pub use services::{FieldResolver, SemanticField};
