//! # Review Harvest
//!
//! 从商品页面的无限滚动评论浮层中采集主评论与追评，并写出工作簿
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有页面，只暴露能力
//! - `Surface` - 滚动、查找、点击、批量读取等页面能力
//! - `ChromeSurface` / `JsExecutor` - 基于 DevTools 的实现
//! - `browser/` - 连接或启动浏览器，为每个目标创建隔离会话
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `TextFilter` - 评论文本过滤与规格清洗
//! - `PrimaryItemStrategy` / `PairedItemStrategy` - 两种抽取策略
//! - `session_bootstrap` - 凭证读取与登录检测
//! - `WorkbookSink` - 结果写入
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个阶段"的收敛循环
//! - `TargetCtx` - 上下文封装（目标序号 + 名称）
//! - `ConvergenceEngine` - 滚动 → 抽取 → 合并 → 判断停止
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 应用入口，管理浏览器与输出
//! - `orchestrator/target_runner` - 顺序处理目标，管理会话生命周期
//! - `orchestrator/target_processor` - 单个目标的两阶段处理

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
pub use config::{BrowserMode, Config, Timing};
pub use error::{HarvestError, Result};
pub use infrastructure::{ChromeSurface, JsExecutor, SessionProvider, Surface};
pub use models::{PairedRecord, PrimaryRecord, RunResult, SiteProfile, Target};
pub use orchestrator::{App, RunSummary, TargetRunner};
pub use workflow::{ConvergenceEngine, RunCtx, TargetCtx};
