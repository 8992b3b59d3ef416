//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 读取目标配置与登录凭证
//! - 连接或启动浏览器
//! - 写出结果、输出全局统计
//!
//! ### `target_runner` - 目标运行器
//! - 顺序处理目标列表
//! - 为每个目标申请、释放隔离会话
//! - 响应停止信号
//!
//! ### `target_processor` - 单个目标处理器
//! - 登录检测、展开评论浮层
//! - 依次运行主评论与追评两个阶段
//!
//! ## 层次关系
//!
//! ```text
//! app (处理 Vec<Target>，持有浏览器)
//!     ↓
//! target_runner (会话生命周期)
//!     ↓
//! target_processor (单个 Target)
//!     ↓
//! workflow::ConvergenceEngine (单个阶段)
//!     ↓
//! services (抽取策略 / 文本过滤 / 会话引导 / 结果写入)
//!     ↓
//! infrastructure (Surface：ChromeSurface / JsExecutor)
//! ```

pub mod app;
pub mod target_processor;
pub mod target_runner;

pub use app::App;
pub use target_processor::{harvest_target, Strategies};
pub use target_runner::{RunSummary, TargetFailure, TargetRunner};
