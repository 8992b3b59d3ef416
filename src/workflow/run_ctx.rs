//! 运行上下文
//!
//! 封装"我正在处理第几个商品"这一信息，并把进度同时写到
//! tracing 日志和运行事件流，替代全局的运行状态。

use std::fmt::Display;

use tracing::{error, info, warn};

use crate::utils::events::{EventEmitter, EventLevel};

/// 一次运行的上下文
#[derive(Debug, Clone)]
pub struct RunCtx {
    emitter: EventEmitter,
}

impl RunCtx {
    pub fn new(emitter: EventEmitter) -> Self {
        Self { emitter }
    }

    /// 派生出某个目标的上下文
    pub fn for_target(&self, target_index: usize, target_name: &str) -> TargetCtx {
        TargetCtx {
            target_index,
            target_name: target_name.to_string(),
            emitter: self.emitter.clone(),
        }
    }

    pub fn info(&self, message: impl AsRef<str>) {
        info!("{}", message.as_ref());
        self.emitter.emit(EventLevel::Info, message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        warn!("{}", message.as_ref());
        self.emitter.emit(EventLevel::Warn, message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        error!("{}", message.as_ref());
        self.emitter.emit(EventLevel::Error, message.as_ref());
    }
}

/// 单个目标的上下文
#[derive(Debug, Clone)]
pub struct TargetCtx {
    /// 目标序号（从1开始，仅用于日志显示）
    pub target_index: usize,
    pub target_name: String,
    emitter: EventEmitter,
}

impl TargetCtx {
    pub fn info(&self, message: impl Display) {
        let line = format!("{} {}", self, message);
        info!("{}", line);
        self.emitter.emit(EventLevel::Info, line);
    }

    pub fn warn(&self, message: impl Display) {
        let line = format!("{} {}", self, message);
        warn!("{}", line);
        self.emitter.emit(EventLevel::Warn, line);
    }

    pub fn error(&self, message: impl Display) {
        let line = format!("{} {}", self, message);
        error!("{}", line);
        self.emitter.emit(EventLevel::Error, line);
    }
}

impl Display for TargetCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[商品 #{} {}]", self.target_index, self.target_name)
    }
}
