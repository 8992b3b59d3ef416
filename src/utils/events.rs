//! 运行事件流
//!
//! 采集过程中的进度与日志以有序事件的形式发出，
//! 由外部管理端（或本程序的日志文件写入任务）消费。

use chrono::{DateTime, Local};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// 事件级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for EventLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventLevel::Info => write!(f, "INFO"),
            EventLevel::Warn => write!(f, "WARN"),
            EventLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// 运行事件
#[derive(Debug, Clone)]
pub struct RunEvent {
    pub level: EventLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

impl RunEvent {
    /// 单行文本形式
    pub fn to_line(&self) -> String {
        format!(
            "[{}] {:<5} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.level,
            self.message
        )
    }
}

/// 事件发送端，没有消费者时静默丢弃
#[derive(Debug, Clone, Default)]
pub struct EventEmitter {
    tx: Option<UnboundedSender<RunEvent>>,
}

impl EventEmitter {
    /// 创建一对发送端 / 接收端
    pub fn channel() -> (Self, UnboundedReceiver<RunEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// 不接任何消费者
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, level: EventLevel, message: impl Into<String>) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(RunEvent {
                level,
                message: message.into(),
                timestamp: Local::now(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_keep_order() {
        let (emitter, mut rx) = EventEmitter::channel();
        emitter.emit(EventLevel::Info, "第一条");
        emitter.clone().emit(EventLevel::Warn, "第二条");
        emitter.emit(EventLevel::Error, "第三条");
        drop(emitter);

        let messages: Vec<(EventLevel, String)> = tokio_test::block_on(async {
            let mut out = Vec::new();
            while let Some(event) = rx.recv().await {
                out.push((event.level, event.message));
            }
            out
        });

        assert_eq!(
            messages,
            vec![
                (EventLevel::Info, "第一条".to_string()),
                (EventLevel::Warn, "第二条".to_string()),
                (EventLevel::Error, "第三条".to_string()),
            ]
        );
    }

    #[test]
    fn test_disabled_emitter_is_silent() {
        EventEmitter::disabled().emit(EventLevel::Info, "无人接收");
    }

    #[test]
    fn test_event_line_format() {
        let (emitter, mut rx) = EventEmitter::channel();
        emitter.emit(EventLevel::Warn, "零条记录");
        let event = rx.try_recv().unwrap();
        let line = event.to_line();
        assert!(line.contains("WARN"));
        assert!(line.ends_with("零条记录"));
    }
}
