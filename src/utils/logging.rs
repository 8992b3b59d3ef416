use std::fs;
use std::io::Write;

use anyhow::Result;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::models::record::RunResult;
use crate::utils::events::RunEvent;

/// 初始化 tracing，`RUST_LOG` 优先
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n评论采集日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 把事件流追加写入日志文件，事件流关闭后结束
pub fn spawn_event_writer(
    log_file_path: String,
    mut events: UnboundedReceiver<RunEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut file = match fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file_path)
        {
            Ok(file) => Some(file),
            Err(e) => {
                warn!("⚠️ 无法打开日志文件 {}: {}", log_file_path, e);
                None
            }
        };

        while let Some(event) = events.recv().await {
            if let Some(f) = file.as_mut() {
                if let Err(e) = writeln!(f, "{}", event.to_line()) {
                    warn!("⚠️ 写入日志文件失败: {}", e);
                    file = None;
                }
            }
        }
    })
}

pub fn log_startup(target_count: usize, retry_budget: u32) {
    info!("{}", "=".repeat(60));
    info!("🚀 开始执行评论采集程序");
    info!("📋 目标数量: {}", target_count);
    info!("🔁 连续无新增上限: {}", retry_budget);
    info!("{}", "=".repeat(60));
}

/// 打印每个目标的最终数量
pub fn print_final_stats(results: &[RunResult], failed: usize, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    for result in results {
        info!(
            "  {} | 主评论 {} 条 | 追评对 {} 条",
            truncate_text(&result.target.name, 30),
            result.primary_records.len(),
            result.paired_records.len()
        );
    }
    info!("✅ 成功: {}/{}", results.len(), results.len() + failed);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
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
        assert_eq!(truncate_text("生椰拿铁", 10), "生椰拿铁");
        assert_eq!(truncate_text("生椰拿铁大杯", 4), "生椰拿铁...");
    }

    #[tokio::test]
    async fn test_event_writer_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harvest.log").display().to_string();
        init_log_file(&path).unwrap();

        let (emitter, rx) = crate::utils::events::EventEmitter::channel();
        let handle = spawn_event_writer(path.clone(), rx);
        emitter.emit(crate::utils::events::EventLevel::Info, "开始采集");
        drop(emitter);
        handle.await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("评论采集日志"));
        assert!(content.contains("开始采集"));
    }
}
