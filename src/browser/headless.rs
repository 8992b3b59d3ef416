use std::path::Path;

use chromiumoxide::{Browser, BrowserConfig};
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::browser::connection::spawn_event_loop;
use crate::error::{HarvestError, Result};

/// 自行启动浏览器
///
/// `headless` 为 false 时显示窗口，方便人工观察滚动过程
pub async fn launch_browser(executable: Option<&str>, headless: bool) -> Result<Browser> {
    info!(
        "🚀 启动浏览器（{}）...",
        if headless { "无头模式" } else { "有界面模式" }
    );

    let mut builder = BrowserConfig::builder();
    builder = if headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };
    if let Some(path) = executable {
        debug!("浏览器可执行文件: {}", path);
        builder = builder.chrome_executable(Path::new(path));
    }

    let config = builder
        .args(vec![
            "--disable-gpu",
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--disable-blink-features=AutomationControlled",
        ])
        .build()
        .map_err(|e| {
            error!("配置浏览器失败: {}", e);
            HarvestError::Config(format!("配置浏览器失败: {}", e))
        })?;

    let (browser, handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        e
    })?;
    spawn_event_loop(handler);
    debug!("浏览器启动成功");

    sleep(tokio::time::Duration::from_millis(300)).await;

    Ok(browser)
}
