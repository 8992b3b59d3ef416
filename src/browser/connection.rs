use chromiumoxide::{Browser, Handler};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::error::Result;

/// 连接到已经开启远程调试端口的浏览器
///
/// 复用用户已登录的浏览器窗口，结束时不会关闭它
pub async fn connect_to_browser(port: u16) -> Result<Browser> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        e
    })?;
    spawn_event_loop(handler);

    // 等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    match browser.version().await {
        Ok(version) => info!("✓ 已连接浏览器: {}", version.product),
        Err(e) => warn!("⚠️ 无法读取浏览器版本: {}", e),
    }

    Ok(browser)
}

/// 在后台处理浏览器事件，连接断开后结束
pub(crate) fn spawn_event_loop(mut handler: Handler) {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                debug!("浏览器事件循环结束: {}", e);
                break;
            }
        }
    });
}
