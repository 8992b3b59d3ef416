//! 隔离会话
//!
//! 每个目标新建一个浏览器上下文（独立的 cookie 存储），
//! 注入凭证后在其中打开页面并导航；释放时关闭页面并销毁上下文。

use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::network::{CookieParam, SetCookiesParams};
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::{Browser, Page};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::config::Timing;
use crate::error::{HarvestError, Result};
use crate::infrastructure::{ChromeSurface, JsExecutor, SessionProvider};
use crate::models::target::Target;

/// 基于 DevTools 浏览器上下文的会话提供者
pub struct ChromeSessions {
    browser: Browser,
    cookies: Vec<CookieParam>,
    timing: Timing,
    /// 是否由本程序启动（决定结束时是否关闭浏览器）
    owned: bool,
}

impl ChromeSessions {
    pub fn new(browser: Browser, cookies: Vec<CookieParam>, timing: Timing, owned: bool) -> Self {
        Self {
            browser,
            cookies,
            timing,
            owned,
        }
    }

    /// 结束运行：自行启动的浏览器会被关闭，连接的浏览器保持原样
    pub async fn shutdown(mut self) {
        if !self.owned {
            debug!("保留外部浏览器");
            return;
        }
        info!("🔒 关闭浏览器...");
        if let Err(e) = self.browser.close().await {
            warn!("⚠️ 关闭浏览器失败: {}", e);
            return;
        }
        if let Err(e) = self.browser.wait().await {
            warn!("⚠️ 等待浏览器退出失败: {}", e);
        }
    }

    async fn create_context(&self) -> Result<BrowserContextId> {
        let created = self
            .browser
            .execute(CreateBrowserContextParams::default())
            .await?;
        Ok(created.result.browser_context_id)
    }

    async fn dispose_context(&self, context_id: BrowserContextId) {
        if let Err(e) = self
            .browser
            .execute(DisposeBrowserContextParams::new(context_id))
            .await
        {
            warn!("⚠️ 销毁浏览器上下文失败: {}", e);
        }
    }

    /// 在上下文内打开页面、注入凭证并导航
    async fn open_page(&self, context_id: &BrowserContextId, target: &Target) -> Result<Page> {
        let mut params = CreateTargetParams::new("about:blank");
        params.browser_context_id = Some(context_id.clone());
        let page = self.browser.new_page(params).await?;

        if let Err(e) = self.prepare_page(&page, target).await {
            if let Err(close_err) = page.close().await {
                debug!("关闭页面失败: {}", close_err);
            }
            return Err(e);
        }
        Ok(page)
    }

    async fn prepare_page(&self, page: &Page, target: &Target) -> Result<()> {
        if !self.cookies.is_empty() {
            page.execute(SetCookiesParams::new(self.cookies.clone()))
                .await?;
            debug!("已注入 {} 条 cookie", self.cookies.len());
        }

        info!("🌐 导航到商品页面: {}", target.url);
        let navigation = timeout(
            Duration::from_millis(self.timing.navigation_timeout_ms),
            page.goto(target.url.as_str()),
        )
        .await;

        match navigation {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                return Err(HarvestError::Navigation {
                    url: target.url.clone(),
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                return Err(HarvestError::Navigation {
                    url: target.url.clone(),
                    reason: format!("超过 {} 毫秒", self.timing.navigation_timeout_ms),
                })
            }
        }

        sleep(Duration::from_millis(self.timing.post_navigation_ms)).await;
        Ok(())
    }
}

impl SessionProvider for ChromeSessions {
    type Surface = ChromeSurface;

    async fn provision(&mut self, target: &Target) -> Result<ChromeSurface> {
        let context_id = self.create_context().await?;
        debug!("已创建浏览器上下文: {:?}", context_id);

        match self.open_page(&context_id, target).await {
            Ok(page) => Ok(ChromeSurface::new(JsExecutor::new(page), Some(context_id))),
            Err(e) => {
                self.dispose_context(context_id).await;
                Err(e)
            }
        }
    }

    async fn release(&mut self, surface: ChromeSurface) {
        let (executor, context_id) = surface.into_parts();
        if let Err(e) = executor.into_page().close().await {
            debug!("关闭页面失败: {}", e);
        }
        if let Some(id) = context_id {
            self.dispose_context(id).await;
        }
        debug!("会话已释放");
    }
}
