//! 会话引导服务 - 业务能力层
//!
//! 负责登录凭证的读取、规范化、转换为 DevTools cookie，
//! 以及导航后的登录状态检测。

use std::path::Path;

use chromiumoxide::cdp::browser_protocol::network::{CookieParam, CookieSameSite, TimeSinceEpoch};
use tracing::{debug, warn};

use crate::error::{HarvestError, Result};
use crate::infrastructure::surface::Surface;
use crate::models::credential::{NormalizedCredential, SameSitePolicy, SessionCredential};
use crate::models::site_profile::SiteProfile;

/// 读取并规范化登录凭证
///
/// 读取或解析失败、凭证为空都属于致命错误
pub async fn load_credentials(path: &Path) -> Result<Vec<NormalizedCredential>> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        HarvestError::Session(format!("无法读取凭证文件 {}: {}", path.display(), e))
    })?;

    let raw: Vec<SessionCredential> = serde_json::from_str(&content).map_err(|e| {
        HarvestError::Session(format!("无法解析凭证文件 {}: {}", path.display(), e))
    })?;

    if raw.is_empty() {
        return Err(HarvestError::Session(format!(
            "凭证文件为空: {}",
            path.display()
        )));
    }

    let normalized: Vec<NormalizedCredential> = raw.iter().map(SessionCredential::normalize).collect();
    debug!("已加载 {} 条 cookie", normalized.len());
    Ok(normalized)
}

/// 转换为 DevTools 的 cookie 参数
pub fn to_cookie_params(credentials: &[NormalizedCredential]) -> Result<Vec<CookieParam>> {
    credentials
        .iter()
        .map(|c| {
            let mut builder = CookieParam::builder().name(c.name.clone()).value(c.value.clone());
            if let Some(domain) = &c.domain {
                builder = builder.domain(domain.clone());
            }
            if let Some(path) = &c.path {
                builder = builder.path(path.clone());
            }
            if let Some(secure) = c.secure {
                builder = builder.secure(secure);
            }
            if let Some(http_only) = c.http_only {
                builder = builder.http_only(http_only);
            }
            if let Some(policy) = c.same_site {
                builder = builder.same_site(match policy {
                    SameSitePolicy::Strict => CookieSameSite::Strict,
                    SameSitePolicy::Lax => CookieSameSite::Lax,
                    SameSitePolicy::None => CookieSameSite::None,
                });
            }
            if let Some(expires) = c.expires {
                builder = builder.expires(TimeSinceEpoch::new(expires));
            }
            builder
                .build()
                .map_err(|e| HarvestError::Session(format!("cookie {} 无效: {}", c.name, e)))
        })
        .collect()
}

/// 登录状态检测（尽力而为）
///
/// 页面出现登录提示且没有任何已登录标志时判定为未登录。
/// 读取页面失败时不判定失败。
pub async fn is_logged_in<S: Surface>(surface: &S, profile: &SiteProfile) -> bool {
    let text = match surface.page_text().await {
        Ok(text) => text,
        Err(e) => {
            warn!("⚠️ 无法读取页面文本，跳过登录检测: {}", e);
            return true;
        }
    };
    login_verdict(&text, profile)
}

fn login_verdict(page_text: &str, profile: &SiteProfile) -> bool {
    let contains_any = |markers: &[String]| {
        markers
            .iter()
            .any(|m| !m.is_empty() && page_text.contains(m.as_str()))
    };
    let prompt_shown = contains_any(&profile.login_prompts);
    let user_shown = contains_any(&profile.user_markers);
    !(prompt_shown && !user_shown)
}
