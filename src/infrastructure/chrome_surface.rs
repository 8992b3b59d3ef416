//! DevTools 页面能力实现
//!
//! 滚动与批量读取通过 [`JsExecutor`] 执行生成的脚本，
//! 点击走 DevTools 元素句柄（真实鼠标事件）。

use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::element::Element;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::debug;

use crate::error::{HarvestError, Result};
use crate::infrastructure::js_executor::JsExecutor;
use crate::infrastructure::surface::{
    ElementQuery, ElementSnapshot, Locator, ScrollMetrics, ScrollTarget, Surface,
};

/// 绑定到单个隔离会话的页面
pub struct ChromeSurface {
    executor: JsExecutor,
    context_id: Option<BrowserContextId>,
}

#[derive(Debug, Deserialize)]
struct ScrollLookup {
    found: bool,
    #[serde(default)]
    metrics: Option<ScrollMetrics>,
}

#[derive(Debug, Deserialize)]
struct FoundFlag {
    found: bool,
}

impl ChromeSurface {
    pub fn new(executor: JsExecutor, context_id: Option<BrowserContextId>) -> Self {
        Self {
            executor,
            context_id,
        }
    }

    /// 拆出执行器与浏览器上下文，用于释放会话
    pub fn into_parts(self) -> (JsExecutor, Option<BrowserContextId>) {
        (self.executor, self.context_id)
    }
}

/// 生成"解析出目标元素"的 JS 表达式
fn element_expr(target: &ScrollTarget) -> Result<String> {
    let expr = match target {
        ScrollTarget::Page => "(document.scrollingElement || document.documentElement)".to_string(),
        ScrollTarget::Element(Locator::Css(selector)) => {
            format!("document.querySelector({})", serde_json::to_string(selector)?)
        }
        ScrollTarget::Element(locator) => {
            let xpath = locator
                .to_xpath()
                .ok_or_else(|| HarvestError::surface(format!("无法转换为 XPath: {}", locator)))?;
            format!(
                "document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
                serde_json::to_string(&xpath)?
            )
        }
    };
    Ok(expr)
}

fn scroll_metrics_js(target: &ScrollTarget) -> Result<String> {
    Ok(format!(
        r#"
        (() => {{
            const el = {};
            if (!el) return {{ found: false }};
            return {{
                found: true,
                metrics: {{
                    contentHeight: el.scrollHeight,
                    viewHeight: el.clientHeight,
                    currentOffset: el.scrollTop
                }}
            }};
        }})()
        "#,
        element_expr(target)?
    ))
}

fn scroll_to_js(target: &ScrollTarget, offset: f64) -> Result<String> {
    let apply = match target {
        ScrollTarget::Page => "window.scrollTo(0, offset);",
        ScrollTarget::Element(_) => "el.scrollTop = offset;",
    };
    Ok(format!(
        r#"
        (() => {{
            const el = {};
            if (!el) return {{ found: false }};
            const offset = {};
            {}
            return {{ found: true }};
        }})()
        "#,
        element_expr(target)?,
        offset,
        apply
    ))
}

fn read_all_js(query: &ElementQuery) -> Result<String> {
    Ok(format!(
        r#"
        (() => {{
            const query = {};
            const textOf = (el) => ((el && (el.innerText || el.textContent)) || '').trim();
            const out = [];
            document.querySelectorAll(query.selector).forEach((el) => {{
                try {{
                    const scope = query.scope ? (el.closest(query.scope) || el) : el;
                    let annotation = null;
                    if (query.annotation) {{
                        const a = scope.querySelector(query.annotation);
                        if (a) annotation = textOf(a);
                    }}
                    const parts = {{}};
                    (query.parts || []).forEach((p) => {{
                        const texts = [];
                        el.querySelectorAll(p.selector).forEach((child) => {{
                            if (p.exclude_class && child.classList.contains(p.exclude_class)) return;
                            texts.push(textOf(child));
                        }});
                        parts[p.name] = texts;
                    }});
                    out.push({{ text: textOf(el), annotation, parts }});
                }} catch (e) {{
                    out.push({{ text: '', annotation: null, parts: {{}} }});
                }}
            }});
            return out;
        }})()
        "#,
        serde_json::to_string(query)?
    ))
}

const PAGE_TEXT_JS: &str = "(() => (document.body ? document.body.innerText : ''))()";

const IS_VISIBLE_FN: &str = "function() { return this.offsetParent !== null; }";

/// 可见性检查失败（元素已脱离文档等）按不可见处理
async fn is_visible(element: &Element) -> bool {
    match element.call_js_fn(IS_VISIBLE_FN, false).await {
        Ok(returns) => returns
            .result
            .value
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        Err(e) => {
            debug!("可见性检查失败: {}", e);
            false
        }
    }
}

impl Surface for ChromeSurface {
    type Handle = Element;

    async fn scroll_metrics(&self, target: &ScrollTarget) -> Result<ScrollMetrics> {
        let lookup: ScrollLookup = self.executor.eval_as(scroll_metrics_js(target)?).await?;
        match (lookup.found, lookup.metrics) {
            (true, Some(metrics)) => Ok(metrics),
            _ => Err(HarvestError::surface(format!("未找到滚动容器: {}", target))),
        }
    }

    async fn scroll_to(&self, target: &ScrollTarget, offset: f64) -> Result<()> {
        let flag: FoundFlag = self.executor.eval_as(scroll_to_js(target, offset)?).await?;
        if flag.found {
            Ok(())
        } else {
            Err(HarvestError::surface(format!("未找到滚动容器: {}", target)))
        }
    }

    async fn find_affordance(&self, locator: &Locator) -> Result<Option<Element>> {
        let page = self.executor.page();
        let found = match locator {
            Locator::Css(selector) => page.find_elements(selector.as_str()).await,
            other => match other.to_xpath() {
                Some(xpath) => page.find_xpaths(xpath).await,
                None => return Ok(None),
            },
        };
        let candidates = match found {
            Ok(elements) => elements,
            Err(e) => {
                debug!("定位 {} 未命中: {}", locator, e);
                return Ok(None);
            }
        };

        // 按文档顺序返回第一个可见元素，隐藏的模板节点跳过
        for element in candidates {
            if is_visible(&element).await {
                return Ok(Some(element));
            }
        }
        debug!("定位 {} 只有不可见元素", locator);
        Ok(None)
    }

    async fn click(&self, handle: &Element) -> Result<()> {
        handle.click().await?;
        Ok(())
    }

    async fn read_all_matching(&self, query: &ElementQuery) -> Result<Vec<ElementSnapshot>> {
        self.executor.eval_as(read_all_js(query)?).await
    }

    async fn page_text(&self) -> Result<String> {
        self.executor.eval_as(PAGE_TEXT_JS).await
    }

    async fn wait(&self, ms: u64) {
        sleep(Duration::from_millis(ms)).await;
    }
}
