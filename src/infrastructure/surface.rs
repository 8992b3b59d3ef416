//! 页面能力契约 - 基础设施层
//!
//! 核心算法只通过 [`Surface`] 访问页面：读滚动几何、滚动、
//! 查找可点击元素、点击、批量读取元素快照、读页面文本、等待。
//! 定位描述全部是数据（[`Locator`] / [`ElementQuery`]），
//! 换站点时只换配置，不动引擎。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// 元素定位描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locator {
    /// CSS 选择器
    Css(String),
    /// XPath 表达式
    #[serde(rename = "xpath")]
    XPath(String),
    /// 在给定标签中按可见文本包含匹配
    Text { contains: String, tags: Vec<String> },
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(expr: impl Into<String>) -> Self {
        Locator::XPath(expr.into())
    }

    pub fn text(contains: impl Into<String>, tags: &[&str]) -> Self {
        Locator::Text {
            contains: contains.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// 是否为页面骨架定位（XPath），骨架定位使用较短的超时
    pub fn is_landmark(&self) -> bool {
        matches!(self, Locator::XPath(_))
    }

    /// 转换为等价的 XPath，文本匹配也能走 DevTools 的 XPath 查询
    ///
    /// 文本匹配比较元素的完整字符串值（含子元素文本），与 `textContent` 一致
    pub fn to_xpath(&self) -> Option<String> {
        match self {
            Locator::Css(_) => None,
            Locator::XPath(expr) => Some(expr.clone()),
            Locator::Text { contains, tags } => {
                let literal = xpath_literal(contains);
                let tag_test = if tags.is_empty() {
                    "*".to_string()
                } else {
                    let alternatives: Vec<String> =
                        tags.iter().map(|t| format!("self::{}", t)).collect();
                    format!("*[{}]", alternatives.join(" or "))
                };
                Some(format!("//{}[contains(., {})]", tag_test, literal))
            }
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css:{}", s),
            Locator::XPath(s) => write!(f, "xpath:{}", s),
            Locator::Text { contains, .. } => write!(f, "text:{}", contains),
        }
    }
}

/// XPath 1.0 没有转义，含双引号时用 concat 拼接
fn xpath_literal(s: &str) -> String {
    if !s.contains('"') {
        return format!("\"{}\"", s);
    }
    if !s.contains('\'') {
        return format!("'{}'", s);
    }
    let parts: Vec<String> = s.split('"').map(|p| format!("\"{}\"", p)).collect();
    format!("concat({})", parts.join(", '\"', "))
}

/// 滚动目标：某个容器元素或整个页面
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollTarget {
    Element(Locator),
    Page,
}

impl std::fmt::Display for ScrollTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrollTarget::Element(locator) => write!(f, "{}", locator),
            ScrollTarget::Page => write!(f, "整个页面"),
        }
    }
}

/// 滚动几何
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollMetrics {
    pub content_height: f64,
    pub view_height: f64,
    pub current_offset: f64,
}

impl ScrollMetrics {
    /// 可滚动到的最大偏移
    pub fn max_offset(&self) -> f64 {
        (self.content_height - self.view_height).max(0.0)
    }
}

/// 子元素查询：在匹配到的元素内部按选择器取文本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartQuery {
    pub name: String,
    pub selector: String,
    /// 带有该类名的元素不参与取文本
    #[serde(default)]
    pub exclude_class: Option<String>,
}

/// 批量元素查询
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementQuery {
    /// 匹配的元素
    pub selector: String,
    /// 向上查找的条目容器，用于定位规格标注；为空时在元素自身内查找
    #[serde(default)]
    pub scope: Option<String>,
    /// 规格标注选择器
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub parts: Vec<PartQuery>,
}

/// 元素快照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    /// 元素自身可见文本（已去首尾空白）
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub annotation: Option<String>,
    /// 子元素文本，键为 [`PartQuery::name`]
    #[serde(default)]
    pub parts: HashMap<String, Vec<String>>,
}

impl ElementSnapshot {
    /// 取某个子元素的全部文本；缺失时为空
    pub fn part(&self, name: &str) -> &[String] {
        self.parts.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// 页面能力
///
/// 任何操作都可能失败（页面未就绪、已离开），
/// 调用方把失败视为"本周期无进展"。
#[allow(async_fn_in_trait)]
pub trait Surface {
    /// 可点击元素句柄
    type Handle;

    async fn scroll_metrics(&self, target: &ScrollTarget) -> Result<ScrollMetrics>;

    async fn scroll_to(&self, target: &ScrollTarget, offset: f64) -> Result<()>;

    /// 查找第一个可见的匹配元素
    async fn find_affordance(&self, locator: &Locator) -> Result<Option<Self::Handle>>;

    async fn click(&self, handle: &Self::Handle) -> Result<()>;

    async fn read_all_matching(&self, query: &ElementQuery) -> Result<Vec<ElementSnapshot>>;

    async fn page_text(&self) -> Result<String>;

    async fn page_contains_any_of(&self, markers: &[String]) -> Result<bool> {
        let text = self.page_text().await?;
        Ok(markers.iter().any(|m| !m.is_empty() && text.contains(m.as_str())))
    }

    /// 协作式等待，不阻塞线程
    async fn wait(&self, ms: u64);
}
