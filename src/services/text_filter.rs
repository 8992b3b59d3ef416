//! 文本过滤服务 - 业务能力层
//!
//! 只负责"这段文本能不能算一条有效评论"和"规格文本清洗"

use regex::Regex;

use crate::error::{HarvestError, Result};
use crate::models::site_profile::ContentFilter;

/// 规格前缀：日期 + "已购："，支持两种日期写法
const SPEC_PREFIX: &str =
    r"^\s*(?:\d{4}-\d{1,2}-\d{1,2}|\d{4}年\d{1,2}月\d{1,2}日)\s*已购\s*[：:]\s*";

/// 文本过滤器
pub struct TextFilter {
    boilerplate: Vec<String>,
    required: Regex,
    min_chars: usize,
    spec_prefix: Regex,
}

impl TextFilter {
    pub fn new(config: &ContentFilter) -> Result<Self> {
        let required = Regex::new(&config.required_chars).map_err(|e| {
            HarvestError::Config(format!("字符类正则无效 '{}': {}", config.required_chars, e))
        })?;
        let spec_prefix =
            Regex::new(SPEC_PREFIX).map_err(|e| HarvestError::Config(e.to_string()))?;
        Ok(Self {
            boilerplate: config
                .boilerplate
                .iter()
                .filter(|p| !p.is_empty())
                .cloned()
                .collect(),
            required,
            min_chars: config.min_chars,
            spec_prefix,
        })
    }

    /// 是否为模板化评论
    pub fn is_boilerplate(&self, text: &str) -> bool {
        self.boilerplate.iter().any(|p| text.contains(p.as_str()))
    }

    /// 是否是一条有效评论（调用方负责先去首尾空白）
    pub fn accept(&self, text: &str) -> bool {
        !text.is_empty()
            && text.chars().count() >= self.min_chars
            && self.required.is_match(text)
            && !self.is_boilerplate(text)
    }

    /// 清洗规格文本：去掉日期 + "已购："前缀并折叠空白
    pub fn clean_spec(&self, raw: &str) -> Option<String> {
        let stripped = self.spec_prefix.replace(raw, "");
        let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
        (!collapsed.is_empty()).then_some(collapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> TextFilter {
        TextFilter::new(&ContentFilter::default()).unwrap()
    }

    #[test]
    fn test_boilerplate_excluded() {
        let f = filter();
        assert!(!f.accept("该用户觉得商品非常好"));
        assert!(!f.accept("该用户未填写评价内容"));
        assert!(!f.accept("该用户觉得商品还行吧，给个好评"));
    }

    #[test]
    fn test_genuine_review_included() {
        let f = filter();
        assert!(f.accept("咖啡很香，回购第三次了"));
        assert!(f.accept("味道不错哦！"));
    }

    #[test]
    fn test_short_or_foreign_text_excluded() {
        let f = filter();
        assert!(!f.accept("好喝"));
        assert!(!f.accept(""));
        assert!(!f.accept("very good coffee"));
        assert!(f.accept("五个字好评"));
    }

    #[test]
    fn test_clean_spec_two_date_formats() {
        let f = filter();
        assert_eq!(f.clean_spec("2025-10-23已购：大杯/热").as_deref(), Some("大杯/热"));
        assert_eq!(f.clean_spec("2025年10月22日已购：中杯").as_deref(), Some("中杯"));
    }

    #[test]
    fn test_clean_spec_whitespace_and_empty() {
        let f = filter();
        assert_eq!(
            f.clean_spec("  2025-1-3 已购: 超大杯   少冰 ").as_deref(),
            Some("超大杯 少冰")
        );
        assert_eq!(f.clean_spec("颜色分类：黑色").as_deref(), Some("颜色分类：黑色"));
        assert_eq!(f.clean_spec("2025-10-23已购："), None);
        assert_eq!(f.clean_spec("   "), None);
    }

    #[test]
    fn test_invalid_required_chars_is_config_error() {
        let config = ContentFilter {
            required_chars: "[".to_string(),
            ..ContentFilter::default()
        };
        assert!(matches!(TextFilter::new(&config), Err(HarvestError::Config(_))));
    }
}
