//! 站点配置
//!
//! 所有与具体站点相关的定位器、过滤词与提示文本都集中在这里，
//! 默认值对应淘宝/天猫商品详情页的评论浮层。

use serde::{Deserialize, Serialize};

use crate::infrastructure::surface::{ElementQuery, Locator, PartQuery};

/// 追评条目中各子元素的名称
pub const PART_ORIGINAL: &str = "original";
pub const PART_FOLLOW_UP: &str = "follow_up";
pub const PART_CONTENT: &str = "content";

/// 内容过滤规则
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentFilter {
    /// 模板化评论片段，包含任一即丢弃
    pub boilerplate: Vec<String>,
    /// 必须包含的字符类（正则）
    pub required_chars: String,
    /// 最小字符数
    pub min_chars: usize,
}

impl Default for ContentFilter {
    fn default() -> Self {
        Self {
            boilerplate: vec![
                "该用户觉得商品非常好".to_string(),
                "该用户未填写评价内容".to_string(),
                "该用户觉得商品".to_string(),
            ],
            required_chars: "[一-龯]".to_string(),
            min_chars: 5,
        }
    }
}

/// 站点配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteProfile {
    /// 评论滚动容器，按顺序尝试，全部失败时滚动整个页面
    pub scroll_containers: Vec<Locator>,
    /// "查看全部评价"
    pub show_all: Vec<Locator>,
    /// "加载更多"
    pub load_more: Vec<Locator>,
    /// 追评标签页
    pub paired_tab: Vec<Locator>,
    /// 主评论查询
    pub primary_query: ElementQuery,
    /// 追评条目查询
    pub paired_query: ElementQuery,
    pub filter: ContentFilter,
    /// "没有更多"提示
    pub no_more_markers: Vec<String>,
    /// 登录提示
    pub login_prompts: Vec<String>,
    /// 已登录界面标志
    pub user_markers: Vec<String>,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            scroll_containers: vec![
                Locator::xpath("/html/body/div[7]/div[2]/div[2]/div[3]"),
                Locator::css(".comments--ChxC7GEN"),
                Locator::css("[class*=\"comments\"]"),
                Locator::css("[class*=\"comment\"]"),
            ],
            show_all: vec![Locator::css(".ShowButton--fMu7HZNs")],
            load_more: vec![
                Locator::css(".comment-show-more"),
                Locator::text("加载更多", &["button", "span", "div"]),
                Locator::css("[class*=\"more\"]"),
                Locator::css("[data-spm-click*=\"more\"]"),
            ],
            paired_tab: vec![
                Locator::xpath("/html/body/div[7]/div[2]/div[2]/div[2]/div[1]/span[3]"),
                Locator::css(".imprItem--fTAkDWa5"),
            ],
            primary_query: ElementQuery {
                selector: ".content--uonoOhaz".to_string(),
                scope: Some(".Comment--H5QmJwe9".to_string()),
                annotation: Some("[class*=\"skuText\"]".to_string()),
                parts: Vec::new(),
            },
            paired_query: ElementQuery {
                selector: ".Comment--H5QmJwe9".to_string(),
                scope: None,
                annotation: Some("[class*=\"skuText\"]".to_string()),
                parts: vec![
                    PartQuery {
                        name: PART_ORIGINAL.to_string(),
                        selector: ".contentWrapper--cSa5gEtn .content--uonoOhaz".to_string(),
                        exclude_class: None,
                    },
                    PartQuery {
                        name: PART_FOLLOW_UP.to_string(),
                        selector: ".append--WvlQlFdT .content--uonoOhaz span".to_string(),
                        exclude_class: Some("appendInternal--bdb3JNSs".to_string()),
                    },
                    PartQuery {
                        name: PART_CONTENT.to_string(),
                        selector: ".content--uonoOhaz".to_string(),
                        exclude_class: None,
                    },
                ],
            },
            filter: ContentFilter::default(),
            no_more_markers: vec!["没有更多".to_string(), "已显示全部".to_string()],
            login_prompts: vec![
                "亲，请登录".to_string(),
                "密码登录".to_string(),
                "短信登录".to_string(),
                "扫码登录".to_string(),
            ],
            user_markers: vec!["退出".to_string(), "我的淘宝".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let profile: SiteProfile = toml::from_str(
            r#"
            no_more_markers = ["到底了"]

            [filter]
            min_chars = 8
            "#,
        )
        .unwrap();

        assert_eq!(profile.no_more_markers, vec!["到底了".to_string()]);
        assert_eq!(profile.filter.min_chars, 8);
        assert_eq!(profile.filter.required_chars, "[一-龯]");
        assert_eq!(profile.scroll_containers, SiteProfile::default().scroll_containers);
    }

    #[test]
    fn test_paired_query_has_all_parts() {
        let profile = SiteProfile::default();
        let names: Vec<&str> = profile
            .paired_query
            .parts
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec![PART_ORIGINAL, PART_FOLLOW_UP, PART_CONTENT]);
    }
}
