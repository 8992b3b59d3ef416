use serde::{Deserialize, Serialize};

use crate::models::site_profile::SiteProfile;

/// 默认输出目录
pub const DEFAULT_OUTPUT_DIR: &str = "./save_data/";

/// 一个采集目标（一个商品页面）
///
/// 配置表沿用原有的中文列名作为别名。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    #[serde(alias = "商品名称")]
    pub name: String,
    #[serde(alias = "商品网址")]
    pub url: String,
    #[serde(alias = "评论总数", default = "default_primary_limit")]
    pub primary_limit: usize,
    #[serde(alias = "追评总数", default = "default_paired_limit")]
    pub paired_limit: usize,
    #[serde(alias = "下载路径", default)]
    pub output_dir: Option<String>,
}

fn default_primary_limit() -> usize {
    1000
}

fn default_paired_limit() -> usize {
    100
}

impl Target {
    /// 实际使用的输出目录，空字符串视为未设置
    pub fn output_dir(&self) -> &str {
        match self.output_dir.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => dir,
            _ => DEFAULT_OUTPUT_DIR,
        }
    }
}

/// 目标配置文件
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetFile {
    #[serde(default)]
    pub targets: Vec<Target>,
    /// 覆盖默认站点配置
    #[serde(default)]
    pub site: Option<SiteProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_defaults_and_aliases() {
        let file: TargetFile = toml::from_str(
            r#"
            [[targets]]
            "商品名称" = "生椰拿铁"
            "商品网址" = "https://item.taobao.com/item.htm?id=1"

            [[targets]]
            name = "美式"
            url = "https://item.taobao.com/item.htm?id=2"
            primary_limit = 50
            paired_limit = 0
            output_dir = "  "
            "#,
        )
        .unwrap();

        assert_eq!(file.targets.len(), 2);
        let first = &file.targets[0];
        assert_eq!(first.name, "生椰拿铁");
        assert_eq!(first.primary_limit, 1000);
        assert_eq!(first.paired_limit, 100);
        assert_eq!(first.output_dir(), DEFAULT_OUTPUT_DIR);

        let second = &file.targets[1];
        assert_eq!(second.primary_limit, 50);
        assert_eq!(second.paired_limit, 0);
        assert_eq!(second.output_dir(), DEFAULT_OUTPUT_DIR);
        assert!(file.site.is_none());
    }
}
