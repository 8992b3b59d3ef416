use crate::error::{HarvestError, Result};
use crate::models::target::TargetFile;
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载目标列表与站点配置
pub async fn load_target_file(path: &Path) -> Result<TargetFile> {
    if !path.exists() {
        return Err(HarvestError::Config(format!(
            "目标配置文件不存在: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path).await.map_err(|e| {
        HarvestError::Config(format!("无法读取目标配置文件 {}: {}", path.display(), e))
    })?;

    let file: TargetFile = toml::from_str(&content).map_err(|e| {
        HarvestError::Config(format!("无法解析目标配置文件 {}: {}", path.display(), e))
    })?;

    for (index, target) in file.targets.iter().enumerate() {
        tracing::info!("{}. 商品名称: {}", index + 1, target.name);
        tracing::info!("   商品网址: {}", target.url);
        tracing::info!("   评论总数: {}", target.primary_limit);
        tracing::info!("   追评总数: {}", target.paired_limit);
        tracing::info!("   下载路径: {}", target.output_dir());
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_target_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [[targets]]
            name = "生椰拿铁"
            url = "https://item.taobao.com/item.htm?id=1"
            primary_limit = 20

            [site]
            no_more_markers = ["到底了"]
            "#,
        )
        .unwrap();

        let file = load_target_file(&path).await.unwrap();
        assert_eq!(file.targets.len(), 1);
        assert_eq!(file.targets[0].primary_limit, 20);
        assert_eq!(
            file.site.unwrap().no_more_markers,
            vec!["到底了".to_string()]
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let err = load_target_file(Path::new("definitely/not/here.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, HarvestError::Config(_)));
    }

    #[tokio::test]
    async fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[[targets]]\nname = ").unwrap();
        let err = load_target_file(&path).await.unwrap_err();
        assert!(matches!(err, HarvestError::Config(_)));
    }
}
