//! JS 执行器 - 基础设施层
//!
//! 持有会话内唯一的 page，只暴露"执行脚本并取回结构化结果"的能力

use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{HarvestError, Result};
use crate::utils::logging::truncate_text;

/// JS 执行器
///
/// 不认识评论 / 追评，也不处理采集流程
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于查找元素句柄）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 交还 page（用于关闭会话）
    pub fn into_page(self) -> Page {
        self.page
    }

    /// 执行脚本并反序列化结果
    ///
    /// 脚本返回 `undefined` 时视为页面能力不可用
    pub async fn eval_as<T: DeserializeOwned>(&self, script: impl Into<String>) -> Result<T> {
        let script = script.into();
        let evaluation = self.page.evaluate(script.clone()).await?;

        let Some(value) = evaluation.value() else {
            debug!("脚本没有返回值: {}", truncate_text(script.trim(), 80));
            return Err(HarvestError::surface("脚本没有返回值"));
        };
        Ok(serde_json::from_value(value.clone())?)
    }
}
