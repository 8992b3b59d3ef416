use thiserror::Error;

/// 采集程序错误类型
///
/// 只有 `Session`、`Config` 与 `Sink` 会上抛到顶层调用方，
/// 其余错误都在目标或周期内部被降级处理。
#[derive(Debug, Error)]
pub enum HarvestError {
    /// 登录凭证读取或解析失败（致命，不运行任何目标）
    #[error("登录凭证错误: {0}")]
    Session(String),

    /// 目标配置文件无法读取或解析（致命）
    #[error("配置错误: {0}")]
    Config(String),

    /// 登录状态检测失败（只放弃当前目标）
    #[error("登录失败: {target}")]
    LoginFailed { target: String },

    /// 页面元素或定位器缺失（非致命，走回退路径）
    #[error("页面元素不可用: {0}")]
    SurfaceUnavailable(String),

    /// 追评视图无法激活（降级为只有主评论）
    #[error("追评视图不可用")]
    PhaseUnavailable,

    /// 导航超时或失败（只放弃当前目标）
    #[error("导航到 {url} 失败: {reason}")]
    Navigation { url: String, reason: String },

    /// 浏览器 DevTools 通信失败
    #[error("浏览器错误: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    /// 结果写入失败（上抛，内存中的结果保留）
    #[error("结果写入失败 ({path}): {reason}")]
    Sink { path: String, reason: String },

    #[error("JSON解析失败: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<toml::de::Error> for HarvestError {
    fn from(err: toml::de::Error) -> Self {
        HarvestError::Config(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for HarvestError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        HarvestError::Sink {
            path: String::new(),
            reason: err.to_string(),
        }
    }
}

impl HarvestError {
    /// 创建页面元素不可用错误
    pub fn surface(message: impl Into<String>) -> Self {
        HarvestError::SurfaceUnavailable(message.into())
    }

    /// 创建结果写入错误
    pub fn sink(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        HarvestError::Sink {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// 是否需要中止整个运行
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            HarvestError::Session(_) | HarvestError::Config(_) | HarvestError::Sink { .. }
        )
    }
}

/// 采集程序结果类型
pub type Result<T> = std::result::Result<T, HarvestError>;
