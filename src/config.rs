use std::str::FromStr;

/// 浏览器接入方式
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BrowserMode {
    /// 连接到已开启调试端口的浏览器
    Connect,
    /// 自行启动浏览器
    Launch,
}

impl FromStr for BrowserMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "connect" => Ok(BrowserMode::Connect),
            "launch" => Ok(BrowserMode::Launch),
            other => Err(format!("未知的浏览器模式: {}", other)),
        }
    }
}

/// 各类固定等待与超时（毫秒）
#[derive(Clone, Debug)]
pub struct Timing {
    /// 滚动到底后的等待
    pub settle_ms: u64,
    /// 点击"加载更多"后的等待
    pub load_more_ms: u64,
    /// 第二次滚动后的等待
    pub rescroll_ms: u64,
    /// 点击"查看全部评价"后的等待
    pub panel_open_ms: u64,
    /// 切换到追评视图后的等待
    pub phase_switch_ms: u64,
    /// XPath 等页面骨架定位的超时
    pub landmark_timeout_ms: u64,
    /// CSS 类名定位的超时
    pub affordance_timeout_ms: u64,
    /// 轮询定位的间隔
    pub poll_interval_ms: u64,
    /// 导航超时
    pub navigation_timeout_ms: u64,
    /// 导航完成后的等待（近似网络空闲）
    pub post_navigation_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            settle_ms: 2000,
            load_more_ms: 1500,
            rescroll_ms: 1000,
            panel_open_ms: 2000,
            phase_switch_ms: 3000,
            landmark_timeout_ms: 5000,
            affordance_timeout_ms: 10000,
            poll_interval_ms: 250,
            navigation_timeout_ms: 30000,
            post_navigation_ms: 2000,
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 浏览器接入方式
    pub browser_mode: BrowserMode,
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 自行启动时使用的浏览器可执行文件
    pub chrome_executable: Option<String>,
    /// 自行启动时是否无头
    pub headless: bool,
    /// 目标配置文件（TOML）
    pub targets_file: String,
    /// 登录凭证文件（JSON）
    pub cookie_file: String,
    /// 运行日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 连续无新增的最大周期数
    pub retry_budget: u32,
    pub timing: Timing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_mode: BrowserMode::Launch,
            browser_debug_port: 9222,
            chrome_executable: None,
            headless: false,
            targets_file: "config.toml".to_string(),
            cookie_file: "cookie.json".to_string(),
            output_log_file: "harvest.log".to_string(),
            verbose_logging: false,
            retry_budget: 5,
            timing: Timing::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        let t = default.timing;
        Self {
            browser_mode: env_parse("BROWSER_MODE").unwrap_or(default.browser_mode),
            browser_debug_port: env_parse("BROWSER_DEBUG_PORT").unwrap_or(default.browser_debug_port),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().or(default.chrome_executable),
            headless: env_parse("HEADLESS").unwrap_or(default.headless),
            targets_file: std::env::var("TARGETS_FILE").unwrap_or(default.targets_file),
            cookie_file: std::env::var("COOKIE_FILE").unwrap_or(default.cookie_file),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
            retry_budget: env_parse("RETRY_BUDGET").unwrap_or(default.retry_budget),
            timing: Timing {
                settle_ms: env_parse("SETTLE_MS").unwrap_or(t.settle_ms),
                load_more_ms: env_parse("LOAD_MORE_MS").unwrap_or(t.load_more_ms),
                rescroll_ms: env_parse("RESCROLL_MS").unwrap_or(t.rescroll_ms),
                panel_open_ms: env_parse("PANEL_OPEN_MS").unwrap_or(t.panel_open_ms),
                phase_switch_ms: env_parse("PHASE_SWITCH_MS").unwrap_or(t.phase_switch_ms),
                landmark_timeout_ms: env_parse("LANDMARK_TIMEOUT_MS").unwrap_or(t.landmark_timeout_ms),
                affordance_timeout_ms: env_parse("AFFORDANCE_TIMEOUT_MS").unwrap_or(t.affordance_timeout_ms),
                poll_interval_ms: env_parse("POLL_INTERVAL_MS").unwrap_or(t.poll_interval_ms),
                navigation_timeout_ms: env_parse("NAVIGATION_TIMEOUT_MS").unwrap_or(t.navigation_timeout_ms),
                post_navigation_ms: env_parse("POST_NAVIGATION_MS").unwrap_or(t.post_navigation_ms),
            },
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_mode_parse() {
        assert_eq!("connect".parse::<BrowserMode>(), Ok(BrowserMode::Connect));
        assert_eq!(" Launch ".parse::<BrowserMode>(), Ok(BrowserMode::Launch));
        assert!("attach".parse::<BrowserMode>().is_err());
    }

    #[test]
    fn test_default_retry_budget() {
        assert_eq!(Config::default().retry_budget, 5);
    }
}
