//! 应用入口 - 编排层
//!
//! 1. 读取目标配置与登录凭证（任一失败都不启动浏览器）
//! 2. 按配置连接或启动浏览器
//! 3. 顺序处理所有目标
//! 4. 写出结果工作簿并打印统计

use std::path::Path;

use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::browser::{self, ChromeSessions};
use crate::config::{BrowserMode, Config};
use crate::error::Result;
use crate::models::loaders::load_target_file;
use crate::models::site_profile::SiteProfile;
use crate::models::target::Target;
use crate::orchestrator::target_runner::{RunSummary, TargetRunner};
use crate::services::result_sink::{ResultSink, WorkbookSink};
use crate::services::session_bootstrap;
use crate::utils::events::EventEmitter;
use crate::utils::logging::{log_startup, print_final_stats};
use crate::workflow::RunCtx;

/// 应用主结构
pub struct App {
    config: Config,
    targets: Vec<Target>,
    runner: TargetRunner<ChromeSessions>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(
        config: Config,
        emitter: EventEmitter,
        stop: Option<watch::Receiver<bool>>,
    ) -> Result<Self> {
        info!("\n📁 正在读取目标配置: {}", config.targets_file);
        let target_file = load_target_file(Path::new(&config.targets_file)).await?;
        let profile = target_file.site.unwrap_or_else(SiteProfile::default);

        info!("🍪 正在读取登录凭证: {}", config.cookie_file);
        let credentials = session_bootstrap::load_credentials(Path::new(&config.cookie_file)).await?;
        let cookies = session_bootstrap::to_cookie_params(&credentials)?;

        log_startup(target_file.targets.len(), config.retry_budget);

        let (browser, owned) = match config.browser_mode {
            BrowserMode::Connect => (browser::connect_to_browser(config.browser_debug_port).await?, false),
            BrowserMode::Launch => (
                browser::launch_browser(config.chrome_executable.as_deref(), config.headless).await?,
                true,
            ),
        };

        let sessions = ChromeSessions::new(browser, cookies, config.timing.clone(), owned);
        let mut runner = TargetRunner::new(sessions, profile, config.clone(), RunCtx::new(emitter))?;
        if let Some(stop) = stop {
            runner = runner.with_stop_signal(stop);
        }

        Ok(Self {
            config,
            targets: target_file.targets,
            runner,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(mut self) -> Result<RunSummary> {
        if self.targets.is_empty() {
            warn!("⚠️ 目标配置中没有商品，程序结束");
            self.runner.into_provider().shutdown().await;
            return Ok(RunSummary::default());
        }

        let run = self.runner.run(&self.targets).await;
        self.runner.into_provider().shutdown().await;
        let summary = run?;

        Ok(finish_run(summary, &WorkbookSink::new(), &self.config.output_log_file))
    }
}

/// 写出结果并打印统计
///
/// 写入失败时错误记在 [`RunSummary::sink_error`]，已完成的结果原样交还调用方
pub fn finish_run(
    mut summary: RunSummary,
    sink: &impl ResultSink,
    log_file_path: &str,
) -> RunSummary {
    let written = sink.write(&summary.results);
    print_final_stats(&summary.results, summary.failures.len(), log_file_path);

    match written {
        Ok(paths) => info!("📁 共写出 {} 个工作簿", paths.len()),
        Err(e) => {
            error!("❌ 结果写入失败，{} 个商品的结果仅保留在内存中: {}", summary.results.len(), e);
            summary.sink_error = Some(e);
        }
    }
    summary
}
