//! 目标运行器 - 编排层
//!
//! 按顺序处理目标列表：每个目标申请一个隔离会话，交给
//! [`harvest_target`] 处理，无论成败都释放会话。
//! 单个目标的失败只记录下来，不影响后续目标；
//! 收到停止信号时丢弃正在处理的目标，保留已完成的结果。

use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{HarvestError, Result};
use crate::infrastructure::SessionProvider;
use crate::models::record::RunResult;
use crate::models::site_profile::SiteProfile;
use crate::models::target::Target;
use crate::orchestrator::target_processor::{harvest_target, Strategies};
use crate::workflow::RunCtx;

/// 某个目标失败的原因
#[derive(Debug)]
pub struct TargetFailure {
    pub target: String,
    pub error: HarvestError,
}

/// 一次运行的汇总
#[derive(Debug, Default)]
pub struct RunSummary {
    /// 按目标顺序排列的完成结果
    pub results: Vec<RunResult>,
    pub failures: Vec<TargetFailure>,
    /// 是否因停止信号提前结束
    pub cancelled: bool,
    /// 结果写入失败时保存错误，`results` 仍然保留在内存中
    pub sink_error: Option<HarvestError>,
}

pub struct TargetRunner<P: SessionProvider> {
    provider: P,
    profile: SiteProfile,
    strategies: Strategies,
    config: Config,
    ctx: RunCtx,
    stop: Option<watch::Receiver<bool>>,
}

impl<P: SessionProvider> TargetRunner<P> {
    pub fn new(provider: P, profile: SiteProfile, config: Config, ctx: RunCtx) -> Result<Self> {
        let strategies = Strategies::new(&profile)?;
        Ok(Self {
            provider,
            profile,
            strategies,
            config,
            ctx,
            stop: None,
        })
    }

    /// 绑定停止信号，值变为 `true` 时停止
    pub fn with_stop_signal(mut self, stop: watch::Receiver<bool>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn into_provider(self) -> P {
        self.provider
    }

    /// 依次处理所有目标
    ///
    /// 只有致命错误会返回 `Err`，其余失败记录在 [`RunSummary::failures`]
    pub async fn run(&mut self, targets: &[Target]) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut stop = self.stop.clone();
        let total = targets.len();

        for (index, target) in targets.iter().enumerate() {
            if stop_requested(stop.as_ref()) {
                summary.cancelled = true;
                break;
            }

            let ctx = self.ctx.for_target(index + 1, &target.name);
            info!("\n{}", "=".repeat(60));
            ctx.info(format!("🔄 开始处理第 {}/{} 个商品", index + 1, total));
            info!("{}", "=".repeat(60));

            let surface = match self.provider.provision(target).await {
                Ok(surface) => surface,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    ctx.error(format!("❌ 无法打开商品页面: {}", e));
                    summary.failures.push(TargetFailure {
                        target: target.name.clone(),
                        error: e,
                    });
                    continue;
                }
            };

            let outcome = {
                let harvest = harvest_target(
                    &surface,
                    target,
                    &self.profile,
                    &self.strategies,
                    &self.config,
                    &ctx,
                );
                match stop.as_mut() {
                    Some(rx) => tokio::select! {
                        result = harvest => Some(result),
                        _ = wait_for_stop(rx) => None,
                    },
                    None => Some(harvest.await),
                }
            };

            self.provider.release(surface).await;

            match outcome {
                Some(Ok(result)) => {
                    ctx.info("✅ 商品处理完成");
                    summary.results.push(result);
                }
                Some(Err(e)) if e.is_fatal() => return Err(e),
                Some(Err(e)) => {
                    ctx.error(format!("❌ 商品处理失败: {}", e));
                    summary.failures.push(TargetFailure {
                        target: target.name.clone(),
                        error: e,
                    });
                }
                None => {
                    ctx.warn("⚠️ 收到停止信号，放弃当前商品");
                    summary.cancelled = true;
                    break;
                }
            }
        }

        if summary.cancelled {
            self.ctx.warn(format!(
                "⚠️ 运行被中断，已完成 {} 个商品",
                summary.results.len()
            ));
        }
        if !summary.failures.is_empty() {
            error!("❌ 失败的商品: {}", summary.failures.len());
            for failure in &summary.failures {
                debug!("  {}: {}", failure.target, failure.error);
            }
        }

        Ok(summary)
    }
}

fn stop_requested(stop: Option<&watch::Receiver<bool>>) -> bool {
    stop.map(|rx| *rx.borrow()).unwrap_or(false)
}

/// 等待停止信号；发送端关闭后永远不会完成
async fn wait_for_stop(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
