//! 单个目标处理器 - 编排层
//!
//! 在已经导航到商品页的会话上：
//! 1. 登录检测（失败只放弃本目标）
//! 2. 展开评论浮层
//! 3. 主评论阶段
//! 4. 切换追评视图；失败时降级为只有主评论
//! 5. 追评阶段
//! 6. 组装 `RunResult`

use crate::config::Config;
use crate::error::{HarvestError, Result};
use crate::infrastructure::surface::Surface;
use crate::models::record::{PairedStatus, RunResult};
use crate::models::site_profile::SiteProfile;
use crate::models::target::Target;
use crate::services::session_bootstrap;
use crate::services::strategy::{PairedItemStrategy, PrimaryItemStrategy};
use crate::workflow::{ConvergenceEngine, TargetCtx};

/// 两个阶段使用的抽取策略
pub struct Strategies {
    pub primary: PrimaryItemStrategy,
    pub paired: PairedItemStrategy,
}

impl Strategies {
    pub fn new(profile: &SiteProfile) -> Result<Self> {
        Ok(Self {
            primary: PrimaryItemStrategy::new(profile)?,
            paired: PairedItemStrategy::new(profile)?,
        })
    }
}

/// 处理单个目标
pub async fn harvest_target<S: Surface>(
    surface: &S,
    target: &Target,
    profile: &SiteProfile,
    strategies: &Strategies,
    config: &Config,
    ctx: &TargetCtx,
) -> Result<RunResult> {
    if !session_bootstrap::is_logged_in(surface, profile).await {
        ctx.error("❌ 登录失败，请检查cookie是否有效");
        return Err(HarvestError::LoginFailed {
            target: target.name.clone(),
        });
    }
    ctx.info("✅ 登录成功，开始爬取评论...");

    let engine = ConvergenceEngine::new(surface, profile, &config.timing, ctx, &target.url);

    engine.open_review_panel().await;

    let primary = engine
        .run_phase(&strategies.primary, target.primary_limit, config.retry_budget)
        .await;

    let (paired_records, paired_status) = if engine.switch_to_paired_view().await {
        let paired = engine
            .run_phase(&strategies.paired, target.paired_limit, config.retry_budget)
            .await;
        (paired.records, PairedStatus::Converged(paired.reason))
    } else {
        ctx.warn(format!("⚠️ {}，只保留主评论", HarvestError::PhaseUnavailable));
        (Vec::new(), PairedStatus::Unavailable)
    };

    let result = RunResult {
        target: target.clone(),
        primary_records: primary.records,
        paired_records,
        primary_reason: primary.reason,
        paired_status,
    };

    ctx.info(format!(
        "📦 主评论 {} 条，追评对 {} 条",
        result.primary_records.len(),
        result.paired_records.len()
    ));
    if result.total_records() == 0 {
        ctx.warn("⚠️ 该商品没有采集到任何评论");
    }

    Ok(result)
}
