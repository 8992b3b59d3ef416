//! 收敛引擎 - 流程层
//!
//! 驱动"滚动 → 等待 → 抽取 → 比较"的周期，直到满足停止条件。
//! 两个阶段（主评论 / 追评）走同一套循环，只换抽取策略、数量上限和重试预算。
//!
//! 每个周期：
//! 1. 定位滚动容器（骨架 XPath → 类名 → 整个页面）
//! 2. 滚到底，等待；可见时点击"加载更多"，等待；再滚一次到底
//! 3. 重新抽取并合并到累积集合
//! 4. 依次检查：达到上限 → "没有更多"提示 → 有无新增（连续无新增达到预算则收敛）
//!
//! 页面能力的任何失败都只算"本周期无进展"。

use chrono::Local;
use tracing::debug;

use crate::config::Timing;
use crate::infrastructure::surface::{Locator, ScrollTarget, Surface};
use crate::models::record::ConvergedReason;
use crate::models::site_profile::SiteProfile;
use crate::services::strategy::ExtractionStrategy;
use crate::workflow::accumulator::ConvergenceState;
use crate::workflow::run_ctx::TargetCtx;

/// 单个阶段的结果
#[derive(Debug, Clone)]
pub struct PhaseOutcome<R> {
    pub records: Vec<R>,
    pub reason: ConvergedReason,
    /// 实际执行的周期数
    pub cycles: u32,
}

/// 收敛引擎
///
/// 不持有页面，只借用；一个目标内依次用于两个阶段
pub struct ConvergenceEngine<'a, S: Surface> {
    surface: &'a S,
    profile: &'a SiteProfile,
    timing: &'a Timing,
    ctx: &'a TargetCtx,
    /// 写入每条记录的来源
    origin: &'a str,
}

impl<'a, S: Surface> ConvergenceEngine<'a, S> {
    pub fn new(
        surface: &'a S,
        profile: &'a SiteProfile,
        timing: &'a Timing,
        ctx: &'a TargetCtx,
        origin: &'a str,
    ) -> Self {
        Self {
            surface,
            profile,
            timing,
            ctx,
            origin,
        }
    }

    /// 打开"查看全部评价"浮层，找不到时认为已经展开
    pub async fn open_review_panel(&self) -> bool {
        self.ctx.info("🖱️ 尝试点击\"查看全部评价\"按钮...");
        if self.click_first_available(&self.profile.show_all).await {
            self.ctx.info("✅ 已点击\"查看全部评价\"按钮");
            self.surface.wait(self.timing.panel_open_ms).await;
            true
        } else {
            self.ctx
                .warn("⚠️ 未找到\"查看全部评价\"按钮，可能已经显示全部评论");
            false
        }
    }

    /// 运行一个阶段直到收敛
    pub async fn run_phase<X: ExtractionStrategy>(
        &self,
        strategy: &X,
        limit: usize,
        retry_budget: u32,
    ) -> PhaseOutcome<X::Record> {
        let phase = strategy.phase();
        let mut state = ConvergenceState::new(phase);
        let mut cycles = 0u32;

        self.ctx.info(format!(
            "🔄 开始采集{}（上限 {}，连续无新增上限 {}）",
            phase, limit, retry_budget
        ));

        let reason = loop {
            cycles += 1;

            let target = self.locate_scroll_target(cycles == 1).await;
            debug!("{} 周期 {} 滚动目标: {}", self.ctx, cycles, target);

            self.ctx.info(format!("🔽 滚动评论容器到底部（{}）...", phase));
            self.scroll_to_bottom(&target).await;
            self.surface.wait(self.timing.settle_ms).await;

            if self.click_load_more().await {
                self.ctx.info("🖱️ 点击\"加载更多\"按钮...");
                self.surface.wait(self.timing.load_more_ms).await;
            }

            self.scroll_to_bottom(&target).await;
            self.surface.wait(self.timing.rescroll_ms).await;

            match self.surface.read_all_matching(strategy.query()).await {
                Ok(snapshots) => {
                    let records = strategy.extract(&snapshots, self.origin, Local::now());
                    let added = state.accumulated.merge(records);
                    debug!("{} 周期 {} 新增 {} 条", self.ctx, cycles, added);
                }
                Err(e) => {
                    self.ctx.warn(format!("⚠️ 读取{}失败，本周期无进展: {}", phase, e));
                }
            }

            let current = state.current_count();
            self.ctx
                .info(format!("📊 当前已加载{}数: {}", phase, current));

            if current >= limit {
                self.ctx
                    .info(format!("✅ 已达到设定的{}数量: {}", phase, limit));
                break ConvergedReason::LimitReached;
            }

            if self.shows_no_more().await {
                self.ctx.info(format!(
                    "✅ 已加载全部{}（检测到\"没有更多\"提示）",
                    phase
                ));
                break ConvergedReason::NoMoreMarker;
            }

            if let Some(reason) = state.record_progress(retry_budget) {
                self.ctx.info(format!(
                    "✅ 连续 {} 次未发现新{}，停止加载",
                    state.stagnant_cycles, phase
                ));
                break reason;
            }
            if state.stagnant_cycles > 0 {
                self.ctx.warn(format!(
                    "⚠️ 连续 {} 次未发现新{}",
                    state.stagnant_cycles, phase
                ));
            }
        };

        if state.accumulated.is_empty() {
            self.ctx.warn(format!("⚠️ 本阶段未提取到任何{}", phase));
        }
        let records = state.accumulated.into_records();
        self.ctx.info(format!(
            "🎉 共提取到 {} 条{}（{}，{} 个周期）",
            records.len(),
            phase,
            reason,
            cycles
        ));

        PhaseOutcome {
            records,
            reason,
            cycles,
        }
    }

    /// 切换到追评视图：先骨架定位，再类名回退
    pub async fn switch_to_paired_view(&self) -> bool {
        self.ctx.info("🖱️ 尝试点击追评按钮...");
        if self.click_first_available(&self.profile.paired_tab).await {
            self.ctx.info("✅ 已点击追评按钮");
            self.surface.wait(self.timing.phase_switch_ms).await;
            true
        } else {
            self.ctx.warn("⚠️ 未找到追评按钮，跳过追评采集");
            false
        }
    }

    /// 按顺序尝试滚动容器，全部失败时滚动整个页面
    ///
    /// 阶段的第一个周期里骨架容器可能还没渲染，最多等待 `landmark_timeout_ms`；
    /// 之后的周期只检查一次
    async fn locate_scroll_target(&self, first_cycle: bool) -> ScrollTarget {
        for locator in &self.profile.scroll_containers {
            let target = ScrollTarget::Element(locator.clone());
            let timeout = if first_cycle && locator.is_landmark() {
                self.timing.landmark_timeout_ms
            } else {
                0
            };
            if self.wait_for_container(&target, timeout).await {
                return target;
            }
            debug!("{} 滚动容器 {} 不可用", self.ctx, locator);
        }
        ScrollTarget::Page
    }

    async fn wait_for_container(&self, target: &ScrollTarget, timeout: u64) -> bool {
        let poll = self.timing.poll_interval_ms.max(1);
        let mut waited = 0u64;

        loop {
            match self.surface.scroll_metrics(target).await {
                Ok(_) => return true,
                Err(e) => debug!("{} 读取 {} 失败: {}", self.ctx, target, e),
            }
            if waited >= timeout {
                return false;
            }
            self.surface.wait(poll).await;
            waited += poll;
        }
    }

    async fn scroll_to_bottom(&self, target: &ScrollTarget) {
        let metrics = match self.surface.scroll_metrics(target).await {
            Ok(metrics) => metrics,
            Err(e) => {
                debug!("{} 读取滚动几何失败: {}", self.ctx, e);
                return;
            }
        };
        if let Err(e) = self.surface.scroll_to(target, metrics.max_offset()).await {
            debug!("{} 滚动失败: {}", self.ctx, e);
        }
    }

    /// "加载更多"只在当下可见时点击，不等待
    async fn click_load_more(&self) -> bool {
        for locator in &self.profile.load_more {
            match self.surface.find_affordance(locator).await {
                Ok(Some(handle)) => match self.surface.click(&handle).await {
                    Ok(()) => return true,
                    Err(e) => debug!("{} 点击 {} 失败: {}", self.ctx, locator, e),
                },
                Ok(None) => {}
                Err(e) => debug!("{} 查找 {} 失败: {}", self.ctx, locator, e),
            }
        }
        false
    }

    async fn shows_no_more(&self) -> bool {
        self.surface
            .page_contains_any_of(&self.profile.no_more_markers)
            .await
            .unwrap_or(false)
    }

    /// 依次等待每个定位器出现并点击，任一成功即返回
    async fn click_first_available(&self, locators: &[Locator]) -> bool {
        for locator in locators {
            let Some(handle) = self.wait_for_affordance(locator).await else {
                debug!("{} 未找到 {}", self.ctx, locator);
                continue;
            };
            match self.surface.click(&handle).await {
                Ok(()) => return true,
                Err(e) => debug!("{} 点击 {} 失败: {}", self.ctx, locator, e),
            }
        }
        false
    }

    /// 轮询直到元素出现；骨架定位与类名定位使用不同的超时
    async fn wait_for_affordance(&self, locator: &Locator) -> Option<S::Handle> {
        let timeout = if locator.is_landmark() {
            self.timing.landmark_timeout_ms
        } else {
            self.timing.affordance_timeout_ms
        };
        let poll = self.timing.poll_interval_ms.max(1);
        let mut waited = 0u64;

        loop {
            match self.surface.find_affordance(locator).await {
                Ok(Some(handle)) => return Some(handle),
                Ok(None) => {}
                Err(e) => debug!("{} 查找 {} 失败: {}", self.ctx, locator, e),
            }
            if waited >= timeout {
                return None;
            }
            self.surface.wait(poll).await;
            waited += poll;
        }
    }
}
