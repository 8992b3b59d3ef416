use chrono::{DateTime, Local};

use crate::models::target::Target;

/// 采集阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// 主评论
    Primary,
    /// 原评论 + 追评
    Paired,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Primary => write!(f, "主评论"),
            Phase::Paired => write!(f, "追评"),
        }
    }
}

/// 可去重的记录
pub trait Keyed {
    type Key: std::hash::Hash + Eq + Clone;

    /// 去重键
    fn identity(&self) -> Self::Key;
}

/// 折叠空白，用于去重比较
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 主评论
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryRecord {
    pub text: String,
    pub spec: Option<String>,
    pub origin: String,
    pub captured_at: DateTime<Local>,
}

impl Keyed for PrimaryRecord {
    type Key = String;

    fn identity(&self) -> String {
        normalize_text(&self.text)
    }
}

/// 原评论与追评
#[derive(Debug, Clone, PartialEq)]
pub struct PairedRecord {
    pub original_text: Option<String>,
    pub follow_up_text: Option<String>,
    pub spec: Option<String>,
    pub origin: String,
    pub captured_at: DateTime<Local>,
}

impl Keyed for PairedRecord {
    type Key = (String, String);

    fn identity(&self) -> (String, String) {
        (
            normalize_text(self.original_text.as_deref().unwrap_or_default()),
            normalize_text(self.follow_up_text.as_deref().unwrap_or_default()),
        )
    }
}

/// 阶段收敛原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergedReason {
    /// 达到设定数量
    LimitReached,
    /// 页面出现"没有更多"提示
    NoMoreMarker,
    /// 连续多个周期无新增
    Exhausted,
}

impl std::fmt::Display for ConvergedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvergedReason::LimitReached => write!(f, "已达到设定数量"),
            ConvergedReason::NoMoreMarker => write!(f, "检测到\"没有更多\"提示"),
            ConvergedReason::Exhausted => write!(f, "连续无新增"),
        }
    }
}

/// 追评阶段的结局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairedStatus {
    Converged(ConvergedReason),
    /// 追评视图无法激活，只有主评论
    Unavailable,
}

/// 单个目标的采集结果
#[derive(Debug, Clone)]
pub struct RunResult {
    pub target: Target,
    pub primary_records: Vec<PrimaryRecord>,
    pub paired_records: Vec<PairedRecord>,
    pub primary_reason: ConvergedReason,
    pub paired_status: PairedStatus,
}

impl RunResult {
    pub fn total_records(&self) -> usize {
        self.primary_records.len() + self.paired_records.len()
    }
}
