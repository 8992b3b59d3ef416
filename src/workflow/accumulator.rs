//! 跨周期累积
//!
//! 虚拟列表会把滚出视口的条目卸载，单次抽取的数量可能变小；
//! 累积集合按去重键只增不减，数量在一个阶段内单调不降。

use indexmap::IndexMap;

use crate::models::record::{ConvergedReason, Keyed, Phase};

/// 按去重键保存、保持首次出现顺序的记录集合
pub struct Accumulator<R: Keyed> {
    items: IndexMap<R::Key, R>,
}

impl<R: Keyed> Accumulator<R> {
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }

    /// 合并记录，返回新增数量；已存在的记录不覆盖
    pub fn merge(&mut self, records: impl IntoIterator<Item = R>) -> usize {
        let before = self.items.len();
        for record in records {
            self.items.entry(record.identity()).or_insert(record);
        }
        self.items.len() - before
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_records(self) -> Vec<R> {
        self.items.into_values().collect()
    }
}

impl<R: Keyed> Default for Accumulator<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// 单个阶段的收敛状态
pub struct ConvergenceState<R: Keyed> {
    pub phase: Phase,
    pub last_count: usize,
    pub stagnant_cycles: u32,
    pub accumulated: Accumulator<R>,
}

impl<R: Keyed> ConvergenceState<R> {
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            last_count: 0,
            stagnant_cycles: 0,
            accumulated: Accumulator::new(),
        }
    }

    pub fn current_count(&self) -> usize {
        self.accumulated.len()
    }

    /// 比较本周期数量与上周期数量
    ///
    /// 有增长时清零停滞计数；否则累加，达到 `retry_budget` 时收敛
    pub fn record_progress(&mut self, retry_budget: u32) -> Option<ConvergedReason> {
        let current = self.current_count();
        if current > self.last_count {
            self.last_count = current;
            self.stagnant_cycles = 0;
            None
        } else {
            self.stagnant_cycles += 1;
            (self.stagnant_cycles >= retry_budget).then_some(ConvergedReason::Exhausted)
        }
    }
}
