//! 带连续组数限制的随机打乱 - 业务能力层
//!
//! 每次从剩余单元中均匀抽取一个：
//! - 组别与上一个不同，或连续次数未达到 `max_run`，则接受
//! - 否则拒绝，累计连续拒绝次数
//!
//! 连续拒绝达到 `reject_streak_factor × 单元总数` 时，认为当前的部分顺序已无法完成，
//! 丢弃全部进度重新开始。重新开始的次数有上限，用完即失败。
//! 这是尽力而为的随机算法：能找到合法顺序的概率很高，但不保证一定找到。

use std::fmt::Debug;

use tracing::{debug, info};

use crate::error::ShuffleError;
use crate::models::{Registry, UnitId};
use crate::services::random_source::RandomSource;

/// 打乱参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShuffleOptions {
    /// 同一组最多连续出现的次数
    pub max_run: usize,
    /// 整体重新开始的次数上限
    pub max_restarts: usize,
    pub reject_streak_factor: usize,
    /// 记录每次抽取/拒绝
    pub debug_logging: bool,
}

impl Default for ShuffleOptions {
    fn default() -> Self {
        Self {
            max_run: 2,
            max_restarts: 10,
            reject_streak_factor: 2,
            debug_logging: false,
        }
    }
}

impl ShuffleOptions {
    pub fn with_max_run(max_run: usize) -> Self {
        Self {
            max_run,
            ..Self::default()
        }
    }
}

/// 带连续组数限制的随机打乱
#[derive(Debug, Clone, Default)]
pub struct ConstrainedShuffle {
    options: ShuffleOptions,
}

impl ConstrainedShuffle {
    pub fn new(options: ShuffleOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ShuffleOptions {
        &self.options
    }

    /// 打乱注册表中的所有单元
    pub fn shuffle<R>(&self, registry: &Registry, rng: &mut R) -> Result<Vec<UnitId>, ShuffleError>
    where
        R: RandomSource + ?Sized,
    {
        let ids: Vec<UnitId> = registry.ids().collect();
        let order = self.shuffle_groups(&registry.groups(), rng)?;
        let order: Vec<UnitId> = order.into_iter().map(|i| ids[i]).collect();

        if self.options.debug_logging {
            info!("选定的顺序:");
            for id in &order {
                if let Some(unit) = registry.get(*id) {
                    info!("  单元: {}; 组别: {}", unit.key(), unit.group());
                }
            }
            info!("顺序结束");
        }

        Ok(order)
    }

    /// 按组别打乱，返回输入下标的一个排列
    pub fn shuffle_groups<G, R>(&self, groups: &[G], rng: &mut R) -> Result<Vec<usize>, ShuffleError>
    where
        G: PartialEq + Debug,
        R: RandomSource + ?Sized,
    {
        let max_run = self.options.max_run;
        if max_run == 0 {
            return Err(ShuffleError::InvalidMaxRun { max_run });
        }
        if groups.is_empty() {
            return Ok(Vec::new());
        }

        let reject_limit = self
            .options
            .reject_streak_factor
            .saturating_mul(groups.len())
            .max(1);

        for attempt in 0..=self.options.max_restarts {
            if attempt > 0 && self.options.debug_logging {
                debug!("🔁 开始第 {} 次重新打乱", attempt);
            }
            if let Some(order) = self.attempt(groups, rng, reject_limit) {
                return Ok(order);
            }
        }

        Err(ShuffleError::Exhausted {
            attempts: self.options.max_restarts.saturating_add(1),
            max_run,
        })
    }

    /// 单次尝试，陷入死局时返回 `None`
    fn attempt<G, R>(&self, groups: &[G], rng: &mut R, reject_limit: usize) -> Option<Vec<usize>>
    where
        G: PartialEq + Debug,
        R: RandomSource + ?Sized,
    {
        let mut pool: Vec<usize> = (0..groups.len()).collect();
        let mut order = Vec::with_capacity(groups.len());
        let mut last_group: Option<&G> = None;
        let mut run_length = 0;
        let mut reject_streak = 0;

        while !pool.is_empty() {
            if reject_streak >= reject_limit {
                return None;
            }

            let pick = rng.next(pool.len());
            let index = pool[pick];
            let group = &groups[index];

            if self.options.debug_logging {
                debug!("抽到单元 {}，组别 {:?}", index, group);
            }

            let same_group = last_group == Some(group);
            if !same_group || run_length < self.options.max_run {
                pool.remove(pick);
                order.push(index);
                run_length = if same_group { run_length + 1 } else { 1 };
                last_group = Some(group);
                reject_streak = 0;
                if self.options.debug_logging {
                    debug!("接受组别 {:?}（已连续 {} 个）", group, run_length);
                }
            } else {
                reject_streak += 1;
                if self.options.debug_logging {
                    debug!("拒绝组别 {:?}（已连续 {} 个）", group, run_length);
                }
            }
        }

        Some(order)
    }
}

/// 检查 `order` 是否为 `groups` 下标的一个排列，且没有组别连续超过 `max_run` 次
pub fn validate_order<G: PartialEq>(groups: &[G], order: &[usize], max_run: usize) -> bool {
    if order.len() != groups.len() {
        return false;
    }
    let mut seen = vec![false; groups.len()];
    for &i in order {
        match seen.get_mut(i) {
            Some(flag) if !*flag => *flag = true,
            _ => return false,
        }
    }
    longest_run(groups, order) <= max_run
}

/// 按 `order` 排列后最长的同组连续段长度
pub fn longest_run<G: PartialEq>(groups: &[G], order: &[usize]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut last: Option<&G> = None;
    for &i in order {
        let group = &groups[i];
        current = if last == Some(group) { current + 1 } else { 1 };
        last = Some(group);
        longest = longest.max(current);
    }
    longest
}
