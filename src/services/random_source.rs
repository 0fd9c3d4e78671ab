//! 随机数来源 - 业务能力层
//!
//! 打乱算法只依赖 [`RandomSource`]，测试可以注入确定的序列

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// 随机数来源
pub trait RandomSource {
    /// 返回 `[0, n)` 内的一个整数，调用方保证 `n > 0`
    fn next(&mut self, n: usize) -> usize;
}

/// 基于 ChaCha8 的随机数来源
#[derive(Debug, Clone)]
pub struct ChaChaSource {
    rng: ChaCha8Rng,
}

impl ChaChaSource {
    /// 使用固定种子，结果可复现
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// 使用系统熵
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// 有种子则使用种子，否则使用系统熵
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for ChaChaSource {
    fn next(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }
}

/// 循环回放一组固定数值的随机数来源，每个值对 `n` 取模
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<usize>,
    position: usize,
}

impl ScriptedSource {
    pub fn new(values: Vec<usize>) -> Self {
        Self {
            values,
            position: 0,
        }
    }

    /// 总是选第一个元素
    pub fn first() -> Self {
        Self::new(vec![0])
    }

    /// 已经取出的数值个数
    pub fn draws(&self) -> usize {
        self.position
    }
}

impl RandomSource for ScriptedSource {
    fn next(&mut self, n: usize) -> usize {
        if self.values.is_empty() {
            self.position += 1;
            return 0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value % n
    }
}
