//! 随机打乱的性质测试
//!
//! **性质 1**: 成功返回的顺序中，任何组别连续出现不超过 max_run 次
//! **性质 2**: 返回的顺序是输入的一个排列
//! **性质 3**: 每个组别的单元数都不超过 max_run 时一定成功
//! **性质 4**: 只有一个组别且单元数超过 max_run 时一定失败

use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

use crate::error::ShuffleError;
use crate::services::random_source::ChaChaSource;
use crate::services::shuffle::{longest_run, validate_order, ConstrainedShuffle, ShuffleOptions};

fn group_counts(groups: &[u8]) -> [usize; 4] {
    let mut counts = [0; 4];
    for g in groups {
        counts[*g as usize] += 1;
    }
    counts
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn successful_orders_respect_run_limit_and_are_permutations(
        groups in prop::collection::vec(0u8..4, 0..16),
        max_run in 1usize..4,
        seed in any::<u64>(),
    ) {
        let shuffle = ConstrainedShuffle::new(ShuffleOptions::with_max_run(max_run));
        if let Ok(order) = shuffle.shuffle_groups(&groups, &mut ChaChaSource::seeded(seed)) {
            prop_assert!(longest_run(&groups, &order) <= max_run);

            let mut sorted = order.clone();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, (0..groups.len()).collect::<Vec<_>>());
            prop_assert!(validate_order(&groups, &order, max_run));
        }
    }

    #[test]
    fn small_groups_always_succeed(
        groups in prop::collection::vec(0u8..4, 0..12),
        seed in any::<u64>(),
    ) {
        let max_run = group_counts(&groups).into_iter().max().unwrap_or(0).max(1);
        let shuffle = ConstrainedShuffle::new(ShuffleOptions::with_max_run(max_run));
        let order = shuffle.shuffle_groups(&groups, &mut ChaChaSource::seeded(seed));
        prop_assert!(order.is_ok());
    }

    #[test]
    fn single_oversized_group_always_fails(
        len in 2usize..10,
        seed in any::<u64>(),
    ) {
        let max_run = len - 1;
        let groups = vec!["only"; len];
        let shuffle = ConstrainedShuffle::new(ShuffleOptions::with_max_run(max_run));
        let err = shuffle.shuffle_groups(&groups, &mut ChaChaSource::seeded(seed));
        prop_assert_eq!(err, Err(ShuffleError::Exhausted { attempts: 11, max_run }));
    }
}
