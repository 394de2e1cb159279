//! 交换序列：粒子群算法在排列空间中的“速度”
//!
//! 交换序列中的每一步交换两个位置上的节点，按顺序作用到一个排列上会得到另一个排列。

use crate::{Node, Swap};
use rand::seq::index::sample;
use rand::Rng;
use rustc_hash::FxHashMap;

/// 把 `source` 逐步变换为 `target` 的交换序列：从左到右，当前位置上的节点和目标不一致时，把目标节点从后面换过来
pub fn swap_sequence(source: &[Node], target: &[Node]) -> Vec<Swap> {
    let mut current = source.to_vec();
    let mut position: FxHashMap<Node, usize> =
        current.iter().enumerate().map(|(i, &x)| (x, i)).collect();
    let mut swaps = vec![];
    for (i, &wanted) in target.iter().enumerate().take(current.len()) {
        if current[i] == wanted {
            continue;
        }
        let Some(&j) = position.get(&wanted) else {
            continue;
        };
        swaps.push((i, j));
        position.insert(current[i], j);
        position.insert(wanted, i);
        current.swap(i, j);
    }
    swaps
}

/// 按顺序把交换序列作用到排列上
pub fn apply_swaps(permutation: &mut [Node], swaps: &[Swap]) {
    for &(i, j) in swaps {
        permutation.swap(i, j);
    }
}

/// 不放回地抽取 `amount` 步交换，保持它们在原序列中的先后顺序
pub fn sample_ordered<R: Rng + ?Sized>(swaps: &[Swap], amount: usize, rng: &mut R) -> Vec<Swap> {
    let amount = amount.min(swaps.len());
    if amount == 0 {
        return vec![];
    }
    let mut indices = sample(rng, swaps.len(), amount).into_vec();
    indices.sort_unstable();
    indices.into_iter().map(|i| swaps[i]).collect()
}

/// 按比例计算抽取的步数，向下取整
pub fn scaled_amount(fraction: f64, length: usize) -> usize {
    if fraction.is_nan() || fraction <= 0.0 {
        return 0;
    }
    ((fraction * length as f64) as usize).min(length)
}
