//! 顺序杂交（OX）

use super::Crossover;
use crate::constraints::Constraints;
use crate::{Node, Permutation};
use rand::seq::index::sample;
use rand::Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CROSSOVER_ATTEMPTS: usize = 1000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderCrossover {
    pub max_attempts: usize,
}

impl Default for OrderCrossover {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_CROSSOVER_ATTEMPTS,
        }
    }
}

impl Crossover for OrderCrossover {
    /// 随机选两个不同的切点，切出的片段从父代一原样复制到子代的相同位置，其余位置从左到右按父代二的相对顺序填入。
    /// 子代违反先后约束时重新选切点
    fn crossover<R: Rng + ?Sized>(
        &self,
        parent1: &[Node],
        parent2: &[Node],
        constraints: &Constraints,
        rng: &mut R,
    ) -> Option<Permutation> {
        let size = parent1.len();
        if size < 2 {
            return constraints.respects(parent1).then(|| parent1.to_vec());
        }
        for _ in 0..self.max_attempts {
            let mut cuts = sample(rng, size, 2).into_vec();
            cuts.sort_unstable();
            let child = order_crossover(parent1, parent2, cuts[0], cuts[1]);
            if constraints.respects(&child) {
                return Some(child);
            }
        }
        None
    }
}

/// 以 `parent1[start..=end]` 为片段构造子代
pub fn order_crossover(
    parent1: &[Node],
    parent2: &[Node],
    start: usize,
    end: usize,
) -> Permutation {
    let segment: FxHashSet<Node> = parent1[start..=end].iter().copied().collect();
    let mut donor = parent2.iter().filter(|x| !segment.contains(*x));
    let mut child = Vec::with_capacity(parent1.len());
    for (index, &node) in parent1.iter().enumerate() {
        if (start..=end).contains(&index) {
            child.push(node);
        } else if let Some(&node) = donor.next() {
            child.push(node);
        }
    }
    child
}
