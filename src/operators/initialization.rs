//! 种群初始化
//!
//! 反复随机打乱节点，直到得到满足先后约束的排列。约束太强、随机打乱几乎不可能命中时，
//! 超过尝试次数便改用随机拓扑序来构造个体。

use crate::constraints::Constraints;
use crate::Permutation;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// 在 `max_attempts` 次随机打乱以内找到一个可行排列
pub fn random_feasible<R: Rng + ?Sized>(
    constraints: &Constraints,
    max_attempts: usize,
    rng: &mut R,
) -> Option<Permutation> {
    let mut candidate = constraints.nodes().to_vec();
    for _ in 0..max_attempts {
        candidate.shuffle(rng);
        if constraints.respects(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// 生成 `size` 个相互独立的可行个体
pub fn initialize_population<R: Rng + ?Sized>(
    constraints: &Constraints,
    size: usize,
    max_attempts: usize,
    rng: &mut R,
) -> Vec<Permutation> {
    let mut population = Vec::with_capacity(size);
    let mut warned = false;
    while population.len() < size {
        let individual = match random_feasible(constraints, max_attempts, rng) {
            Some(individual) => individual,
            None => {
                if !warned {
                    warn!(
                        "随机打乱 {max_attempts} 次仍未得到可行解，改用随机拓扑序构造初始个体"
                    );
                    warned = true;
                }
                constraints.topological_order(rng)
            }
        };
        population.push(individual);
    }
    population
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Node;
    use itertools::Itertools;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_initialize_population() {
        let constraints = Constraints::new(&[1, 2, 3, 4, 5], &[(1, 3), (2, 4)]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let population = initialize_population(&constraints, 20, DEFAULT_MAX_ATTEMPTS, &mut rng);
        assert_eq!(population.len(), 20);
        for individual in &population {
            assert_eq!(
                individual.iter().copied().sorted().collect::<Vec<_>>(),
                vec![1, 2, 3, 4, 5]
            );
            assert!(constraints.respects(individual));
        }
    }

    #[test]
    fn test_fallback_to_topological_order() {
        // 30 个节点的全序约束，随机打乱几乎不可能命中
        let nodes: Vec<Node> = (0..30).collect();
        let pairs: Vec<_> = (0..29).map(|i| (i, i + 1)).collect();
        let constraints = Constraints::new(&nodes, &pairs).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let population = initialize_population(&constraints, 3, 10, &mut rng);
        assert_eq!(population, vec![nodes.clone(), nodes.clone(), nodes]);
    }

    #[test]
    fn test_random_feasible_exhausted() {
        let nodes: Vec<Node> = (0..30).collect();
        let pairs: Vec<_> = (0..29).map(|i| (i, i + 1)).collect();
        let constraints = Constraints::new(&nodes, &pairs).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(random_feasible(&constraints, 5, &mut rng).is_none());
    }
}
