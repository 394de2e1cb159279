//! 交换变异

use super::Mutation;
use crate::constraints::Constraints;
use crate::Permutation;
use rand::seq::index::sample;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SwapMutation {
    pub rate: f64,
}

impl Default for SwapMutation {
    fn default() -> Self {
        Self { rate: 0.1 }
    }
}

impl Mutation for SwapMutation {
    /// 以 `rate` 的概率交换两个不同的位置；交换后违反约束就撤销，不再重试
    fn mutate<R: Rng + ?Sized>(
        &self,
        individual: &mut Permutation,
        constraints: &Constraints,
        rng: &mut R,
    ) -> bool {
        if individual.len() < 2 || rng.random::<f64>() >= self.rate {
            return false;
        }
        let positions = sample(rng, individual.len(), 2);
        let (i, j) = (positions.index(0), positions.index(1));
        individual.swap(i, j);
        if constraints.respects(individual) {
            return true;
        }
        individual.swap(i, j);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_always_mutates_without_constraints() {
        let constraints = Constraints::new(&[0, 1, 2, 3], &[]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let operator = SwapMutation { rate: 1.0 };
        let mut individual = vec![0, 1, 2, 3];
        assert!(operator.mutate(&mut individual, &constraints, &mut rng));
        let differences = (0..4).filter(|&i| individual[i] != i).count();
        assert_eq!(differences, 2);
    }

    #[test]
    fn test_never_mutates() {
        let constraints = Constraints::new(&[0, 1, 2, 3], &[]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let operator = SwapMutation { rate: 0.0 };
        let mut individual = vec![0, 1, 2, 3];
        for _ in 0..100 {
            assert!(!operator.mutate(&mut individual, &constraints, &mut rng));
        }
        assert_eq!(individual, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_infeasible_swap_is_reverted() {
        // 全序约束下任何交换都不可行
        let constraints = Constraints::new(&[0, 1, 2], &[(0, 1), (1, 2)]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let operator = SwapMutation { rate: 1.0 };
        let mut individual = vec![0, 1, 2];
        for _ in 0..50 {
            assert!(!operator.mutate(&mut individual, &constraints, &mut rng));
            assert_eq!(individual, vec![0, 1, 2]);
        }
    }
}
