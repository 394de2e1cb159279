//! 先后约束
//!
//! 每一条约束 `(before, after)` 要求节点 `before` 在序列中的位置严格先于节点 `after`。约束集合在求解过程中保持不变。

use crate::{Error, Node, Permutation};
use rand::seq::IndexedRandom;
use rand::Rng;
use rustc_hash::FxHashMap;

/// 一条先后约束
pub type Precedence = (Node, Node);

#[derive(Debug, Clone)]
pub struct Constraints {
    nodes: Vec<Node>,
    pairs: Vec<Precedence>,
    // 节点编号到它在 `nodes` 中下标的映射，构造时建立一次
    index: FxHashMap<Node, usize>,
    // 用下标表示的约束
    dense: Vec<(usize, usize)>,
}

impl Constraints {
    /// 构造约束集合，同时检查约束是否引用了不存在的节点、是否存在自环或者依赖环
    pub fn new(nodes: &[Node], pairs: &[Precedence]) -> Result<Self, Error> {
        let index: FxHashMap<Node, usize> =
            nodes.iter().enumerate().map(|(i, &x)| (x, i)).collect();
        if index.len() != nodes.len() {
            return Err(Error::configuration("节点列表中有重复的节点"));
        }
        let mut dense = Vec::with_capacity(pairs.len());
        for &(before, after) in pairs {
            let (Some(&b), Some(&a)) = (index.get(&before), index.get(&after)) else {
                return Err(Error::configuration(format!(
                    "约束 ({before}, {after}) 引用了不存在的节点"
                )));
            };
            if before == after {
                return Err(Error::unsatisfiable(format!(
                    "约束 ({before}, {after}) 要求节点先于它自身"
                )));
            }
            dense.push((b, a));
        }
        let constraints = Self {
            nodes: nodes.to_vec(),
            pairs: pairs.to_vec(),
            index,
            dense,
        };
        // 没有拓扑序就说明存在依赖环
        let mut order = vec![];
        constraints.sort_with(|ready| ready[0], &mut order);
        if order.len() != nodes.len() {
            let remaining: Vec<_> = nodes.iter().filter(|x| !order.contains(x)).collect();
            return Err(Error::unsatisfiable(format!(
                "检测到依赖环，无法满足先后约束，剩余节点：{remaining:?}"
            )));
        }
        Ok(constraints)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn pairs(&self) -> &[Precedence] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// 判断一个序列是否满足所有先后约束。序列中缺失的节点视为违反约束
    pub fn respects(&self, permutation: &[Node]) -> bool {
        if self.dense.is_empty() {
            return true;
        }
        let mut position = vec![usize::MAX; self.nodes.len()];
        for (i, node) in permutation.iter().enumerate() {
            if let Some(&k) = self.index.get(node) {
                position[k] = i;
            }
        }
        self.dense.iter().all(|&(before, after)| {
            let (b, a) = (position[before], position[after]);
            b != usize::MAX && a != usize::MAX && b < a
        })
    }

    /// 随机生成一个拓扑序：每一步从当前所有前驱都已排好的节点中均匀地选一个
    pub fn topological_order<R: Rng + ?Sized>(&self, rng: &mut R) -> Permutation {
        let mut order = Vec::with_capacity(self.nodes.len());
        self.sort_with(|ready| *ready.choose(rng).unwrap_or(&ready[0]), &mut order);
        order
    }

    // Kahn 算法，`pick` 决定下一个出队的节点
    fn sort_with<F: FnMut(&[Node]) -> Node>(&self, mut pick: F, order: &mut Permutation) {
        let n = self.nodes.len();
        let mut in_degree = vec![0_usize; n];
        let mut successors = vec![vec![]; n];
        for &(before, after) in &self.dense {
            in_degree[after] += 1;
            successors[before].push(after);
        }
        let mut ready: Vec<Node> = self
            .nodes
            .iter()
            .zip(&in_degree)
            .filter(|(_, d)| **d == 0)
            .map(|(&x, _)| x)
            .collect();
        while !ready.is_empty() {
            let u = pick(&ready);
            ready.retain(|&x| x != u);
            order.push(u);
            let Some(&k) = self.index.get(&u) else {
                continue;
            };
            for &v in &successors[k] {
                in_degree[v] -= 1;
                if in_degree[v] == 0 {
                    ready.push(self.nodes[v]);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample() -> Constraints {
        Constraints::new(&[1, 2, 3, 4, 5], &[(1, 3), (2, 4)]).unwrap()
    }

    #[test]
    fn test_respects() {
        let constraints = sample();
        assert!(constraints.respects(&[1, 2, 3, 4, 5]));
        assert!(!constraints.respects(&[3, 1, 2, 4, 5]));
        assert!(!constraints.respects(&[1, 4, 3, 2, 5]));
    }

    #[test]
    fn test_respects_matches_definition() {
        let constraints = sample();
        for p in [1, 2, 3, 4, 5].into_iter().permutations(5) {
            let index = |x| p.iter().position(|&y| y == x).unwrap();
            let expected = constraints
                .pairs()
                .iter()
                .all(|&(b, a)| index(b) < index(a));
            assert_eq!(constraints.respects(&p), expected, "{p:?}");
        }
    }

    #[test]
    fn test_missing_node_violates() {
        let constraints = sample();
        assert!(!constraints.respects(&[1, 2, 4, 5]));
    }

    #[test]
    fn test_unknown_node() {
        let error = Constraints::new(&[0, 1], &[(0, 7)]).unwrap_err();
        assert_eq!(error.kind, crate::ErrorKind::Configuration);
    }

    #[test]
    fn test_cycle() {
        let error = Constraints::new(&[0, 1, 2], &[(0, 1), (1, 2), (2, 0)]).unwrap_err();
        assert_eq!(error.kind, crate::ErrorKind::Unsatisfiable);
        let error = Constraints::new(&[0, 1], &[(1, 1)]).unwrap_err();
        assert_eq!(error.kind, crate::ErrorKind::Unsatisfiable);
    }

    #[test]
    fn test_sparse_node_ids() {
        let nodes = [0, 50_000_000, usize::MAX];
        let constraints = Constraints::new(&nodes, &[(0, usize::MAX), (usize::MAX, 50_000_000)])
            .unwrap();
        assert!(constraints.respects(&[0, usize::MAX, 50_000_000]));
        assert!(!constraints.respects(&[usize::MAX, 0, 50_000_000]));
        assert!(!constraints.respects(&[0, usize::MAX]));
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            constraints.topological_order(&mut rng),
            vec![0, usize::MAX, 50_000_000]
        );
        let error = Constraints::new(&nodes, &[(0, usize::MAX), (usize::MAX, 0)]).unwrap_err();
        assert_eq!(error.kind, crate::ErrorKind::Unsatisfiable);
    }

    #[test]
    fn test_topological_order() {
        let nodes: Vec<Node> = (0..8).collect();
        let pairs = [(0, 7), (7, 1), (1, 6), (6, 2), (3, 4)];
        let constraints = Constraints::new(&nodes, &pairs).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let order = constraints.topological_order(&mut rng);
            assert_eq!(order.iter().copied().sorted().collect::<Vec<_>>(), nodes);
            assert!(constraints.respects(&order));
        }
    }
}
