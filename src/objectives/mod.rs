//! 目标函数接口，以及默认目标函数的实现
//!
//! 适应度越低越好。违反先后约束或者经过禁止转移的序列的适应度为 [`INFEASIBLE`]，比任何有限值都差。

use crate::constraints::Constraints;
use crate::costs::CostModel;
use crate::{Node, INFEASIBLE};
use itertools::Itertools;

pub trait Objective {
    /// 计算一个序列的适应度
    fn evaluate(&self, permutation: &[Node]) -> f64;

    fn constraints(&self) -> &Constraints;

    fn nodes(&self) -> &[Node] {
        self.constraints().nodes()
    }
}

/// 沿序列累加相邻两个节点之间的转移代价
#[derive(Debug, Clone)]
pub struct SopObjective<C: CostModel> {
    costs: C,
    constraints: Constraints,
}

impl<C: CostModel> SopObjective<C> {
    pub fn new(costs: C, constraints: Constraints) -> Self {
        Self { costs, constraints }
    }

    pub fn costs(&self) -> &C {
        &self.costs
    }
}

impl<C: CostModel> Objective for SopObjective<C> {
    fn evaluate(&self, permutation: &[Node]) -> f64 {
        if !self.constraints.respects(permutation) {
            return INFEASIBLE;
        }
        let mut total = 0.0;
        for (&from, &to) in permutation.iter().tuple_windows() {
            match self.costs.cost(from, to) {
                Some(cost) => total += cost,
                None => return INFEASIBLE,
            }
        }
        total
    }

    fn constraints(&self) -> &Constraints {
        &self.constraints
    }
}
