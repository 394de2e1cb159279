//! 代价的查询接口，以及带权有向图和代价矩阵两种实现
//!

use crate::Node;

pub mod graph;
pub mod matrix;

pub trait CostModel {
    /// 从 `from` 转移到 `to` 的代价；不允许直接转移时返回 `None`
    fn cost(&self, from: Node, to: Node) -> Option<f64>;
}

impl<C: CostModel + ?Sized> CostModel for &C {
    fn cost(&self, from: Node, to: Node) -> Option<f64> {
        (**self).cost(from, to)
    }
}
