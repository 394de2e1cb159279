//! 算子接口，以及排列空间上的默认算子（初始化、杂交、变异、交换序列）
//!

use crate::constraints::Constraints;
use crate::{Node, Permutation};
use rand::Rng;

pub mod crossover;
pub mod initialization;
pub mod mutation;
pub mod swaps;

pub use crossover::OrderCrossover;
pub use mutation::SwapMutation;

pub trait Crossover {
    /// 基于两个可行的父代生成一个可行的子代，在尝试次数内找不到时返回 `None`
    fn crossover<R: Rng + ?Sized>(
        &self,
        parent1: &[Node],
        parent2: &[Node],
        constraints: &Constraints,
        rng: &mut R,
    ) -> Option<Permutation>;
}

pub trait Mutation {
    /// 对一个可行解做随机扰动，扰动后仍然可行才保留；返回是否发生了变异
    fn mutate<R: Rng + ?Sized>(
        &self,
        individual: &mut Permutation,
        constraints: &Constraints,
        rng: &mut R,
    ) -> bool;
}
