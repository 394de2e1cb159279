//! 优化方法的公共部分：求解结果，以及按配置分派到具体的求解方法
//!

use crate::config::SolverConfig;
use crate::interfaces::Interface;
use crate::objectives::Objective;
use crate::{Error, Permutation};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub mod genetic;
pub mod particle_swarm;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub algorithm: String,
    pub permutation: Permutation,
    pub fitness: f64,
    /// 每一代的最优适应度。粒子群算法在最前面多记录一个初始化后的最优值
    pub trace: Vec<f64>,
    /// 用时，单位为毫秒
    pub elapsed: u64,
}

impl SolverConfig {
    pub fn name(&self) -> &'static str {
        match self {
            SolverConfig::Genetic(_) => genetic::NAME,
            SolverConfig::ParticleSwarm(_) => particle_swarm::NAME,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        match self {
            SolverConfig::Genetic(ga) => ga.validate(),
            SolverConfig::ParticleSwarm(pso) => pso.validate(),
        }
    }

    pub fn solve<O: Objective, R: Rng + ?Sized>(
        &self,
        objective: &O,
        interface: &dyn Interface,
        rng: &mut R,
    ) -> Result<OptimizationResult, Error> {
        match self {
            SolverConfig::Genetic(ga) => ga.optimize(objective, interface, rng),
            SolverConfig::ParticleSwarm(pso) => pso.optimize(objective, interface, rng),
        }
    }
}

/// 第一个最小值的下标，空切片返回 0
pub(crate) fn argmin(values: &[f64]) -> usize {
    (0..values.len())
        .min_by(|&a, &b| values[a].total_cmp(&values[b]))
        .unwrap_or(0)
}

pub(crate) fn check_rate(name: &str, value: f64) -> Result<(), Error> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::configuration(format!(
            "{name} 应当在 [0, 1] 区间内，实际为 {value}"
        )))
    }
}
